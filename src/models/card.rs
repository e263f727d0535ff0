use serde::{Deserialize, Serialize};

use super::Label;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CardRole {
    Assignee,
    Watcher,
}

impl CardRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardRole::Assignee => "ASSIGNEE",
            CardRole::Watcher => "WATCHER",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ASSIGNEE" => Some(CardRole::Assignee),
            "WATCHER" => Some(CardRole::Watcher),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardMember {
    pub id: String,
    pub card_id: String,
    pub user_id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub role: CardRole,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub position: i32,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub achieved: bool,
    /// ISO 8601
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    /// 1 = highest
    #[serde(default)]
    pub priority: Option<i32>,
    pub column_id: String,
    #[serde(default)]
    pub members: Vec<CardMember>,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub comment_count: Option<u32>,
    #[serde(default)]
    pub attachment_count: Option<u32>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Card {
    pub fn role_of(&self, user_id: &str) -> Option<CardRole> {
        self.members.iter().find(|m| m.user_id == user_id).map(|m| m.role)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardCreate {
    pub title: String,
    pub column_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub achieved: Option<bool>,
    /// Server clears the due date when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clear_due_date: Option<bool>,
}

/// Body of `PUT /cards/{id}/move`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardMoveRequest {
    pub target_column_id: String,
    pub new_position: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub edited: bool,
    pub card_id: String,
    pub author_id: String,
    #[serde(default)]
    pub author_username: String,
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentCreate {
    pub content: String,
    pub card_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLog {
    pub id: String,
    pub entity_id: String,
    pub entity_type: String,
    /// CREATED, UPDATED, MOVED, DELETED
    pub action: String,
    #[serde(default)]
    pub details: String,
    pub timestamp: String,
    pub performed_by: String,
    #[serde(default)]
    pub performed_by_username: Option<String>,
}
