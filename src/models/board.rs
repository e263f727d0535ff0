use serde::{Deserialize, Serialize};

use super::MemberRole;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub is_private: bool,
    /// Some proxies rewrite keys to snake_case
    #[serde(default, alias = "background_color")]
    pub background_color: Option<String>,
    #[serde(default)]
    pub position: i32,
    pub workspace_id: String,
    #[serde(default)]
    pub workspace_name: Option<String>,
    #[serde(default)]
    pub members: Vec<BoardMember>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Board {
    /// Role of `user_id` on this board, if listed as a member
    pub fn role_of(&self, user_id: &str) -> Option<MemberRole> {
        self.members.iter().find(|m| m.user_id == user_id).map(|m| m.role)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardMember {
    pub id: String,
    pub board_id: String,
    pub user_id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub role: MemberRole,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardCreate {
    pub name: String,
    pub workspace_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_private: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_private: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_background_color_snake_case_alias() {
        let board: Board = serde_json::from_str(
            r##"{"id":"b1","name":"Roadmap","workspaceId":"w1","background_color":"#0079bf"}"##,
        ).unwrap();
        assert_eq!(board.background_color.as_deref(), Some("#0079bf"));
        assert!(!board.archived);
    }

    #[test]
    fn test_update_omits_unset_fields() {
        let update = BoardUpdate { archived: Some(true), ..Default::default() };
        assert_eq!(serde_json::to_string(&update).unwrap(), r#"{"archived":true}"#);
    }

    #[test]
    fn test_role_of_member() {
        let board: Board = serde_json::from_str(
            r#"{"id":"b1","name":"R","workspaceId":"w1","members":[{"id":"m1","boardId":"b1","userId":"u1","role":"ADMIN"}]}"#,
        ).unwrap();
        assert_eq!(board.role_of("u1"), Some(MemberRole::Admin));
        assert_eq!(board.role_of("u2"), None);
    }
}
