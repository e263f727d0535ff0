use serde::{Deserialize, Serialize};

use super::Workspace;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchBoardItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub workspace_id: String,
    pub workspace_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchColumnItem {
    pub id: String,
    pub name: String,
    pub board_id: String,
    pub board_name: String,
    pub workspace_id: String,
    pub workspace_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCardItem {
    pub id: String,
    pub title: String,
    pub column_id: String,
    pub column_name: String,
    pub board_id: String,
    pub board_name: String,
    pub workspace_id: String,
    pub workspace_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchResult {
    pub workspaces: Vec<Workspace>,
    pub boards: Vec<SearchBoardItem>,
    pub columns: Vec<SearchColumnItem>,
    pub cards: Vec<SearchCardItem>,
}

impl SearchResult {
    pub fn is_empty(&self) -> bool {
        self.workspaces.is_empty() && self.boards.is_empty() && self.columns.is_empty() && self.cards.is_empty()
    }

    pub fn total(&self) -> usize {
        self.workspaces.len() + self.boards.len() + self.columns.len() + self.cards.len()
    }
}
