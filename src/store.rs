//! Global Application State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity.

use leptos::prelude::*;
use percent_encoding::percent_decode_str;
use reactive_stores::Store;

use crate::models::{Board, User, Workspace};
use crate::notifications::NotificationFeed;

/// Which page is showing
#[derive(Clone, Debug, Default, PartialEq)]
pub enum View {
    #[default]
    Login,
    Register,
    ForgotPassword,
    /// Board list of the current workspace, or all boards
    Boards,
    Board(String),
    Search(String),
    Settings,
    /// Members, settings and activity of one workspace
    Workspace(String),
    /// The signed-in user's activity
    Activity,
    /// Token from the verification email
    VerifyEmail(String),
    /// Token from the password reset email
    ResetPassword(String),
}

impl View {
    pub fn requires_auth(&self) -> bool {
        !matches!(
            self,
            View::Login | View::Register | View::ForgotPassword | View::VerifyEmail(_) | View::ResetPassword(_)
        )
    }
}

/// Page for an emailed link like `/reset-password?token=...`, if the
/// location is one
pub fn view_from_location(path: &str, search: &str) -> Option<View> {
    let token = search
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "token")
        .map(|(_, value)| percent_decode_str(&value.replace('+', " ")).decode_utf8_lossy().into_owned())
        .filter(|token| !token.is_empty())?;
    match path.trim_end_matches('/') {
        "/verify-email" => Some(View::VerifyEmail(token)),
        "/reset-password" => Some(View::ResetPassword(token)),
        _ => None,
    }
}

/// Global application state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct AppState {
    pub view: View,
    pub user: Option<User>,
    pub workspaces: Vec<Workspace>,
    /// `None` shows boards from every workspace
    pub current_workspace_id: Option<String>,
    pub boards: Vec<Board>,
    pub notifications: NotificationFeed,
    /// Bumped to force the board list to reload
    pub boards_version: u32,
}

/// Type alias for the store
pub type AppStore = Store<AppState>;

/// Get the app store from context
pub fn use_app_store() -> AppStore {
    expect_context::<AppStore>()
}

/// The saved workspace if it still exists, else the first one
pub fn pick_current_workspace(saved: Option<&str>, workspaces: &[Workspace]) -> Option<String> {
    saved
        .and_then(|id| workspaces.iter().find(|w| w.id == id))
        .or_else(|| workspaces.first())
        .map(|w| w.id.clone())
}

// ========================
// Store Helper Functions
// ========================

pub fn store_upsert_board(store: &AppStore, board: Board) {
    let field = store.boards();
    let mut boards = field.write();
    match boards.iter_mut().find(|b| b.id == board.id) {
        Some(existing) => *existing = board,
        None => boards.push(board),
    }
}

pub fn store_remove_board(store: &AppStore, board_id: &str) {
    store.boards().write().retain(|b| b.id != board_id);
}

pub fn store_add_workspace(store: &AppStore, workspace: Workspace) {
    store.workspaces().write().push(workspace);
}

pub fn store_update_workspace(store: &AppStore, updated: Workspace) {
    if let Some(workspace) = store.workspaces().write().iter_mut().find(|w| w.id == updated.id) {
        *workspace = updated;
    }
}

pub fn store_remove_workspace(store: &AppStore, workspace_id: &str) {
    store.workspaces().write().retain(|w| w.id != workspace_id);
    if store.current_workspace_id().get_untracked().as_deref() == Some(workspace_id) {
        store.current_workspace_id().set(None);
    }
}

pub fn reload_boards(store: &AppStore) {
    *store.boards_version().write() += 1;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workspace(id: &str) -> Workspace {
        Workspace {
            id: id.into(),
            name: id.to_uppercase(),
            description: None,
            is_private: false,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_pick_saved_workspace() {
        let all = vec![workspace("w1"), workspace("w2")];
        assert_eq!(pick_current_workspace(Some("w2"), &all), Some("w2".into()));
    }

    #[test]
    fn test_pick_falls_back_to_first() {
        let all = vec![workspace("w1"), workspace("w2")];
        assert_eq!(pick_current_workspace(Some("gone"), &all), Some("w1".into()));
        assert_eq!(pick_current_workspace(None, &all), Some("w1".into()));
        assert_eq!(pick_current_workspace(Some("w1"), &[]), None);
    }

    fn board(id: &str, name: &str) -> Board {
        serde_json::from_value(serde_json::json!({ "id": id, "name": name, "workspaceId": "w1" })).unwrap()
    }

    #[test]
    fn test_upsert_board_replaces_or_appends() {
        let owner = Owner::new();
        owner.with(|| {
            let store = Store::new(AppState::default());
            store_upsert_board(&store, board("b1", "One"));
            store_upsert_board(&store, board("b2", "Two"));
            store_upsert_board(&store, board("b1", "Renamed"));
            let names: Vec<_> = store.boards().get_untracked().into_iter().map(|b| b.name).collect();
            assert_eq!(names, vec!["Renamed", "Two"]);

            store.current_workspace_id().set(Some("w1".into()));
            store_remove_workspace(&store, "w1");
            assert_eq!(store.current_workspace_id().get_untracked(), None);
            reload_boards(&store);
            assert_eq!(store.boards_version().get_untracked(), 1);
        });
    }

    #[test]
    fn test_auth_views() {
        assert!(!View::Login.requires_auth());
        assert!(View::Board("b1".into()).requires_auth());
        assert!(View::Workspace("w1".into()).requires_auth());
        assert!(!View::ResetPassword("t".into()).requires_auth());
    }

    #[test]
    fn test_emailed_links() {
        assert_eq!(
            view_from_location("/verify-email", "?token=abc%2Bdef"),
            Some(View::VerifyEmail("abc+def".into()))
        );
        assert_eq!(
            view_from_location("/reset-password/", "?lang=en&token=t-1"),
            Some(View::ResetPassword("t-1".into()))
        );
    }

    #[test]
    fn test_other_locations_are_ignored() {
        assert_eq!(view_from_location("/", ""), None);
        assert_eq!(view_from_location("/verify-email", ""), None);
        assert_eq!(view_from_location("/verify-email", "?token="), None);
        assert_eq!(view_from_location("/boards", "?token=abc"), None);
    }
}
