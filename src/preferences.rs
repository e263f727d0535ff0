//! User Preferences
//!
//! Typed accessors over local storage. Values are stored as plain strings
//! (favorites as a JSON array) with no versioning.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::storage::{keys, KeyValueStore, StorageError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            "system" => Some(Theme::System),
            _ => None,
        }
    }

    /// Concrete theme after resolving `System` against the OS preference
    pub fn resolve(&self, prefers_dark: bool) -> Theme {
        match self {
            Theme::System if prefers_dark => Theme::Dark,
            Theme::System => Theme::Light,
            other => *other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Grid => "grid",
            ViewMode::List => "list",
        }
    }
}

#[derive(Clone)]
pub struct Preferences {
    store: Arc<dyn KeyValueStore>,
}

impl Preferences {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn theme(&self) -> Theme {
        self.store
            .get(keys::THEME)
            .and_then(|v| Theme::parse(&v))
            .unwrap_or_default()
    }

    pub fn set_theme(&self, theme: Theme) -> Result<(), StorageError> {
        self.store.set(keys::THEME, theme.as_str())
    }

    pub fn sidebar_collapsed(&self) -> bool {
        self.flag(keys::SIDEBAR_COLLAPSED, false)
    }

    pub fn set_sidebar_collapsed(&self, collapsed: bool) -> Result<(), StorageError> {
        self.set_flag(keys::SIDEBAR_COLLAPSED, collapsed)
    }

    pub fn view_mode(&self) -> ViewMode {
        match self.store.get(keys::BOARD_VIEW_MODE).as_deref() {
            Some("list") => ViewMode::List,
            _ => ViewMode::Grid,
        }
    }

    pub fn set_view_mode(&self, mode: ViewMode) -> Result<(), StorageError> {
        self.store.set(keys::BOARD_VIEW_MODE, mode.as_str())
    }

    // ========================
    // Favorites
    // ========================

    /// Favorite board ids. A corrupt entry reads as empty.
    pub fn favorite_boards(&self) -> BTreeSet<String> {
        self.store
            .get(keys::FAVORITE_BOARDS)
            .and_then(|raw| serde_json::from_str::<Vec<String>>(&raw).ok())
            .map(|ids| ids.into_iter().collect())
            .unwrap_or_default()
    }

    pub fn is_favorite(&self, board_id: &str) -> bool {
        self.favorite_boards().contains(board_id)
    }

    /// Flip a board's favorite flag, returning the new state
    pub fn toggle_favorite(&self, board_id: &str) -> Result<bool, StorageError> {
        let mut favorites = self.favorite_boards();
        let now_favorite = if favorites.remove(board_id) {
            false
        } else {
            favorites.insert(board_id.to_string());
            true
        };
        let ids: Vec<&String> = favorites.iter().collect();
        let raw = serde_json::to_string(&ids).unwrap_or_else(|_| "[]".to_string());
        self.store.set(keys::FAVORITE_BOARDS, &raw)?;
        Ok(now_favorite)
    }

    // ========================
    // Workspace selection
    // ========================

    pub fn current_workspace(&self) -> Option<String> {
        self.store.get(keys::CURRENT_WORKSPACE).filter(|id| !id.is_empty())
    }

    pub fn set_current_workspace(&self, workspace_id: Option<&str>) -> Result<(), StorageError> {
        match workspace_id {
            Some(id) => self.store.set(keys::CURRENT_WORKSPACE, id),
            None => {
                self.store.remove(keys::CURRENT_WORKSPACE);
                Ok(())
            }
        }
    }

    // ========================
    // Notification settings
    // ========================

    pub fn notify_email_assigned(&self) -> bool {
        self.flag(keys::NOTIFY_EMAIL_ASSIGNED, true)
    }

    pub fn set_notify_email_assigned(&self, enabled: bool) -> Result<(), StorageError> {
        self.set_flag(keys::NOTIFY_EMAIL_ASSIGNED, enabled)
    }

    pub fn notify_email_digest(&self) -> bool {
        self.flag(keys::NOTIFY_EMAIL_DIGEST, false)
    }

    pub fn set_notify_email_digest(&self, enabled: bool) -> Result<(), StorageError> {
        self.set_flag(keys::NOTIFY_EMAIL_DIGEST, enabled)
    }

    fn flag(&self, key: &str, default: bool) -> bool {
        match self.store.get(key).as_deref() {
            Some("true") => true,
            Some("false") => false,
            _ => default,
        }
    }

    fn set_flag(&self, key: &str, value: bool) -> Result<(), StorageError> {
        self.store.set(key, if value { "true" } else { "false" })
    }
}
