//! Persistent Key/Value Storage
//!
//! Browser local storage behind a trait so session and preference logic can
//! run against an in-memory map in tests.

use std::collections::HashMap;

use parking_lot::Mutex;
use thiserror::Error;
use tracing::warn;

/// Local storage keys
pub mod keys {
    pub const ACCESS_TOKEN: &str = "access_token";
    pub const REFRESH_TOKEN: &str = "refresh_token";
    pub const USER: &str = "user";
    pub const THEME: &str = "taskflow-theme";
    pub const SIDEBAR_COLLAPSED: &str = "taskflow_sidebar_collapsed";
    pub const BOARD_VIEW_MODE: &str = "taskflow_board_view_mode";
    pub const FAVORITE_BOARDS: &str = "taskflow-favorite-board-ids";
    pub const CURRENT_WORKSPACE: &str = "taskflow_current_workspace";
    pub const NOTIFY_EMAIL_ASSIGNED: &str = "taskflow-notify-email-assigned";
    pub const NOTIFY_EMAIL_DIGEST: &str = "taskflow-notify-email-digest";
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StorageError {
    #[error("local storage is not available")]
    Unavailable,
    #[error("failed to write '{key}': {reason}")]
    Write { key: String, reason: String },
}

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str);
}

/// `window.localStorage`
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

impl BrowserStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let storage = Self::storage().ok_or(StorageError::Unavailable)?;
        storage.set_item(key, value).map_err(|e| StorageError::Write {
            key: key.to_string(),
            reason: format!("{:?}", e),
        })
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = Self::storage() {
            if let Err(e) = storage.remove_item(key) {
                warn!("Failed to remove '{}' from local storage: {:?}", key, e);
            }
        }
    }
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.entries.lock().remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip_and_remove() {
        let store = MemoryStore::new();
        assert!(store.get(keys::THEME).is_none());
        store.set(keys::THEME, "dark").unwrap();
        assert_eq!(store.get(keys::THEME).as_deref(), Some("dark"));
        store.remove(keys::THEME);
        assert!(store.get(keys::THEME).is_none());
        assert_eq!(store.len(), 0);
    }
}
