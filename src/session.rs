//! Session State
//!
//! Tokens and the cached user live in persistent storage; the in-memory state
//! only tracks whether a refresh is in flight.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::models::{AuthResponse, User};
use crate::storage::{keys, KeyValueStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticated,
    Refreshing,
}

type LogoutListener = Arc<dyn Fn() + Send + Sync>;

pub struct Session {
    store: Arc<dyn KeyValueStore>,
    state: Mutex<SessionState>,
    on_logout: Mutex<Option<LogoutListener>>,
}

impl Session {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let state = if store.get(keys::ACCESS_TOKEN).is_some() {
            SessionState::Authenticated
        } else {
            SessionState::Unauthenticated
        };
        Self {
            store,
            state: Mutex::new(state),
            on_logout: Mutex::new(None),
        }
    }

    pub fn state(&self) -> SessionState {
        *self.state.lock()
    }

    /// An access token is stored
    pub fn is_authenticated(&self) -> bool {
        self.access_token().is_some()
    }

    pub fn access_token(&self) -> Option<String> {
        self.store.get(keys::ACCESS_TOKEN).filter(|t| !t.is_empty())
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.store.get(keys::REFRESH_TOKEN).filter(|t| !t.is_empty())
    }

    /// Cached user; unreadable JSON is treated as absent
    pub fn user(&self) -> Option<User> {
        let raw = self.store.get(keys::USER)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!("Discarding cached user: {}", e);
                None
            }
        }
    }

    /// Persist tokens and user from a login or refresh response
    pub fn store_auth(&self, auth: &AuthResponse) {
        if let Err(e) = self.store.set(keys::ACCESS_TOKEN, &auth.access_token) {
            warn!("Failed to persist access token: {}", e);
        }
        if let Err(e) = self.store.set(keys::REFRESH_TOKEN, &auth.refresh_token) {
            warn!("Failed to persist refresh token: {}", e);
        }
        self.set_user(&auth.user);
        *self.state.lock() = SessionState::Authenticated;
        debug!("Session stored for {}", auth.user.username);
    }

    pub fn set_user(&self, user: &User) {
        match serde_json::to_string(user) {
            Ok(raw) => {
                if let Err(e) = self.store.set(keys::USER, &raw) {
                    warn!("Failed to persist user: {}", e);
                }
            }
            Err(e) => warn!("Failed to encode user: {}", e),
        }
    }

    pub fn begin_refresh(&self) {
        *self.state.lock() = SessionState::Refreshing;
    }

    /// Leave `Refreshing` without new tokens (state follows what is stored)
    pub fn end_refresh(&self) {
        let mut state = self.state.lock();
        if *state == SessionState::Refreshing {
            *state = if self.access_token().is_some() {
                SessionState::Authenticated
            } else {
                SessionState::Unauthenticated
            };
        }
    }

    /// Called whenever the session ends so the UI can return to login
    pub fn set_logout_listener(&self, listener: impl Fn() + Send + Sync + 'static) {
        *self.on_logout.lock() = Some(Arc::new(listener));
    }

    /// Drop tokens and cached user, then notify the logout listener
    pub fn clear(&self) {
        self.store.remove(keys::ACCESS_TOKEN);
        self.store.remove(keys::REFRESH_TOKEN);
        self.store.remove(keys::USER);
        *self.state.lock() = SessionState::Unauthenticated;
        debug!("Session cleared");

        let listener = self.on_logout.lock().clone();
        if let Some(listener) = listener {
            listener();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn sample_auth(access: &str, refresh: &str) -> AuthResponse {
        AuthResponse {
            access_token: access.to_string(),
            refresh_token: refresh.to_string(),
            user: User {
                id: "u1".into(),
                username: "alice".into(),
                email: "alice@example.com".into(),
                active: Some(true),
                last_login: None,
                roles: vec!["ROLE_USER".into()],
            },
        }
    }

    #[test]
    fn test_initial_state_follows_stored_token() {
        let store = Arc::new(MemoryStore::new());
        assert_eq!(Session::new(store.clone()).state(), SessionState::Unauthenticated);
        store.set(keys::ACCESS_TOKEN, "a1").unwrap();
        let session = Session::new(store);
        assert_eq!(session.state(), SessionState::Authenticated);
        assert!(session.is_authenticated());
    }

    #[test]
    fn test_store_auth_persists_everything() {
        let store = Arc::new(MemoryStore::new());
        let session = Session::new(store.clone());
        session.store_auth(&sample_auth("a1", "r1"));
        assert_eq!(session.access_token().as_deref(), Some("a1"));
        assert_eq!(session.refresh_token().as_deref(), Some("r1"));
        assert_eq!(session.user().map(|u| u.username), Some("alice".to_string()));
        assert_eq!(session.state(), SessionState::Authenticated);
    }

    #[test]
    fn test_clear_removes_keys_and_fires_listener() {
        let store = Arc::new(MemoryStore::new());
        let session = Session::new(store.clone());
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();
        session.set_logout_listener(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        session.store_auth(&sample_auth("a1", "r1"));
        session.clear();
        assert_eq!(store.len(), 0);
        assert!(!session.is_authenticated());
        assert_eq!(session.state(), SessionState::Unauthenticated);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_corrupt_user_is_ignored() {
        let store = Arc::new(MemoryStore::new());
        store.set(keys::USER, "not json").unwrap();
        assert!(Session::new(store).user().is_none());
    }

    #[test]
    fn test_refresh_state_transitions() {
        let store = Arc::new(MemoryStore::new());
        let session = Session::new(store);
        session.store_auth(&sample_auth("a1", "r1"));
        session.begin_refresh();
        assert_eq!(session.state(), SessionState::Refreshing);
        session.end_refresh();
        assert_eq!(session.state(), SessionState::Authenticated);
    }
}
