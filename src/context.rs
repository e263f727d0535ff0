//! Application Context
//!
//! Shared services provided via Leptos Context API.

use std::sync::Arc;

use leptos::prelude::*;

use crate::config::AppConfig;
use crate::http::{ApiClient, LoadingCounter, ReqwestBackend};
use crate::preferences::Preferences;
use crate::session::Session;
use crate::storage::{BrowserStorage, KeyValueStore};

/// Long-lived services; cheap to clone
#[derive(Clone)]
pub struct Services {
    pub config: Arc<AppConfig>,
    pub api: Arc<ApiClient>,
    pub session: Arc<Session>,
    pub prefs: Preferences,
    pub loading: Arc<LoadingCounter>,
}

impl Services {
    /// Browser storage, `reqwest` transport, default interceptor chain
    pub fn browser(config: AppConfig) -> Self {
        let store: Arc<dyn KeyValueStore> = Arc::new(BrowserStorage);
        let session = Arc::new(Session::new(store.clone()));
        let loading = Arc::new(LoadingCounter::new());
        let backend = Arc::new(ReqwestBackend::new(config.clone()));
        let api = ApiClient::with_default_chain(backend, session.clone(), loading.clone());
        Self {
            config: Arc::new(config),
            api: Arc::new(api),
            session,
            prefs: Preferences::new(store),
            loading,
        }
    }
}

/// Get the services from context
pub fn use_services() -> Services {
    expect_context::<Services>()
}
