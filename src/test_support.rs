//! Test doubles shared by unit tests

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::{ApiError, ApiResult};
use crate::http::{ApiClient, HttpBackend, HttpRequest, HttpResponse, LoadingCounter};
use crate::models::{AuthResponse, BoardColumn, Card, User};
use crate::session::Session;
use crate::storage::MemoryStore;

/// Backend answering from a script, in order, and recording every request
#[derive(Default)]
pub struct MockBackend {
    script: Mutex<VecDeque<ApiResult<HttpResponse>>>,
    log: Mutex<Vec<HttpRequest>>,
}

impl MockBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, status: u16, body: &str) -> &Self {
        self.script.lock().push_back(Ok(HttpResponse::new(status, body)));
        self
    }

    pub fn respond_json(&self, status: u16, body: serde_json::Value) -> &Self {
        self.respond(status, &body.to_string())
    }

    pub fn fail_network(&self) -> &Self {
        self.script.lock().push_back(Err(ApiError::Network("connection refused".into())));
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.log.lock().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.log.lock().iter().map(|r| format!("{} {}", r.method, r.path)).collect()
    }
}

#[async_trait(?Send)]
impl HttpBackend for MockBackend {
    async fn send(&self, request: HttpRequest) -> ApiResult<HttpResponse> {
        self.log.lock().push(request);
        self.script
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Network("no scripted response".into())))
    }
}

pub struct Harness {
    pub backend: Arc<MockBackend>,
    pub store: Arc<MemoryStore>,
    pub session: Arc<Session>,
    pub loading: Arc<LoadingCounter>,
    pub api: ApiClient,
}

/// Full default chain over a mock backend, signed in as `alice`
pub fn harness() -> Harness {
    let backend = MockBackend::new();
    let store = Arc::new(MemoryStore::new());
    let session = Arc::new(Session::new(store.clone()));
    session.store_auth(&auth_response("access-1", "refresh-1"));
    let loading = Arc::new(LoadingCounter::new());
    let api = ApiClient::with_default_chain(backend.clone(), session.clone(), loading.clone());
    Harness { backend, store, session, loading, api }
}

pub fn user() -> User {
    User {
        id: "u1".into(),
        username: "alice".into(),
        email: "alice@example.com".into(),
        active: Some(true),
        last_login: None,
        roles: vec!["ROLE_USER".into()],
    }
}

pub fn auth_response(access: &str, refresh: &str) -> AuthResponse {
    AuthResponse {
        access_token: access.into(),
        refresh_token: refresh.into(),
        user: user(),
    }
}

pub fn auth_json(access: &str, refresh: &str) -> serde_json::Value {
    serde_json::to_value(auth_response(access, refresh)).unwrap_or_default()
}

pub fn column(id: &str, position: i32) -> BoardColumn {
    BoardColumn {
        id: id.into(),
        name: format!("Column {}", id),
        position,
        wip_limit: None,
        archived: false,
        board_id: "b1".into(),
    }
}

pub fn card(id: &str, column_id: &str, position: i32) -> Card {
    Card {
        id: id.into(),
        title: format!("Card {}", id),
        description: None,
        position,
        archived: false,
        achieved: false,
        due_date: None,
        start_date: None,
        priority: None,
        column_id: column_id.into(),
        members: Vec::new(),
        labels: Vec::new(),
        comment_count: None,
        attachment_count: None,
        created_at: None,
        updated_at: None,
    }
}
