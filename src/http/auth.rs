use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use super::{HttpRequest, HttpResponse, Interceptor, Next};
use crate::error::{ApiError, ApiResult};
use crate::models::{AuthResponse, RefreshTokenRequest};
use crate::session::Session;

pub const REFRESH_PATH: &str = "/auth/refresh";

const AUTH_ENDPOINTS: [&str; 6] = [
    "/auth/login",
    "/auth/register",
    REFRESH_PATH,
    "/auth/verify",
    "/auth/forgot-password",
    "/auth/reset-password",
];

/// Endpoints that never carry a bearer token and never trigger a refresh
pub fn is_auth_endpoint(path: &str) -> bool {
    let path = path.split('?').next().unwrap_or(path);
    AUTH_ENDPOINTS.contains(&path)
}

/// Attaches the bearer token and recovers from a 401 with one refresh
///
/// Concurrent 401s each refresh on their own; there is no coalescing.
pub struct AuthInterceptor {
    session: Arc<Session>,
}

impl AuthInterceptor {
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }

    fn authorize(&self, mut request: HttpRequest) -> HttpRequest {
        if let Some(token) = self.session.access_token() {
            request.set_header("Authorization", format!("Bearer {}", token));
        }
        request
    }

    /// Network failures (status 0) and 5xx end the session, first attempt or retry
    fn end_on_server_failure(&self, result: ApiResult<HttpResponse>) -> ApiResult<HttpResponse> {
        if let Err(e) = &result {
            if matches!(e.status(), Some(0) | Some(500..=599)) {
                warn!("Clearing session after {}", e);
                self.session.clear();
            }
        }
        result
    }

    async fn refresh(&self, next: Next<'_>) -> ApiResult<AuthResponse> {
        let refresh_token = self.session.refresh_token().ok_or(ApiError::SessionExpired)?;
        let request = HttpRequest::post(REFRESH_PATH).json(&RefreshTokenRequest { refresh_token })?;
        next.run(request).await?.json()
    }

    async fn refresh_and_retry(&self, request: HttpRequest, next: Next<'_>) -> ApiResult<HttpResponse> {
        self.session.begin_refresh();
        match self.refresh(next).await {
            Ok(auth) => {
                info!("Access token refreshed");
                self.session.store_auth(&auth);
                // A second 401 is returned as is
                let retried = next.run(self.authorize(request)).await;
                self.end_on_server_failure(retried)
            }
            Err(e) => {
                warn!("Token refresh failed: {}", e);
                self.session.end_refresh();
                self.session.clear();
                Err(ApiError::SessionExpired)
            }
        }
    }
}

#[async_trait(?Send)]
impl Interceptor for AuthInterceptor {
    async fn intercept(&self, request: HttpRequest, next: Next<'_>) -> ApiResult<HttpResponse> {
        if is_auth_endpoint(&request.path) {
            return next.run(request).await;
        }

        match next.run(self.authorize(request.clone())).await {
            Err(e) if e.is_unauthorized() => self.refresh_and_retry(request, next).await,
            other => self.end_on_server_failure(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionState;
    use crate::storage::KeyValueStore;
    use crate::test_support::{auth_json, harness};
    use futures::executor::block_on;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_bearer_attached() {
        let h = harness();
        h.backend.respond(200, "[]");
        block_on(h.api.send(HttpRequest::get("/boards"))).unwrap();
        assert_eq!(h.backend.requests()[0].header_value("Authorization"), Some("Bearer access-1"));
    }

    #[test]
    fn test_auth_endpoints_skip_bearer_and_refresh() {
        let h = harness();
        h.backend.respond(401, r#"{"message":"Bad credentials"}"#);
        let err = block_on(h.api.send(HttpRequest::post("/auth/login"))).unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(h.backend.requests().len(), 1);
        assert!(h.backend.requests()[0].header_value("Authorization").is_none());
        assert!(h.session.is_authenticated());
    }

    #[test]
    fn test_401_refreshes_once_and_retries_with_new_token() {
        let h = harness();
        h.backend
            .respond(401, "")
            .respond_json(200, auth_json("access-2", "refresh-2"))
            .respond(200, r#"[{"id":"w1","name":"Team"}]"#);

        let response = block_on(h.api.send(HttpRequest::get("/workspaces"))).unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(
            h.backend.paths(),
            vec!["GET /workspaces", "POST /auth/refresh", "GET /workspaces"]
        );
        let requests = h.backend.requests();
        assert!(requests[1].header_value("Authorization").is_none());
        assert_eq!(
            requests[1].body,
            Some(crate::http::RequestBody::Json(serde_json::json!({ "refreshToken": "refresh-1" })))
        );
        assert_eq!(requests[2].header_value("Authorization"), Some("Bearer access-2"));
        assert_eq!(h.session.refresh_token().as_deref(), Some("refresh-2"));
        assert_eq!(h.session.state(), SessionState::Authenticated);
    }

    #[test]
    fn test_second_401_is_not_refreshed_again() {
        let h = harness();
        h.backend
            .respond(401, "")
            .respond_json(200, auth_json("access-2", "refresh-2"))
            .respond(401, "");

        let err = block_on(h.api.send(HttpRequest::get("/boards"))).unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(h.backend.requests().len(), 3);
    }

    #[test]
    fn test_refresh_failure_clears_session_and_notifies() {
        let h = harness();
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();
        h.session.set_logout_listener(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        h.backend.respond(401, "").respond(401, "");

        let err = block_on(h.api.send(HttpRequest::get("/boards"))).unwrap_err();
        assert_eq!(err, ApiError::SessionExpired);
        assert!(!h.session.is_authenticated());
        assert_eq!(h.session.state(), SessionState::Unauthenticated);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(h.store.len(), 0);
    }

    #[test]
    fn test_missing_refresh_token_clears_session() {
        let h = harness();
        h.store.remove(crate::storage::keys::REFRESH_TOKEN);
        h.backend.respond(401, "");
        let err = block_on(h.api.send(HttpRequest::get("/boards"))).unwrap_err();
        assert_eq!(err, ApiError::SessionExpired);
        assert_eq!(h.backend.requests().len(), 1);
        assert!(!h.session.is_authenticated());
    }

    #[test]
    fn test_network_error_and_5xx_clear_session() {
        let h = harness();
        h.backend.fail_network();
        assert!(matches!(block_on(h.api.send(HttpRequest::get("/boards"))), Err(ApiError::Network(_))));
        assert!(!h.session.is_authenticated());

        let h = harness();
        h.backend.respond(503, "");
        assert_eq!(block_on(h.api.send(HttpRequest::get("/boards"))).unwrap_err().status(), Some(503));
        assert!(!h.session.is_authenticated());
    }

    #[test]
    fn test_server_failure_on_retry_clears_session() {
        let h = harness();
        h.backend
            .respond(401, "")
            .respond_json(200, auth_json("access-2", "refresh-2"))
            .respond(502, "");
        let err = block_on(h.api.send(HttpRequest::get("/boards"))).unwrap_err();
        assert_eq!(err.status(), Some(502));
        assert!(!h.session.is_authenticated());

        let h = harness();
        h.backend
            .respond(401, "")
            .respond_json(200, auth_json("access-2", "refresh-2"))
            .fail_network();
        assert!(matches!(block_on(h.api.send(HttpRequest::get("/boards"))), Err(ApiError::Network(_))));
        assert!(!h.session.is_authenticated());
        assert_eq!(h.backend.requests().len(), 3);
    }

    #[test]
    fn test_client_errors_keep_session() {
        let h = harness();
        h.backend.respond(404, "");
        assert!(block_on(h.api.send(HttpRequest::get("/boards/missing"))).is_err());
        assert!(h.session.is_authenticated());
    }

    #[test]
    fn test_is_auth_endpoint() {
        assert!(is_auth_endpoint("/auth/verify?token=abc"));
        assert!(is_auth_endpoint("/auth/refresh"));
        assert!(!is_auth_endpoint("/auth/logout"));
        assert!(!is_auth_endpoint("/boards"));
    }
}
