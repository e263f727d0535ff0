//! Authentication Endpoints

use tracing::warn;

use crate::error::ApiResult;
use crate::http::{ApiClient, HttpRequest};
use crate::models::{AuthResponse, LoginRequest, RegisterRequest, ResetPasswordRequest};
use crate::session::Session;

/// `identifier` is a username or an email; both go in the `login` field
pub async fn login(api: &ApiClient, session: &Session, identifier: &str, password: &str) -> ApiResult<AuthResponse> {
    let body = LoginRequest {
        login: identifier.trim().to_string(),
        password: password.to_string(),
    };
    let auth: AuthResponse = api.fetch(HttpRequest::post("/auth/login").json(&body)?).await?;
    session.store_auth(&auth);
    Ok(auth)
}

pub async fn register(api: &ApiClient, session: &Session, request: &RegisterRequest) -> ApiResult<AuthResponse> {
    let auth: AuthResponse = api.fetch(HttpRequest::post("/auth/register").json(request)?).await?;
    session.store_auth(&auth);
    Ok(auth)
}

/// Best-effort server logout; the local session is cleared regardless
pub async fn logout(api: &ApiClient, session: &Session) {
    if session.is_authenticated() {
        if let Err(e) = api.execute(HttpRequest::post("/auth/logout").skip_loading()).await {
            warn!("Server logout failed: {}", e);
        }
    }
    session.clear();
}

pub async fn verify_email(api: &ApiClient, token: &str) -> ApiResult<()> {
    api.execute(HttpRequest::get("/auth/verify").query("token", token)).await
}

pub async fn forgot_password(api: &ApiClient, email: &str) -> ApiResult<()> {
    api.execute(HttpRequest::post("/auth/forgot-password").query("email", email.trim())).await
}

pub async fn reset_password(api: &ApiClient, token: &str, new_password: &str) -> ApiResult<()> {
    let body = ResetPasswordRequest {
        token: token.to_string(),
        new_password: new_password.to_string(),
    };
    api.execute(HttpRequest::post("/auth/reset-password").json(&body)?).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{auth_json, harness};
    use futures::executor::block_on;

    #[test]
    fn test_login_maps_identifier_and_stores_session() {
        let h = harness();
        h.session.clear();
        h.backend.respond_json(200, auth_json("access-9", "refresh-9"));
        let auth = block_on(login(&h.api, &h.session, " alice@example.com ", "Secret#123")).unwrap();
        assert_eq!(auth.access_token, "access-9");
        assert_eq!(h.session.access_token().as_deref(), Some("access-9"));
        assert_eq!(
            h.backend.requests()[0].body,
            Some(crate::http::RequestBody::Json(serde_json::json!({
                "login": "alice@example.com",
                "password": "Secret#123"
            })))
        );
    }

    #[test]
    fn test_verify_and_reset_skip_bearer() {
        let h = harness();
        h.backend.respond(200, "Email verified").respond(200, "Password reset");
        block_on(verify_email(&h.api, "tok-1")).unwrap();
        block_on(reset_password(&h.api, "tok-2", "N3w#Secret")).unwrap();
        let requests = h.backend.requests();
        assert_eq!(requests[0].query, vec![("token".to_string(), "tok-1".to_string())]);
        assert_eq!(
            requests[1].body,
            Some(crate::http::RequestBody::Json(serde_json::json!({ "token": "tok-2", "newPassword": "N3w#Secret" })))
        );
        assert!(requests.iter().all(|r| r.header_value("Authorization").is_none()));
    }

    #[test]
    fn test_logout_clears_even_when_server_fails() {
        let h = harness();
        h.backend.respond(500, "");
        block_on(logout(&h.api, &h.session));
        assert!(!h.session.is_authenticated());
        assert_eq!(h.backend.paths(), vec!["POST /auth/logout"]);
    }
}
