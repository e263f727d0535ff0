//! User Endpoints

use crate::error::ApiResult;
use crate::http::{ApiClient, HttpRequest};
use crate::models::{ChangePasswordRequest, ProfileUpdate, User, UserSummary};
use crate::session::Session;

pub async fn current_user(api: &ApiClient) -> ApiResult<User> {
    api.fetch(HttpRequest::get("/users/me")).await
}

/// Update the profile and refresh the cached user
pub async fn update_profile(api: &ApiClient, session: &Session, update: &ProfileUpdate) -> ApiResult<User> {
    let user: User = api.fetch(HttpRequest::put("/users/me").json(update)?).await?;
    session.set_user(&user);
    Ok(user)
}

pub async fn change_password(api: &ApiClient, old_password: &str, new_password: &str) -> ApiResult<()> {
    let body = ChangePasswordRequest {
        old_password: old_password.to_string(),
        new_password: new_password.to_string(),
    };
    api.execute(HttpRequest::put("/users/me/change-password").json(&body)?).await
}

pub async fn search_users(api: &ApiClient, keyword: &str) -> ApiResult<Vec<UserSummary>> {
    api.fetch(HttpRequest::get("/users/search").query("keyword", keyword.trim())).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::harness;
    use futures::executor::block_on;

    #[test]
    fn test_search_users_trims_keyword() {
        let h = harness();
        h.backend.respond(200, r#"[{"id":"u2","username":"bob","email":"bob@example.com"}]"#);
        let users = block_on(search_users(&h.api, "  bo ")).unwrap();
        assert_eq!(users[0].username, "bob");
        assert_eq!(h.backend.requests()[0].query, vec![("keyword".to_string(), "bo".to_string())]);
    }
}
