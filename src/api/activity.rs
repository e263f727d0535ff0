//! Activity Log Endpoints

use crate::error::ApiResult;
use crate::http::{ApiClient, HttpRequest};
use crate::models::ActivityLog;

/// Which activity stream to read
#[derive(Debug, Clone, PartialEq)]
pub enum ActivityScope {
    Entity(String),
    Workspace(String),
    Mine,
}

pub async fn list_activity(api: &ApiClient, scope: &ActivityScope) -> ApiResult<Vec<ActivityLog>> {
    let request = HttpRequest::get("/activities");
    let request = match scope {
        ActivityScope::Entity(id) => request.query("entityId", id.as_str()),
        ActivityScope::Workspace(id) => request.query("workspaceId", id.as_str()),
        ActivityScope::Mine => request.query("me", "true"),
    };
    api.fetch(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::harness;
    use futures::executor::block_on;

    #[test]
    fn test_scope_picks_query() {
        let h = harness();
        h.backend.respond(200, "[]").respond(200, "[]").respond(200, "[]");
        block_on(list_activity(&h.api, &ActivityScope::Entity("c1".into()))).unwrap();
        block_on(list_activity(&h.api, &ActivityScope::Workspace("w1".into()))).unwrap();
        block_on(list_activity(&h.api, &ActivityScope::Mine)).unwrap();
        let queries: Vec<_> = h.backend.requests().into_iter().map(|r| r.query).collect();
        assert_eq!(
            queries,
            vec![
                vec![("entityId".to_string(), "c1".to_string())],
                vec![("workspaceId".to_string(), "w1".to_string())],
                vec![("me".to_string(), "true".to_string())],
            ]
        );
    }
}
