//! Notification Endpoints

use super::{encode, segment};
use crate::config::AppConfig;
use crate::error::ApiResult;
use crate::http::{ApiClient, HttpRequest};
use crate::models::{Notification, UnreadCount};

pub async fn list_notifications(api: &ApiClient) -> ApiResult<Vec<Notification>> {
    api.fetch(HttpRequest::get("/notifications").skip_loading()).await
}

pub async fn unread_count(api: &ApiClient) -> ApiResult<u32> {
    let count: UnreadCount = api.fetch(HttpRequest::get("/notifications/unread-count").skip_loading()).await?;
    Ok(count.count)
}

pub async fn mark_notification_read(api: &ApiClient, id: &str) -> ApiResult<()> {
    api.execute(HttpRequest::put(format!("/notifications/{}/read", segment(id)))).await
}

pub async fn mark_all_notifications_read(api: &ApiClient) -> ApiResult<()> {
    api.execute(HttpRequest::put("/notifications/read-all")).await
}

/// SSE endpoint. EventSource cannot send headers, so the token rides in the query.
pub fn notification_stream_url(config: &AppConfig, access_token: &str) -> String {
    format!("{}?token={}", config.url("/notifications/stream"), encode(access_token))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_url_encodes_token() {
        let config = AppConfig {
            api_base_url: "https://kanban.example/api".into(),
            ..AppConfig::default()
        };
        assert_eq!(
            notification_stream_url(&config, "a.b+c/d="),
            "https://kanban.example/api/notifications/stream?token=a%2Eb%2Bc%2Fd%3D"
        );
    }
}
