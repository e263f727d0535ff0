//! Comment Endpoints

use super::segment;
use crate::error::ApiResult;
use crate::http::{ApiClient, HttpRequest};
use crate::models::{Comment, CommentCreate};

pub async fn list_comments(api: &ApiClient, card_id: &str) -> ApiResult<Vec<Comment>> {
    api.fetch(HttpRequest::get(format!("/comments/cards/{}", segment(card_id)))).await
}

pub async fn add_comment(api: &ApiClient, card_id: &str, content: &str) -> ApiResult<Comment> {
    let body = CommentCreate {
        content: content.to_string(),
        card_id: card_id.to_string(),
    };
    api.fetch(HttpRequest::post("/comments").json(&body)?).await
}

/// The backend takes the new content as a raw `text/plain` body
pub async fn update_comment(api: &ApiClient, id: &str, content: &str) -> ApiResult<Comment> {
    api.fetch(HttpRequest::put(format!("/comments/{}", segment(id))).text(content)).await
}

pub async fn delete_comment(api: &ApiClient, id: &str) -> ApiResult<()> {
    api.execute(HttpRequest::delete(format!("/comments/{}", segment(id)))).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::RequestBody;
    use crate::test_support::harness;
    use futures::executor::block_on;

    #[test]
    fn test_update_sends_plain_text() {
        let h = harness();
        h.backend.respond(
            200,
            r#"{"id":"m1","content":"edited","edited":true,"cardId":"c1","authorId":"u1","createdAt":"2026-01-01T00:00:00Z"}"#,
        );
        let comment = block_on(update_comment(&h.api, "m1", "edited")).unwrap();
        assert!(comment.edited);
        assert_eq!(h.backend.requests()[0].body, Some(RequestBody::Text("edited".into())));
    }
}
