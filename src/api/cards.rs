//! Card Endpoints

use super::segment;
use crate::error::ApiResult;
use crate::http::{ApiClient, HttpRequest};
use crate::models::{Card, CardCreate, CardMoveRequest, CardRole, CardUpdate};

pub async fn list_cards(api: &ApiClient, column_id: &str) -> ApiResult<Vec<Card>> {
    api.fetch(HttpRequest::get("/cards").query("columnId", column_id)).await
}

pub async fn get_card(api: &ApiClient, id: &str) -> ApiResult<Card> {
    api.fetch(HttpRequest::get(format!("/cards/{}", segment(id)))).await
}

pub async fn create_card(api: &ApiClient, card: &CardCreate) -> ApiResult<Card> {
    api.fetch(HttpRequest::post("/cards").json(card)?).await
}

pub async fn update_card(api: &ApiClient, id: &str, update: &CardUpdate) -> ApiResult<Card> {
    api.fetch(HttpRequest::put(format!("/cards/{}", segment(id))).json(update)?).await
}

pub async fn delete_card(api: &ApiClient, id: &str) -> ApiResult<()> {
    api.execute(HttpRequest::delete(format!("/cards/{}", segment(id)))).await
}

/// Move a card to `new_position` (0-based index) in `target_column_id`
pub async fn move_card(api: &ApiClient, id: &str, target_column_id: &str, new_position: i32) -> ApiResult<Card> {
    let body = CardMoveRequest {
        target_column_id: target_column_id.to_string(),
        new_position,
    };
    api.fetch(HttpRequest::put(format!("/cards/{}/move", segment(id))).json(&body)?).await
}

pub async fn set_card_archived(api: &ApiClient, id: &str, archived: bool) -> ApiResult<Card> {
    let update = CardUpdate {
        archived: Some(archived),
        ..Default::default()
    };
    update_card(api, id, &update).await
}

pub async fn set_card_achieved(api: &ApiClient, id: &str, achieved: bool) -> ApiResult<Card> {
    let update = CardUpdate {
        achieved: Some(achieved),
        ..Default::default()
    };
    update_card(api, id, &update).await
}

// ========================
// Members
// ========================

pub async fn assign_user(api: &ApiClient, card_id: &str, user_id: &str) -> ApiResult<Card> {
    api.fetch(HttpRequest::post(format!("/cards/{}/assignees/{}", segment(card_id), segment(user_id)))).await
}

pub async fn unassign_user(api: &ApiClient, card_id: &str, user_id: &str) -> ApiResult<Card> {
    api.fetch(HttpRequest::delete(format!("/cards/{}/assignees/{}", segment(card_id), segment(user_id)))).await
}

pub async fn set_member_role(api: &ApiClient, card_id: &str, user_id: &str, role: CardRole) -> ApiResult<Card> {
    let request = HttpRequest::put(format!("/cards/{}/members/{}", segment(card_id), segment(user_id)))
        .query("role", role.as_str());
    api.fetch(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{card, harness};
    use futures::executor::block_on;

    #[test]
    fn test_move_card_request() {
        let h = harness();
        h.backend.respond_json(200, serde_json::to_value(card("c1", "k2", 0)).unwrap());
        let moved = block_on(move_card(&h.api, "c1", "k2", 0)).unwrap();
        assert_eq!(moved.column_id, "k2");
        let request = &h.backend.requests()[0];
        assert_eq!(request.path, "/cards/c1/move");
        assert_eq!(
            request.body,
            Some(crate::http::RequestBody::Json(serde_json::json!({ "targetColumnId": "k2", "newPosition": 0 })))
        );
    }

    #[test]
    fn test_member_role_in_query() {
        let h = harness();
        h.backend.respond_json(200, serde_json::to_value(card("c1", "k1", 0)).unwrap());
        block_on(set_member_role(&h.api, "c1", "u2", CardRole::Watcher)).unwrap();
        assert_eq!(h.backend.requests()[0].query, vec![("role".to_string(), "WATCHER".to_string())]);
    }
}
