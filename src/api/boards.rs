//! Board Endpoints

use super::segment;
use crate::error::ApiResult;
use crate::http::{ApiClient, HttpRequest};
use crate::models::{Board, BoardCreate, BoardMember, BoardUpdate, Card, MemberRole, MemberRoleUpdate};

/// All visible boards, optionally limited to one workspace
pub async fn list_boards(api: &ApiClient, workspace_id: Option<&str>) -> ApiResult<Vec<Board>> {
    let mut request = HttpRequest::get("/boards");
    if let Some(id) = workspace_id {
        request = request.query("workspaceId", id);
    }
    api.fetch(request).await
}

pub async fn get_board(api: &ApiClient, id: &str) -> ApiResult<Board> {
    api.fetch(HttpRequest::get(format!("/boards/{}", segment(id)))).await
}

pub async fn create_board(api: &ApiClient, board: &BoardCreate) -> ApiResult<Board> {
    api.fetch(HttpRequest::post("/boards").json(board)?).await
}

pub async fn update_board(api: &ApiClient, id: &str, update: &BoardUpdate) -> ApiResult<Board> {
    api.fetch(HttpRequest::put(format!("/boards/{}", segment(id))).json(update)?).await
}

pub async fn delete_board(api: &ApiClient, id: &str) -> ApiResult<()> {
    api.execute(HttpRequest::delete(format!("/boards/{}", segment(id)))).await
}

pub async fn set_board_archived(api: &ApiClient, id: &str, archived: bool) -> ApiResult<Board> {
    let update = BoardUpdate {
        archived: Some(archived),
        ..Default::default()
    };
    update_board(api, id, &update).await
}

pub async fn set_board_private(api: &ApiClient, id: &str, is_private: bool) -> ApiResult<Board> {
    let update = BoardUpdate {
        is_private: Some(is_private),
        ..Default::default()
    };
    update_board(api, id, &update).await
}

pub async fn list_archived_cards(api: &ApiClient, board_id: &str) -> ApiResult<Vec<Card>> {
    api.fetch(HttpRequest::get(format!("/boards/{}/archived-cards", segment(board_id)))).await
}

// ========================
// Members
// ========================

pub async fn add_board_member(api: &ApiClient, board_id: &str, user_id: &str, role: MemberRole) -> ApiResult<BoardMember> {
    let request = HttpRequest::post(format!("/boards/{}/members/{}", segment(board_id), segment(user_id)))
        .json(&MemberRoleUpdate { role })?;
    api.fetch(request).await
}

pub async fn update_board_member(api: &ApiClient, board_id: &str, user_id: &str, role: MemberRole) -> ApiResult<BoardMember> {
    let request = HttpRequest::put(format!("/boards/{}/members/{}", segment(board_id), segment(user_id)))
        .json(&MemberRoleUpdate { role })?;
    api.fetch(request).await
}

pub async fn remove_board_member(api: &ApiClient, board_id: &str, user_id: &str) -> ApiResult<()> {
    api.execute(HttpRequest::delete(format!("/boards/{}/members/{}", segment(board_id), segment(user_id)))).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::harness;
    use futures::executor::block_on;

    #[test]
    fn test_list_boards_by_workspace() {
        let h = harness();
        h.backend.respond(200, r#"[{"id":"b1","name":"Roadmap","workspaceId":"w1"}]"#);
        let boards = block_on(list_boards(&h.api, Some("w1"))).unwrap();
        assert_eq!(boards.len(), 1);
        assert_eq!(h.backend.requests()[0].query, vec![("workspaceId".to_string(), "w1".to_string())]);
    }

    #[test]
    fn test_archive_sends_only_flag() {
        let h = harness();
        h.backend.respond(200, r#"{"id":"b1","name":"Roadmap","workspaceId":"w1","archived":true}"#);
        let board = block_on(set_board_archived(&h.api, "b1", true)).unwrap();
        assert!(board.archived);
        let request = &h.backend.requests()[0];
        assert_eq!(request.path, "/boards/b1");
        assert_eq!(request.body, Some(crate::http::RequestBody::Json(serde_json::json!({ "archived": true }))));
    }
}
