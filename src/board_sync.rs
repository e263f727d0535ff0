//! Board Synchronization
//!
//! Loading a board and confirming local drag-and-drop moves with the server.
//! A failed confirmation is never retried or reconciled: the whole board is
//! fetched again and replaces local state.

use std::collections::HashMap;

use futures::future::try_join_all;
use tracing::{info, warn};

use crate::api;
use crate::board_state::{BoardState, CardMove, ColumnMove};
use crate::error::{ApiError, ApiResult};
use crate::http::ApiClient;
use crate::models::ColumnUpdate;

/// Board, then its columns, then the cards of every column
pub async fn load_board(api: &ApiClient, board_id: &str) -> ApiResult<BoardState> {
    let board = api::get_board(api, board_id).await?;
    let columns = api::list_columns(api, board_id).await?;
    let card_lists = try_join_all(columns.iter().map(|c| api::list_cards(api, &c.id))).await?;
    let cards_by_column: HashMap<_, _> = columns.iter().map(|c| c.id.clone()).zip(card_lists).collect();
    Ok(BoardState::from_parts(board, columns, cards_by_column))
}

/// A local drop waiting for the server
#[derive(Debug, Clone, PartialEq)]
pub enum BoardChange {
    Card(CardMove),
    Column(ColumnMove),
}

pub async fn commit_change(api: &ApiClient, change: &BoardChange) -> ApiResult<()> {
    match change {
        BoardChange::Card(mv) => commit_card_move(api, mv).await,
        BoardChange::Column(mv) => commit_column_move(api, mv).await,
    }
}

pub async fn commit_card_move(api: &ApiClient, mv: &CardMove) -> ApiResult<()> {
    api::move_card(api, &mv.card_id, &mv.to_column, mv.to_index as i32).await?;
    Ok(())
}

/// One position update per active column whose index changed; the backend
/// stores positions as given and does not shift neighbours.
pub async fn commit_column_move(api: &ApiClient, mv: &ColumnMove) -> ApiResult<()> {
    try_join_all(mv.renumbered.iter().map(|(column_id, position)| {
        let update = ColumnUpdate {
            position: Some(*position),
            ..Default::default()
        };
        async move { api::update_column(api, column_id, &update).await }
    }))
    .await?;
    Ok(())
}

/// Outcome of confirming an optimistic change
#[derive(Debug)]
pub enum Settlement {
    Confirmed,
    /// The change failed; `state` is a fresh copy of the board
    Reloaded { state: BoardState, error: ApiError },
    /// The change failed and so did the reload
    ReloadFailed { error: ApiError },
}

pub async fn settle(api: &ApiClient, board_id: &str, result: ApiResult<()>) -> Settlement {
    let error = match result {
        Ok(()) => return Settlement::Confirmed,
        Err(error) => error,
    };
    warn!("Board {} change rejected: {}; reloading", board_id, error);
    match load_board(api, board_id).await {
        Ok(state) => {
            info!("Board {} reloaded", board_id);
            Settlement::Reloaded { state, error }
        }
        Err(reload_error) => {
            warn!("Board {} reload failed: {}", board_id, reload_error);
            Settlement::ReloadFailed { error }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::RequestBody;
    use crate::test_support::{card, column, harness, Harness};
    use futures::executor::block_on;
    use serde_json::json;

    const BOARD: &str = r#"{"id":"b1","name":"Roadmap","workspaceId":"w1"}"#;

    fn script_board(h: &Harness) {
        h.backend
            .respond(200, BOARD)
            .respond_json(200, json!([column("todo", 0), column("done", 1)]))
            .respond_json(200, json!([card("c1", "todo", 0), card("c2", "todo", 1)]))
            .respond_json(200, json!([card("c3", "done", 0)]));
    }

    #[test]
    fn test_load_board_fetches_in_order() {
        let h = harness();
        script_board(&h);
        let state = block_on(load_board(&h.api, "b1")).unwrap();
        assert_eq!(
            h.backend.paths(),
            vec!["GET /boards/b1", "GET /columns", "GET /cards", "GET /cards"]
        );
        assert_eq!(state.cards_for("todo").len(), 2);
        assert_eq!(state.cards_for("done")[0].id, "c3");
    }

    #[test]
    fn test_card_move_single_request_and_confirm() {
        let h = harness();
        script_board(&h);
        let mut state = block_on(load_board(&h.api, "b1")).unwrap();
        let mv = state.move_card("todo", 0, "done", 1).unwrap();

        h.backend.respond_json(200, json!(card("c1", "done", 1)));
        let outcome = block_on(async {
            let result = commit_card_move(&h.api, &mv).await;
            settle(&h.api, "b1", result).await
        });
        assert!(matches!(outcome, Settlement::Confirmed));

        let requests = h.backend.requests();
        assert_eq!(requests.len(), 5);
        assert_eq!(requests[4].path, "/cards/c1/move");
        assert_eq!(
            requests[4].body,
            Some(RequestBody::Json(json!({ "targetColumnId": "done", "newPosition": 1 })))
        );
    }

    #[test]
    fn test_failed_card_move_reloads_board() {
        let h = harness();
        script_board(&h);
        let mut state = block_on(load_board(&h.api, "b1")).unwrap();
        let mv = state.move_card("todo", 0, "done", 0).unwrap();
        assert_eq!(state.cards_for("done").len(), 2);

        h.backend.respond(409, r#"{"message":"Card was moved by someone else"}"#);
        script_board(&h);
        let outcome = block_on(async {
            let result = commit_card_move(&h.api, &mv).await;
            settle(&h.api, "b1", result).await
        });

        match outcome {
            Settlement::Reloaded { state, error } => {
                assert_eq!(error.user_message(), "Card was moved by someone else");
                assert_eq!(state.cards_for("todo").len(), 2);
                assert_eq!(state.cards_for("done").len(), 1);
            }
            other => panic!("expected reload, got {:?}", other),
        }
        // one move attempt, no retry
        let moves = h.backend.paths().iter().filter(|p| p.ends_with("/move")).count();
        assert_eq!(moves, 1);
    }

    #[test]
    fn test_column_move_sends_every_shifted_position() {
        let h = harness();
        h.backend
            .respond(200, BOARD)
            .respond_json(200, json!([column("a", 0), column("b", 1), column("c", 2)]))
            .respond(200, "[]")
            .respond(200, "[]")
            .respond(200, "[]");
        let mut state = block_on(load_board(&h.api, "b1")).unwrap();
        let mv = state.reorder_column(2, 0).unwrap();

        h.backend
            .respond_json(200, json!(column("c", 0)))
            .respond_json(200, json!(column("a", 1)))
            .respond_json(200, json!(column("b", 2)));
        block_on(commit_column_move(&h.api, &mv)).unwrap();

        let updates: Vec<_> = h.backend.requests().into_iter().skip(5).map(|r| (r.path, r.body)).collect();
        assert_eq!(
            updates,
            vec![
                ("/columns/c".to_string(), Some(RequestBody::Json(json!({ "position": 0 })))),
                ("/columns/a".to_string(), Some(RequestBody::Json(json!({ "position": 1 })))),
                ("/columns/b".to_string(), Some(RequestBody::Json(json!({ "position": 2 })))),
            ]
        );
    }

    #[test]
    fn test_partial_column_move_failure_reloads() {
        let h = harness();
        script_board(&h);
        let mut state = block_on(load_board(&h.api, "b1")).unwrap();
        let mv = state.reorder_column(1, 0).unwrap();

        h.backend.respond_json(200, json!(column("done", 0))).respond(403, "");
        script_board(&h);
        let outcome = block_on(async {
            let result = commit_column_move(&h.api, &mv).await;
            settle(&h.api, "b1", result).await
        });
        match outcome {
            Settlement::Reloaded { state, .. } => {
                let order: Vec<_> = state.active_columns().into_iter().map(|c| c.id).collect();
                assert_eq!(order, vec!["todo", "done"]);
            }
            other => panic!("expected reload, got {:?}", other),
        }
    }

    #[test]
    fn test_reload_failure_reports_original_error() {
        let h = harness();
        h.backend.respond(404, "");
        let outcome = block_on(settle(
            &h.api,
            "b1",
            Err(ApiError::Http { status: 400, message: "bad move".into() }),
        ));
        match outcome {
            Settlement::ReloadFailed { error } => assert_eq!(error.user_message(), "bad move"),
            other => panic!("expected reload failure, got {:?}", other),
        }
    }
}
