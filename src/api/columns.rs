//! Column Endpoints

use super::segment;
use crate::error::ApiResult;
use crate::http::{ApiClient, HttpRequest};
use crate::models::{BoardColumn, ColumnCreate, ColumnUpdate};

pub async fn list_columns(api: &ApiClient, board_id: &str) -> ApiResult<Vec<BoardColumn>> {
    api.fetch(HttpRequest::get("/columns").query("boardId", board_id)).await
}

pub async fn create_column(api: &ApiClient, column: &ColumnCreate) -> ApiResult<BoardColumn> {
    api.fetch(HttpRequest::post("/columns").json(column)?).await
}

pub async fn update_column(api: &ApiClient, id: &str, update: &ColumnUpdate) -> ApiResult<BoardColumn> {
    api.fetch(HttpRequest::put(format!("/columns/{}", segment(id))).json(update)?).await
}

pub async fn delete_column(api: &ApiClient, id: &str) -> ApiResult<()> {
    api.execute(HttpRequest::delete(format!("/columns/{}", segment(id)))).await
}
