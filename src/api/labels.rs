//! Label Endpoints

use super::segment;
use crate::error::ApiResult;
use crate::http::{ApiClient, HttpRequest};
use crate::models::{Label, LabelCreate, LabelUpdate};

pub async fn list_labels(api: &ApiClient, board_id: &str) -> ApiResult<Vec<Label>> {
    api.fetch(HttpRequest::get("/labels").query("boardId", board_id)).await
}

pub async fn create_label(api: &ApiClient, label: &LabelCreate) -> ApiResult<Label> {
    api.fetch(HttpRequest::post("/labels").json(label)?).await
}

pub async fn update_label(api: &ApiClient, id: &str, update: &LabelUpdate) -> ApiResult<Label> {
    api.fetch(HttpRequest::put(format!("/labels/{}", segment(id))).json(update)?).await
}

pub async fn delete_label(api: &ApiClient, id: &str) -> ApiResult<()> {
    api.execute(HttpRequest::delete(format!("/labels/{}", segment(id)))).await
}

pub async fn add_label_to_card(api: &ApiClient, card_id: &str, label_id: &str) -> ApiResult<()> {
    api.execute(HttpRequest::post(format!("/labels/cards/{}/labels/{}", segment(card_id), segment(label_id)))).await
}

pub async fn remove_label_from_card(api: &ApiClient, card_id: &str, label_id: &str) -> ApiResult<()> {
    api.execute(HttpRequest::delete(format!("/labels/cards/{}/labels/{}", segment(card_id), segment(label_id)))).await
}
