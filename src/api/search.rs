//! Global Search

use crate::error::ApiResult;
use crate::http::{ApiClient, HttpRequest};
use crate::models::SearchResult;

/// Blank queries resolve to an empty result without a request
pub async fn search(api: &ApiClient, query: &str) -> ApiResult<SearchResult> {
    let query = query.trim();
    if query.is_empty() {
        return Ok(SearchResult::default());
    }
    api.fetch(HttpRequest::get("/search").query("q", query)).await
}
