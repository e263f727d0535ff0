//! Application Configuration
//!
//! Compile-time defaults with an optional JSON override.

use serde::{Deserialize, Serialize};

/// Backend base URL used when `TASKFLOW_API_URL` is not set at build time
const DEFAULT_API_URL: &str = "http://localhost:8080/api";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    pub api_base_url: String,
    /// Nominal request timeout. Not applied to requests.
    pub request_timeout_ms: u32,
    pub sse_reconnect_delay_ms: u32,
    pub sse_max_reconnect_attempts: u32,
    /// Background board refresh while the page is visible
    pub board_refresh_interval_ms: u32,
    /// Lines kept by the in-memory log buffer
    pub log_capacity: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: option_env!("TASKFLOW_API_URL").unwrap_or(DEFAULT_API_URL).to_string(),
            request_timeout_ms: 30_000,
            sse_reconnect_delay_ms: 3_000,
            sse_max_reconnect_attempts: 5,
            board_refresh_interval_ms: 60_000,
            log_capacity: 500,
        }
    }
}

impl AppConfig {
    /// Defaults overridden by whatever fields `json` provides
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Join the base URL and an endpoint path
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
