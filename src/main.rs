//! TaskFlow Frontend Entry Point

mod api;
mod app;
mod board_state;
mod board_sync;
mod components;
mod config;
mod context;
mod error;
mod http;
mod markdown;
mod models;
mod notification_stream;
mod notifications;
mod permissions;
mod preferences;
mod session;
mod storage;
mod store;
mod text;
mod theme;
mod toast;

#[cfg(test)]
mod test_support;

use app::App;
use config::AppConfig;
use leptos::prelude::*;
use tracing::{error, warn, Level};

/// Optional JSON overrides from `<meta name="taskflow-config" content="...">`
fn embedded_config() -> Option<String> {
    web_sys::window()?
        .document()?
        .query_selector("meta[name=taskflow-config]")
        .ok()??
        .get_attribute("content")
}

fn main() {
    console_error_panic_hook::set_once();

    let (config, config_error) = match embedded_config().map(|json| AppConfig::from_json(&json)) {
        Some(Ok(config)) => (config, None),
        Some(Err(e)) => (AppConfig::default(), Some(e)),
        None => (AppConfig::default(), None),
    };

    if let Err(e) = rolling_logger::init_logger("taskflow", config.log_capacity, Level::INFO) {
        web_sys::console::error_1(&format!("Logger init failed: {}", e).into());
    }
    if let Some(e) = config_error {
        warn!("Ignoring invalid embedded config: {}", e);
    }
    if config.api_base_url.is_empty() {
        error!("No API base URL configured");
    }

    mount_to_body(move || view! { <App config=config /> });
}
