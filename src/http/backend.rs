use async_trait::async_trait;
use tracing::debug;

use super::{HttpRequest, HttpResponse, RequestBody};
use crate::config::AppConfig;
use crate::error::{ApiError, ApiResult};

/// Transport at the end of the interceptor chain
///
/// Non-2xx statuses are returned as responses; only transport failures are
/// errors (`ApiError::Network`).
#[async_trait(?Send)]
pub trait HttpBackend: Send + Sync {
    async fn send(&self, request: HttpRequest) -> ApiResult<HttpResponse>;
}

/// `reqwest` client (browser `fetch` on wasm32)
pub struct ReqwestBackend {
    client: reqwest::Client,
    config: AppConfig,
}

impl ReqwestBackend {
    pub fn new(config: AppConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait(?Send)]
impl HttpBackend for ReqwestBackend {
    async fn send(&self, request: HttpRequest) -> ApiResult<HttpResponse> {
        let url = self.config.url(&request.path);
        debug!("{} {}", request.method, url);

        let mut builder = self.client.request(request.method.clone(), &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = match request.body {
            Some(RequestBody::Json(value)) => builder
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(value.to_string()),
            Some(RequestBody::Text(text)) => builder
                .header(reqwest::header::CONTENT_TYPE, "text/plain")
                .body(text),
            None => builder,
        };

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(HttpResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
            body,
        })
    }
}
