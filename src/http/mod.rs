//! HTTP Access Layer
//!
//! Requests flow through an ordered interceptor chain before reaching the
//! backend: loading counter, then auth, then error normalization.

mod auth;
mod backend;
mod interceptor;
mod loading;
mod normalize;

pub use auth::AuthInterceptor;
pub use backend::{HttpBackend, ReqwestBackend};
pub use interceptor::{Interceptor, Next};
pub use loading::{LoadingCounter, LoadingInterceptor, SKIP_LOADING_HEADER};
pub use normalize::ErrorInterceptor;

use std::sync::Arc;

pub use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ApiError, ApiResult};
use crate::session::Session;

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(serde_json::Value),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    /// Path relative to the API base URL, starting with `/`
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<RequestBody>,
}

impl HttpRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_header(name, value);
        self
    }

    /// Replace any existing header of the same name (case-insensitive)
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.remove_header(name);
        self.headers.push((name.to_string(), value.into()));
    }

    #[cfg(test)]
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn remove_header(&mut self, name: &str) -> Option<String> {
        let index = self.headers.iter().position(|(k, _)| k.eq_ignore_ascii_case(name))?;
        Some(self.headers.remove(index).1)
    }

    pub fn json<B: Serialize>(mut self, body: &B) -> ApiResult<Self> {
        let value = serde_json::to_value(body).map_err(|e| ApiError::Encode(e.to_string()))?;
        self.body = Some(RequestBody::Json(value));
        Ok(self)
    }

    pub fn text(mut self, body: impl Into<String>) -> Self {
        self.body = Some(RequestBody::Text(body.into()));
        self
    }

    /// Keep the global loading indicator hidden for this request
    pub fn skip_loading(self) -> Self {
        self.header(SKIP_LOADING_HEADER, "true")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub reason: String,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            reason: String::new(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> ApiResult<T> {
        serde_json::from_str(&self.body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// Entry point for every REST call
pub struct ApiClient {
    backend: Arc<dyn HttpBackend>,
    chain: Vec<Arc<dyn Interceptor>>,
}

impl ApiClient {
    pub fn new(backend: Arc<dyn HttpBackend>) -> Self {
        Self {
            backend,
            chain: Vec::new(),
        }
    }

    /// Standard chain: loading, auth, error normalization
    pub fn with_default_chain(
        backend: Arc<dyn HttpBackend>,
        session: Arc<Session>,
        loading: Arc<LoadingCounter>,
    ) -> Self {
        Self::new(backend)
            .with(LoadingInterceptor::new(loading))
            .with(AuthInterceptor::new(session))
            .with(ErrorInterceptor)
    }

    /// Append an interceptor; earlier interceptors run first
    pub fn with(mut self, interceptor: impl Interceptor + 'static) -> Self {
        self.chain.push(Arc::new(interceptor));
        self
    }

    pub async fn send(&self, request: HttpRequest) -> ApiResult<HttpResponse> {
        Next::new(&self.chain, self.backend.as_ref()).run(request).await
    }

    /// Send and decode a JSON response body
    pub async fn fetch<T: DeserializeOwned>(&self, request: HttpRequest) -> ApiResult<T> {
        self.send(request).await?.json()
    }

    /// Send and ignore the response body
    pub async fn execute(&self, request: HttpRequest) -> ApiResult<()> {
        self.send(request).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_replace_is_case_insensitive() {
        let mut request = HttpRequest::get("/boards").header("authorization", "Bearer a");
        request.set_header("Authorization", "Bearer b");
        assert_eq!(request.headers.len(), 1);
        assert_eq!(request.header_value("AUTHORIZATION"), Some("Bearer b"));
    }

    #[test]
    fn test_json_body() {
        let request = HttpRequest::put("/columns/k1")
            .json(&serde_json::json!({ "position": 2 }))
            .unwrap();
        assert_eq!(request.body, Some(RequestBody::Json(serde_json::json!({ "position": 2 }))));
    }

    #[test]
    fn test_decode_error() {
        let response = HttpResponse::new(200, "not json");
        assert!(matches!(response.json::<Vec<String>>(), Err(ApiError::Decode(_))));
    }
}
