use std::sync::Arc;

use async_trait::async_trait;

use super::{HttpBackend, HttpRequest, HttpResponse};
use crate::error::ApiResult;

/// One link of the request chain
///
/// Implementations may rewrite the request, short-circuit, inspect the
/// result, or call `next` more than once (retry).
#[async_trait(?Send)]
pub trait Interceptor: Send + Sync {
    async fn intercept(&self, request: HttpRequest, next: Next<'_>) -> ApiResult<HttpResponse>;
}

/// Remainder of the chain, ending at the backend
#[derive(Clone, Copy)]
pub struct Next<'a> {
    chain: &'a [Arc<dyn Interceptor>],
    backend: &'a dyn HttpBackend,
}

impl<'a> Next<'a> {
    pub fn new(chain: &'a [Arc<dyn Interceptor>], backend: &'a dyn HttpBackend) -> Self {
        Self { chain, backend }
    }

    pub async fn run(self, request: HttpRequest) -> ApiResult<HttpResponse> {
        match self.chain.split_first() {
            Some((head, rest)) => {
                head.intercept(request, Next::new(rest, self.backend)).await
            }
            None => self.backend.send(request).await,
        }
    }
}
