use async_trait::async_trait;
use tracing::error;

use super::{HttpRequest, HttpResponse, Interceptor, Next};
use crate::error::{message_for_status, ApiError, ApiResult, ErrorResponse};

/// Turns non-2xx responses into `ApiError::Http` with a user-facing message
pub struct ErrorInterceptor;

impl ErrorInterceptor {
    fn to_error(response: &HttpResponse) -> ApiError {
        let server_message = serde_json::from_str::<ErrorResponse>(&response.body)
            .ok()
            .and_then(|body| body.message);
        ApiError::Http {
            status: response.status,
            message: message_for_status(response.status, server_message.as_deref(), &response.reason),
        }
    }
}

#[async_trait(?Send)]
impl Interceptor for ErrorInterceptor {
    async fn intercept(&self, request: HttpRequest, next: Next<'_>) -> ApiResult<HttpResponse> {
        let method = request.method.clone();
        let path = request.path.clone();
        match next.run(request).await {
            Ok(response) if response.is_success() => Ok(response),
            Ok(response) => {
                let err = Self::to_error(&response);
                error!("{} {} failed ({}): {}", method, path, response.status, err);
                Err(err)
            }
            Err(err) => {
                error!("{} {} failed: {}", method, path, err);
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::ApiClient;
    use crate::test_support::MockBackend;
    use futures::executor::block_on;

    #[test]
    fn test_server_message_surfaces() {
        let backend = MockBackend::new();
        backend.respond(404, r#"{"status":404,"error":"Not Found","message":"Board not found","path":"/boards/x"}"#);
        let api = ApiClient::new(backend).with(ErrorInterceptor);
        let err = block_on(api.send(HttpRequest::get("/boards/x"))).unwrap_err();
        assert_eq!(err, ApiError::Http { status: 404, message: "Board not found".into() });
    }

    #[test]
    fn test_unparseable_body_uses_default_text() {
        let backend = MockBackend::new();
        backend.respond(403, "<html>denied</html>");
        let api = ApiClient::new(backend).with(ErrorInterceptor);
        let err = block_on(api.send(HttpRequest::delete("/boards/b1"))).unwrap_err();
        assert_eq!(err.user_message(), "Forbidden. You do not have permission.");
    }

    #[test]
    fn test_success_passes_through() {
        let backend = MockBackend::new();
        backend.respond(204, "");
        let api = ApiClient::new(backend).with(ErrorInterceptor);
        assert_eq!(block_on(api.send(HttpRequest::delete("/cards/c1"))).unwrap().status, 204);
    }
}
