//! API Errors
//!
//! HTTP failures taxonomized by status code, with fixed user-facing messages.

use serde::Deserialize;
use thiserror::Error;

/// Body the backend sends with non-2xx responses
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ErrorResponse {
    pub status: u16,
    pub error: Option<String>,
    pub message: Option<String>,
    pub path: Option<String>,
    pub validation_errors: Option<std::collections::HashMap<String, String>>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// Non-2xx response. `message` is already user-facing.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// Request never got a response (status 0)
    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Failed to encode request: {0}")]
    Encode(String),

    /// Refresh failed or no refresh token; the session was cleared
    #[error("Session expired. Please login again.")]
    SessionExpired,
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// HTTP status, 0 for network failures, `None` for local errors
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::Network(_) => Some(0),
            ApiError::SessionExpired => Some(401),
            ApiError::Decode(_) | ApiError::Encode(_) => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Http { status: 401, .. })
    }

    /// Text shown in toasts
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Http { message, .. } => message.clone(),
            ApiError::Network(_) => NETWORK_MESSAGE.to_string(),
            ApiError::SessionExpired => "Session expired. Please login again.".to_string(),
            ApiError::Decode(_) | ApiError::Encode(_) => "An unexpected error occurred".to_string(),
        }
    }
}

const NETWORK_MESSAGE: &str = "Unable to reach the server. Check your connection.";

/// Map a status (and optional server message) to the user-facing text
pub fn message_for_status(status: u16, server_message: Option<&str>, reason: &str) -> String {
    let server = server_message.filter(|m| !m.trim().is_empty());
    match status {
        0 => NETWORK_MESSAGE.to_string(),
        400 => server.unwrap_or("Bad Request: Invalid input").to_string(),
        401 => "Unauthorized. Please login again.".to_string(),
        403 => "Forbidden. You do not have permission.".to_string(),
        404 => server.unwrap_or("Resource not found").to_string(),
        409 => server.unwrap_or("Conflict: Resource already exists").to_string(),
        422 => server.unwrap_or("Validation failed: Invalid input data").to_string(),
        500 => "Internal Server Error. Please try again later.".to_string(),
        _ => server
            .map(str::to_string)
            .unwrap_or_else(|| format!("Error ({}): {}", status, reason)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_messages_ignore_server_text() {
        assert_eq!(message_for_status(401, Some("jwt expired"), "Unauthorized"), "Unauthorized. Please login again.");
        assert_eq!(message_for_status(403, Some("nope"), "Forbidden"), "Forbidden. You do not have permission.");
        assert_eq!(message_for_status(500, Some("NPE"), "Internal Server Error"), "Internal Server Error. Please try again later.");
    }

    #[test]
    fn test_server_message_preferred_when_present() {
        assert_eq!(message_for_status(404, Some("Board not found"), "Not Found"), "Board not found");
        assert_eq!(message_for_status(404, None, "Not Found"), "Resource not found");
        assert_eq!(message_for_status(409, Some("  "), "Conflict"), "Conflict: Resource already exists");
        assert_eq!(message_for_status(422, None, ""), "Validation failed: Invalid input data");
    }

    #[test]
    fn test_other_status_fallback() {
        assert_eq!(message_for_status(418, None, "I'm a teapot"), "Error (418): I'm a teapot");
        assert_eq!(message_for_status(0, None, ""), NETWORK_MESSAGE);
    }

    #[test]
    fn test_status_of_errors() {
        assert_eq!(ApiError::Network("down".into()).status(), Some(0));
        assert!(ApiError::Http { status: 401, message: String::new() }.is_unauthorized());
        assert_eq!(ApiError::Decode("x".into()).status(), None);
    }
}
