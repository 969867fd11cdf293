//! Error types for the API client

use serde::Deserialize;
use thiserror::Error;

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// API client errors
#[derive(Error, Debug)]
pub enum ApiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// API returned an error response
    #[error("API error ({status}): {message}")]
    ApiResponse {
        /// HTTP status code
        status: u16,
        /// `message` from the error body, or the raw body when it has none
        message: String,
    },

    /// All retry attempts exhausted
    #[error("All {attempts} retry attempts failed: {last_error}")]
    RetriesExhausted {
        /// Number of attempts made
        attempts: u32,
        /// Last error message
        last_error: String,
    },

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl ApiError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an API response error
    pub fn api_response(status: u16, message: impl Into<String>) -> Self {
        Self::ApiResponse {
            status,
            message: message.into(),
        }
    }

    /// Build an API response error from a raw error body
    ///
    /// The server answers errors with `{"message": "..."}`; anything else is
    /// kept verbatim.
    pub fn from_body(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .map(|b| b.message)
            .unwrap_or_else(|_| {
                if body.trim().is_empty() {
                    "Unknown error".to_string()
                } else {
                    body.trim().to_string()
                }
            });
        Self::api_response(status, message)
    }

    /// Status code of an API response error
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ApiResponse { status, .. } => Some(*status),
            Self::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if this error is retryable
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Request(e) => e.is_connect() || e.is_timeout(),
            Self::ApiResponse { status, .. } => *status >= 500 || *status == 429,
            Self::Config(_)
            | Self::Json(_)
            | Self::InvalidUrl(_)
            | Self::RetriesExhausted { .. } => false,
        }
    }

    /// Check if this is a client error (4xx)
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::ApiResponse { status, .. } if (400..500).contains(status))
    }

    /// Check if this is a server error (5xx)
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::ApiResponse { status, .. } if *status >= 500)
    }

    /// The requested record does not exist
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// The write collided with an existing record or relation
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        self.status() == Some(409)
    }

    /// The admin secret was missing or wrong
    #[must_use]
    pub fn is_forbidden(&self) -> bool {
        self.status() == Some(403)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_body_reads_message() {
        let err = ApiError::from_body(404, r#"{"message":"Category not found"}"#);
        assert_eq!(err.to_string(), "API error (404): Category not found");
        assert!(err.is_not_found());
        assert!(err.is_client_error());
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_from_body_keeps_plain_text() {
        let err = ApiError::from_body(502, "Bad Gateway\n");
        let ApiError::ApiResponse { ref message, .. } = err else {
            panic!("expected an API response error");
        };
        assert_eq!(message, "Bad Gateway");
        assert!(err.is_server_error());
        assert!(err.is_retryable());
    }

    #[test]
    fn test_from_body_empty() {
        let err = ApiError::from_body(500, "  ");
        let ApiError::ApiResponse { message, .. } = err else {
            panic!("expected an API response error");
        };
        assert_eq!(message, "Unknown error");
    }

    #[test]
    fn test_status_predicates() {
        assert!(ApiError::api_response(409, "dup").is_conflict());
        assert!(ApiError::api_response(403, "no").is_forbidden());
        assert!(ApiError::api_response(429, "slow down").is_retryable());
        assert_eq!(ApiError::config("bad").status(), None);
    }
}
