//! Error types for the Aurity status client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when querying job status
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// API returned an error status code
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Response body did not match the job-status contract
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Base URL or job id cannot form a status URL
    #[error("Invalid status URL: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ApiError { status: 404, .. })
    }

    /// Check if this error is a client error (4xx status)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if *status >= 400 && *status < 500)
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if *status >= 500)
    }

    /// Check if the request timed out at the HTTP layer
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::RequestFailed(e) if e.is_timeout())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(ClientError::api_error(404, "missing").is_not_found());
        assert!(ClientError::api_error(422, "bad").is_client_error());
        assert!(ClientError::api_error(503, "down").is_server_error());
        assert!(!ClientError::ParseError("x".into()).is_client_error());
    }
}
