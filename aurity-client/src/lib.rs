//! HTTP client for the Aurity job-status endpoints
//!
//! The poller reaches it through `HttpStatusTransport`; the CLI calls it
//! directly for one-shot queries.
//!
//! ```no_run
//! use aurity_client::StatusClient;
//! use aurity_core::domain::{JobId, JobKind};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let client = StatusClient::new("http://localhost:8000");
//! let status = client
//!     .get_job_status(JobKind::Diarization, &JobId::new("session-123")?)
//!     .await?;
//! println!("{}", status.summary(JobKind::Diarization));
//! # Ok(())
//! # }
//! ```

pub mod error;
mod jobs;

pub use error::{ClientError, Result};

use reqwest::Client;
use serde::de::DeserializeOwned;

#[derive(Debug, Clone)]
pub struct StatusClient {
    /// Backend root without a trailing slash
    base_url: String,
    client: Client,
}

impl StatusClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Uses a preconfigured `reqwest::Client` (timeouts, proxies, TLS)
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Non-2xx becomes [`ClientError::ApiError`] carrying the body text; a
    /// 2xx body that does not deserialize becomes [`ClientError::ParseError`].
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), message));
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| ClientError::ParseError(format!("unexpected status body: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        assert_eq!(
            StatusClient::new("http://localhost:8000/").base_url(),
            "http://localhost:8000"
        );
        assert_eq!(
            StatusClient::with_client("http://localhost:8000", Client::new()).base_url(),
            "http://localhost:8000"
        );
    }
}
