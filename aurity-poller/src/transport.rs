//! Status transport seam
//!
//! The poller only needs "give me the current status of this job". The
//! trait keeps the loop testable without a backend; the HTTP implementation
//! wraps [`StatusClient`].

use async_trait::async_trait;
use aurity_client::{ClientError, StatusClient};
use aurity_core::domain::{JobId, JobKind, JobStatus};
use thiserror::Error;

/// Transient failure of a single status check
///
/// Never terminal: the poller retries on its fallback cadence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("status request failed: {0}")]
    Request(String),

    #[error("status endpoint returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("malformed status response: {0}")]
    Parse(String),

    /// Deadline hit, either the poller's request timeout or the HTTP client's
    #[error("status request timed out")]
    Timeout,
}

impl From<ClientError> for TransportError {
    fn from(err: ClientError) -> Self {
        if err.is_timeout() {
            return Self::Timeout;
        }
        match err {
            ClientError::ApiError { status, message } => Self::Status { status, message },
            ClientError::ParseError(message) => Self::Parse(message),
            other => Self::Request(other.to_string()),
        }
    }
}

/// Source of job status snapshots
#[async_trait]
pub trait StatusTransport: Send + Sync {
    /// Fetches the current status of a job
    async fn fetch_status(&self, job_id: &JobId) -> Result<JobStatus, TransportError>;
}

/// HTTP implementation of StatusTransport for one job family
#[derive(Debug, Clone)]
pub struct HttpStatusTransport {
    client: StatusClient,
    kind: JobKind,
}

impl HttpStatusTransport {
    pub fn new(client: StatusClient, kind: JobKind) -> Self {
        Self { client, kind }
    }

    pub fn kind(&self) -> JobKind {
        self.kind
    }
}

#[async_trait]
impl StatusTransport for HttpStatusTransport {
    async fn fetch_status(&self, job_id: &JobId) -> Result<JobStatus, TransportError> {
        self.client
            .get_job_status(self.kind, job_id)
            .await
            .map_err(TransportError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aurity_core::domain::JobState;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_client_errors_map_to_transport_errors() {
        assert_eq!(
            TransportError::from(ClientError::api_error(502, "bad gateway")),
            TransportError::Status {
                status: 502,
                message: "bad gateway".to_string()
            }
        );
        assert_eq!(
            TransportError::from(ClientError::ParseError("missing state".into())),
            TransportError::Parse("missing state".to_string())
        );
    }

    #[tokio::test]
    async fn test_http_transport_fetches_kind_route() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/soap/jobs/note-1/status"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "state": "in_progress", "progress": 40 })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let transport =
            HttpStatusTransport::new(StatusClient::new(server.uri()), JobKind::SoapNote);
        let status = transport
            .fetch_status(&JobId::new("note-1").unwrap())
            .await
            .unwrap();

        assert_eq!(status.state, JobState::InProgress);
        assert_eq!(status.progress, 40.0);
    }

    #[tokio::test]
    async fn test_http_client_timeout_maps_to_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/jobs/slow/status"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "state": "pending", "progress": 0 }))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .unwrap();
        let client = StatusClient::with_client(server.uri(), http);
        let transport = HttpStatusTransport::new(client, JobKind::Generic);
        let err = transport
            .fetch_status(&JobId::new("slow").unwrap())
            .await
            .unwrap_err();

        assert_eq!(err, TransportError::Timeout);
    }
}
