//! Job-status endpoints

use aurity_core::domain::{JobId, JobKind, JobStatus};
use aurity_core::dto::job::JobStatusResponse;
use chrono::Utc;
use reqwest::Url;
use tracing::debug;

use crate::StatusClient;
use crate::error::{ClientError, Result};

impl StatusClient {
    /// Build the status URL for a job
    ///
    /// Kind-specific jobs live under `/api/{route}/jobs/{id}/status`, generic
    /// jobs under `/jobs/{id}/status`. The id is percent-encoded as a single
    /// path segment.
    pub fn status_url(&self, kind: JobKind, job_id: &JobId) -> Result<Url> {
        // Dot segments are dropped by the URL path builder
        if matches!(job_id.as_str(), "." | "..") {
            return Err(ClientError::InvalidUrl(format!(
                "job id {job_id:?} is not addressable"
            )));
        }

        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                ClientError::InvalidUrl(format!("{} cannot be a base URL", self.base_url))
            })?;
            segments.pop_if_empty();
            if let Some(route) = kind.route() {
                segments.push("api").push(route);
            }
            segments.push("jobs").push(job_id.as_str()).push("status");
        }
        Ok(url)
    }

    /// Get the current status of a job
    ///
    /// The returned snapshot is stamped with the time it was received.
    pub async fn get_job_status(&self, kind: JobKind, job_id: &JobId) -> Result<JobStatus> {
        let url = self.status_url(kind, job_id)?;
        debug!(%url, "Fetching job status");
        let response = self.client.get(url).send().await?;

        let body: JobStatusResponse = self.handle_response(response).await?;
        Ok(body.into_status(Utc::now()))
    }
}
