//! Job status DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::job::{JobState, JobStatus};

/// Body of `GET .../jobs/{id}/status`
///
/// Only `state` and `progress` are required; everything else the backend
/// sends is kept in `extra` for display purposes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStatusResponse {
    pub state: JobState,
    #[serde(alias = "progress_pct")]
    pub progress: f64,
    #[serde(default, alias = "error", skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl JobStatusResponse {
    /// Converts into a domain snapshot observed at `observed_at`
    ///
    /// An error message on a non-failed state is dropped.
    pub fn into_status(self, observed_at: DateTime<Utc>) -> JobStatus {
        let error_message = match self.state {
            JobState::Failed => self.error_message,
            _ => None,
        };
        JobStatus {
            state: self.state,
            progress: self.progress,
            error_message,
            extra: self.extra,
            observed_at,
        }
    }
}
