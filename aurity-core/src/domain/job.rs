//! Job domain types

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::kind::JobKind;
use crate::error::{CoreError, Result};

/// Opaque identifier of a remote job
///
/// The backend hands these out when a job is submitted; the client never
/// interprets them beyond requiring them to be non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct JobId(String);

impl JobId {
    /// Creates a job id, rejecting empty or whitespace-only input
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(CoreError::EmptyJobId);
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for JobId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<JobId> for String {
    fn from(id: JobId) -> Self {
        id.0
    }
}

impl std::str::FromStr for JobId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

/// Remote job state
///
/// Closed set: the status endpoint may return nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Pending,
    InProgress,
    Completed,
    Failed,
}

impl JobState {
    /// Whether polling stops once this state is observed
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Whether the job is still queued or working
    pub fn is_running(&self) -> bool {
        !self.is_terminal()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of a job as returned by one status check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobStatus {
    pub state: JobState,
    /// Work-completed indicator in job-defined units; only compared, never
    /// assumed to be a percentage.
    pub progress: f64,
    /// Backend error message, only meaningful when `state` is `Failed`
    pub error_message: Option<String>,
    /// Job-specific auxiliary fields kept verbatim (segment counts etc.)
    #[serde(default)]
    pub extra: serde_json::Map<String, serde_json::Value>,
    pub observed_at: DateTime<Utc>,
}

impl JobStatus {
    /// Creates a snapshot observed now with no auxiliary fields
    pub fn new(state: JobState, progress: f64) -> Self {
        Self {
            state,
            progress,
            error_message: None,
            extra: serde_json::Map::new(),
            observed_at: Utc::now(),
        }
    }

    pub fn with_error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Reads an auxiliary field as an unsigned count
    pub fn extra_count(&self, key: &str) -> Option<u64> {
        self.extra.get(key).and_then(|v| {
            v.as_u64()
                .or_else(|| v.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
        })
    }

    /// Builds a human-readable status line for display
    ///
    /// Uses the kind's auxiliary counters when the backend supplied them,
    /// otherwise falls back to the raw state and progress.
    pub fn summary(&self, kind: JobKind) -> String {
        let label = kind.label();
        match self.state {
            JobState::Failed => match &self.error_message {
                Some(message) => format!("{label} failed: {message}"),
                None => format!("{label} failed"),
            },
            JobState::Completed => format!("{label} completed"),
            state => {
                let phase = if state == JobState::Pending {
                    "pending"
                } else {
                    "in progress"
                };
                match kind.progress_fields() {
                    Some((done_key, total_key, unit)) => {
                        match (self.extra_count(done_key), self.extra_count(total_key)) {
                            (Some(done), Some(total)) => {
                                format!("{label} {phase}: {done}/{total} {unit}")
                            }
                            (Some(done), None) => format!("{label} {phase}: {done} {unit}"),
                            _ => format!("{label} {phase} (progress {})", self.progress),
                        }
                    }
                    None => format!("{label} {phase} (progress {})", self.progress),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_job_id_rejects_blank() {
        assert_eq!(JobId::new(""), Err(CoreError::EmptyJobId));
        assert_eq!(JobId::new("   "), Err(CoreError::EmptyJobId));
        assert_eq!(JobId::new("job-42").unwrap().as_str(), "job-42");
    }

    #[test]
    fn test_job_id_deserialize_rejects_blank() {
        assert!(serde_json::from_value::<JobId>(json!("")).is_err());
        let id: JobId = serde_json::from_value(json!("abc")).unwrap();
        assert_eq!(id.to_string(), "abc");
    }

    #[test]
    fn test_job_state_wire_names() {
        let state: JobState = serde_json::from_value(json!("in_progress")).unwrap();
        assert_eq!(state, JobState::InProgress);
        assert!(serde_json::from_value::<JobState>(json!("running")).is_err());
        assert_eq!(serde_json::to_value(JobState::Completed).unwrap(), json!("completed"));
    }

    #[test]
    fn test_terminal_states() {
        assert!(JobState::Completed.is_terminal());
        assert!(JobState::Failed.is_terminal());
        assert!(JobState::Pending.is_running());
        assert!(JobState::InProgress.is_running());
    }

    #[test]
    fn test_summary_uses_segment_counts() {
        let status = JobStatus::new(JobState::InProgress, 12.0)
            .with_extra("segments_processed", json!(12))
            .with_extra("total_segments", json!(40));
        assert_eq!(
            status.summary(JobKind::Diarization),
            "Diarization in progress: 12/40 segments"
        );
    }

    #[test]
    fn test_summary_falls_back_to_progress() {
        let status = JobStatus::new(JobState::Pending, 0.0);
        assert_eq!(
            status.summary(JobKind::Transcription),
            "Transcription pending (progress 0)"
        );
    }

    #[test]
    fn test_summary_failed_includes_message() {
        let status = JobStatus::new(JobState::Failed, 3.0).with_error_message("audio corrupt");
        assert_eq!(
            status.summary(JobKind::SoapNote),
            "SOAP note failed: audio corrupt"
        );
    }
}
