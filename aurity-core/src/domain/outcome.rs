//! Terminal outcomes of a polling session

use thiserror::Error;

use crate::domain::job::JobStatus;

/// Why a session ended without a successful job
///
/// Consumers can tell "gave up waiting" apart from "job explicitly failed".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PollError {
    /// Attempt budget exhausted before the job reached a terminal state
    #[error("timed out after {attempts} status checks")]
    TimedOut { attempts: u32 },

    /// Backend reported the job as failed
    #[error("job failed: {message}")]
    JobFailed { message: String },
}

impl PollError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::TimedOut { .. })
    }

    pub fn is_job_failure(&self) -> bool {
        matches!(self, Self::JobFailed { .. })
    }
}

/// Final result delivered once per session
pub type PollOutcome = Result<JobStatus, PollError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds_are_distinct() {
        let timeout = PollError::TimedOut { attempts: 5 };
        let failed = PollError::JobFailed {
            message: "boom".to_string(),
        };
        assert!(timeout.is_timeout() && !timeout.is_job_failure());
        assert!(failed.is_job_failure() && !failed.is_timeout());
        assert_eq!(timeout.to_string(), "timed out after 5 status checks");
        assert_eq!(failed.to_string(), "job failed: boom");
    }
}
