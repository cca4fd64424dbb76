//! Error types for core domain validation

use thiserror::Error;

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised while constructing or validating domain values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Job identifiers must carry at least one non-whitespace character
    #[error("job id cannot be empty")]
    EmptyJobId,

    /// Polling options violate their bounds
    #[error("invalid polling options: {0}")]
    InvalidOptions(String),

    /// Job kind name not recognised
    #[error("unknown job kind: {0}")]
    UnknownJobKind(String),
}
