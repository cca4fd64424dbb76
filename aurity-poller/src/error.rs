//! Poller error types

use aurity_core::CoreError;
use thiserror::Error;

/// Errors returned when a session cannot be started
///
/// Terminal job outcomes are not errors of the poller; they are delivered
/// as [`aurity_core::domain::PollError`] through callbacks and handles.
#[derive(Debug, Error)]
pub enum PollerError {
    #[error(transparent)]
    InvalidOptions(#[from] CoreError),

    /// `start` was called outside a Tokio runtime
    #[error("poller must be started from within a Tokio runtime")]
    NoRuntime,
}
