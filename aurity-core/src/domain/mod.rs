//! Core domain types
//!
//! These types are shared between the status client (which produces
//! snapshots), the poller (which decides on them) and the CLI (which
//! renders them).

pub mod job;
pub mod kind;
pub mod options;
pub mod outcome;

pub use job::{JobId, JobState, JobStatus};
pub use kind::JobKind;
pub use options::{PollingOptions, ProgressRegression};
pub use outcome::{PollError, PollOutcome};
