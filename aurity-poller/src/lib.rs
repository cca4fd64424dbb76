//! Aurity Poller
//!
//! Adaptive status polling for long-running backend jobs.
//!
//! A consumer creates an [`AdaptivePoller`] over a [`StatusTransport`],
//! starts a session for one job and gets back a [`PollHandle`] exposing the
//! live status, diagnostics and `cancel()`. The session:
//! - checks immediately, then waits `initial_interval`
//! - grows the wait by `backoff_multiplier` on every check without progress,
//!   capped at `max_interval`, and drops back to `initial_interval` whenever
//!   progress increases
//! - idles on `hidden_tab_interval` while the consumer is hidden
//! - retries transport failures on `hidden_tab_interval`
//! - ends on `completed`, `failed`, attempt-budget exhaustion or cancellation
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use aurity_client::StatusClient;
//! use aurity_core::domain::{JobId, JobKind};
//! use aurity_poller::{AdaptivePoller, HttpStatusTransport, PollCallbacks};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let transport = HttpStatusTransport::new(
//!     StatusClient::new("http://localhost:8000"),
//!     JobKind::Diarization,
//! );
//! let poller = AdaptivePoller::new(Arc::new(transport));
//!
//! let handle = poller.start(
//!     JobId::new("session-123")?,
//!     JobKind::Diarization.default_options(),
//!     PollCallbacks::new()
//!         .on_complete(|status| println!("done at {}", status.progress))
//!         .on_error(|err| eprintln!("{err}")),
//! )?;
//!
//! let outcome = handle.wait().await;
//! # let _ = outcome;
//! # Ok(())
//! # }
//! ```

pub mod backoff;
mod error;
mod poller;
mod session;
#[cfg(test)]
mod testing;
pub mod transport;
pub mod visibility;

pub use backoff::{AdaptiveBackoff, Observation};
pub use error::PollerError;
pub use poller::{AdaptivePoller, PollHandle, SuccessPredicate};
pub use session::{PollCallbacks, PollPhase, PollSnapshot};
pub use transport::{HttpStatusTransport, StatusTransport, TransportError};
pub use visibility::{AlwaysVisible, Visibility, VisibilityFlag};
