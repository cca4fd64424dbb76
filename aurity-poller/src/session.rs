//! Polling session state
//!
//! One session per tracked job. The loop task and every [`PollHandle`]
//! share it; all phase transitions go through the state lock so a
//! cancellation and a terminal transition can never both win.
//!
//! [`PollHandle`]: crate::PollHandle

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use aurity_core::domain::{JobId, JobStatus, PollError, PollOutcome};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// Lifecycle phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollPhase {
    Polling,
    Completed,
    Failed,
    Cancelled,
}

impl PollPhase {
    pub fn is_finished(&self) -> bool {
        !matches!(self, Self::Polling)
    }
}

/// Live view of a session published after every state change
#[derive(Debug, Clone)]
pub struct PollSnapshot {
    pub job_id: JobId,
    pub phase: PollPhase,
    /// Last successfully parsed status
    pub status: Option<JobStatus>,
    /// Delay before the next check: the adaptive interval, or the retry
    /// interval after a failed check. A hidden consumer waits the hidden
    /// interval instead.
    pub current_interval: Duration,
    /// Status checks issued so far
    pub total_attempts: u32,
}

type CompleteFn = Box<dyn FnOnce(JobStatus) + Send>;
type ErrorFn = Box<dyn FnOnce(PollError) + Send>;

/// Terminal notifications for one session
///
/// At most one of the two closures runs, and only on a terminal
/// transition that was not preceded by a cancellation.
#[derive(Default)]
pub struct PollCallbacks {
    on_complete: Option<CompleteFn>,
    on_error: Option<ErrorFn>,
}

impl PollCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_complete(mut self, f: impl FnOnce(JobStatus) + Send + 'static) -> Self {
        self.on_complete = Some(Box::new(f));
        self
    }

    pub fn on_error(mut self, f: impl FnOnce(PollError) + Send + 'static) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }

    fn fire(self, outcome: PollOutcome) {
        match outcome {
            Ok(status) => {
                if let Some(f) = self.on_complete {
                    f(status);
                }
            }
            Err(err) => {
                if let Some(f) = self.on_error {
                    f(err);
                }
            }
        }
    }
}

impl std::fmt::Debug for PollCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollCallbacks")
            .field("on_complete", &self.on_complete.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

struct SessionState {
    phase: PollPhase,
    callbacks: Option<PollCallbacks>,
    outcome: Option<PollOutcome>,
}

pub(crate) struct Session {
    job_id: JobId,
    token: CancellationToken,
    state: Mutex<SessionState>,
    snapshot: watch::Sender<PollSnapshot>,
}

impl Session {
    pub(crate) fn new(job_id: JobId, initial_interval: Duration, callbacks: PollCallbacks) -> Self {
        let (snapshot, _) = watch::channel(PollSnapshot {
            job_id: job_id.clone(),
            phase: PollPhase::Polling,
            status: None,
            current_interval: initial_interval,
            total_attempts: 0,
        });
        Self {
            job_id,
            token: CancellationToken::new(),
            state: Mutex::new(SessionState {
                phase: PollPhase::Polling,
                callbacks: Some(callbacks),
                outcome: None,
            }),
            snapshot,
        }
    }

    pub(crate) fn job_id(&self) -> &JobId {
        &self.job_id
    }

    pub(crate) fn token(&self) -> &CancellationToken {
        &self.token
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn phase(&self) -> PollPhase {
        self.lock().phase
    }

    pub(crate) fn snapshot(&self) -> PollSnapshot {
        self.snapshot.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<PollSnapshot> {
        self.snapshot.subscribe()
    }

    pub(crate) fn outcome(&self) -> Option<PollOutcome> {
        self.lock().outcome.clone()
    }

    /// Applies `update` to the snapshot if the session is still polling
    ///
    /// Returns false when the update was discarded.
    pub(crate) fn update(&self, update: impl FnOnce(&mut PollSnapshot)) -> bool {
        let state = self.lock();
        if state.phase != PollPhase::Polling {
            return false;
        }
        self.snapshot.send_modify(update);
        true
    }

    /// Moves the session into its terminal phase and notifies the consumer
    ///
    /// No-op when the session already finished or was cancelled.
    pub(crate) fn finish(&self, outcome: PollOutcome) -> bool {
        let callbacks = {
            let mut state = self.lock();
            if state.phase != PollPhase::Polling {
                return false;
            }
            let phase = if outcome.is_ok() {
                PollPhase::Completed
            } else {
                PollPhase::Failed
            };
            state.phase = phase;
            state.outcome = Some(outcome.clone());
            self.snapshot.send_modify(|snapshot| snapshot.phase = phase);
            state.callbacks.take()
        };

        // Callbacks run outside the lock so they may use the handle freely
        if let Some(callbacks) = callbacks {
            callbacks.fire(outcome);
        }
        true
    }

    /// Cancels the session; returns true on the first effective call
    pub(crate) fn cancel(&self) -> bool {
        let cancelled = {
            let mut state = self.lock();
            if state.phase == PollPhase::Polling {
                state.phase = PollPhase::Cancelled;
                state.callbacks = None;
                self.snapshot
                    .send_modify(|snapshot| snapshot.phase = PollPhase::Cancelled);
                true
            } else {
                false
            }
        };
        self.token.cancel();
        cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aurity_core::domain::JobState;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn session(callbacks: PollCallbacks) -> Session {
        Session::new(
            JobId::new("job-1").unwrap(),
            Duration::from_secs(1),
            callbacks,
        )
    }

    fn counting() -> (PollCallbacks, Arc<AtomicUsize>, Arc<AtomicUsize>) {
        let completes = Arc::new(AtomicUsize::new(0));
        let errors = Arc::new(AtomicUsize::new(0));
        let callbacks = {
            let completes = completes.clone();
            let errors = errors.clone();
            PollCallbacks::new()
                .on_complete(move |_| {
                    completes.fetch_add(1, Ordering::SeqCst);
                })
                .on_error(move |_| {
                    errors.fetch_add(1, Ordering::SeqCst);
                })
        };
        (callbacks, completes, errors)
    }

    #[test]
    fn test_finish_fires_once() {
        let (callbacks, completes, errors) = counting();
        let session = session(callbacks);

        let status = JobStatus::new(JobState::Completed, 100.0);
        assert!(session.finish(Ok(status.clone())));
        assert!(!session.finish(Ok(status)));
        assert!(!session.finish(Err(PollError::TimedOut { attempts: 1 })));

        assert_eq!(completes.load(Ordering::SeqCst), 1);
        assert_eq!(errors.load(Ordering::SeqCst), 0);
        assert_eq!(session.phase(), PollPhase::Completed);
    }

    #[test]
    fn test_cancel_suppresses_callbacks_and_updates() {
        let (callbacks, completes, errors) = counting();
        let session = session(callbacks);

        assert!(session.cancel());
        assert!(!session.cancel());
        assert!(session.token().is_cancelled());

        assert!(!session.update(|s| s.total_attempts = 9));
        assert!(!session.finish(Err(PollError::JobFailed {
            message: "late".into()
        })));

        assert_eq!(completes.load(Ordering::SeqCst), 0);
        assert_eq!(errors.load(Ordering::SeqCst), 0);
        assert_eq!(session.snapshot().phase, PollPhase::Cancelled);
        assert_eq!(session.snapshot().total_attempts, 0);
        assert!(session.outcome().is_none());
    }

    #[test]
    fn test_cancel_after_finish_keeps_outcome() {
        let (callbacks, _, errors) = counting();
        let session = session(callbacks);

        session.finish(Err(PollError::TimedOut { attempts: 3 }));
        assert!(!session.cancel());

        assert_eq!(errors.load(Ordering::SeqCst), 1);
        assert_eq!(session.phase(), PollPhase::Failed);
        assert_eq!(
            session.outcome(),
            Some(Err(PollError::TimedOut { attempts: 3 }))
        );
    }
}
