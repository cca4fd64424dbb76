//! Adaptive poller
//!
//! Tracks one remote job at a time: checks its status immediately, then
//! keeps checking on a cadence that speeds up while the job reports
//! progress and slows down while it idles, until the job completes, fails,
//! exhausts the attempt budget or the consumer cancels.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use aurity_core::domain::{JobId, JobState, JobStatus, PollError, PollOutcome, PollingOptions};
use tokio::sync::watch;
use tokio::time;
use tracing::{debug, info, warn};

use crate::backoff::AdaptiveBackoff;
use crate::error::PollerError;
use crate::session::{PollCallbacks, PollPhase, PollSnapshot, Session};
use crate::transport::{StatusTransport, TransportError};
use crate::visibility::{AlwaysVisible, Visibility};

/// Extra condition a `completed` status must meet before the session ends
pub type SuccessPredicate = Arc<dyn Fn(&JobStatus) -> bool + Send + Sync>;

/// Starts and owns polling sessions for a single consumer
///
/// A poller runs at most one session at a time. Track several jobs with
/// several pollers.
pub struct AdaptivePoller {
    transport: Arc<dyn StatusTransport>,
    visibility: Arc<dyn Visibility>,
    success: Option<SuccessPredicate>,
    active: Mutex<Option<PollHandle>>,
}

impl AdaptivePoller {
    pub fn new(transport: Arc<dyn StatusTransport>) -> Self {
        Self {
            transport,
            visibility: Arc::new(AlwaysVisible),
            success: None,
            active: Mutex::new(None),
        }
    }

    pub fn with_visibility(mut self, visibility: Arc<dyn Visibility>) -> Self {
        self.visibility = visibility;
        self
    }

    /// Requires `predicate` to hold on a `completed` status before the
    /// session completes; until then the job counts as still running.
    pub fn with_success_predicate(
        mut self,
        predicate: impl Fn(&JobStatus) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.success = Some(Arc::new(predicate));
        self
    }

    /// Starts tracking `job_id`
    ///
    /// The first status check is issued immediately. If a session is
    /// already polling, its handle is returned and the arguments are
    /// ignored. Must be called from within a Tokio runtime.
    pub fn start(
        &self,
        job_id: JobId,
        options: PollingOptions,
        callbacks: PollCallbacks,
    ) -> Result<PollHandle, PollerError> {
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = active.as_ref().filter(|h| h.is_polling()) {
            debug!(
                job_id = %handle.job_id(),
                requested = %job_id,
                "Session already active, ignoring start"
            );
            return Ok(handle.clone());
        }

        options.validate()?;
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| PollerError::NoRuntime)?;

        let session = Arc::new(Session::new(
            job_id.clone(),
            options.initial_interval,
            callbacks,
        ));
        let handle = PollHandle {
            session: Arc::clone(&session),
        };

        info!(
            %job_id,
            initial_ms = options.initial_interval.as_millis() as u64,
            max_ms = options.max_interval.as_millis() as u64,
            max_attempts = options.max_attempts,
            "Starting job status polling"
        );

        let task = PollLoop {
            session,
            transport: Arc::clone(&self.transport),
            visibility: Arc::clone(&self.visibility),
            success: self.success.clone(),
            options,
        };
        runtime.spawn(task.run());

        *active = Some(handle.clone());
        Ok(handle)
    }

    /// Handle of the most recent session, if any
    pub fn current(&self) -> Option<PollHandle> {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Cancels the active session and forgets it
    pub fn dispose(&self) {
        let handle = self
            .active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            handle.cancel();
        }
    }
}

/// Consumer view of one polling session
///
/// Clones observe and control the same session.
#[derive(Clone)]
pub struct PollHandle {
    session: Arc<Session>,
}

impl PollHandle {
    pub fn job_id(&self) -> &JobId {
        self.session.job_id()
    }

    /// Last successfully parsed status
    pub fn status(&self) -> Option<JobStatus> {
        self.session.snapshot().status
    }

    pub fn is_polling(&self) -> bool {
        self.session.phase() == PollPhase::Polling
    }

    pub fn phase(&self) -> PollPhase {
        self.session.phase()
    }

    pub fn current_interval(&self) -> Duration {
        self.session.snapshot().current_interval
    }

    pub fn total_attempts(&self) -> u32 {
        self.session.snapshot().total_attempts
    }

    pub fn snapshot(&self) -> PollSnapshot {
        self.session.snapshot()
    }

    /// Receiver notified on every snapshot change
    pub fn subscribe(&self) -> watch::Receiver<PollSnapshot> {
        self.session.subscribe()
    }

    /// Waits for the session to end
    ///
    /// Returns the terminal outcome, or `None` if the session was cancelled.
    pub async fn wait(&self) -> Option<PollOutcome> {
        let mut rx = self.session.subscribe();
        // The session owns the sender, so the channel cannot close under us
        let _ = rx.wait_for(|snapshot| snapshot.phase.is_finished()).await;
        self.session.outcome()
    }

    /// Stops the session
    ///
    /// Idempotent and a no-op after the session ended on its own. Once this
    /// returns no further request is issued and no callback runs; a
    /// response already in flight is dropped.
    pub fn cancel(&self) {
        if self.session.cancel() {
            info!(job_id = %self.session.job_id(), "Polling cancelled");
        }
    }

    /// Whether both handles refer to the same session
    pub fn same_session(&self, other: &PollHandle) -> bool {
        Arc::ptr_eq(&self.session, &other.session)
    }
}

impl std::fmt::Debug for PollHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollHandle")
            .field("snapshot", &self.session.snapshot())
            .finish()
    }
}

/// What the loop does after a cycle
enum Next {
    Wait(Duration),
    Stop,
}

struct PollLoop {
    session: Arc<Session>,
    transport: Arc<dyn StatusTransport>,
    visibility: Arc<dyn Visibility>,
    success: Option<SuccessPredicate>,
    options: PollingOptions,
}

impl PollLoop {
    async fn run(self) {
        let mut backoff = AdaptiveBackoff::new(&self.options);
        let mut attempts: u32 = 0;
        let mut delay = Duration::ZERO;

        loop {
            if !delay.is_zero() {
                // A hidden consumer gets the hidden cadence instead of the adaptive one
                let resumed = if self.visibility.is_visible() {
                    self.sleep(delay).await
                } else {
                    self.wait_hidden().await
                };
                if !resumed {
                    return;
                }
            }

            if !self.visibility.is_visible() {
                debug!(job_id = %self.session.job_id(), "Consumer hidden, skipping check");
                if !self.wait_hidden().await {
                    return;
                }
                delay = Duration::ZERO;
                continue;
            }

            if self.session.phase().is_finished() {
                return;
            }

            match self.cycle(&mut backoff, &mut attempts).await {
                Next::Wait(next) => delay = next,
                Next::Stop => return,
            }
        }
    }

    /// One status check and the decision that follows it
    async fn cycle(&self, backoff: &mut AdaptiveBackoff, attempts: &mut u32) -> Next {
        let job_id = self.session.job_id();

        *attempts += 1;
        if *attempts > self.options.max_attempts {
            let max_attempts = self.options.max_attempts;
            warn!(%job_id, attempts = max_attempts, "Attempt budget exhausted");
            self.session
                .finish(Err(PollError::TimedOut { attempts: max_attempts }));
            return Next::Stop;
        }

        let attempt = *attempts;
        if !self.session.update(|s| s.total_attempts = attempt) {
            return Next::Stop;
        }

        debug!(%job_id, attempt, "Checking job status");
        let result = tokio::select! {
            biased;
            _ = self.session.token().cancelled() => return Next::Stop,
            result = self.fetch() => result,
        };

        let status = match result {
            Ok(status) => status,
            Err(err) => {
                let retry = self.options.hidden_tab_interval;
                if !self.session.update(|s| s.current_interval = retry) {
                    return Next::Stop;
                }
                warn!(%job_id, attempt, error = %err, "Status check failed, retrying");
                return Next::Wait(retry);
            }
        };

        let succeeded = status.state == JobState::Completed
            && self.success.as_ref().is_none_or(|predicate| predicate(&status));
        let running = !succeeded && status.state != JobState::Failed;

        let observation = backoff.observe(status.progress, running);
        let interval = backoff.current();
        debug!(
            %job_id,
            state = %status.state,
            progress = status.progress,
            ?observation,
            next_ms = interval.as_millis() as u64,
            "Status observed"
        );

        let recorded = status.clone();
        let applied = self.session.update(move |s| {
            s.status = Some(recorded);
            s.current_interval = interval;
        });
        if !applied {
            // Cancelled while the response was in flight
            return Next::Stop;
        }

        if succeeded {
            info!(%job_id, attempts = attempt, "Job completed");
            self.session.finish(Ok(status));
            return Next::Stop;
        }

        if status.state == JobState::Failed {
            let message = status
                .error_message
                .clone()
                .unwrap_or_else(|| "job failed without an error message".to_string());
            info!(%job_id, attempts = attempt, error = %message, "Job failed");
            self.session.finish(Err(PollError::JobFailed { message }));
            return Next::Stop;
        }

        Next::Wait(interval)
    }

    async fn fetch(&self) -> Result<JobStatus, TransportError> {
        let timeout = self.options.request_timeout;
        match time::timeout(timeout, self.transport.fetch_status(self.session.job_id())).await {
            Ok(result) => result,
            Err(_) => {
                debug!(
                    job_id = %self.session.job_id(),
                    timeout_ms = timeout.as_millis() as u64,
                    "Request deadline elapsed"
                );
                Err(TransportError::Timeout)
            }
        }
    }

    /// Sleeps for `delay`; false if cancelled meanwhile
    async fn sleep(&self, delay: Duration) -> bool {
        tokio::select! {
            biased;
            _ = self.session.token().cancelled() => false,
            _ = time::sleep(delay) => true,
        }
    }

    /// Idles while hidden: until the hidden interval elapses or the consumer
    /// becomes visible again. False if cancelled meanwhile.
    async fn wait_hidden(&self) -> bool {
        tokio::select! {
            biased;
            _ = self.session.token().cancelled() => false,
            _ = time::sleep(self.options.hidden_tab_interval) => true,
            _ = self.visibility.visible() => true,
        }
    }
}
