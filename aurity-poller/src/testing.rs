//! Scripted transport for loop tests

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use aurity_core::domain::{JobId, JobStatus};
use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::transport::{StatusTransport, TransportError};

#[derive(Debug, Clone)]
pub(crate) struct Reply {
    result: Result<JobStatus, TransportError>,
    delay: Option<Duration>,
}

impl Reply {
    pub(crate) fn status(status: JobStatus) -> Self {
        Self {
            result: Ok(status),
            delay: None,
        }
    }

    pub(crate) fn failure(err: TransportError) -> Self {
        Self {
            result: Err(err),
            delay: None,
        }
    }

    /// Holds the response back for `delay` after the request starts
    pub(crate) fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// Replays replies in order, repeating the last one once exhausted
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    script: Mutex<VecDeque<Reply>>,
    last: Mutex<Option<Reply>>,
    started_at: Mutex<Vec<Instant>>,
    started_tx: Mutex<Option<mpsc::UnboundedSender<usize>>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    completed: AtomicUsize,
}

impl ScriptedTransport {
    pub(crate) fn new(replies: Vec<Reply>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(replies.into()),
            ..Default::default()
        })
    }

    /// Receiver of 1-based request numbers, sent as each request starts
    pub(crate) fn started(&self) -> mpsc::UnboundedReceiver<usize> {
        let (tx, rx) = mpsc::unbounded_channel();
        *self.started_tx.lock().unwrap() = Some(tx);
        rx
    }

    pub(crate) fn requests(&self) -> usize {
        self.started_at.lock().unwrap().len()
    }

    pub(crate) fn completed_requests(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Milliseconds between consecutive request starts
    pub(crate) fn gaps_ms(&self) -> Vec<u64> {
        self.started_at
            .lock()
            .unwrap()
            .windows(2)
            .map(|w| (w[1] - w[0]).as_millis() as u64)
            .collect()
    }

    fn next_reply(&self) -> Reply {
        let mut last = self.last.lock().unwrap();
        if let Some(reply) = self.script.lock().unwrap().pop_front() {
            *last = Some(reply.clone());
            return reply;
        }
        last.clone().expect("script must contain at least one reply")
    }
}

struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl StatusTransport for ScriptedTransport {
    async fn fetch_status(&self, _job_id: &JobId) -> Result<JobStatus, TransportError> {
        let reply = self.next_reply();
        let index = {
            let mut started = self.started_at.lock().unwrap();
            started.push(Instant::now());
            started.len()
        };
        if let Some(tx) = self.started_tx.lock().unwrap().as_ref() {
            let _ = tx.send(index);
        }

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        let _in_flight = InFlight(&self.in_flight);

        if let Some(delay) = reply.delay {
            tokio::time::sleep(delay).await;
        }
        self.completed.fetch_add(1, Ordering::SeqCst);
        reply.result
    }
}
