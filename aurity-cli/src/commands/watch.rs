//! Watch command
//!
//! Starts one polling session per job, prints a line whenever a session's
//! status changes and waits for all of them to end. Ctrl-C cancels every
//! session and the command fails.

use std::sync::Arc;

use anyhow::Result;
use aurity_client::StatusClient;
use aurity_core::domain::{JobId, JobKind, PollOutcome};
use aurity_poller::{
    AdaptivePoller, HttpStatusTransport, PollCallbacks, PollHandle, StatusTransport,
};
use futures::future::join_all;
use tracing::{info, warn};

use crate::config::{Config, PollingArgs};
use crate::output;

/// Poll every job in `job_ids` to completion
pub async fn handle_watch(
    config: &Config,
    kind: JobKind,
    job_ids: &[String],
    polling: &PollingArgs,
) -> Result<()> {
    let options = polling.resolve(kind)?;
    let job_ids = job_ids
        .iter()
        .map(JobId::new)
        .collect::<Result<Vec<_>, _>>()?;

    let transport: Arc<dyn StatusTransport> = Arc::new(HttpStatusTransport::new(
        StatusClient::new(&config.base_url),
        kind,
    ));

    // One poller per job: sessions never share state
    let mut pollers = Vec::with_capacity(job_ids.len());
    let mut handles = Vec::with_capacity(job_ids.len());
    for job_id in job_ids {
        let poller = AdaptivePoller::new(Arc::clone(&transport));
        let handle = poller.start(job_id, options.clone(), PollCallbacks::new())?;
        tokio::spawn(report_changes(handle.clone(), kind));
        handles.push(handle);
        pollers.push(poller);
    }

    info!("Watching {} {} job(s)", handles.len(), kind);

    let outcomes = tokio::select! {
        outcomes = join_all(handles.iter().map(|h| h.wait())) => outcomes,
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted, cancelling all sessions");
            for poller in &pollers {
                poller.dispose();
            }
            join_all(handles.iter().map(|h| h.wait())).await
        }
    };

    summarize(&handles, kind, &outcomes)
}

/// Prints a line for every new status a session observes
async fn report_changes(handle: PollHandle, kind: JobKind) {
    let mut rx = handle.subscribe();
    let mut last_seen = None;

    loop {
        let snapshot = rx.borrow_and_update().clone();
        if let Some(status) = &snapshot.status {
            if last_seen != Some(status.observed_at) {
                last_seen = Some(status.observed_at);
                output::print_progress_line(&snapshot, kind);
            }
        }

        if snapshot.phase.is_finished() || rx.changed().await.is_err() {
            break;
        }
    }
}

fn summarize(
    handles: &[PollHandle],
    kind: JobKind,
    outcomes: &[Option<PollOutcome>],
) -> Result<()> {
    let mut unsuccessful = 0;
    for (handle, outcome) in handles.iter().zip(outcomes) {
        output::print_outcome(handle.job_id(), kind, outcome.as_ref(), handle.total_attempts());
        if !matches!(outcome, Some(Ok(_))) {
            unsuccessful += 1;
        }
    }

    if unsuccessful > 0 {
        anyhow::bail!("{} of {} job(s) did not complete", unsuccessful, handles.len());
    }
    Ok(())
}
