//! One-shot status query

use anyhow::{Context, Result};
use aurity_client::StatusClient;
use aurity_core::domain::{JobId, JobKind};

use crate::config::Config;
use crate::output;

/// Fetch and print a job's current status
pub async fn handle_status(config: &Config, kind: JobKind, job_id: &str) -> Result<()> {
    let job_id = JobId::new(job_id)?;
    let client = StatusClient::new(&config.base_url);

    let status = client
        .get_job_status(kind, &job_id)
        .await
        .with_context(|| format!("Failed to fetch status of {} job {}", kind, job_id))?;

    output::print_status_details(&job_id, kind, &status);
    Ok(())
}
