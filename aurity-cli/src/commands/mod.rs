//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod status;
mod watch;

use anyhow::Result;
use clap::Subcommand;

use crate::config::{Config, KindArg, PollingArgs};

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Poll jobs until they finish
    Watch {
        /// Job IDs to track, one polling session each
        #[arg(required = true)]
        job_ids: Vec<String>,

        /// Job family the IDs belong to
        #[arg(long, value_enum, default_value = "diarization")]
        kind: KindArg,

        #[command(flatten)]
        polling: PollingArgs,
    },
    /// Fetch the current status of a job once
    Status {
        /// Job ID
        job_id: String,

        /// Job family the ID belongs to
        #[arg(long, value_enum, default_value = "diarization")]
        kind: KindArg,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Watch {
            job_ids,
            kind,
            polling,
        } => watch::handle_watch(config, kind.into(), &job_ids, &polling).await,
        Commands::Status { job_id, kind } => {
            status::handle_status(config, kind.into(), &job_id).await
        }
    }
}
