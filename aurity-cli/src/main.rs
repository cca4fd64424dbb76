//! Aurity CLI
//!
//! Terminal front end for tracking long-running Aurity backend jobs.

mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "aurity")]
#[command(about = "Track Aurity diarization, transcription and SOAP-note jobs", long_about = None)]
struct Cli {
    /// Backend API URL
    #[arg(long, env = "AURITY_API_URL", default_value = "http://localhost:8000")]
    base_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so status lines on stdout stay clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aurity_cli=info,aurity_poller=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config {
        base_url: cli.base_url,
    };
    config.validate()?;

    handle_command(cli.command, &config).await
}
