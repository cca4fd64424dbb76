//! Configuration module
//!
//! Handles CLI configuration: the backend URL and polling overrides.

use std::time::Duration;

use aurity_core::domain::{JobKind, PollingOptions, ProgressRegression};
use clap::{Args, ValueEnum};

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the backend API
    pub base_url: String,
}

impl Config {
    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.base_url.is_empty() {
            anyhow::bail!("base_url cannot be empty");
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            anyhow::bail!("base_url must start with http:// or https://");
        }

        Ok(())
    }
}

/// Job family selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Diarization,
    Transcription,
    SoapNote,
    Generic,
}

impl From<KindArg> for JobKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Diarization => JobKind::Diarization,
            KindArg::Transcription => JobKind::Transcription,
            KindArg::SoapNote => JobKind::SoapNote,
            KindArg::Generic => JobKind::Generic,
        }
    }
}

/// Regression policy selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RegressionArg {
    Rebase,
    Ignore,
}

impl From<RegressionArg> for ProgressRegression {
    fn from(policy: RegressionArg) -> Self {
        match policy {
            RegressionArg::Rebase => ProgressRegression::Rebase,
            RegressionArg::Ignore => ProgressRegression::Ignore,
        }
    }
}

/// Polling overrides; unset flags keep the job kind's preset
#[derive(Debug, Clone, Default, Args)]
pub struct PollingArgs {
    /// Fastest polling interval in milliseconds
    #[arg(long, env = "AURITY_INITIAL_INTERVAL_MS")]
    pub initial_interval_ms: Option<u64>,

    /// Slowest polling interval in milliseconds
    #[arg(long, env = "AURITY_MAX_INTERVAL_MS")]
    pub max_interval_ms: Option<u64>,

    /// Interval growth factor while a job shows no progress
    #[arg(long, env = "AURITY_BACKOFF_MULTIPLIER")]
    pub multiplier: Option<f64>,

    /// Status checks before giving up
    #[arg(long, env = "AURITY_MAX_ATTEMPTS")]
    pub max_attempts: Option<u32>,

    /// Retry interval after a failed status request, in milliseconds
    #[arg(long, env = "AURITY_RETRY_INTERVAL_MS")]
    pub retry_interval_ms: Option<u64>,

    /// Per-request timeout in milliseconds
    #[arg(long, env = "AURITY_REQUEST_TIMEOUT_MS")]
    pub request_timeout_ms: Option<u64>,

    /// How to treat progress that goes backwards
    #[arg(long, value_enum)]
    pub on_regression: Option<RegressionArg>,
}

impl PollingArgs {
    /// Applies the overrides on top of `kind`'s preset and validates the result
    pub fn resolve(&self, kind: JobKind) -> anyhow::Result<PollingOptions> {
        let mut options = kind.default_options();

        if let Some(ms) = self.initial_interval_ms {
            options = options.with_initial_interval(Duration::from_millis(ms));
        }
        if let Some(ms) = self.max_interval_ms {
            options = options.with_max_interval(Duration::from_millis(ms));
        }
        if let Some(multiplier) = self.multiplier {
            options = options.with_backoff_multiplier(multiplier);
        }
        if let Some(attempts) = self.max_attempts {
            options = options.with_max_attempts(attempts);
        }
        if let Some(ms) = self.retry_interval_ms {
            options = options.with_hidden_tab_interval(Duration::from_millis(ms));
        }
        if let Some(ms) = self.request_timeout_ms {
            options = options.with_request_timeout(Duration::from_millis(ms));
        }
        if let Some(policy) = self.on_regression {
            options = options.with_progress_regression(policy.into());
        }

        options.validate()?;
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validation() {
        let mut config = Config {
            base_url: "http://localhost:8000".to_string(),
        };
        assert!(config.validate().is_ok());

        config.base_url = "localhost:8000".to_string();
        assert!(config.validate().is_err());

        config.base_url = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_resolve_keeps_preset_without_overrides() {
        let options = PollingArgs::default().resolve(JobKind::SoapNote).unwrap();
        assert_eq!(options, JobKind::SoapNote.default_options());
    }

    #[test]
    fn test_resolve_applies_overrides() {
        let args = PollingArgs {
            initial_interval_ms: Some(250),
            max_attempts: Some(3),
            on_regression: Some(RegressionArg::Ignore),
            ..Default::default()
        };
        let options = args.resolve(JobKind::Generic).unwrap();
        assert_eq!(options.initial_interval, Duration::from_millis(250));
        assert_eq!(options.max_attempts, 3);
        assert_eq!(options.progress_regression, ProgressRegression::Ignore);
    }

    #[test]
    fn test_resolve_rejects_invalid_overrides() {
        let args = PollingArgs {
            multiplier: Some(1.0),
            ..Default::default()
        };
        assert!(args.resolve(JobKind::Generic).is_err());
    }
}
