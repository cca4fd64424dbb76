//! Polling options
//!
//! Supplied by the consumer when a session starts and fixed for its
//! lifetime. All intervals are wall-clock delays between status checks.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// What to do when a job reports less progress than before
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressRegression {
    /// Adopt the lower value as the new baseline, so the next increase
    /// counts as a change again
    #[default]
    Rebase,
    /// Keep the highest value seen as the baseline
    Ignore,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollingOptions {
    /// Fastest cadence, used after the first check and whenever progress moves
    pub initial_interval: Duration,
    /// Slowest cadence the backoff may reach
    pub max_interval: Duration,
    /// Growth factor applied on each no-change check
    pub backoff_multiplier: f64,
    /// Number of status checks before giving up with a timeout
    pub max_attempts: u32,
    /// Fixed delay while the consumer is hidden, also the retry delay after
    /// a transport failure
    pub hidden_tab_interval: Duration,
    /// Upper bound for a single status request
    pub request_timeout: Duration,
    pub progress_regression: ProgressRegression,
}

impl Default for PollingOptions {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_millis(1000),
            max_interval: Duration::from_millis(8000),
            backoff_multiplier: 2.0,
            max_attempts: 120,
            hidden_tab_interval: Duration::from_millis(5000),
            request_timeout: Duration::from_millis(10_000),
            progress_regression: ProgressRegression::default(),
        }
    }
}

impl PollingOptions {
    pub fn with_initial_interval(mut self, interval: Duration) -> Self {
        self.initial_interval = interval;
        self
    }

    pub fn with_max_interval(mut self, interval: Duration) -> Self {
        self.max_interval = interval;
        self
    }

    pub fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn with_hidden_tab_interval(mut self, interval: Duration) -> Self {
        self.hidden_tab_interval = interval;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_progress_regression(mut self, policy: ProgressRegression) -> Self {
        self.progress_regression = policy;
        self
    }

    /// Validates the options
    pub fn validate(&self) -> Result<()> {
        if self.initial_interval.is_zero() {
            return Err(invalid("initial_interval must be greater than 0"));
        }

        if self.max_interval < self.initial_interval {
            return Err(invalid("max_interval must be at least initial_interval"));
        }

        if !self.backoff_multiplier.is_finite() || self.backoff_multiplier <= 1.0 {
            return Err(invalid("backoff_multiplier must be a finite number above 1"));
        }

        if self.max_attempts == 0 {
            return Err(invalid("max_attempts must be greater than 0"));
        }

        if self.hidden_tab_interval.is_zero() {
            return Err(invalid("hidden_tab_interval must be greater than 0"));
        }

        if self.request_timeout.is_zero() {
            return Err(invalid("request_timeout must be greater than 0"));
        }

        Ok(())
    }
}

fn invalid(message: &str) -> CoreError {
    CoreError::InvalidOptions(message.to_string())
}
