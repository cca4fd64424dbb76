//! Adaptive backoff
//!
//! Decides the delay before the next status check from the progress the
//! job reported. Movement resets to the fastest cadence, idle checks grow
//! the delay geometrically up to the ceiling.

use std::time::Duration;

use aurity_core::domain::{PollingOptions, ProgressRegression};
use tracing::warn;

/// How a status observation compared with the previous one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    /// First observation of the session
    Baseline,
    /// Progress strictly increased
    Progressed,
    /// Progress unchanged
    Unchanged,
    /// Progress went backwards
    Regressed,
}

#[derive(Debug, Clone)]
pub struct AdaptiveBackoff {
    initial: Duration,
    max: Duration,
    multiplier: f64,
    regression: ProgressRegression,
    current: Duration,
    last_progress: Option<f64>,
}

impl AdaptiveBackoff {
    pub fn new(options: &PollingOptions) -> Self {
        Self {
            initial: options.initial_interval,
            max: options.max_interval,
            multiplier: options.backoff_multiplier,
            regression: options.progress_regression,
            current: options.initial_interval,
            last_progress: None,
        }
    }

    /// Delay before the next check
    pub fn current(&self) -> Duration {
        self.current
    }

    pub fn last_progress(&self) -> Option<f64> {
        self.last_progress
    }

    /// Folds one observation into the cadence
    ///
    /// `running` is false when the job reached a state that will not be
    /// polled again; the interval is then left alone.
    pub fn observe(&mut self, progress: f64, running: bool) -> Observation {
        let Some(last) = self.last_progress else {
            self.last_progress = Some(progress);
            self.current = self.initial;
            return Observation::Baseline;
        };

        if progress > last {
            self.last_progress = Some(progress);
            self.current = self.initial;
            return Observation::Progressed;
        }

        let observation = if progress < last {
            warn!(
                previous = last,
                reported = progress,
                policy = ?self.regression,
                "Job progress went backwards"
            );
            if self.regression == ProgressRegression::Rebase {
                self.last_progress = Some(progress);
            }
            Observation::Regressed
        } else {
            Observation::Unchanged
        };

        if running {
            self.grow();
        }
        observation
    }

    fn grow(&mut self) {
        let scaled = Duration::try_from_secs_f64(self.current.as_secs_f64() * self.multiplier)
            .unwrap_or(self.max);
        self.current = scaled.min(self.max).max(self.initial);
    }
}
