//! Bounded wait for the remote menu to settle

use crate::config::PollConfig;
use crate::{ApiError, Result};
use std::time::Duration;
use tracing::debug;

/// Re-runs a probe until it yields a value or the retry budget is spent
///
/// The probe runs once immediately, then up to `attempts` more times with
/// `interval` between runs. Errors returned by the probe abort the wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Poller {
    attempts: u32,
    interval: Duration,
}

impl Poller {
    pub fn new(config: PollConfig) -> Self {
        Self {
            attempts: config.attempts,
            interval: config.interval,
        }
    }

    /// Wait until `probe` returns `Some`
    ///
    /// # Errors
    /// `Timeout` after the last retry, or the probe's own error.
    pub fn poll<T, F>(&self, mut probe: F) -> Result<T>
    where
        F: FnMut() -> Result<Option<T>>,
    {
        if let Some(value) = probe()? {
            return Ok(value);
        }

        for attempt in 1..=self.attempts {
            if !self.interval.is_zero() {
                std::thread::sleep(self.interval);
            }
            if let Some(value) = probe()? {
                return Ok(value);
            }
            debug!(attempt, of = self.attempts, "menu not settled yet");
        }

        Err(ApiError::Timeout {
            attempts: self.attempts,
        })
    }
}

impl Default for Poller {
    fn default() -> Self {
        Self::new(PollConfig::default())
    }
}
