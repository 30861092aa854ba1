//! Geometric backoff for polling remote generation operations.
//!
//! The interval doubles after each consecutive failed poll, is clamped to
//! a ceiling, and snaps back to the initial interval on the first success.

use std::time::Duration;

/// Default delay between polls while everything is healthy.
pub const DEFAULT_INITIAL_INTERVAL: Duration = Duration::from_secs(5);
/// Upper bound on the delay between polls.
pub const DEFAULT_MAX_INTERVAL: Duration = Duration::from_secs(60);
/// Growth factor applied after each failure.
pub const DEFAULT_MULTIPLIER: f64 = 2.0;

/// Tunable parameters for [`PollBackoff`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackoffConfig {
    pub initial: Duration,
    pub max: Duration,
    pub multiplier: f64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            initial: DEFAULT_INITIAL_INTERVAL,
            max: DEFAULT_MAX_INTERVAL,
            multiplier: DEFAULT_MULTIPLIER,
        }
    }
}

/// Calculate the next delay from the current one. Clamped to `config.max`.
pub fn next_delay(current: Duration, config: &BackoffConfig) -> Duration {
    let next_ms = (current.as_millis() as f64 * config.multiplier) as u64;
    Duration::from_millis(next_ms).min(config.max)
}

/// Stateful poll interval tracker.
#[derive(Debug, Clone)]
pub struct PollBackoff {
    config: BackoffConfig,
    current: Duration,
    consecutive_failures: u32,
}

impl PollBackoff {
    pub fn new(config: BackoffConfig) -> Self {
        Self {
            current: config.initial,
            config,
            consecutive_failures: 0,
        }
    }

    /// Delay to wait before the next poll.
    pub fn current(&self) -> Duration {
        self.current
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Record a failed poll and return the new (longer) delay.
    pub fn on_failure(&mut self) -> Duration {
        self.consecutive_failures += 1;
        self.current = next_delay(self.current, &self.config);
        self.current
    }

    /// Record a successful poll and return the reset delay.
    pub fn on_success(&mut self) -> Duration {
        self.consecutive_failures = 0;
        self.current = self.config.initial;
        self.current
    }
}

impl Default for PollBackoff {
    fn default() -> Self {
        Self::new(BackoffConfig::default())
    }
}
