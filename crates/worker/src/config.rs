use std::time::Duration;

use reelcraft_core::polling::{BackoffConfig, DEFAULT_MULTIPLIER};

/// Poller process configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Delay between polls while vendors are healthy.
    pub poll_initial_secs: u64,
    /// Ceiling for the delay after repeated poll failures.
    pub poll_max_secs: u64,
    /// How long to wait for the poller and notification writer on shutdown.
    pub shutdown_timeout_secs: u64,
    /// Shared with the API so both processes agree on vendor pacing.
    pub generation_rate_limit_per_minute: u32,
}

impl PollerConfig {
    /// | Env Var                             | Default |
    /// |-------------------------------------|---------|
    /// | `POLL_INITIAL_SECS`                 | `5`     |
    /// | `POLL_MAX_SECS`                     | `60`    |
    /// | `SHUTDOWN_TIMEOUT_SECS`             | `30`    |
    /// | `GENERATION_RATE_LIMIT_PER_MINUTE`  | `10`    |
    pub fn from_env() -> Self {
        let poll_initial_secs: u64 = std::env::var("POLL_INITIAL_SECS")
            .unwrap_or_else(|_| "5".into())
            .parse()
            .expect("POLL_INITIAL_SECS must be a valid u64");

        let poll_max_secs: u64 = std::env::var("POLL_MAX_SECS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("POLL_MAX_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let generation_rate_limit_per_minute: u32 =
            std::env::var("GENERATION_RATE_LIMIT_PER_MINUTE")
                .unwrap_or_else(|_| "10".into())
                .parse()
                .expect("GENERATION_RATE_LIMIT_PER_MINUTE must be a valid u32");

        Self {
            poll_initial_secs,
            poll_max_secs,
            shutdown_timeout_secs,
            generation_rate_limit_per_minute,
        }
    }

    /// Poll backoff; the ceiling never drops below the initial interval.
    pub fn backoff(&self) -> BackoffConfig {
        let initial = self.poll_initial_secs.max(1);
        BackoffConfig {
            initial: Duration::from_secs(initial),
            max: Duration::from_secs(self.poll_max_secs.max(initial)),
            multiplier: DEFAULT_MULTIPLIER,
        }
    }
}
