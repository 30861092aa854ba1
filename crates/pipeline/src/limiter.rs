//! Per-user rate limit on requests that start paid AI work.

use std::num::NonZeroU32;

use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use reelcraft_core::error::CoreError;
use reelcraft_core::types::DbId;

pub const DEFAULT_REQUESTS_PER_MINUTE: u32 = 10;

pub struct GenerationLimiter {
    limiter: DefaultKeyedRateLimiter<DbId>,
}

impl GenerationLimiter {
    pub fn per_minute(requests: u32) -> Self {
        let quota = Quota::per_minute(NonZeroU32::new(requests).unwrap_or(NonZeroU32::MIN));
        Self {
            limiter: RateLimiter::keyed(quota),
        }
    }

    /// Consume one request from `user_id`'s allowance.
    pub fn check(&self, user_id: DbId) -> Result<(), CoreError> {
        self.limiter.check_key(&user_id).map_err(|_| {
            tracing::warn!(user_id, "Generation rate limit hit");
            CoreError::RateLimited("Too many generation requests, try again shortly".to_string())
        })
    }
}

impl Default for GenerationLimiter {
    fn default() -> Self {
        Self::per_minute(DEFAULT_REQUESTS_PER_MINUTE)
    }
}
