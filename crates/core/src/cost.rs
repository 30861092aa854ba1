//! Cost estimation and daily budget enforcement.
//!
//! Prices are list prices in US cents. They only need to be close enough
//! to stop a runaway batch; the vendor bill is the source of truth.

use serde::Serialize;

use crate::error::CoreError;

/// Video without native audio, per generated second.
pub const VIDEO_CENTS_PER_SECOND: i32 = 50;
/// Video with native audio, per generated second.
pub const VIDEO_WITH_AUDIO_CENTS_PER_SECOND: i32 = 75;
/// One generated still image.
pub const IMAGE_CENTS: i32 = 4;
/// Characters of synthesized speech covered by one cent.
pub const TTS_CHARS_PER_CENT: i32 = 625;
/// Flat estimate for one LLM text call.
pub const LLM_CALL_CENTS: i32 = 1;

/// Budget applied to users that have not set one.
pub const DEFAULT_DAILY_BUDGET_CENTS: i32 = 2000;

// Usage log service names.
pub const SERVICE_LLM: &str = "llm";
pub const SERVICE_VIDEO: &str = "video";
pub const SERVICE_IMAGE: &str = "image";
pub const SERVICE_TTS: &str = "tts";

pub fn estimate_video_cents(duration_secs: i32, with_audio: bool) -> i32 {
    let rate = if with_audio {
        VIDEO_WITH_AUDIO_CENTS_PER_SECOND
    } else {
        VIDEO_CENTS_PER_SECOND
    };
    duration_secs.max(0) * rate
}

pub fn estimate_image_cents(count: i32) -> i32 {
    count.max(0) * IMAGE_CENTS
}

/// TTS cost for `chars` characters, rounded up, at least one cent.
pub fn estimate_tts_cents(chars: usize) -> i32 {
    let chars = i32::try_from(chars).unwrap_or(i32::MAX);
    let cents = chars / TTS_CHARS_PER_CENT + i32::from(chars % TTS_CHARS_PER_CENT != 0);
    cents.max(1)
}

/// Snapshot of a user's spending for the current UTC day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BudgetStatus {
    pub budget_cents: i32,
    pub spent_cents: i64,
    pub remaining_cents: i64,
}

impl BudgetStatus {
    pub fn new(budget_cents: i32, spent_cents: i64) -> Self {
        Self {
            budget_cents,
            spent_cents,
            remaining_cents: (i64::from(budget_cents) - spent_cents).max(0),
        }
    }

    /// Reject `estimate_cents` of new spend that would overrun the budget.
    pub fn check(&self, estimate_cents: i64) -> Result<(), CoreError> {
        if self.spent_cents + estimate_cents > i64::from(self.budget_cents) {
            Err(CoreError::RateLimited(format!(
                "Daily budget exceeded: {} of {} cents used, request needs {}",
                self.spent_cents, self.budget_cents, estimate_cents
            )))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn video_cost_scales_with_duration_and_audio() {
        assert_eq!(estimate_video_cents(8, false), 400);
        assert_eq!(estimate_video_cents(8, true), 600);
        assert_eq!(estimate_video_cents(-1, true), 0);
    }

    #[test]
    fn tts_cost_rounds_up() {
        assert_eq!(estimate_tts_cents(1), 1);
        assert_eq!(estimate_tts_cents(625), 1);
        assert_eq!(estimate_tts_cents(626), 2);
        assert_eq!(estimate_tts_cents(0), 1);
    }

    #[test]
    fn image_cost() {
        assert_eq!(estimate_image_cents(3), 12);
    }

    #[test]
    fn budget_allows_exact_fit() {
        let status = BudgetStatus::new(1000, 600);
        assert_eq!(status.remaining_cents, 400);
        assert!(status.check(400).is_ok());
    }

    #[test]
    fn budget_rejects_overrun() {
        let status = BudgetStatus::new(1000, 600);
        assert_matches!(status.check(401), Err(CoreError::RateLimited(_)));
    }

    #[test]
    fn remaining_never_negative() {
        assert_eq!(BudgetStatus::new(100, 250).remaining_cents, 0);
    }
}
