//! Generation kinds, statuses, and the polling failure rule.
//!
//! A generation row tracks one external AI invocation. Video generations
//! are long-running remote operations polled by name; images and
//! voiceovers complete synchronously inside the request that created them.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Kinds
// ---------------------------------------------------------------------------

pub const KIND_VIDEO: &str = "video";
pub const KIND_IMAGE: &str = "image";
pub const KIND_VOICEOVER: &str = "voiceover";
pub const KIND_STITCHED: &str = "stitched";

pub const VALID_KINDS: &[&str] = &[KIND_VIDEO, KIND_IMAGE, KIND_VOICEOVER, KIND_STITCHED];

// ---------------------------------------------------------------------------
// Statuses
// ---------------------------------------------------------------------------

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_QUEUED: &str = "queued";
pub const STATUS_PROCESSING: &str = "processing";
pub const STATUS_COMPLETED: &str = "completed";
pub const STATUS_FAILED: &str = "failed";

pub const VALID_STATUSES: &[&str] = &[
    STATUS_PENDING,
    STATUS_QUEUED,
    STATUS_PROCESSING,
    STATUS_COMPLETED,
    STATUS_FAILED,
];

/// Cumulative polling failures after which a generation is marked failed.
pub const MAX_POLL_FAILURES: i32 = 3;

pub fn validate_kind(kind: &str) -> Result<(), CoreError> {
    if VALID_KINDS.contains(&kind) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid generation kind '{kind}'. Must be one of: {}",
            VALID_KINDS.join(", ")
        )))
    }
}

pub fn validate_status(status: &str) -> Result<(), CoreError> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid generation status '{status}'. Must be one of: {}",
            VALID_STATUSES.join(", ")
        )))
    }
}

pub fn is_terminal(status: &str) -> bool {
    status == STATUS_COMPLETED || status == STATUS_FAILED
}

/// A row is worth polling only while processing with a known remote name.
pub fn is_pollable(status: &str, operation_name: Option<&str>) -> bool {
    status == STATUS_PROCESSING && operation_name.is_some_and(|n| !n.is_empty())
}

// ---------------------------------------------------------------------------
// Poll failure rule
// ---------------------------------------------------------------------------

/// What to do with a row after a failed poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollFailure {
    /// Record the failure and keep the row processing.
    Retry { retry_count: i32 },
    /// Failure budget exhausted; mark the row failed.
    GiveUp { retry_count: i32 },
}

/// Apply one polling failure to a row that has already failed
/// `retry_count` times.
pub fn record_poll_failure(retry_count: i32) -> PollFailure {
    let next = retry_count.saturating_add(1);
    if next >= MAX_POLL_FAILURES {
        PollFailure::GiveUp { retry_count: next }
    } else {
        PollFailure::Retry { retry_count: next }
    }
}

// ---------------------------------------------------------------------------
// Batch state
// ---------------------------------------------------------------------------

/// Aggregate state of a project's video batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    /// No video generations exist.
    Empty,
    /// At least one generation is still pending, queued, or processing.
    InFlight,
    /// Every generation is terminal and at least one completed.
    Finished { completed: usize, failed: usize },
    /// Every generation is terminal and none completed.
    AllFailed,
}

pub fn batch_state<'a>(statuses: impl IntoIterator<Item = &'a str>) -> BatchState {
    let mut total = 0usize;
    let mut completed = 0usize;
    let mut failed = 0usize;
    for status in statuses {
        total += 1;
        match status {
            STATUS_COMPLETED => completed += 1,
            STATUS_FAILED => failed += 1,
            _ => {}
        }
    }
    if total == 0 {
        BatchState::Empty
    } else if completed + failed < total {
        BatchState::InFlight
    } else if completed == 0 {
        BatchState::AllFailed
    } else {
        BatchState::Finished { completed, failed }
    }
}
