//! Content calendar event types and time-range checks.

use crate::error::CoreError;
use crate::types::Timestamp;

pub const EVENT_PUBLISH: &str = "publish";
pub const EVENT_DEADLINE: &str = "deadline";
pub const EVENT_REVIEW: &str = "review";
pub const EVENT_LAUNCH: &str = "launch";
pub const EVENT_OTHER: &str = "other";

pub const VALID_EVENT_TYPES: &[&str] = &[
    EVENT_PUBLISH,
    EVENT_DEADLINE,
    EVENT_REVIEW,
    EVENT_LAUNCH,
    EVENT_OTHER,
];

pub fn validate_event_type(event_type: &str) -> Result<(), CoreError> {
    if VALID_EVENT_TYPES.contains(&event_type) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid event type '{event_type}'. Must be one of: {}",
            VALID_EVENT_TYPES.join(", ")
        )))
    }
}

/// An event may be open-ended, but its end must not precede its start.
pub fn validate_time_range(starts_at: Timestamp, ends_at: Option<Timestamp>) -> Result<(), CoreError> {
    match ends_at {
        Some(end) if end < starts_at => Err(CoreError::Validation(
            "Event end must not precede its start".to_string(),
        )),
        _ => Ok(()),
    }
}

/// Range filter for listing: `from` must not come after `to`.
pub fn validate_range_filter(from: Option<Timestamp>, to: Option<Timestamp>) -> Result<(), CoreError> {
    match (from, to) {
        (Some(f), Some(t)) if f > t => Err(CoreError::Validation(
            "'from' must not be after 'to'".to_string(),
        )),
        _ => Ok(()),
    }
}
