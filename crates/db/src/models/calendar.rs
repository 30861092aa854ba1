//! Calendar event model and DTOs.

use reelcraft_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `calendar_events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CalendarEvent {
    pub id: DbId,
    pub user_id: DbId,
    pub project_id: Option<DbId>,
    pub campaign_id: Option<DbId>,
    pub title: String,
    pub description: Option<String>,
    pub event_type: String,
    pub platform: Option<String>,
    pub starts_at: Timestamp,
    pub ends_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCalendarEvent {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub description: Option<String>,
    /// Defaults to `publish` if omitted.
    pub event_type: Option<String>,
    pub platform: Option<String>,
    pub project_id: Option<DbId>,
    pub campaign_id: Option<DbId>,
    pub starts_at: Timestamp,
    pub ends_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCalendarEvent {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub event_type: Option<String>,
    pub platform: Option<String>,
    pub project_id: Option<DbId>,
    pub campaign_id: Option<DbId>,
    pub starts_at: Option<Timestamp>,
    pub ends_at: Option<Timestamp>,
}
