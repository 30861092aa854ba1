//! Usage log model and aggregates.

use chrono::NaiveDate;
use reelcraft_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `usage_logs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UsageLog {
    pub id: DbId,
    pub user_id: DbId,
    pub project_id: Option<DbId>,
    pub generation_id: Option<DbId>,
    pub service: String,
    pub model: String,
    pub units: i32,
    pub cost_cents: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct CreateUsageLog {
    pub user_id: DbId,
    pub project_id: Option<DbId>,
    pub generation_id: Option<DbId>,
    pub service: &'static str,
    pub model: String,
    pub units: i32,
    pub cost_cents: i32,
}

/// Spend for one UTC day and service.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DailyUsage {
    pub day: NaiveDate,
    pub service: String,
    pub calls: i64,
    pub cost_cents: i64,
}
