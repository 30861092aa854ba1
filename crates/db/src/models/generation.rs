//! Generation entity model and DTOs.
//!
//! One row per external AI invocation. Status changes go through the
//! dedicated repository methods rather than a generic update DTO.

use reelcraft_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A row from the `generations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Generation {
    pub id: DbId,
    pub user_id: DbId,
    pub project_id: DbId,
    pub scene_id: Option<DbId>,
    pub batch_id: Option<Uuid>,
    pub kind: String,
    pub status: String,
    pub provider: String,
    pub model: String,
    pub prompt: Option<String>,
    pub negative_prompt: Option<String>,
    pub operation_name: Option<String>,
    pub output_url: Option<String>,
    pub storage_key: Option<String>,
    pub error_message: Option<String>,
    pub retry_count: i32,
    pub estimated_cost_cents: i32,
    pub duration_secs: Option<i32>,
    pub started_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub last_polled_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a generation row.
#[derive(Debug, Clone)]
pub struct CreateGeneration {
    pub user_id: DbId,
    pub project_id: DbId,
    pub scene_id: Option<DbId>,
    pub batch_id: Option<Uuid>,
    pub kind: String,
    /// Initial status; `queued` for batch videos, `processing` for
    /// synchronous and stitch jobs.
    pub status: String,
    pub provider: String,
    pub model: String,
    pub prompt: Option<String>,
    pub negative_prompt: Option<String>,
    pub estimated_cost_cents: i32,
    pub duration_secs: Option<i32>,
}

/// Count of generations per kind and status.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GenerationCount {
    pub kind: String,
    pub status: String,
    pub count: i64,
}
