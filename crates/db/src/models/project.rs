//! Project entity model and DTOs.

use reelcraft_core::error::CoreError;
use reelcraft_core::types::{DbId, Timestamp};
use reelcraft_core::workflow::ProjectStatus;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub user_id: DbId,
    pub brand_kit_id: Option<DbId>,
    pub campaign_id: Option<DbId>,
    pub name: String,
    pub description: Option<String>,
    pub brief: serde_json::Value,
    pub strategy: Option<serde_json::Value>,
    pub status: String,
    pub current_step: i32,
    pub aspect_ratio: String,
    pub final_video_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Project {
    /// Parsed workflow status. The column is constrained, so a parse
    /// failure means the row was written outside this codebase.
    pub fn workflow_status(&self) -> Result<ProjectStatus, CoreError> {
        self.status.parse()
    }
}

/// DTO for creating a new project. New projects always start in `draft`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProject {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub description: Option<String>,
    pub brief: Option<serde_json::Value>,
    pub brand_kit_id: Option<DbId>,
    pub campaign_id: Option<DbId>,
    /// Defaults to `16:9` if omitted.
    pub aspect_ratio: Option<String>,
}

/// DTO for updating an existing project. All fields are optional.
///
/// Status is deliberately absent; it only changes through workflow
/// transitions.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProject {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub brief: Option<serde_json::Value>,
    pub brand_kit_id: Option<DbId>,
    pub campaign_id: Option<DbId>,
    pub aspect_ratio: Option<String>,
}

/// Per-status project count for dashboards.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectStatusCount {
    pub status: String,
    pub count: i64,
}
