//! Template entity model and DTOs.

use reelcraft_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `templates` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Template {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub aspect_ratio: String,
    pub brief: serde_json::Value,
    pub scene_outline: serde_json::Value,
    pub is_public: bool,
    pub use_count: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// One scene stub in a template's outline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlineScene {
    pub description: String,
    pub duration_secs: Option<i32>,
}

impl Template {
    /// Scene stubs, skipping malformed entries.
    pub fn outline(&self) -> Vec<OutlineScene> {
        self.scene_outline
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| serde_json::from_value(v.clone()).ok())
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTemplate {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub aspect_ratio: Option<String>,
    pub brief: Option<serde_json::Value>,
    pub scene_outline: Option<Vec<OutlineScene>>,
    pub is_public: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateTemplate {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub aspect_ratio: Option<String>,
    pub brief: Option<serde_json::Value>,
    pub scene_outline: Option<Vec<OutlineScene>>,
    pub is_public: Option<bool>,
}

/// Request body for `POST /templates/{id}/use`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UseTemplate {
    /// Name for the new project; defaults to the template name.
    pub name: Option<String>,
    pub brand_kit_id: Option<DbId>,
    pub campaign_id: Option<DbId>,
}
