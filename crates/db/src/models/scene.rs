//! Scene entity model and DTOs.

use reelcraft_core::scene::AudioConfig;
use reelcraft_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `scenes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Scene {
    pub id: DbId,
    pub project_id: DbId,
    pub sort_order: i32,
    pub description: String,
    pub optimized_prompt: Option<String>,
    pub negative_prompt: Option<String>,
    pub is_approved: bool,
    pub audio_config: serde_json::Value,
    pub duration_secs: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Scene {
    pub fn audio(&self) -> AudioConfig {
        AudioConfig::from_json(&self.audio_config)
    }

    /// Text sent to the video model: the optimized prompt when present,
    /// otherwise the raw description.
    pub fn video_prompt(&self) -> &str {
        self.optimized_prompt
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or(&self.description)
    }
}

/// DTO for creating a scene. Durations are snapped before insert.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateScene {
    #[validate(length(min = 1, max = 4000))]
    pub description: String,
    pub sort_order: Option<i32>,
    pub duration_secs: Option<i32>,
    pub audio_config: Option<serde_json::Value>,
}

/// DTO for updating a scene. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateScene {
    #[validate(length(min = 1, max = 4000))]
    pub description: Option<String>,
    pub sort_order: Option<i32>,
    pub optimized_prompt: Option<String>,
    pub negative_prompt: Option<String>,
    pub is_approved: Option<bool>,
    pub duration_secs: Option<i32>,
    pub audio_config: Option<serde_json::Value>,
}
