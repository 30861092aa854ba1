//! Scene rules: allowed clip durations, aspect ratios, and audio settings.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Clip lengths (seconds) the video model accepts.
pub const ALLOWED_DURATIONS_SECS: [i32; 3] = [4, 6, 8];

/// Duration used when a scene does not specify one.
pub const DEFAULT_DURATION_SECS: i32 = 8;

pub const ASPECT_LANDSCAPE: &str = "16:9";
pub const ASPECT_PORTRAIT: &str = "9:16";

pub const VALID_ASPECT_RATIOS: &[&str] = &[ASPECT_LANDSCAPE, ASPECT_PORTRAIT];

/// Maximum number of scenes a single project may hold.
pub const MAX_SCENES_PER_PROJECT: usize = 20;

/// Snap a requested duration to the nearest allowed clip length.
///
/// Below 4 snaps to 4, above 8 snaps to 8, and the midpoints (5 and 7)
/// round up.
pub fn snap_duration(requested_secs: i32) -> i32 {
    match requested_secs {
        i32::MIN..=4 => 4,
        5..=6 => 6,
        _ => 8,
    }
}

pub fn validate_aspect_ratio(ratio: &str) -> Result<(), CoreError> {
    if VALID_ASPECT_RATIOS.contains(&ratio) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid aspect ratio '{ratio}'. Must be one of: {}",
            VALID_ASPECT_RATIOS.join(", ")
        )))
    }
}

/// Per-scene audio settings stored in `scenes.audio_config`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Ask the video model to generate native audio alongside the clip.
    #[serde(default)]
    pub generate_audio: bool,
    /// Narration text synthesized by the TTS service.
    pub voiceover_script: Option<String>,
    /// Vendor voice name, e.g. `en-US-Neural2-F`.
    pub voice_name: Option<String>,
    pub music_mood: Option<String>,
}

impl AudioConfig {
    /// Parse the JSON column, falling back to defaults for null or junk.
    pub fn from_json(value: &serde_json::Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or_default()
    }

    /// The voiceover script, if one is set and non-blank.
    pub fn script(&self) -> Option<&str> {
        self.voiceover_script
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}
