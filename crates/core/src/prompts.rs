//! LLM prompt construction and response parsing for the creative steps.
//!
//! The brief, strategy, and scene drafts are stored as JSON columns; the
//! structs here are their typed views. Every LLM call asks for JSON, and
//! [`extract_json`] tolerates the markdown fences models like to add.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::scene::{snap_duration, MAX_SCENES_PER_PROJECT};

/// Scene count requested when the strategy does not suggest one.
pub const DEFAULT_SCENE_COUNT: usize = 4;

// ---------------------------------------------------------------------------
// Typed JSON columns
// ---------------------------------------------------------------------------

/// The creative brief a user fills in at step 1.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Brief {
    #[serde(default)]
    pub product: String,
    #[serde(default)]
    pub audience: String,
    pub goals: Option<String>,
    pub tone: Option<String>,
    #[serde(default)]
    pub platforms: Vec<String>,
    pub call_to_action: Option<String>,
    #[serde(default)]
    pub key_messages: Vec<String>,
}

impl Brief {
    pub fn from_json(value: &serde_json::Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or_default()
    }

    /// A brief is ready for strategy once it names a product and audience.
    pub fn validate_for_submission(&self) -> Result<(), CoreError> {
        if self.product.trim().is_empty() {
            return Err(CoreError::Validation(
                "Brief must describe the product".to_string(),
            ));
        }
        if self.audience.trim().is_empty() {
            return Err(CoreError::Validation(
                "Brief must describe the target audience".to_string(),
            ));
        }
        Ok(())
    }
}

/// The marketing strategy produced at step 2.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub core_message: String,
    pub target_emotion: Option<String>,
    pub visual_style: Option<String>,
    #[serde(default)]
    pub narrative_arc: Vec<String>,
    #[serde(default)]
    pub hooks: Vec<String>,
    pub recommended_scene_count: Option<usize>,
}

impl Strategy {
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        if value.is_null() {
            return None;
        }
        serde_json::from_value(value.clone()).ok()
    }

    /// Scene count to request, bounded to what a project may hold.
    pub fn scene_count(&self) -> usize {
        self.recommended_scene_count
            .unwrap_or(DEFAULT_SCENE_COUNT)
            .clamp(1, MAX_SCENES_PER_PROJECT)
    }
}

/// One scene as proposed by the LLM breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDraft {
    pub description: String,
    pub duration_secs: Option<i32>,
    pub voiceover_script: Option<String>,
    pub music_mood: Option<String>,
}

/// A rewritten video-model prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizedPrompt {
    pub prompt: String,
    #[serde(default)]
    pub negative_prompt: String,
}

/// Brand details injected into prompts. Built from a brand kit row.
#[derive(Debug, Clone, Default)]
pub struct BrandContext {
    pub name: String,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub font_family: Option<String>,
}

// ---------------------------------------------------------------------------
// Prompt builders
// ---------------------------------------------------------------------------

fn push_line(out: &mut String, label: &str, value: Option<&str>) {
    if let Some(v) = value.map(str::trim).filter(|v| !v.is_empty()) {
        out.push_str(label);
        out.push_str(": ");
        out.push_str(v);
        out.push('\n');
    }
}

fn describe_brief(brief: &Brief) -> String {
    let mut out = String::new();
    push_line(&mut out, "Product", Some(&brief.product));
    push_line(&mut out, "Audience", Some(&brief.audience));
    push_line(&mut out, "Goals", brief.goals.as_deref());
    push_line(&mut out, "Tone", brief.tone.as_deref());
    if !brief.platforms.is_empty() {
        push_line(&mut out, "Platforms", Some(&brief.platforms.join(", ")));
    }
    push_line(&mut out, "Call to action", brief.call_to_action.as_deref());
    if !brief.key_messages.is_empty() {
        push_line(&mut out, "Key messages", Some(&brief.key_messages.join("; ")));
    }
    out
}

pub fn build_strategy_prompt(brief: &Brief) -> String {
    format!(
        "You are a senior creative strategist planning a short marketing video.\n\
         {brief}\n\
         Respond with a single JSON object with keys: headline (string), \
         core_message (string), target_emotion (string), visual_style (string), \
         narrative_arc (array of strings), hooks (array of strings), \
         recommended_scene_count (integer between 1 and {max}).",
        brief = describe_brief(brief),
        max = MAX_SCENES_PER_PROJECT,
    )
}

pub fn build_scene_breakdown_prompt(brief: &Brief, strategy: &Strategy) -> String {
    let mut context = describe_brief(brief);
    push_line(&mut context, "Headline", Some(&strategy.headline));
    push_line(&mut context, "Core message", Some(&strategy.core_message));
    push_line(&mut context, "Visual style", strategy.visual_style.as_deref());
    if !strategy.narrative_arc.is_empty() {
        push_line(
            &mut context,
            "Narrative arc",
            Some(&strategy.narrative_arc.join(" -> ")),
        );
    }
    format!(
        "Break this marketing video into exactly {count} scenes.\n\
         {context}\n\
         Respond with a JSON object {{\"scenes\": [...]}} where each scene has: \
         description (one vivid shot description), duration_secs (4, 6 or 8), \
         voiceover_script (string or null), music_mood (string or null).",
        count = strategy.scene_count(),
    )
}

pub fn build_prompt_optimization(
    scene_description: &str,
    strategy: Option<&Strategy>,
    brand: Option<&BrandContext>,
    aspect_ratio: &str,
    duration_secs: i32,
) -> String {
    let mut context = String::new();
    if let Some(s) = strategy {
        push_line(&mut context, "Visual style", s.visual_style.as_deref());
        push_line(&mut context, "Target emotion", s.target_emotion.as_deref());
    }
    if let Some(b) = brand {
        push_line(&mut context, "Brand", Some(&b.name));
        push_line(&mut context, "Primary color", b.primary_color.as_deref());
        push_line(&mut context, "Secondary color", b.secondary_color.as_deref());
    }
    format!(
        "Rewrite the scene below into a prompt for a text-to-video model. \
         Describe subject, action, camera movement, lighting and style \
         in one paragraph. The clip is {duration_secs} seconds at {aspect_ratio}.\n\
         {context}\
         Scene: {scene}\n\
         Respond with a JSON object with keys: prompt (string), \
         negative_prompt (comma-separated things to avoid).",
        scene = scene_description.trim(),
    )
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

/// Pull the JSON payload out of an LLM reply.
///
/// Strips markdown code fences and any prose around the outermost object
/// or array.
pub fn extract_json(text: &str) -> &str {
    let trimmed = text.trim();
    let start = trimmed.find(['{', '[']);
    let end = trimmed.rfind(['}', ']']);
    match (start, end) {
        (Some(s), Some(e)) if e >= s => &trimmed[s..=e],
        _ => trimmed,
    }
}

fn parse_reply<T: DeserializeOwned>(text: &str, what: &str) -> Result<T, CoreError> {
    serde_json::from_str(extract_json(text))
        .map_err(|e| CoreError::Internal(format!("Model returned an unreadable {what}: {e}")))
}

pub fn parse_strategy(text: &str) -> Result<Strategy, CoreError> {
    let strategy: Strategy = parse_reply(text, "strategy")?;
    if strategy.headline.trim().is_empty() && strategy.core_message.trim().is_empty() {
        return Err(CoreError::Internal(
            "Model returned an empty strategy".to_string(),
        ));
    }
    Ok(strategy)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SceneReply {
    Wrapped { scenes: Vec<SceneDraft> },
    Bare(Vec<SceneDraft>),
}

/// Parse a scene breakdown. Durations are snapped, blank scenes dropped,
/// and the list is capped at [`MAX_SCENES_PER_PROJECT`].
pub fn parse_scene_drafts(text: &str) -> Result<Vec<SceneDraft>, CoreError> {
    let reply: SceneReply = parse_reply(text, "scene breakdown")?;
    let drafts = match reply {
        SceneReply::Wrapped { scenes } => scenes,
        SceneReply::Bare(scenes) => scenes,
    };
    let drafts: Vec<SceneDraft> = drafts
        .into_iter()
        .filter(|d| !d.description.trim().is_empty())
        .take(MAX_SCENES_PER_PROJECT)
        .map(|mut d| {
            d.duration_secs = d.duration_secs.map(snap_duration);
            d
        })
        .collect();
    if drafts.is_empty() {
        return Err(CoreError::Internal(
            "Model returned no usable scenes".to_string(),
        ));
    }
    Ok(drafts)
}

pub fn parse_optimized_prompt(text: &str) -> Result<OptimizedPrompt, CoreError> {
    let prompt: OptimizedPrompt = parse_reply(text, "prompt")?;
    if prompt.prompt.trim().is_empty() {
        return Err(CoreError::Internal(
            "Model returned an empty prompt".to_string(),
        ));
    }
    Ok(prompt)
}
