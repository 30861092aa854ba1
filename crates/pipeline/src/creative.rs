//! LLM-driven creative steps: strategy, scene breakdown, prompt rewrite.

use reelcraft_core::cost::{LLM_CALL_CENTS, SERVICE_LLM};
use reelcraft_core::error::CoreError;
use reelcraft_core::prompts::{
    build_prompt_optimization, build_scene_breakdown_prompt, build_strategy_prompt,
    parse_optimized_prompt, parse_scene_drafts, parse_strategy, BrandContext, Brief, Strategy,
};
use reelcraft_core::scene::AudioConfig;
use reelcraft_core::types::DbId;
use reelcraft_core::workflow::ProjectStatus;
use reelcraft_db::models::brand::BrandKit;
use reelcraft_db::models::project::Project;
use reelcraft_db::models::scene::{CreateScene, Scene};
use reelcraft_db::models::usage::CreateUsageLog;
use reelcraft_db::repositories::{BrandKitRepo, ProjectRepo, SceneRepo};

use crate::budget::{admit, record_usage};
use crate::context::PipelineContext;
use crate::error::{PipelineError, PipelineResult};

pub(crate) async fn load_project(
    ctx: &PipelineContext,
    project_id: DbId,
    user_id: DbId,
) -> PipelineResult<Project> {
    ProjectRepo::find_for_user(&ctx.pool, project_id, user_id)
        .await?
        .ok_or_else(|| PipelineError::not_found("Project", project_id))
}

/// Call the LLM with budget checks and a usage row.
async fn call_llm(
    ctx: &PipelineContext,
    user_id: DbId,
    project_id: DbId,
    prompt: &str,
) -> PipelineResult<String> {
    admit(ctx, user_id, i64::from(LLM_CALL_CENTS)).await?;
    let text = ctx.text.generate_json(prompt).await?;
    record_usage(
        &ctx.pool,
        CreateUsageLog {
            user_id,
            project_id: Some(project_id),
            generation_id: None,
            service: SERVICE_LLM,
            model: ctx.text.model().to_string(),
            units: 1,
            cost_cents: LLM_CALL_CENTS,
        },
    )
    .await;
    Ok(text)
}

fn to_json<T: serde::Serialize>(value: &T) -> PipelineResult<serde_json::Value> {
    serde_json::to_value(value)
        .map_err(|e| PipelineError::Core(CoreError::Internal(format!("serialize: {e}"))))
}

/// Generate (or regenerate) the project's marketing strategy.
///
/// From `strategy_pending` the project advances to `scenes_pending`; in
/// `scenes_pending` the strategy is replaced in place.
pub async fn generate_strategy(
    ctx: &PipelineContext,
    user_id: DbId,
    project_id: DbId,
) -> PipelineResult<Project> {
    let project = load_project(ctx, project_id, user_id).await?;
    let status = project.workflow_status()?;
    if !matches!(
        status,
        ProjectStatus::StrategyPending | ProjectStatus::ScenesPending
    ) {
        return Err(PipelineError::conflict(format!(
            "Strategy can only be generated in 'strategy_pending' or 'scenes_pending' (currently '{status}')"
        )));
    }

    let brief = Brief::from_json(&project.brief);
    brief.validate_for_submission()?;

    let text = call_llm(ctx, user_id, project_id, &build_strategy_prompt(&brief)).await?;
    let strategy = parse_strategy(&text)?;

    let mut project = ProjectRepo::set_strategy(&ctx.pool, project_id, &to_json(&strategy)?)
        .await?
        .ok_or_else(|| PipelineError::not_found("Project", project_id))?;

    if status == ProjectStatus::StrategyPending {
        project = ProjectRepo::set_status(
            &ctx.pool,
            project_id,
            &[ProjectStatus::StrategyPending],
            ProjectStatus::ScenesPending,
        )
        .await?
        .ok_or_else(|| PipelineError::conflict("Project status changed while generating strategy"))?;
    }

    tracing::info!(project_id, user_id, headline = %strategy.headline, "Strategy generated");
    Ok(project)
}

/// Ask the LLM for a scene breakdown and replace the project's scenes.
pub async fn generate_scenes(
    ctx: &PipelineContext,
    user_id: DbId,
    project_id: DbId,
) -> PipelineResult<Vec<Scene>> {
    let project = load_project(ctx, project_id, user_id).await?;
    project.workflow_status()?.require(ProjectStatus::ScenesPending)?;

    let strategy = project
        .strategy
        .as_ref()
        .and_then(Strategy::from_json)
        .ok_or_else(|| PipelineError::conflict("Project has no strategy yet"))?;
    let brief = Brief::from_json(&project.brief);

    let text = call_llm(
        ctx,
        user_id,
        project_id,
        &build_scene_breakdown_prompt(&brief, &strategy),
    )
    .await?;
    let drafts = parse_scene_drafts(&text)?;

    let mut inputs = Vec::with_capacity(drafts.len());
    for (idx, draft) in drafts.into_iter().enumerate() {
        let audio = AudioConfig {
            generate_audio: false,
            voiceover_script: draft.voiceover_script,
            voice_name: None,
            music_mood: draft.music_mood,
        };
        inputs.push(CreateScene {
            description: draft.description,
            sort_order: Some(idx as i32),
            duration_secs: draft.duration_secs,
            audio_config: Some(to_json(&audio)?),
        });
    }

    let scenes = SceneRepo::replace_for_project(&ctx.pool, project_id, &inputs).await?;
    tracing::info!(project_id, count = scenes.len(), "Scenes generated");
    Ok(scenes)
}

fn brand_context(kit: &BrandKit) -> BrandContext {
    BrandContext {
        name: kit.name.clone(),
        primary_color: kit.primary_color.clone(),
        secondary_color: kit.secondary_color.clone(),
        font_family: kit.font_family.clone(),
    }
}

/// The project's brand kit, falling back to the user's default kit.
pub(crate) async fn resolve_brand_kit(
    ctx: &PipelineContext,
    project: &Project,
) -> PipelineResult<Option<BrandKit>> {
    if let Some(kit_id) = project.brand_kit_id {
        if let Some(kit) = BrandKitRepo::find_by_id(&ctx.pool, kit_id).await? {
            return Ok(Some(kit));
        }
    }
    Ok(BrandKitRepo::find_default(&ctx.pool, project.user_id).await?)
}

/// Rewrite a scene description into a video-model prompt.
///
/// Identical requests are answered from the prompt cache without an LLM
/// call or usage charge.
pub async fn optimize_prompt(
    ctx: &PipelineContext,
    user_id: DbId,
    scene_id: DbId,
) -> PipelineResult<Scene> {
    let scene = SceneRepo::find_for_user(&ctx.pool, scene_id, user_id)
        .await?
        .ok_or_else(|| PipelineError::not_found("Scene", scene_id))?;
    let project = load_project(ctx, scene.project_id, user_id).await?;
    let status = project.workflow_status()?;
    if !matches!(
        status,
        ProjectStatus::ScenesPending | ProjectStatus::PromptsPending
    ) {
        return Err(PipelineError::conflict(format!(
            "Prompts can only be optimized before generation starts (currently '{status}')"
        )));
    }

    let strategy = project.strategy.as_ref().and_then(Strategy::from_json);
    let brand = resolve_brand_kit(ctx, &project)
        .await?
        .map(|kit| brand_context(&kit));
    let prompt = build_prompt_optimization(
        &scene.description,
        strategy.as_ref(),
        brand.as_ref(),
        &project.aspect_ratio,
        scene.duration_secs,
    );

    let model = ctx.text.model().to_string();
    let text = match ctx.prompt_cache.get(&model, &prompt) {
        Some(cached) => {
            tracing::debug!(scene_id, "Prompt cache hit");
            cached
        }
        None => {
            let text = call_llm(ctx, user_id, project.id, &prompt).await?;
            ctx.prompt_cache.insert(&model, &prompt, text.clone());
            text
        }
    };
    let optimized = parse_optimized_prompt(&text)?;

    let scene = SceneRepo::set_prompts(
        &ctx.pool,
        scene_id,
        &optimized.prompt,
        &optimized.negative_prompt,
    )
    .await?
    .ok_or_else(|| PipelineError::not_found("Scene", scene_id))?;
    tracing::info!(scene_id, project_id = project.id, "Scene prompt optimized");
    Ok(scene)
}
