//! Synchronous single-shot generations: storyboard images and voiceovers.

use reelcraft_ai::{ImageRequest, SpeechRequest};
use reelcraft_core::cost::{estimate_image_cents, estimate_tts_cents, SERVICE_IMAGE, SERVICE_TTS};
use reelcraft_core::error::CoreError;
use reelcraft_core::generation::{KIND_IMAGE, KIND_VOICEOVER, STATUS_PROCESSING};
use reelcraft_core::storage::{format_for_kind, generation_key};
use reelcraft_core::types::DbId;
use reelcraft_db::models::generation::{CreateGeneration, Generation};
use reelcraft_db::models::scene::Scene;
use reelcraft_db::models::usage::CreateUsageLog;
use reelcraft_db::repositories::{GenerationRepo, SceneRepo};
use reelcraft_events::{PlatformEvent, GENERATION_COMPLETED, GENERATION_FAILED};

use crate::budget::{admit, record_usage};
use crate::context::PipelineContext;
use crate::creative::load_project;
use crate::error::{PipelineError, PipelineResult};

async fn load_scene(
    ctx: &PipelineContext,
    scene_id: DbId,
    user_id: DbId,
) -> PipelineResult<Scene> {
    SceneRepo::find_for_user(&ctx.pool, scene_id, user_id)
        .await?
        .ok_or_else(|| PipelineError::not_found("Scene", scene_id))
}

/// Upload the produced bytes and complete the row, or mark it failed.
async fn finish(
    ctx: &PipelineContext,
    row: Generation,
    produced: PipelineResult<(Vec<u8>, String)>,
    usage: (&'static str, i32),
) -> PipelineResult<Generation> {
    let uploaded = match produced {
        Ok((bytes, content_type)) => {
            let key = generation_key(row.project_id, &row.kind, row.id);
            ctx.store
                .put(&key, bytes, &content_type)
                .await
                .map(|url| (url, key))
                .map_err(PipelineError::from)
        }
        Err(e) => Err(e),
    };

    match uploaded {
        Ok((url, key)) => {
            let completed = GenerationRepo::mark_completed(&ctx.pool, row.id, &url, &key)
                .await?
                .ok_or_else(|| PipelineError::conflict("Generation is no longer processing"))?;
            let (service, units) = usage;
            record_usage(
                &ctx.pool,
                CreateUsageLog {
                    user_id: completed.user_id,
                    project_id: Some(completed.project_id),
                    generation_id: Some(completed.id),
                    service,
                    model: completed.model.clone(),
                    units,
                    cost_cents: completed.estimated_cost_cents,
                },
            )
            .await;
            ctx.publish(
                PlatformEvent::new(GENERATION_COMPLETED)
                    .with_source("generation", completed.id)
                    .with_actor(completed.user_id)
                    .with_payload(serde_json::json!({
                        "kind": completed.kind,
                        "project_id": completed.project_id,
                        "output_url": url,
                    })),
            );
            tracing::info!(
                generation_id = completed.id,
                kind = %completed.kind,
                "Generation completed"
            );
            Ok(completed)
        }
        Err(e) => {
            let message = e.to_string();
            tracing::warn!(
                generation_id = row.id,
                kind = %row.kind,
                error = %message,
                "Generation failed"
            );
            GenerationRepo::mark_failed(&ctx.pool, row.id, &message).await?;
            ctx.publish(
                PlatformEvent::new(GENERATION_FAILED)
                    .with_source("generation", row.id)
                    .with_actor(row.user_id)
                    .with_payload(serde_json::json!({
                        "kind": row.kind,
                        "project_id": row.project_id,
                        "error": message,
                    })),
            );
            Err(e)
        }
    }
}

/// Generate a storyboard still for a scene.
pub async fn generate_image(
    ctx: &PipelineContext,
    user_id: DbId,
    scene_id: DbId,
) -> PipelineResult<Generation> {
    let scene = load_scene(ctx, scene_id, user_id).await?;
    let project = load_project(ctx, scene.project_id, user_id).await?;

    let estimate = estimate_image_cents(1);
    admit(ctx, user_id, i64::from(estimate)).await?;

    let request = ImageRequest {
        prompt: scene.video_prompt().to_string(),
        negative_prompt: scene.negative_prompt.clone(),
        aspect_ratio: project.aspect_ratio.clone(),
    };
    let row = GenerationRepo::create(
        &ctx.pool,
        &CreateGeneration {
            user_id,
            project_id: project.id,
            scene_id: Some(scene.id),
            batch_id: None,
            kind: KIND_IMAGE.to_string(),
            status: STATUS_PROCESSING.to_string(),
            provider: ctx.images.provider().to_string(),
            model: ctx.images.model().to_string(),
            prompt: Some(request.prompt.clone()),
            negative_prompt: request.negative_prompt.clone(),
            estimated_cost_cents: estimate,
            duration_secs: None,
        },
    )
    .await?;

    let produced = ctx
        .images
        .generate(&request)
        .await
        .map(|image| (image.bytes, image.mime_type))
        .map_err(PipelineError::from);
    finish(ctx, row, produced, (SERVICE_IMAGE, 1)).await
}

/// Synthesize the scene's voiceover script to MP3.
pub async fn generate_voiceover(
    ctx: &PipelineContext,
    user_id: DbId,
    scene_id: DbId,
) -> PipelineResult<Generation> {
    let scene = load_scene(ctx, scene_id, user_id).await?;
    let audio = scene.audio();
    let script = audio
        .script()
        .ok_or_else(|| {
            PipelineError::Core(CoreError::Validation(
                "Scene has no voiceover script".to_string(),
            ))
        })?
        .to_string();

    let estimate = estimate_tts_cents(script.chars().count());
    admit(ctx, user_id, i64::from(estimate)).await?;

    let row = GenerationRepo::create(
        &ctx.pool,
        &CreateGeneration {
            user_id,
            project_id: scene.project_id,
            scene_id: Some(scene.id),
            batch_id: None,
            kind: KIND_VOICEOVER.to_string(),
            status: STATUS_PROCESSING.to_string(),
            provider: ctx.speech.provider().to_string(),
            model: audio
                .voice_name
                .clone()
                .unwrap_or_else(|| ctx.speech.model().to_string()),
            prompt: Some(script.clone()),
            negative_prompt: None,
            estimated_cost_cents: estimate,
            duration_secs: None,
        },
    )
    .await?;

    let units = i32::try_from(script.chars().count()).unwrap_or(i32::MAX);
    let (_, content_type) = format_for_kind(KIND_VOICEOVER);
    let produced = ctx
        .speech
        .synthesize(&SpeechRequest {
            text: script,
            voice_name: audio.voice_name,
        })
        .await
        .map(|bytes| (bytes, content_type.to_string()))
        .map_err(PipelineError::from);
    finish(ctx, row, produced, (SERVICE_TTS, units)).await
}
