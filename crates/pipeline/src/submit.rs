//! Scene batch expansion and video job submission.

use reelcraft_ai::VideoRequest;
use reelcraft_core::cost::{estimate_video_cents, SERVICE_VIDEO};
use reelcraft_core::error::CoreError;
use reelcraft_core::generation::{batch_state, BatchState, KIND_VIDEO, STATUS_QUEUED};
use reelcraft_core::types::DbId;
use reelcraft_core::workflow::ProjectStatus;
use reelcraft_db::models::generation::{CreateGeneration, Generation};
use reelcraft_db::models::project::Project;
use reelcraft_db::models::scene::Scene;
use reelcraft_db::models::usage::CreateUsageLog;
use reelcraft_db::repositories::{GenerationRepo, ProjectRepo, SceneRepo};
use reelcraft_events::{PlatformEvent, GENERATION_FAILED};
use serde::Serialize;
use uuid::Uuid;

use crate::budget::{admit, record_usage};
use crate::context::PipelineContext;
use crate::creative::load_project;
use crate::error::{PipelineError, PipelineResult};

/// Result of one `generate` request.
#[derive(Debug, Serialize)]
pub struct BatchSubmission {
    pub batch_id: Uuid,
    pub estimated_cost_cents: i64,
    /// Every row created, including ones whose submission failed.
    pub generations: Vec<Generation>,
}

fn video_request(scene: &Scene, aspect_ratio: &str) -> VideoRequest {
    VideoRequest {
        prompt: scene.video_prompt().to_string(),
        negative_prompt: scene.negative_prompt.clone(),
        duration_secs: scene.duration_secs,
        aspect_ratio: aspect_ratio.to_string(),
        generate_audio: scene.audio().generate_audio,
    }
}

/// Move the project into `generating`, or confirm a retry is allowed.
///
/// A project already in `generating` may submit again only once nothing
/// from earlier batches is still in flight.
async fn enter_generating(ctx: &PipelineContext, project: &Project) -> PipelineResult<()> {
    match project.workflow_status()? {
        ProjectStatus::PromptsPending => {
            ProjectRepo::set_status(
                &ctx.pool,
                project.id,
                &[ProjectStatus::PromptsPending],
                ProjectStatus::Generating,
            )
            .await?
            .ok_or_else(|| PipelineError::conflict("Generation already started for this project"))?;
            Ok(())
        }
        ProjectStatus::Generating => {
            let existing =
                GenerationRepo::list_for_project(&ctx.pool, project.id, Some(KIND_VIDEO)).await?;
            if batch_state(existing.iter().map(|g| g.status.as_str())) == BatchState::InFlight {
                return Err(PipelineError::conflict(
                    "A generation batch is already running for this project",
                ));
            }
            Ok(())
        }
        other => Err(PipelineError::conflict(format!(
            "Project must be in '{}' status to generate (currently '{other}')",
            ProjectStatus::PromptsPending
        ))),
    }
}

/// Submit one video job per approved scene.
///
/// Rows are inserted `queued`, then moved to `processing` with the remote
/// operation name. A failed submission marks only that row `failed`.
pub async fn submit_batch(
    ctx: &PipelineContext,
    user_id: DbId,
    project_id: DbId,
) -> PipelineResult<BatchSubmission> {
    let project = load_project(ctx, project_id, user_id).await?;
    let status = project.workflow_status()?;
    if !matches!(
        status,
        ProjectStatus::PromptsPending | ProjectStatus::Generating
    ) {
        return Err(PipelineError::conflict(format!(
            "Project must be in '{}' status to generate (currently '{status}')",
            ProjectStatus::PromptsPending
        )));
    }

    let scenes = SceneRepo::list_approved(&ctx.pool, project_id).await?;
    if scenes.is_empty() {
        return Err(PipelineError::Core(CoreError::Validation(
            "Project has no approved scenes to generate".to_string(),
        )));
    }

    let estimates: Vec<i32> = scenes
        .iter()
        .map(|s| estimate_video_cents(s.duration_secs, s.audio().generate_audio))
        .collect();
    let total: i64 = estimates.iter().map(|c| i64::from(*c)).sum();
    admit(ctx, user_id, total).await?;

    enter_generating(ctx, &project).await?;

    let batch_id = Uuid::new_v4();
    let mut generations = Vec::with_capacity(scenes.len());

    for (scene, estimate) in scenes.iter().zip(estimates) {
        let request = video_request(scene, &project.aspect_ratio);
        let row = GenerationRepo::create(
            &ctx.pool,
            &CreateGeneration {
                user_id,
                project_id,
                scene_id: Some(scene.id),
                batch_id: Some(batch_id),
                kind: KIND_VIDEO.to_string(),
                status: STATUS_QUEUED.to_string(),
                provider: ctx.video.provider().to_string(),
                model: ctx.video.model().to_string(),
                prompt: Some(request.prompt.clone()),
                negative_prompt: request.negative_prompt.clone(),
                estimated_cost_cents: estimate,
                duration_secs: Some(request.duration_secs),
            },
        )
        .await?;

        match ctx.video.submit(&request).await {
            Ok(operation_name) => {
                let updated = GenerationRepo::mark_processing(&ctx.pool, row.id, &operation_name)
                    .await?
                    .unwrap_or(row);
                record_usage(
                    &ctx.pool,
                    CreateUsageLog {
                        user_id,
                        project_id: Some(project_id),
                        generation_id: Some(updated.id),
                        service: SERVICE_VIDEO,
                        model: updated.model.clone(),
                        units: request.duration_secs,
                        cost_cents: estimate,
                    },
                )
                .await;
                generations.push(updated);
            }
            Err(e) => {
                tracing::warn!(
                    generation_id = row.id,
                    scene_id = scene.id,
                    error = %e,
                    "Video submission failed"
                );
                let message = format!("Submission failed: {e}");
                let updated = GenerationRepo::mark_failed(&ctx.pool, row.id, &message)
                    .await?
                    .unwrap_or(row);
                ctx.publish(
                    PlatformEvent::new(GENERATION_FAILED)
                        .with_source("generation", updated.id)
                        .with_actor(user_id)
                        .with_payload(serde_json::json!({
                            "kind": KIND_VIDEO,
                            "project_id": project_id,
                            "error": message,
                        })),
                );
                generations.push(updated);
            }
        }
    }

    tracing::info!(
        project_id,
        %batch_id,
        submitted = generations.iter().filter(|g| g.operation_name.is_some()).count(),
        total = generations.len(),
        "Video batch submitted"
    );

    Ok(BatchSubmission {
        batch_id,
        estimated_cost_cents: total,
        generations,
    })
}
