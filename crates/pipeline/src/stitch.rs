//! Final video export: concatenate each scene's latest clip with ffmpeg.
//!
//! [`start_stitch`] validates and records the job, then hands the slow part
//! to a spawned task so the request can return `202 Accepted`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use reelcraft_core::error::CoreError;
use reelcraft_core::ffmpeg::{stitch_clips, FfmpegError, WatermarkSpec};
use reelcraft_core::generation::{KIND_STITCHED, STATUS_PROCESSING};
use reelcraft_core::storage::{generation_key, CONTENT_TYPE_MP4};
use reelcraft_core::types::DbId;
use reelcraft_core::workflow::ProjectStatus;
use reelcraft_db::models::generation::{CreateGeneration, Generation};
use reelcraft_db::models::project::Project;
use reelcraft_db::repositories::{GenerationRepo, ProjectRepo};
use reelcraft_events::{PlatformEvent, GENERATION_FAILED, PROJECT_COMPLETED};

use crate::context::PipelineContext;
use crate::creative::{load_project, resolve_brand_kit};
use crate::error::{PipelineError, PipelineResult};

const STITCH_PROVIDER: &str = "ffmpeg";
const STITCH_MODEL: &str = "concat";

/// Joins local clip files into one output file.
#[async_trait]
pub trait ClipStitcher: Send + Sync {
    async fn stitch(
        &self,
        work_dir: &Path,
        clips: &[PathBuf],
        output: &Path,
        watermark: Option<&WatermarkSpec>,
    ) -> Result<(), FfmpegError>;
}

/// Stitches with the `ffmpeg` binary on `PATH`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FfmpegStitcher;

#[async_trait]
impl ClipStitcher for FfmpegStitcher {
    async fn stitch(
        &self,
        work_dir: &Path,
        clips: &[PathBuf],
        output: &Path,
        watermark: Option<&WatermarkSpec>,
    ) -> Result<(), FfmpegError> {
        stitch_clips(work_dir, clips, output, watermark).await
    }
}

/// Watermark source resolved from the brand kit.
#[derive(Debug, Clone)]
pub struct WatermarkSource {
    pub storage_key: String,
    pub position: String,
    pub opacity: f64,
}

/// Everything the background task needs.
#[derive(Debug, Clone)]
pub struct StitchJob {
    pub project: Project,
    pub generation: Generation,
    /// Object keys of the clips, in scene order.
    pub clip_keys: Vec<String>,
    pub watermark: Option<WatermarkSource>,
}

/// Validate the project, record a `stitched` generation, and spawn the
/// export task.
pub async fn start_stitch(
    ctx: &PipelineContext,
    user_id: DbId,
    project_id: DbId,
) -> PipelineResult<Generation> {
    let job = prepare_stitch(ctx, user_id, project_id).await?;
    let generation = job.generation.clone();

    let task_ctx = ctx.clone();
    tokio::spawn(async move {
        let generation_id = job.generation.id;
        if let Err(e) = run_stitch(&task_ctx, job).await {
            tracing::error!(generation_id, error = %e, "Stitch task failed");
        }
    });

    Ok(generation)
}

/// Everything in [`start_stitch`] except spawning.
pub async fn prepare_stitch(
    ctx: &PipelineContext,
    user_id: DbId,
    project_id: DbId,
) -> PipelineResult<StitchJob> {
    let project = load_project(ctx, project_id, user_id).await?;
    project
        .workflow_status()?
        .require(ProjectStatus::PostProduction)?;

    let clips = GenerationRepo::latest_completed_videos(&ctx.pool, project_id).await?;
    let clip_keys: Vec<String> = clips
        .iter()
        .filter_map(|g| g.storage_key.clone())
        .collect();
    if clip_keys.is_empty() {
        return Err(PipelineError::Core(CoreError::Validation(
            "Project has no completed clips to stitch".to_string(),
        )));
    }

    let watermark = resolve_brand_kit(ctx, &project).await?.and_then(|kit| {
        kit.watermark_key.map(|storage_key| WatermarkSource {
            storage_key,
            position: kit.watermark_position,
            opacity: kit.watermark_opacity,
        })
    });

    let generation = GenerationRepo::create(
        &ctx.pool,
        &CreateGeneration {
            user_id,
            project_id,
            scene_id: None,
            batch_id: None,
            kind: KIND_STITCHED.to_string(),
            status: STATUS_PROCESSING.to_string(),
            provider: STITCH_PROVIDER.to_string(),
            model: STITCH_MODEL.to_string(),
            prompt: None,
            negative_prompt: None,
            estimated_cost_cents: 0,
            duration_secs: None,
        },
    )
    .await?;

    tracing::info!(
        project_id,
        generation_id = generation.id,
        clips = clip_keys.len(),
        watermark = watermark.is_some(),
        "Stitch job created"
    );

    Ok(StitchJob {
        project,
        generation,
        clip_keys,
        watermark,
    })
}

/// Run the export and record the outcome on the generation row.
pub async fn run_stitch(ctx: &PipelineContext, job: StitchJob) -> PipelineResult<Project> {
    let generation_id = job.generation.id;
    let user_id = job.project.user_id;

    match export(ctx, &job).await {
        Ok(project) => Ok(project),
        Err(e) => {
            let message = e.to_string();
            GenerationRepo::mark_failed(&ctx.pool, generation_id, &message).await?;
            ctx.publish(
                PlatformEvent::new(GENERATION_FAILED)
                    .with_source("generation", generation_id)
                    .with_actor(user_id)
                    .with_payload(serde_json::json!({
                        "kind": KIND_STITCHED,
                        "project_id": job.project.id,
                        "error": message,
                    })),
            );
            Err(e)
        }
    }
}

async fn export(ctx: &PipelineContext, job: &StitchJob) -> PipelineResult<Project> {
    let work_dir = tempfile::tempdir()?;

    let mut clip_paths: Vec<PathBuf> = Vec::with_capacity(job.clip_keys.len());
    for (idx, key) in job.clip_keys.iter().enumerate() {
        let bytes = ctx.store.get(key).await?;
        let path = work_dir.path().join(format!("clip_{idx:03}.mp4"));
        tokio::fs::write(&path, bytes).await?;
        clip_paths.push(path);
    }

    let watermark = match &job.watermark {
        Some(source) => {
            let bytes = ctx.store.get(&source.storage_key).await?;
            let path = work_dir.path().join("watermark.png");
            tokio::fs::write(&path, bytes).await?;
            Some(WatermarkSpec {
                image_path: path,
                position: source.position.clone(),
                opacity: source.opacity,
            })
        }
        None => None,
    };

    let output = work_dir.path().join("final.mp4");
    ctx.stitcher
        .stitch(work_dir.path(), &clip_paths, &output, watermark.as_ref())
        .await?;

    let bytes = tokio::fs::read(&output).await?;
    let key = generation_key(job.project.id, KIND_STITCHED, job.generation.id);
    let url = ctx.store.put(&key, bytes, CONTENT_TYPE_MP4).await?;

    GenerationRepo::mark_completed(&ctx.pool, job.generation.id, &url, &key)
        .await?
        .ok_or_else(|| PipelineError::conflict("Stitch generation is no longer processing"))?;

    let project = ProjectRepo::complete_with_video(&ctx.pool, job.project.id, &url)
        .await?
        .ok_or_else(|| PipelineError::conflict("Project left post-production during export"))?;

    tracing::info!(project_id = project.id, url = %url, "Final video exported");
    ctx.publish(
        PlatformEvent::new(PROJECT_COMPLETED)
            .with_source("project", project.id)
            .with_actor(project.user_id)
            .with_payload(serde_json::json!({
                "project_name": project.name,
                "final_video_url": url,
            })),
    );
    Ok(project)
}
