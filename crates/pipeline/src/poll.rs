//! Single-shot polling of a remote video operation.
//!
//! Shared by the HTTP status endpoint and the background poller so both
//! apply the same completion and failure bookkeeping.

use reelcraft_ai::OperationStatus;
use reelcraft_core::generation::{
    batch_state, is_pollable, record_poll_failure, BatchState, PollFailure, KIND_VIDEO,
};
use reelcraft_core::storage::{format_for_kind, generation_key};
use reelcraft_core::workflow::ProjectStatus;
use reelcraft_db::models::generation::Generation;
use reelcraft_db::repositories::{GenerationRepo, ProjectRepo};
use reelcraft_events::{PlatformEvent, GENERATION_COMPLETED, GENERATION_FAILED};

use crate::context::PipelineContext;
use crate::error::PipelineResult;

/// Poll `generation` once and persist the outcome.
///
/// Rows that are not `processing` with an operation name come back
/// unchanged. A remote error or a failed poll call counts as one polling
/// failure; the third one marks the row `failed`.
pub async fn poll_generation(
    ctx: &PipelineContext,
    generation: Generation,
) -> PipelineResult<Generation> {
    let Some(operation_name) = generation
        .operation_name
        .clone()
        .filter(|_| is_pollable(&generation.status, generation.operation_name.as_deref()))
    else {
        return Ok(generation);
    };

    let Some(generation) = GenerationRepo::touch_polled(&ctx.pool, generation.id).await? else {
        // Settled by a concurrent poll since the caller read it.
        return Ok(GenerationRepo::find_by_id(&ctx.pool, generation.id)
            .await?
            .unwrap_or(generation));
    };

    match ctx.video.poll(&operation_name).await {
        Ok(OperationStatus::Running) => Ok(generation),
        Ok(OperationStatus::Succeeded { video_uri }) => {
            store_video(ctx, generation, &video_uri).await
        }
        Ok(OperationStatus::Failed { message }) => {
            record_failure(ctx, generation, &message).await
        }
        Err(e) => {
            tracing::warn!(
                generation_id = generation.id,
                operation = %operation_name,
                error = %e,
                "Poll call failed"
            );
            record_failure(ctx, generation, &e.to_string()).await
        }
    }
}

/// Download the finished clip, upload it, and complete the row.
///
/// Transfer errors count as a polling failure; database errors propagate.
async fn store_video(
    ctx: &PipelineContext,
    generation: Generation,
    video_uri: &str,
) -> PipelineResult<Generation> {
    let bytes = match ctx.video.download(video_uri).await {
        Ok(bytes) => bytes,
        Err(e) => {
            return record_failure(ctx, generation, &format!("Download failed: {e}")).await;
        }
    };

    let key = generation_key(generation.project_id, &generation.kind, generation.id);
    let (_, content_type) = format_for_kind(&generation.kind);
    let url = match ctx.store.put(&key, bytes, content_type).await {
        Ok(url) => url,
        Err(e) => {
            return record_failure(ctx, generation, &format!("Upload failed: {e}")).await;
        }
    };

    let Some(completed) =
        GenerationRepo::mark_completed(&ctx.pool, generation.id, &url, &key).await?
    else {
        // Another poller finished it first.
        return Ok(GenerationRepo::find_by_id(&ctx.pool, generation.id)
            .await?
            .unwrap_or(generation));
    };

    tracing::info!(
        generation_id = completed.id,
        project_id = completed.project_id,
        url = %url,
        "Generation completed"
    );
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
    advance_batch(ctx, &completed).await?;
    Ok(completed)
}

async fn record_failure(
    ctx: &PipelineContext,
    generation: Generation,
    message: &str,
) -> PipelineResult<Generation> {
    let (retry_count, give_up) = match record_poll_failure(generation.retry_count) {
        PollFailure::Retry { retry_count } => (retry_count, false),
        PollFailure::GiveUp { retry_count } => (retry_count, true),
    };

    let updated = GenerationRepo::record_poll_failure(
        &ctx.pool,
        generation.id,
        generation.retry_count,
        retry_count,
        message,
        give_up,
    )
    .await?;

    let Some(updated) = updated else {
        // Lost the race with a concurrent poll; report the current row.
        return Ok(GenerationRepo::find_by_id(&ctx.pool, generation.id)
            .await?
            .unwrap_or(generation));
    };

    if give_up {
        tracing::warn!(
            generation_id = updated.id,
            retry_count,
            error = %message,
            "Generation failed after repeated polling failures"
        );
        ctx.publish(
            PlatformEvent::new(GENERATION_FAILED)
                .with_source("generation", updated.id)
                .with_actor(updated.user_id)
                .with_payload(serde_json::json!({
                    "kind": updated.kind,
                    "project_id": updated.project_id,
                    "error": message,
                })),
        );
        advance_batch(ctx, &updated).await?;
    } else {
        tracing::debug!(generation_id = updated.id, retry_count, "Polling failure recorded");
    }
    Ok(updated)
}

/// Move the project to post-production once its batch has settled with at
/// least one finished clip.
async fn advance_batch(ctx: &PipelineContext, generation: &Generation) -> PipelineResult<()> {
    if generation.kind != KIND_VIDEO {
        return Ok(());
    }
    let Some(batch_id) = generation.batch_id else {
        return Ok(());
    };

    let statuses = GenerationRepo::batch_statuses(&ctx.pool, batch_id).await?;
    match batch_state(statuses.iter().map(String::as_str)) {
        BatchState::Finished { completed, failed } => {
            let moved = ProjectRepo::set_status(
                &ctx.pool,
                generation.project_id,
                &[ProjectStatus::Generating],
                ProjectStatus::PostProduction,
            )
            .await?;
            if moved.is_some() {
                tracing::info!(
                    project_id = generation.project_id,
                    %batch_id,
                    completed,
                    failed,
                    "Batch finished, project moved to post-production"
                );
            }
        }
        BatchState::AllFailed => {
            tracing::warn!(
                project_id = generation.project_id,
                %batch_id,
                "Every generation in the batch failed"
            );
        }
        BatchState::Empty | BatchState::InFlight => {}
    }
    Ok(())
}
