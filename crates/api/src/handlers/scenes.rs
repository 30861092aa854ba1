//! Handlers for the `/scenes` resource: edits, approval, prompt
//! optimization, and single-shot image and voiceover generation.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use reelcraft_core::error::CoreError;
use reelcraft_core::types::DbId;
use reelcraft_core::workflow::ProjectStatus;
use reelcraft_db::models::generation::Generation;
use reelcraft_db::models::scene::{Scene, UpdateScene};
use reelcraft_db::repositories::SceneRepo;
use reelcraft_pipeline::{creative, media};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::projects::find_project;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

async fn find_scene(state: &AppState, id: DbId, user_id: DbId) -> AppResult<Scene> {
    SceneRepo::find_for_user(&state.pool, id, user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Scene", id }))
}

/// Scenes are frozen once their project starts generating video.
async fn ensure_editable(state: &AppState, scene: &Scene, user_id: DbId) -> AppResult<()> {
    let project = find_project(state, scene.project_id, user_id).await?;
    let status = project.workflow_status()?;
    if status >= ProjectStatus::Generating {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Scenes are locked once generation has started (currently '{status}')"
        ))));
    }
    Ok(())
}

/// GET /api/v1/scenes/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Scene>>> {
    let scene = find_scene(&state, id, auth.user_id).await?;
    Ok(Json(DataResponse { data: scene }))
}

/// PUT /api/v1/scenes/{id}
///
/// Also used to approve a scene (`{"is_approved": true}`). Durations snap
/// to the nearest allowed clip length.
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateScene>,
) -> AppResult<Json<DataResponse<Scene>>> {
    input.validate()?;
    let scene = find_scene(&state, id, auth.user_id).await?;
    ensure_editable(&state, &scene, auth.user_id).await?;

    let scene = SceneRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Scene", id }))?;
    Ok(Json(DataResponse { data: scene }))
}

/// DELETE /api/v1/scenes/{id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let scene = find_scene(&state, id, auth.user_id).await?;
    ensure_editable(&state, &scene, auth.user_id).await?;

    if SceneRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "Scene", id }))
    }
}

/// POST /api/v1/scenes/{id}/optimize-prompt
pub async fn optimize_prompt(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Scene>>> {
    let scene = creative::optimize_prompt(&state.pipeline, auth.user_id, id).await?;
    Ok(Json(DataResponse { data: scene }))
}

/// POST /api/v1/scenes/{id}/image
///
/// Synchronous storyboard still. A vendor failure leaves a `failed`
/// generation behind and returns 502.
pub async fn generate_image(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<(StatusCode, Json<DataResponse<Generation>>)> {
    let generation = media::generate_image(&state.pipeline, auth.user_id, id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: generation })))
}

/// POST /api/v1/scenes/{id}/voiceover
pub async fn generate_voiceover(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<(StatusCode, Json<DataResponse<Generation>>)> {
    let generation = media::generate_voiceover(&state.pipeline, auth.user_id, id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: generation })))
}
