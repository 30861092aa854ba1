//! Handlers for the `/projects` resource and its workflow actions.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use reelcraft_core::error::CoreError;
use reelcraft_core::generation::validate_kind;
use reelcraft_core::prompts::Brief;
use reelcraft_core::scene::{validate_aspect_ratio, MAX_SCENES_PER_PROJECT};
use reelcraft_core::types::DbId;
use reelcraft_core::workflow::ProjectStatus;
use reelcraft_db::models::generation::Generation;
use reelcraft_db::models::project::{CreateProject, Project, UpdateProject};
use reelcraft_db::models::scene::{CreateScene, Scene};
use reelcraft_db::repositories::{
    BrandKitRepo, CampaignRepo, GenerationRepo, ProjectRepo, SceneRepo,
};
use reelcraft_pipeline::submit::BatchSubmission;
use reelcraft_pipeline::{creative, stitch, submit};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Load a project owned by `user_id`, or 404.
pub(crate) async fn find_project(
    state: &AppState,
    id: DbId,
    user_id: DbId,
) -> AppResult<Project> {
    ProjectRepo::find_for_user(&state.pool, id, user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))
}

/// Referenced brand kit and campaign must belong to the caller.
pub(crate) async fn check_references(
    state: &AppState,
    user_id: DbId,
    brand_kit_id: Option<DbId>,
    campaign_id: Option<DbId>,
) -> AppResult<()> {
    if let Some(id) = brand_kit_id {
        BrandKitRepo::find_for_user(&state.pool, id, user_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "BrandKit",
                id,
            }))?;
    }
    if let Some(id) = campaign_id {
        CampaignRepo::find_for_user(&state.pool, id, user_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Campaign",
                id,
            }))?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// POST /api/v1/projects
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<DataResponse<Project>>)> {
    input.validate()?;
    if let Some(ratio) = &input.aspect_ratio {
        validate_aspect_ratio(ratio)?;
    }
    check_references(&state, auth.user_id, input.brand_kit_id, input.campaign_id).await?;

    let project = ProjectRepo::create(&state.pool, auth.user_id, &input).await?;
    tracing::info!(project_id = project.id, user_id = auth.user_id, "Project created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}

/// GET /api/v1/projects
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<Project>>>> {
    let projects =
        ProjectRepo::list_for_user(&state.pool, auth.user_id, params.limit(), params.offset())
            .await?;
    Ok(Json(DataResponse { data: projects }))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = find_project(&state, id, auth.user_id).await?;
    Ok(Json(DataResponse { data: project }))
}

/// PUT /api/v1/projects/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<DataResponse<Project>>> {
    input.validate()?;
    if let Some(ratio) = &input.aspect_ratio {
        validate_aspect_ratio(ratio)?;
    }
    check_references(&state, auth.user_id, input.brand_kit_id, input.campaign_id).await?;

    let project = ProjectRepo::update(&state.pool, id, auth.user_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    Ok(Json(DataResponse { data: project }))
}

/// DELETE /api/v1/projects/{id}
///
/// Soft delete; the row stays for usage history.
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if ProjectRepo::soft_delete(&state.pool, id, auth.user_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))
    }
}

// ---------------------------------------------------------------------------
// Workflow
// ---------------------------------------------------------------------------

/// Apply a guarded status write, turning a lost race into 409.
async fn transition(
    state: &AppState,
    project: &Project,
    target: ProjectStatus,
) -> AppResult<Project> {
    let current = project.workflow_status()?;
    current.transition_to(target)?;
    let updated = ProjectRepo::set_status(&state.pool, project.id, &[current], target)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Project status changed concurrently; reload and retry".to_string(),
            ))
        })?;
    tracing::info!(
        project_id = project.id,
        from = %current,
        to = %target,
        "Project advanced"
    );
    Ok(updated)
}

/// POST /api/v1/projects/{id}/brief/submit
///
/// Lock in the brief and move `draft -> strategy_pending`.
pub async fn submit_brief(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = find_project(&state, id, auth.user_id).await?;
    project.workflow_status()?.require(ProjectStatus::Draft)?;
    Brief::from_json(&project.brief).validate_for_submission()?;

    let project = transition(&state, &project, ProjectStatus::StrategyPending).await?;
    Ok(Json(DataResponse { data: project }))
}

/// POST /api/v1/projects/{id}/strategy
pub async fn generate_strategy(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = creative::generate_strategy(&state.pipeline, auth.user_id, id).await?;
    Ok(Json(DataResponse { data: project }))
}

/// POST /api/v1/projects/{id}/scenes/generate
pub async fn generate_scenes(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Scene>>>> {
    let scenes = creative::generate_scenes(&state.pipeline, auth.user_id, id).await?;
    Ok(Json(DataResponse { data: scenes }))
}

/// POST /api/v1/projects/{id}/scenes/confirm
///
/// Requires at least one scene, all approved. Moves
/// `scenes_pending -> prompts_pending`.
pub async fn confirm_scenes(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = find_project(&state, id, auth.user_id).await?;
    project
        .workflow_status()?
        .require(ProjectStatus::ScenesPending)?;

    let (total, approved) = SceneRepo::approval_counts(&state.pool, id).await?;
    if total == 0 {
        return Err(AppError::Core(CoreError::Validation(
            "Project has no scenes to confirm".to_string(),
        )));
    }
    if approved < total {
        return Err(AppError::Core(CoreError::Validation(format!(
            "All scenes must be approved ({approved} of {total} approved)"
        ))));
    }

    let project = transition(&state, &project, ProjectStatus::PromptsPending).await?;
    Ok(Json(DataResponse { data: project }))
}

/// POST /api/v1/projects/{id}/generate
///
/// Submit one video job per approved scene. Returns 202; jobs finish
/// asynchronously and are polled via `GET /generations/{id}`.
pub async fn generate_videos(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<(StatusCode, Json<DataResponse<BatchSubmission>>)> {
    let batch = submit::submit_batch(&state.pipeline, auth.user_id, id).await?;
    Ok((StatusCode::ACCEPTED, Json(DataResponse { data: batch })))
}

/// Body for `POST /projects/{id}/advance`.
#[derive(Debug, Default, Deserialize)]
pub struct AdvanceRequest {
    /// Target status; defaults to the next one.
    pub to: Option<ProjectStatus>,
}

/// POST /api/v1/projects/{id}/advance
///
/// Forward-only step used by the UI's skip buttons.
pub async fn advance(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AdvanceRequest>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = find_project(&state, id, auth.user_id).await?;
    let current = project.workflow_status()?;
    let target = match input.to {
        Some(target) => target,
        None => current.next().ok_or_else(|| {
            AppError::Core(CoreError::Conflict(format!(
                "Project is already '{current}'"
            )))
        })?,
    };

    let project = transition(&state, &project, target).await?;
    Ok(Json(DataResponse { data: project }))
}

/// POST /api/v1/projects/{id}/stitch
///
/// Starts the export in the background and returns the `stitched`
/// generation with 202.
pub async fn start_stitch(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<(StatusCode, Json<DataResponse<Generation>>)> {
    let generation = stitch::start_stitch(&state.pipeline, auth.user_id, id).await?;
    Ok((StatusCode::ACCEPTED, Json(DataResponse { data: generation })))
}

// ---------------------------------------------------------------------------
// Nested collections
// ---------------------------------------------------------------------------

/// GET /api/v1/projects/{id}/scenes
pub async fn list_scenes(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Scene>>>> {
    find_project(&state, id, auth.user_id).await?;
    let scenes = SceneRepo::list_for_project(&state.pool, id).await?;
    Ok(Json(DataResponse { data: scenes }))
}

/// POST /api/v1/projects/{id}/scenes
///
/// Scenes can be added until generation starts.
pub async fn create_scene(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateScene>,
) -> AppResult<(StatusCode, Json<DataResponse<Scene>>)> {
    input.validate()?;
    let project = find_project(&state, id, auth.user_id).await?;
    let status = project.workflow_status()?;
    if status >= ProjectStatus::Generating {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Scenes cannot be added once generation has started (currently '{status}')"
        ))));
    }

    let (total, _) = SceneRepo::approval_counts(&state.pool, id).await?;
    if total >= MAX_SCENES_PER_PROJECT as i64 {
        return Err(AppError::Core(CoreError::Validation(format!(
            "A project may have at most {MAX_SCENES_PER_PROJECT} scenes"
        ))));
    }

    let scene = SceneRepo::create(&state.pool, id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: scene })))
}

#[derive(Debug, Deserialize)]
pub struct GenerationListQuery {
    pub kind: Option<String>,
}

/// GET /api/v1/projects/{id}/generations
pub async fn list_generations(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<GenerationListQuery>,
) -> AppResult<Json<DataResponse<Vec<Generation>>>> {
    if let Some(kind) = &params.kind {
        validate_kind(kind)?;
    }
    find_project(&state, id, auth.user_id).await?;
    let generations =
        GenerationRepo::list_for_project(&state.pool, id, params.kind.as_deref()).await?;
    Ok(Json(DataResponse { data: generations }))
}
