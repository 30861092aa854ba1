//! Handlers for the `/templates` resource.
//!
//! Public templates are visible to everyone; only admins may publish one.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use reelcraft_core::error::CoreError;
use reelcraft_core::scene::{validate_aspect_ratio, MAX_SCENES_PER_PROJECT};
use reelcraft_core::types::DbId;
use reelcraft_db::models::project::{CreateProject, Project};
use reelcraft_db::models::scene::CreateScene;
use reelcraft_db::models::template::{CreateTemplate, Template, UpdateTemplate, UseTemplate};
use reelcraft_db::repositories::{ProjectRepo, SceneRepo, TemplateRepo};
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::projects::check_references;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

fn check_publish(auth: &AuthUser, is_public: Option<bool>) -> Result<(), CoreError> {
    if is_public == Some(true) && !auth.is_admin() {
        return Err(CoreError::Forbidden(
            "Only admins can publish public templates".to_string(),
        ));
    }
    Ok(())
}

fn check_outline_len(len: Option<usize>) -> Result<(), CoreError> {
    match len {
        Some(n) if n > MAX_SCENES_PER_PROJECT => Err(CoreError::Validation(format!(
            "A template outline may have at most {MAX_SCENES_PER_PROJECT} scenes"
        ))),
        _ => Ok(()),
    }
}

#[derive(Debug, Deserialize)]
pub struct TemplateListQuery {
    pub category: Option<String>,
}

/// POST /api/v1/templates
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateTemplate>,
) -> AppResult<(StatusCode, Json<DataResponse<Template>>)> {
    input.validate()?;
    check_publish(&auth, input.is_public)?;
    check_outline_len(input.scene_outline.as_ref().map(Vec::len))?;
    if let Some(ratio) = &input.aspect_ratio {
        validate_aspect_ratio(ratio)?;
    }

    let template = TemplateRepo::create(&state.pool, auth.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: template })))
}

/// GET /api/v1/templates
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<TemplateListQuery>,
) -> AppResult<Json<DataResponse<Vec<Template>>>> {
    let templates =
        TemplateRepo::list_visible(&state.pool, auth.user_id, params.category.as_deref()).await?;
    Ok(Json(DataResponse { data: templates }))
}

/// GET /api/v1/templates/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Template>>> {
    let template = TemplateRepo::find_visible(&state.pool, id, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Template",
            id,
        }))?;
    Ok(Json(DataResponse { data: template }))
}

/// PUT /api/v1/templates/{id}
///
/// Only the owner can edit a template.
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTemplate>,
) -> AppResult<Json<DataResponse<Template>>> {
    input.validate()?;
    check_publish(&auth, input.is_public)?;
    check_outline_len(input.scene_outline.as_ref().map(Vec::len))?;
    if let Some(ratio) = &input.aspect_ratio {
        validate_aspect_ratio(ratio)?;
    }

    let template = TemplateRepo::update(&state.pool, id, auth.user_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Template",
            id,
        }))?;
    Ok(Json(DataResponse { data: template }))
}

/// DELETE /api/v1/templates/{id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if TemplateRepo::delete(&state.pool, id, auth.user_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Template",
            id,
        }))
    }
}

/// POST /api/v1/templates/{id}/use
///
/// Create a draft project from the template's brief and scene outline.
pub async fn use_template(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UseTemplate>,
) -> AppResult<(StatusCode, Json<DataResponse<Project>>)> {
    let template = TemplateRepo::find_visible(&state.pool, id, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Template",
            id,
        }))?;
    check_references(&state, auth.user_id, input.brand_kit_id, input.campaign_id).await?;

    let name = input
        .name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| template.name.clone());
    let project = ProjectRepo::create(
        &state.pool,
        auth.user_id,
        &CreateProject {
            name,
            description: template.description.clone(),
            brief: Some(template.brief.clone()),
            brand_kit_id: input.brand_kit_id,
            campaign_id: input.campaign_id,
            aspect_ratio: Some(template.aspect_ratio.clone()),
        },
    )
    .await?;

    let scenes: Vec<CreateScene> = template
        .outline()
        .into_iter()
        .take(MAX_SCENES_PER_PROJECT)
        .map(|stub| CreateScene {
            description: stub.description,
            sort_order: None,
            duration_secs: stub.duration_secs,
            audio_config: None,
        })
        .collect();
    if !scenes.is_empty() {
        SceneRepo::replace_for_project(&state.pool, project.id, &scenes).await?;
    }
    TemplateRepo::increment_use_count(&state.pool, template.id).await?;

    tracing::info!(
        template_id = template.id,
        project_id = project.id,
        scenes = scenes.len(),
        "Project created from template"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}
