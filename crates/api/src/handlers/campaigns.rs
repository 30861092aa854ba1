//! Handlers for `/campaigns`, their ad deployments, and performance.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use reelcraft_core::ads::{validate_campaign_status, PerformanceTotals};
use reelcraft_core::error::CoreError;
use reelcraft_core::types::DbId;
use reelcraft_db::models::campaign::{
    AdDeployment, Campaign, CreateAdDeployment, CreateCampaign, PerformanceDay, UpdateCampaign,
};
use reelcraft_db::repositories::{AdDeploymentRepo, CampaignRepo, PerformanceRepo};
use reelcraft_pipeline::ads;
use serde::Serialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

async fn find_campaign(state: &AppState, id: DbId, user_id: DbId) -> AppResult<Campaign> {
    CampaignRepo::find_for_user(&state.pool, id, user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Campaign",
            id,
        }))
}

fn validate_dates(starts_on: Option<NaiveDate>, ends_on: Option<NaiveDate>) -> Result<(), CoreError> {
    match (starts_on, ends_on) {
        (Some(start), Some(end)) if end < start => Err(CoreError::Validation(
            "Campaign end date must not precede its start date".to_string(),
        )),
        _ => Ok(()),
    }
}

/// POST /api/v1/campaigns
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateCampaign>,
) -> AppResult<(StatusCode, Json<DataResponse<Campaign>>)> {
    input.validate()?;
    if let Some(status) = &input.status {
        validate_campaign_status(status)?;
    }
    validate_dates(input.starts_on, input.ends_on)?;

    let campaign = CampaignRepo::create(&state.pool, auth.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: campaign })))
}

/// GET /api/v1/campaigns
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Campaign>>>> {
    let campaigns = CampaignRepo::list_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: campaigns }))
}

/// GET /api/v1/campaigns/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Campaign>>> {
    let campaign = find_campaign(&state, id, auth.user_id).await?;
    Ok(Json(DataResponse { data: campaign }))
}

/// PUT /api/v1/campaigns/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCampaign>,
) -> AppResult<Json<DataResponse<Campaign>>> {
    input.validate()?;
    if let Some(status) = &input.status {
        validate_campaign_status(status)?;
    }
    let existing = find_campaign(&state, id, auth.user_id).await?;
    validate_dates(
        input.starts_on.or(existing.starts_on),
        input.ends_on.or(existing.ends_on),
    )?;

    let campaign = CampaignRepo::update(&state.pool, id, auth.user_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Campaign",
            id,
        }))?;
    Ok(Json(DataResponse { data: campaign }))
}

/// DELETE /api/v1/campaigns/{id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if CampaignRepo::delete(&state.pool, id, auth.user_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Campaign",
            id,
        }))
    }
}

// ---------------------------------------------------------------------------
// Deployments
// ---------------------------------------------------------------------------

/// POST /api/v1/campaigns/{id}/deployments
///
/// Publishes a completed project's final video. A publisher rejection is
/// stored as a `failed` deployment and still returns 201.
pub async fn create_deployment(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateAdDeployment>,
) -> AppResult<(StatusCode, Json<DataResponse<AdDeployment>>)> {
    let deployment = ads::publish_deployment(&state.pipeline, auth.user_id, id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: deployment })))
}

/// GET /api/v1/campaigns/{id}/deployments
pub async fn list_deployments(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<AdDeployment>>>> {
    find_campaign(&state, id, auth.user_id).await?;
    let deployments = AdDeploymentRepo::list_for_campaign(&state.pool, id).await?;
    Ok(Json(DataResponse { data: deployments }))
}

/// GET /api/v1/deployments/{id}
pub async fn get_deployment(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<AdDeployment>>> {
    let deployment = AdDeploymentRepo::find_for_user(&state.pool, id, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "AdDeployment",
            id,
        }))?;
    Ok(Json(DataResponse { data: deployment }))
}

// ---------------------------------------------------------------------------
// Performance
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct CampaignPerformance {
    pub campaign_id: DbId,
    pub totals: PerformanceTotals,
}

/// GET /api/v1/campaigns/{id}/performance
///
/// Totals across every deployment of the campaign, with CTR and CPC.
pub async fn performance(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CampaignPerformance>>> {
    find_campaign(&state, id, auth.user_id).await?;
    let sums = PerformanceRepo::sums_for_campaign(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: CampaignPerformance {
            campaign_id: id,
            totals: PerformanceTotals::new(
                sums.impressions,
                sums.clicks,
                sums.conversions,
                sums.spend_cents,
            ),
        },
    }))
}

/// GET /api/v1/deployments/{id}/performance
///
/// Daily rows for one deployment, oldest first.
pub async fn deployment_performance(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<PerformanceDay>>>> {
    AdDeploymentRepo::find_for_user(&state.pool, id, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "AdDeployment",
            id,
        }))?;
    let days = PerformanceRepo::list_for_deployment(&state.pool, id).await?;
    Ok(Json(DataResponse { data: days }))
}

/// POST /api/v1/deployments/{id}/performance/sync
pub async fn sync_performance(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<PerformanceDay>>> {
    let day = ads::sync_performance(&state.pipeline, auth.user_id, id).await?;
    Ok(Json(DataResponse { data: day }))
}
