//! Handlers for the `/calendar/events` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use reelcraft_core::calendar::{validate_event_type, validate_range_filter, validate_time_range};
use reelcraft_core::error::CoreError;
use reelcraft_core::types::{DbId, Timestamp};
use reelcraft_db::models::calendar::{CalendarEvent, CreateCalendarEvent, UpdateCalendarEvent};
use reelcraft_db::repositories::CalendarEventRepo;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::projects::find_project;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /calendar/events`.
#[derive(Debug, Deserialize)]
pub struct CalendarRangeQuery {
    /// Only events starting at or after this instant.
    pub from: Option<Timestamp>,
    /// Only events starting at or before this instant.
    pub to: Option<Timestamp>,
}

async fn find_event(state: &AppState, id: DbId, user_id: DbId) -> AppResult<CalendarEvent> {
    CalendarEventRepo::find_for_user(&state.pool, id, user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "CalendarEvent",
            id,
        }))
}

/// POST /api/v1/calendar/events
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateCalendarEvent>,
) -> AppResult<(StatusCode, Json<DataResponse<CalendarEvent>>)> {
    input.validate()?;
    if let Some(event_type) = &input.event_type {
        validate_event_type(event_type)?;
    }
    validate_time_range(input.starts_at, input.ends_at)?;
    if let Some(project_id) = input.project_id {
        find_project(&state, project_id, auth.user_id).await?;
    }

    let event = CalendarEventRepo::create(&state.pool, auth.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: event })))
}

/// GET /api/v1/calendar/events?from=&to=
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<CalendarRangeQuery>,
) -> AppResult<Json<DataResponse<Vec<CalendarEvent>>>> {
    validate_range_filter(params.from, params.to)?;
    let events =
        CalendarEventRepo::list_for_user(&state.pool, auth.user_id, params.from, params.to)
            .await?;
    Ok(Json(DataResponse { data: events }))
}

/// GET /api/v1/calendar/events/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CalendarEvent>>> {
    let event = find_event(&state, id, auth.user_id).await?;
    Ok(Json(DataResponse { data: event }))
}

/// PUT /api/v1/calendar/events/{id}
///
/// The time range is checked against the merged result, so moving only
/// the start past an existing end is rejected.
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCalendarEvent>,
) -> AppResult<Json<DataResponse<CalendarEvent>>> {
    input.validate()?;
    if let Some(event_type) = &input.event_type {
        validate_event_type(event_type)?;
    }
    let existing = find_event(&state, id, auth.user_id).await?;
    validate_time_range(
        input.starts_at.unwrap_or(existing.starts_at),
        input.ends_at.or(existing.ends_at),
    )?;
    if let Some(project_id) = input.project_id {
        find_project(&state, project_id, auth.user_id).await?;
    }

    let event = CalendarEventRepo::update(&state.pool, id, auth.user_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "CalendarEvent",
            id,
        }))?;
    Ok(Json(DataResponse { data: event }))
}

/// DELETE /api/v1/calendar/events/{id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if CalendarEventRepo::delete(&state.pool, id, auth.user_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "CalendarEvent",
            id,
        }))
    }
}
