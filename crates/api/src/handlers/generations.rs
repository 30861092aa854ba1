//! Handlers for the `/generations` resource.

use axum::extract::{Path, State};
use axum::Json;
use reelcraft_core::error::CoreError;
use reelcraft_core::types::DbId;
use reelcraft_db::models::generation::Generation;
use reelcraft_db::repositories::GenerationRepo;
use reelcraft_pipeline::poll::poll_generation;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/generations/{id}
///
/// Returns the generation after one on-demand poll of its remote
/// operation. Rows that are not processing come back unchanged.
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Generation>>> {
    let generation = GenerationRepo::find_for_user(&state.pool, id, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Generation",
            id,
        }))?;

    let generation = poll_generation(&state.pipeline, generation).await?;
    Ok(Json(DataResponse { data: generation }))
}
