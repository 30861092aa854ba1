//! Handlers for the `/api-keys` resource.
//!
//! The plaintext key is returned exactly once, from `create`. Only its
//! SHA-256 digest and a display prefix are stored.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use reelcraft_core::api_keys::generate_api_key;
use reelcraft_core::error::CoreError;
use reelcraft_core::types::DbId;
use reelcraft_db::models::api_key::{ApiKey, ApiKeyCreatedResponse, CreateApiKey};
use reelcraft_db::repositories::ApiKeyRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/api-keys
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateApiKey>,
) -> AppResult<(StatusCode, Json<DataResponse<ApiKeyCreatedResponse>>)> {
    input.validate()?;
    let generated = generate_api_key();
    let key = ApiKeyRepo::create(
        &state.pool,
        auth.user_id,
        &input.name,
        &generated.hash,
        &generated.prefix,
    )
    .await?;

    tracing::info!(
        api_key_id = key.id,
        user_id = auth.user_id,
        key_prefix = %key.key_prefix,
        "API key created"
    );
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: ApiKeyCreatedResponse {
                id: key.id,
                name: key.name,
                key_prefix: key.key_prefix,
                plaintext_key: generated.plaintext,
                created_at: key.created_at,
            },
        }),
    ))
}

/// GET /api/v1/api-keys
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<ApiKey>>>> {
    let keys = ApiKeyRepo::list_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: keys }))
}

/// DELETE /api/v1/api-keys/{id}
///
/// Revokes the key; the row is kept for audit.
pub async fn revoke(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if ApiKeyRepo::revoke(&state.pool, id, auth.user_id).await? {
        tracing::info!(api_key_id = id, user_id = auth.user_id, "API key revoked");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "ApiKey",
            id,
        }))
    }
}
