//! Handlers for `/brand-kits` and their uploaded assets.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use reelcraft_core::brand::{
    validate_asset_type, validate_hex_color, validate_opacity, validate_watermark_position,
    ASSET_LOGO, ASSET_WATERMARK, MAX_ASSET_BYTES,
};
use reelcraft_core::error::CoreError;
use reelcraft_core::storage::{brand_asset_key, content_type_for_filename};
use reelcraft_core::types::DbId;
use reelcraft_db::models::brand::{
    BrandAsset, BrandKit, CreateBrandAsset, CreateBrandKit, UpdateBrandKit,
};
use reelcraft_db::repositories::{BrandAssetRepo, BrandKitRepo};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

async fn find_kit(state: &AppState, id: DbId, user_id: DbId) -> AppResult<BrandKit> {
    BrandKitRepo::find_for_user(&state.pool, id, user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "BrandKit",
            id,
        }))
}

/// Shared checks for the optional style fields of create and update.
fn validate_style(
    colors: [&Option<String>; 3],
    position: &Option<String>,
    opacity: Option<f64>,
) -> Result<(), CoreError> {
    for color in colors.into_iter().flatten() {
        validate_hex_color(color)?;
    }
    if let Some(position) = position {
        validate_watermark_position(position)?;
    }
    if let Some(opacity) = opacity {
        validate_opacity(opacity)?;
    }
    Ok(())
}

/// POST /api/v1/brand-kits
///
/// Setting `is_default` clears the flag on the caller's other kits.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateBrandKit>,
) -> AppResult<(StatusCode, Json<DataResponse<BrandKit>>)> {
    input.validate()?;
    validate_style(
        [
            &input.primary_color,
            &input.secondary_color,
            &input.accent_color,
        ],
        &input.watermark_position,
        input.watermark_opacity,
    )?;

    let kit = BrandKitRepo::create(&state.pool, auth.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: kit })))
}

/// GET /api/v1/brand-kits
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<BrandKit>>>> {
    let kits = BrandKitRepo::list_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: kits }))
}

/// GET /api/v1/brand-kits/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<BrandKit>>> {
    let kit = find_kit(&state, id, auth.user_id).await?;
    Ok(Json(DataResponse { data: kit }))
}

/// PUT /api/v1/brand-kits/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateBrandKit>,
) -> AppResult<Json<DataResponse<BrandKit>>> {
    input.validate()?;
    validate_style(
        [
            &input.primary_color,
            &input.secondary_color,
            &input.accent_color,
        ],
        &input.watermark_position,
        input.watermark_opacity,
    )?;

    let kit = BrandKitRepo::update(&state.pool, id, auth.user_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "BrandKit",
            id,
        }))?;
    Ok(Json(DataResponse { data: kit }))
}

/// DELETE /api/v1/brand-kits/{id}
///
/// Assets cascade in the database; their stored objects are removed on a
/// best-effort basis.
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    find_kit(&state, id, auth.user_id).await?;
    let assets = BrandAssetRepo::list_for_kit(&state.pool, id).await?;

    if !BrandKitRepo::delete(&state.pool, id, auth.user_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "BrandKit",
            id,
        }));
    }

    for asset in assets {
        if let Err(e) = state.pipeline.store.delete(&asset.storage_key).await {
            tracing::warn!(asset_id = asset.id, error = %e, "Failed to delete asset object");
        }
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Assets
// ---------------------------------------------------------------------------

/// GET /api/v1/brand-kits/{id}/assets
pub async fn list_assets(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<BrandAsset>>>> {
    find_kit(&state, id, auth.user_id).await?;
    let assets = BrandAssetRepo::list_for_kit(&state.pool, id).await?;
    Ok(Json(DataResponse { data: assets }))
}

/// POST /api/v1/brand-kits/{id}/assets
///
/// Multipart form with an `asset_type` text field and a `file` field.
/// Uploading a `logo` or `watermark` also points the kit at the new file.
pub async fn upload_asset(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<BrandAsset>>)> {
    let kit = find_kit(&state, id, auth.user_id).await?;

    let mut asset_type: Option<String> = None;
    let mut file: Option<(String, Option<String>, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        match field.name() {
            Some("asset_type") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                asset_type = Some(value.trim().to_string());
            }
            Some("file") => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                let content_type = field.content_type().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                file = Some((filename, content_type, data.to_vec()));
            }
            _ => {}
        }
    }

    let asset_type =
        asset_type.ok_or_else(|| AppError::BadRequest("Missing 'asset_type' field".into()))?;
    validate_asset_type(&asset_type)?;
    let (filename, content_type, bytes) =
        file.ok_or_else(|| AppError::BadRequest("Missing 'file' field".into()))?;
    if bytes.is_empty() {
        return Err(AppError::BadRequest("Uploaded file is empty".into()));
    }
    if bytes.len() > MAX_ASSET_BYTES {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Asset exceeds the {} MiB limit",
            MAX_ASSET_BYTES / (1024 * 1024)
        ))));
    }

    let content_type = content_type
        .filter(|ct| !ct.is_empty() && ct != "application/octet-stream")
        .unwrap_or_else(|| content_type_for_filename(&filename).to_string());
    let key = brand_asset_key(kit.id, &Uuid::new_v4().simple().to_string(), &filename);
    let size_bytes = bytes.len() as i64;
    let url = state.pipeline.store.put(&key, bytes, &content_type).await?;

    let created = BrandAssetRepo::create(
        &state.pool,
        &CreateBrandAsset {
            brand_kit_id: kit.id,
            asset_type: asset_type.clone(),
            filename,
            content_type,
            size_bytes,
            storage_key: key.clone(),
            url: url.clone(),
        },
    )
    .await;
    let asset = match created {
        Ok(asset) => asset,
        Err(e) => {
            if let Err(delete_err) = state.pipeline.store.delete(&key).await {
                tracing::warn!(key = %key, error = %delete_err, "Failed to delete orphaned upload");
            }
            return Err(e.into());
        }
    };

    match asset_type.as_str() {
        ASSET_LOGO => BrandKitRepo::set_logo(&state.pool, kit.id, &url).await?,
        ASSET_WATERMARK => {
            BrandKitRepo::set_watermark(&state.pool, kit.id, &url, &key).await?;
        }
        _ => {}
    }

    tracing::info!(
        brand_kit_id = kit.id,
        asset_id = asset.id,
        asset_type = %asset.asset_type,
        size_bytes,
        "Brand asset uploaded"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: asset })))
}

/// DELETE /api/v1/brand-assets/{id}
pub async fn delete_asset(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let asset = BrandAssetRepo::find_for_user(&state.pool, id, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "BrandAsset",
            id,
        }))?;

    BrandAssetRepo::delete(&state.pool, id).await?;

    // The kit's active watermark keeps its object so exports still work.
    let kit = BrandKitRepo::find_by_id(&state.pool, asset.brand_kit_id).await?;
    let in_use = kit.is_some_and(|k| k.watermark_key.as_deref() == Some(asset.storage_key.as_str()));
    if !in_use {
        if let Err(e) = state.pipeline.store.delete(&asset.storage_key).await {
            tracing::warn!(asset_id = id, error = %e, "Failed to delete asset object");
        }
    }
    Ok(StatusCode::NO_CONTENT)
}
