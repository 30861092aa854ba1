//! Route definitions for `/brand-kits` and `/brand-assets`.

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get};
use axum::Router;
use reelcraft_core::brand::MAX_ASSET_BYTES;

use crate::handlers::brand_kits;
use crate::state::AppState;

/// Headroom above the file limit for multipart framing and text fields.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Routes mounted at `/brand-kits`.
///
/// ```text
/// GET    /               -> list
/// POST   /               -> create
/// GET    /{id}           -> get_by_id
/// PUT    /{id}           -> update
/// DELETE /{id}           -> delete
/// GET    /{id}/assets    -> list_assets
/// POST   /{id}/assets    -> upload_asset (multipart)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(brand_kits::list).post(brand_kits::create))
        .route(
            "/{id}",
            get(brand_kits::get_by_id)
                .put(brand_kits::update)
                .delete(brand_kits::delete),
        )
        .route(
            "/{id}/assets",
            get(brand_kits::list_assets)
                .post(brand_kits::upload_asset)
                .layer(DefaultBodyLimit::max(
                    MAX_ASSET_BYTES + MULTIPART_OVERHEAD_BYTES,
                )),
        )
}

/// Routes mounted at `/brand-assets`.
///
/// ```text
/// DELETE /{id}    -> delete_asset
/// ```
pub fn asset_router() -> Router<AppState> {
    Router::new().route("/{id}", delete(brand_kits::delete_asset))
}
