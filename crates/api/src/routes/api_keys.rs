use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::api_keys;
use crate::state::AppState;

/// Routes mounted at `/api-keys`.
///
/// ```text
/// GET    /        -> list
/// POST   /        -> create
/// DELETE /{id}    -> revoke
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(api_keys::list).post(api_keys::create))
        .route("/{id}", delete(api_keys::revoke))
}
