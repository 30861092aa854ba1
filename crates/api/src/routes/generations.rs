//! Route definitions for the `/generations` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::generations;
use crate::state::AppState;

/// Routes mounted at `/generations`.
///
/// ```text
/// GET    /{id}    -> get_by_id (polls the remote operation once)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", get(generations::get_by_id))
}
