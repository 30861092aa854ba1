//! Route definitions for the `/deployments` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::campaigns;
use crate::state::AppState;

/// Routes mounted at `/deployments`.
///
/// ```text
/// GET    /{id}                     -> get_deployment
/// GET    /{id}/performance         -> deployment_performance
/// POST   /{id}/performance/sync    -> sync_performance
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(campaigns::get_deployment))
        .route("/{id}/performance", get(campaigns::deployment_performance))
        .route(
            "/{id}/performance/sync",
            post(campaigns::sync_performance),
        )
}
