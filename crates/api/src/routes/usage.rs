use axum::routing::get;
use axum::Router;

use crate::handlers::usage;
use crate::state::AppState;

/// Routes mounted at `/usage`.
///
/// ```text
/// GET    /          -> report (?days=)
/// GET    /budget    -> budget
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(usage::report))
        .route("/budget", get(usage::budget))
}
