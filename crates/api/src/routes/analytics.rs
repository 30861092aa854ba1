use axum::routing::get;
use axum::Router;

use crate::handlers::analytics;
use crate::state::AppState;

/// Routes mounted at `/analytics`.
///
/// ```text
/// GET    /overview    -> overview
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/overview", get(analytics::overview))
}
