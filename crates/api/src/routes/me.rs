use axum::routing::get;
use axum::Router;

use crate::handlers::me;
use crate::state::AppState;

/// Routes mounted at `/me`.
///
/// ```text
/// GET    /    -> get
/// PUT    /    -> update
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(me::get).put(me::update))
}
