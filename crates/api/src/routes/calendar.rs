use axum::routing::get;
use axum::Router;

use crate::handlers::calendar;
use crate::state::AppState;

/// Routes mounted at `/calendar/events`.
///
/// ```text
/// GET    /        -> list (?from=&to=)
/// POST   /        -> create
/// GET    /{id}    -> get_by_id
/// PUT    /{id}    -> update
/// DELETE /{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(calendar::list).post(calendar::create))
        .route(
            "/{id}",
            get(calendar::get_by_id)
                .put(calendar::update)
                .delete(calendar::delete),
        )
}
