//! Route definitions for the `/scenes` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::scenes;
use crate::state::AppState;

/// Routes mounted at `/scenes`.
///
/// ```text
/// GET    /{id}                  -> get_by_id
/// PUT    /{id}                  -> update
/// DELETE /{id}                  -> delete
/// POST   /{id}/optimize-prompt  -> optimize_prompt
/// POST   /{id}/image            -> generate_image
/// POST   /{id}/voiceover        -> generate_voiceover
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            get(scenes::get_by_id)
                .put(scenes::update)
                .delete(scenes::delete),
        )
        .route("/{id}/optimize-prompt", post(scenes::optimize_prompt))
        .route("/{id}/image", post(scenes::generate_image))
        .route("/{id}/voiceover", post(scenes::generate_voiceover))
}
