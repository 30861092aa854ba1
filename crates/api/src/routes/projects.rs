//! Route definitions for the `/projects` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::projects;
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                          -> list
/// POST   /                          -> create
/// GET    /{id}                      -> get_by_id
/// PUT    /{id}                      -> update
/// DELETE /{id}                      -> delete
/// POST   /{id}/brief/submit         -> submit_brief
/// POST   /{id}/strategy             -> generate_strategy
/// GET    /{id}/scenes               -> list_scenes
/// POST   /{id}/scenes               -> create_scene
/// POST   /{id}/scenes/generate      -> generate_scenes
/// POST   /{id}/scenes/confirm       -> confirm_scenes
/// POST   /{id}/generate             -> generate_videos
/// POST   /{id}/advance              -> advance
/// POST   /{id}/stitch               -> start_stitch
/// GET    /{id}/generations          -> list_generations
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(projects::list).post(projects::create))
        .route(
            "/{id}",
            get(projects::get_by_id)
                .put(projects::update)
                .delete(projects::delete),
        )
        .route("/{id}/brief/submit", post(projects::submit_brief))
        .route("/{id}/strategy", post(projects::generate_strategy))
        .route(
            "/{id}/scenes",
            get(projects::list_scenes).post(projects::create_scene),
        )
        .route("/{id}/scenes/generate", post(projects::generate_scenes))
        .route("/{id}/scenes/confirm", post(projects::confirm_scenes))
        .route("/{id}/generate", post(projects::generate_videos))
        .route("/{id}/advance", post(projects::advance))
        .route("/{id}/stitch", post(projects::start_stitch))
        .route("/{id}/generations", get(projects::list_generations))
}
