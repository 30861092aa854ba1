pub mod analytics;
pub mod api_keys;
pub mod brand_kits;
pub mod calendar;
pub mod campaigns;
pub mod deployments;
pub mod generations;
pub mod health;
pub mod me;
pub mod notifications;
pub mod projects;
pub mod scenes;
pub mod templates;
pub mod usage;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Every route requires an authenticated caller (Bearer JWT, `session`
/// cookie, or `X-Api-Key`).
///
/// ```text
/// /projects                                 list, create
/// /projects/{id}                            get, update, delete
/// /projects/{id}/brief/submit               draft -> strategy_pending (POST)
/// /projects/{id}/strategy                   LLM strategy (POST)
/// /projects/{id}/scenes                     list, create
/// /projects/{id}/scenes/generate            LLM scene breakdown (POST)
/// /projects/{id}/scenes/confirm             scenes_pending -> prompts_pending (POST)
/// /projects/{id}/generate                   submit video batch (POST)
/// /projects/{id}/advance                    forward step (POST)
/// /projects/{id}/stitch                     export final video (POST)
/// /projects/{id}/generations                list generations
///
/// /scenes/{id}                              get, update, delete
/// /scenes/{id}/optimize-prompt              LLM prompt rewrite (POST)
/// /scenes/{id}/image                        storyboard still (POST)
/// /scenes/{id}/voiceover                    TTS voiceover (POST)
///
/// /generations/{id}                         get (polls once)
///
/// /brand-kits                               list, create
/// /brand-kits/{id}                          get, update, delete
/// /brand-kits/{id}/assets                   list, upload (multipart)
/// /brand-assets/{id}                        delete
///
/// /campaigns                                list, create
/// /campaigns/{id}                           get, update, delete
/// /campaigns/{id}/deployments               list, publish
/// /campaigns/{id}/performance               totals
/// /deployments/{id}                         get
/// /deployments/{id}/performance             daily rows
/// /deployments/{id}/performance/sync        simulate today's metrics (POST)
///
/// /templates                                list, create
/// /templates/{id}                           get, update, delete
/// /templates/{id}/use                       create project (POST)
///
/// /calendar/events                          list (?from=&to=), create
/// /calendar/events/{id}                     get, update, delete
///
/// /notifications                            list (?unread_only=&limit=&offset=)
/// /notifications/{id}/read                  mark read (POST)
/// /notifications/read-all                   mark all read (POST)
/// /notifications/unread-count               unread count
///
/// /api-keys                                 list, create
/// /api-keys/{id}                            revoke (DELETE)
///
/// /usage                                    daily series (?days=) + budget
/// /usage/budget                             today's budget status
/// /analytics/overview                       dashboard aggregates
/// /me                                       get, update
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/projects", projects::router())
        .nest("/scenes", scenes::router())
        .nest("/generations", generations::router())
        .nest("/brand-kits", brand_kits::router())
        .nest("/brand-assets", brand_kits::asset_router())
        .nest("/campaigns", campaigns::router())
        .nest("/deployments", deployments::router())
        .nest("/templates", templates::router())
        .nest("/calendar/events", calendar::router())
        .nest("/notifications", notifications::router())
        .nest("/api-keys", api_keys::router())
        .nest("/usage", usage::router())
        .nest("/analytics", analytics::router())
        .nest("/me", me::router())
}
