//! Request handlers, one submodule per resource.
//!
//! Handlers authenticate via [`AuthUser`](crate::middleware::auth::AuthUser),
//! validate input, and delegate to a repository in `reelcraft_db` or an
//! operation in `reelcraft_pipeline`. Errors map through [`AppError`](crate::error::AppError).

pub mod analytics;
pub mod api_keys;
pub mod brand_kits;
pub mod calendar;
pub mod campaigns;
pub mod generations;
pub mod me;
pub mod notifications;
pub mod projects;
pub mod scenes;
pub mod templates;
pub mod usage;
