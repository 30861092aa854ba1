use std::sync::Arc;

use reelcraft_pipeline::PipelineContext;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything inside is behind `Arc` or already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: reelcraft_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Vendor clients, object store, event bus, and rate limiter.
    pub pipeline: PipelineContext,
}
