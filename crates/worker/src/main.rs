//! Background worker: polls in-flight video generations until they finish.
//!
//! Runs alongside the API against the same database. Each process has its
//! own event bus, so the worker runs its own notification writer for the
//! completions it observes.

mod config;

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use reelcraft_events::{EventBus, NotificationWriter};
use reelcraft_pipeline::{GenerationLimiter, GenerationPoller, PipelineContext};

use crate::config::PollerConfig;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reelcraft_worker=debug,reelcraft_pipeline=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = PollerConfig::from_env();
    tracing::info!(
        poll_initial_secs = config.poll_initial_secs,
        poll_max_secs = config.poll_max_secs,
        "Loaded worker configuration"
    );

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = reelcraft_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    reelcraft_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    reelcraft_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database ready");

    // --- Event bus ---
    let cancel = CancellationToken::new();
    let event_bus = Arc::new(EventBus::default());
    let writer_handle = tokio::spawn(NotificationWriter::run(
        pool.clone(),
        event_bus.subscribe(),
        cancel.clone(),
    ));

    // --- Poller ---
    let limiter = GenerationLimiter::per_minute(config.generation_rate_limit_per_minute);
    let ctx = PipelineContext::from_env(pool, event_bus, limiter)
        .expect("Failed to configure generation pipeline");
    let poller = GenerationPoller::new(ctx, config.backoff());
    let poller_cancel = cancel.clone();
    let poller_handle = tokio::spawn(async move { poller.run(poller_cancel).await });

    shutdown_signal().await;
    cancel.cancel();

    let timeout = Duration::from_secs(config.shutdown_timeout_secs);
    if tokio::time::timeout(timeout, poller_handle).await.is_err() {
        tracing::warn!("Poller did not stop within the shutdown timeout");
    }
    let _ = tokio::time::timeout(timeout, writer_handle).await;
    tracing::info!("Worker stopped");
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received SIGINT, shutting down"),
        () = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
