//! Server-side poller for in-flight video generations.
//!
//! Scans every `processing` video row on a [`PollBackoff`] schedule: the
//! interval resets after a clean cycle and doubles (up to the cap) after a
//! cycle that hit polling failures.

use reelcraft_core::generation::{STATUS_COMPLETED, STATUS_FAILED};
use reelcraft_core::polling::{BackoffConfig, PollBackoff};
use reelcraft_db::repositories::GenerationRepo;
use tokio_util::sync::CancellationToken;

use crate::context::PipelineContext;
use crate::error::PipelineResult;
use crate::poll::poll_generation;

/// Maximum rows polled per cycle.
const DEFAULT_BATCH_SIZE: i64 = 50;

/// Outcome counts for one poll cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollSummary {
    pub polled: usize,
    pub completed: usize,
    pub failed: usize,
    /// Rows whose poll recorded a failure without giving up yet.
    pub retried: usize,
}

impl PollSummary {
    pub fn had_failures(&self) -> bool {
        self.failed > 0 || self.retried > 0
    }
}

pub struct GenerationPoller {
    ctx: PipelineContext,
    backoff: BackoffConfig,
    batch_size: i64,
}

impl GenerationPoller {
    pub fn new(ctx: PipelineContext, backoff: BackoffConfig) -> Self {
        Self {
            ctx,
            backoff,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn with_batch_size(mut self, batch_size: i64) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Run until `cancel` fires.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut backoff = PollBackoff::new(self.backoff);
        tracing::info!(
            initial_secs = self.backoff.initial.as_secs(),
            max_secs = self.backoff.max.as_secs(),
            "Generation poller started"
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Generation poller shutting down");
                    break;
                }
                _ = tokio::time::sleep(backoff.current()) => {}
            }

            match self.poll_once().await {
                Ok(summary) if summary.had_failures() => {
                    let delay = backoff.on_failure();
                    tracing::warn!(
                        ?summary,
                        next_delay_secs = delay.as_secs(),
                        "Poll cycle had failures, backing off"
                    );
                }
                Ok(summary) => {
                    backoff.on_success();
                    if summary.polled > 0 {
                        tracing::debug!(?summary, "Poll cycle finished");
                    }
                }
                Err(e) => {
                    let delay = backoff.on_failure();
                    tracing::error!(
                        error = %e,
                        next_delay_secs = delay.as_secs(),
                        "Poll cycle failed"
                    );
                }
            }
        }
    }

    /// Poll every processing video once.
    pub async fn poll_once(&self) -> PipelineResult<PollSummary> {
        let rows = GenerationRepo::list_pollable(&self.ctx.pool, self.batch_size).await?;
        let mut summary = PollSummary::default();

        for row in rows {
            let id = row.id;
            let before = row.retry_count;
            summary.polled += 1;
            match poll_generation(&self.ctx, row).await {
                Ok(updated) => match updated.status.as_str() {
                    STATUS_COMPLETED => summary.completed += 1,
                    STATUS_FAILED => summary.failed += 1,
                    _ if updated.retry_count > before => summary.retried += 1,
                    _ => {}
                },
                Err(e) => {
                    tracing::error!(generation_id = id, error = %e, "Failed to poll generation");
                    summary.retried += 1;
                }
            }
        }
        Ok(summary)
    }
}
