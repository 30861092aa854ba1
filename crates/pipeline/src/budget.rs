//! Daily spend checks and usage logging.

use reelcraft_core::cost::BudgetStatus;
use reelcraft_core::types::DbId;
use reelcraft_db::models::usage::CreateUsageLog;
use reelcraft_db::repositories::{UsageRepo, UserRepo};
use reelcraft_db::DbPool;

use crate::context::PipelineContext;
use crate::error::{PipelineError, PipelineResult};

/// The user's budget and today's (UTC) spend.
pub async fn budget_status(pool: &DbPool, user_id: DbId) -> PipelineResult<BudgetStatus> {
    let user = UserRepo::find_by_id(pool, user_id)
        .await?
        .ok_or_else(|| PipelineError::not_found("User", user_id))?;
    let spent = UsageRepo::spent_today(pool, user_id).await?;
    Ok(BudgetStatus::new(user.daily_budget_cents, spent))
}

/// Rate-limit the request and reject it if `estimate_cents` would overrun
/// today's budget.
pub async fn admit(
    ctx: &PipelineContext,
    user_id: DbId,
    estimate_cents: i64,
) -> PipelineResult<BudgetStatus> {
    ctx.limiter.check(user_id)?;
    let status = budget_status(&ctx.pool, user_id).await?;
    status.check(estimate_cents)?;
    Ok(status)
}

/// Write a usage row. Failures are logged, never surfaced: the vendor call
/// already happened.
pub async fn record_usage(pool: &DbPool, input: CreateUsageLog) {
    if let Err(e) = UsageRepo::create(pool, &input).await {
        tracing::error!(
            error = %e,
            user_id = input.user_id,
            service = input.service,
            "Failed to write usage log"
        );
    }
}
