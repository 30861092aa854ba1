//! Handlers for `/usage`: spend history and today's budget.

use axum::extract::{Query, State};
use axum::Json;
use reelcraft_core::cost::BudgetStatus;
use reelcraft_db::models::usage::DailyUsage;
use reelcraft_db::repositories::UsageRepo;
use reelcraft_pipeline::budget::budget_status;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

pub const DEFAULT_DAYS: i32 = 30;
pub const MAX_DAYS: i32 = 365;

#[derive(Debug, Deserialize)]
pub struct UsageQuery {
    /// Number of UTC days to include, counting today. Defaults to 30.
    pub days: Option<i32>,
}

impl UsageQuery {
    fn days(&self) -> i32 {
        self.days.unwrap_or(DEFAULT_DAYS).clamp(1, MAX_DAYS)
    }
}

#[derive(Debug, Serialize)]
pub struct UsageReport {
    pub days: i32,
    pub daily: Vec<DailyUsage>,
    pub total_cents: i64,
    pub today: BudgetStatus,
}

/// GET /api/v1/usage?days=
pub async fn report(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<UsageQuery>,
) -> AppResult<Json<DataResponse<UsageReport>>> {
    let days = params.days();
    let daily = UsageRepo::daily_series(&state.pool, auth.user_id, days).await?;
    let total_cents: i64 = daily.iter().map(|d| d.cost_cents).sum();
    let today = budget_status(&state.pool, auth.user_id).await?;

    Ok(Json(DataResponse {
        data: UsageReport {
            days,
            daily,
            total_cents,
            today,
        },
    }))
}

/// GET /api/v1/usage/budget
pub async fn budget(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<BudgetStatus>>> {
    let status = budget_status(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: status }))
}
