//! Handler for the analytics dashboard.

use axum::extract::State;
use axum::Json;
use reelcraft_core::ads::PerformanceTotals;
use reelcraft_db::models::analytics::AnalyticsOverview;
use reelcraft_db::repositories::{GenerationRepo, PerformanceRepo, ProjectRepo, UsageRepo};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Window for the spend figure on the overview.
const SPEND_WINDOW_DAYS: i32 = 30;

/// GET /api/v1/analytics/overview
pub async fn overview(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<AnalyticsOverview>>> {
    let (projects_by_status, generations, spend, sums) = tokio::try_join!(
        ProjectRepo::count_by_status(&state.pool, auth.user_id),
        GenerationRepo::count_by_kind_status(&state.pool, auth.user_id),
        UsageRepo::spent_over_days(&state.pool, auth.user_id, SPEND_WINDOW_DAYS),
        PerformanceRepo::sums_for_user(&state.pool, auth.user_id),
    )?;

    Ok(Json(DataResponse {
        data: AnalyticsOverview {
            projects_by_status,
            generations,
            spend_last_30_days_cents: spend,
            campaign_performance: PerformanceTotals::new(
                sums.impressions,
                sums.clicks,
                sums.conversions,
                sums.spend_cents,
            ),
        },
    }))
}
