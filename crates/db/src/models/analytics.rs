//! Read-only aggregate shapes for the analytics overview.

use reelcraft_core::ads::PerformanceTotals;
use serde::Serialize;

use crate::models::generation::GenerationCount;
use crate::models::project::ProjectStatusCount;

#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsOverview {
    pub projects_by_status: Vec<ProjectStatusCount>,
    pub generations: Vec<GenerationCount>,
    pub spend_last_30_days_cents: i64,
    pub campaign_performance: PerformanceTotals,
}
