//! Campaign, ad deployment, and campaign performance models.

use chrono::NaiveDate;
use reelcraft_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `campaigns` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Campaign {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub objective: Option<String>,
    pub status: String,
    pub budget_cents: Option<i64>,
    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCampaign {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub objective: Option<String>,
    /// Defaults to `draft` if omitted.
    pub status: Option<String>,
    #[validate(range(min = 0))]
    pub budget_cents: Option<i64>,
    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateCampaign {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub objective: Option<String>,
    pub status: Option<String>,
    #[validate(range(min = 0))]
    pub budget_cents: Option<i64>,
    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
}

/// A row from the `ad_deployments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AdDeployment {
    pub id: DbId,
    pub campaign_id: DbId,
    pub project_id: DbId,
    pub platform: String,
    pub status: String,
    pub external_campaign_id: Option<String>,
    pub external_ad_id: Option<String>,
    pub creative_url: String,
    pub daily_budget_cents: Option<i64>,
    pub error_message: Option<String>,
    pub published_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for publishing a project's video to an ad platform.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAdDeployment {
    pub project_id: DbId,
    pub platform: String,
    pub daily_budget_cents: Option<i64>,
}

/// A row from the `campaign_performance` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PerformanceDay {
    pub id: DbId,
    pub deployment_id: DbId,
    pub metric_date: NaiveDate,
    pub impressions: i64,
    pub clicks: i64,
    pub conversions: i64,
    pub spend_cents: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Metrics for one deployment-day, as produced by a publisher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerformanceMetrics {
    pub impressions: i64,
    pub clicks: i64,
    pub conversions: i64,
    pub spend_cents: i64,
}

/// Summed raw metrics over a set of performance rows.
#[derive(Debug, Clone, Copy, Default, FromRow)]
pub struct PerformanceSums {
    pub impressions: i64,
    pub clicks: i64,
    pub conversions: i64,
    pub spend_cents: i64,
}
