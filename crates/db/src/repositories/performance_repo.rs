//! Repository for the `campaign_performance` table.

use chrono::NaiveDate;
use reelcraft_core::types::DbId;
use sqlx::PgPool;

use crate::models::campaign::{PerformanceDay, PerformanceMetrics, PerformanceSums};

const COLUMNS: &str = "id, deployment_id, metric_date, impressions, clicks, conversions, \
    spend_cents, created_at, updated_at";

const SUMS: &str = "COALESCE(SUM(cp.impressions), 0)::BIGINT AS impressions, \
    COALESCE(SUM(cp.clicks), 0)::BIGINT AS clicks, \
    COALESCE(SUM(cp.conversions), 0)::BIGINT AS conversions, \
    COALESCE(SUM(cp.spend_cents), 0)::BIGINT AS spend_cents";

pub struct PerformanceRepo;

impl PerformanceRepo {
    /// Insert or overwrite the metrics for one deployment-day.
    pub async fn upsert_day(
        pool: &PgPool,
        deployment_id: DbId,
        metric_date: NaiveDate,
        metrics: &PerformanceMetrics,
    ) -> Result<PerformanceDay, sqlx::Error> {
        let query = format!(
            "INSERT INTO campaign_performance
                (deployment_id, metric_date, impressions, clicks, conversions, spend_cents)
             VALUES ($1, $2, $3, $4, $5, $6)
             ON CONFLICT (deployment_id, metric_date) DO UPDATE SET
                impressions = EXCLUDED.impressions,
                clicks = EXCLUDED.clicks,
                conversions = EXCLUDED.conversions,
                spend_cents = EXCLUDED.spend_cents
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PerformanceDay>(&query)
            .bind(deployment_id)
            .bind(metric_date)
            .bind(metrics.impressions)
            .bind(metrics.clicks)
            .bind(metrics.conversions)
            .bind(metrics.spend_cents)
            .fetch_one(pool)
            .await
    }

    pub async fn list_for_deployment(
        pool: &PgPool,
        deployment_id: DbId,
    ) -> Result<Vec<PerformanceDay>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM campaign_performance
             WHERE deployment_id = $1 ORDER BY metric_date"
        );
        sqlx::query_as::<_, PerformanceDay>(&query)
            .bind(deployment_id)
            .fetch_all(pool)
            .await
    }

    pub async fn sums_for_campaign(
        pool: &PgPool,
        campaign_id: DbId,
    ) -> Result<PerformanceSums, sqlx::Error> {
        let query = format!(
            "SELECT {SUMS} FROM campaign_performance cp
             JOIN ad_deployments d ON d.id = cp.deployment_id
             WHERE d.campaign_id = $1"
        );
        sqlx::query_as::<_, PerformanceSums>(&query)
            .bind(campaign_id)
            .fetch_one(pool)
            .await
    }

    pub async fn sums_for_user(pool: &PgPool, user_id: DbId) -> Result<PerformanceSums, sqlx::Error> {
        let query = format!(
            "SELECT {SUMS} FROM campaign_performance cp
             JOIN ad_deployments d ON d.id = cp.deployment_id
             JOIN campaigns c ON c.id = d.campaign_id
             WHERE c.user_id = $1"
        );
        sqlx::query_as::<_, PerformanceSums>(&query)
            .bind(user_id)
            .fetch_one(pool)
            .await
    }
}
