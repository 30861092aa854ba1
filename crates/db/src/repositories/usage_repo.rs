//! Repository for the `usage_logs` table.
//!
//! Day boundaries are UTC.

use reelcraft_core::types::DbId;
use sqlx::PgPool;

use crate::models::usage::{CreateUsageLog, DailyUsage, UsageLog};

const COLUMNS: &str = "id, user_id, project_id, generation_id, service, model, units, \
    cost_cents, created_at, updated_at";

pub struct UsageRepo;

impl UsageRepo {
    pub async fn create(pool: &PgPool, input: &CreateUsageLog) -> Result<UsageLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO usage_logs
                (user_id, project_id, generation_id, service, model, units, cost_cents)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UsageLog>(&query)
            .bind(input.user_id)
            .bind(input.project_id)
            .bind(input.generation_id)
            .bind(input.service)
            .bind(&input.model)
            .bind(input.units)
            .bind(input.cost_cents)
            .fetch_one(pool)
            .await
    }

    /// Cents spent since the start of the current UTC day.
    pub async fn spent_today(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        Self::spent_over_days(pool, user_id, 1).await
    }

    /// Cents spent over the last `days` UTC days, today included.
    pub async fn spent_over_days(pool: &PgPool, user_id: DbId, days: i32) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COALESCE(SUM(cost_cents), 0)::BIGINT FROM usage_logs
             WHERE user_id = $1
               AND created_at >= date_trunc('day', NOW(), 'UTC') - make_interval(days => $2 - 1)",
        )
        .bind(user_id)
        .bind(days)
        .fetch_one(pool)
        .await
    }

    /// Per-day, per-service totals for the last `days` UTC days.
    pub async fn daily_series(
        pool: &PgPool,
        user_id: DbId,
        days: i32,
    ) -> Result<Vec<DailyUsage>, sqlx::Error> {
        sqlx::query_as::<_, DailyUsage>(
            "SELECT (created_at AT TIME ZONE 'UTC')::DATE AS day,
                    service,
                    COUNT(*) AS calls,
                    COALESCE(SUM(cost_cents), 0)::BIGINT AS cost_cents
             FROM usage_logs
             WHERE user_id = $1
               AND created_at >= date_trunc('day', NOW(), 'UTC') - make_interval(days => $2 - 1)
             GROUP BY 1, 2
             ORDER BY 1, 2",
        )
        .bind(user_id)
        .bind(days)
        .fetch_all(pool)
        .await
    }
}
