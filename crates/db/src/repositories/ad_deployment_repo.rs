//! Repository for the `ad_deployments` table.

use reelcraft_core::ads::{DEPLOYMENT_FAILED, DEPLOYMENT_PENDING, DEPLOYMENT_PUBLISHED};
use reelcraft_core::types::DbId;
use sqlx::PgPool;

use crate::models::campaign::AdDeployment;

const COLUMNS: &str = "id, campaign_id, project_id, platform, status, external_campaign_id, \
    external_ad_id, creative_url, daily_budget_cents, error_message, published_at, created_at, \
    updated_at";

pub struct AdDeploymentRepo;

impl AdDeploymentRepo {
    /// Insert a `pending` deployment before calling the publisher.
    pub async fn create(
        pool: &PgPool,
        campaign_id: DbId,
        project_id: DbId,
        platform: &str,
        creative_url: &str,
        daily_budget_cents: Option<i64>,
    ) -> Result<AdDeployment, sqlx::Error> {
        let query = format!(
            "INSERT INTO ad_deployments
                (campaign_id, project_id, platform, status, creative_url, daily_budget_cents)
             VALUES ($1, $2, $3, '{DEPLOYMENT_PENDING}', $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AdDeployment>(&query)
            .bind(campaign_id)
            .bind(project_id)
            .bind(platform)
            .bind(creative_url)
            .bind(daily_budget_cents)
            .fetch_one(pool)
            .await
    }

    pub async fn mark_published(
        pool: &PgPool,
        id: DbId,
        external_campaign_id: &str,
        external_ad_id: &str,
    ) -> Result<Option<AdDeployment>, sqlx::Error> {
        let query = format!(
            "UPDATE ad_deployments
             SET status = '{DEPLOYMENT_PUBLISHED}', external_campaign_id = $2,
                 external_ad_id = $3, published_at = NOW(), error_message = NULL
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AdDeployment>(&query)
            .bind(id)
            .bind(external_campaign_id)
            .bind(external_ad_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn mark_failed(
        pool: &PgPool,
        id: DbId,
        error_message: &str,
    ) -> Result<Option<AdDeployment>, sqlx::Error> {
        let query = format!(
            "UPDATE ad_deployments SET status = '{DEPLOYMENT_FAILED}', error_message = $2
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AdDeployment>(&query)
            .bind(id)
            .bind(error_message)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_for_campaign(
        pool: &PgPool,
        campaign_id: DbId,
    ) -> Result<Vec<AdDeployment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM ad_deployments WHERE campaign_id = $1 ORDER BY created_at, id"
        );
        sqlx::query_as::<_, AdDeployment>(&query)
            .bind(campaign_id)
            .fetch_all(pool)
            .await
    }

    /// Find a deployment whose campaign belongs to `user_id`.
    pub async fn find_for_user(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<AdDeployment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM ad_deployments
             WHERE id = $1
               AND campaign_id IN (SELECT id FROM campaigns WHERE user_id = $2)"
        );
        sqlx::query_as::<_, AdDeployment>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }
}
