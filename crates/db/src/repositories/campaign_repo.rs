//! Repository for the `campaigns` table.

use reelcraft_core::ads::CAMPAIGN_DRAFT;
use reelcraft_core::types::DbId;
use sqlx::PgPool;

use crate::models::campaign::{Campaign, CreateCampaign, UpdateCampaign};

const COLUMNS: &str =
    "id, user_id, name, objective, status, budget_cents, starts_on, ends_on, created_at, updated_at";

pub struct CampaignRepo;

impl CampaignRepo {
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateCampaign,
    ) -> Result<Campaign, sqlx::Error> {
        let query = format!(
            "INSERT INTO campaigns (user_id, name, objective, status, budget_cents, starts_on, ends_on)
             VALUES ($1, $2, $3, COALESCE($4, '{CAMPAIGN_DRAFT}'), $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Campaign>(&query)
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.objective)
            .bind(&input.status)
            .bind(input.budget_cents)
            .bind(input.starts_on)
            .bind(input.ends_on)
            .fetch_one(pool)
            .await
    }

    pub async fn find_for_user(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Campaign>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM campaigns WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, Campaign>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Campaign>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM campaigns WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Campaign>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        input: &UpdateCampaign,
    ) -> Result<Option<Campaign>, sqlx::Error> {
        let query = format!(
            "UPDATE campaigns SET
                name = COALESCE($3, name),
                objective = COALESCE($4, objective),
                status = COALESCE($5, status),
                budget_cents = COALESCE($6, budget_cents),
                starts_on = COALESCE($7, starts_on),
                ends_on = COALESCE($8, ends_on)
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Campaign>(&query)
            .bind(id)
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.objective)
            .bind(&input.status)
            .bind(input.budget_cents)
            .bind(input.starts_on)
            .bind(input.ends_on)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM campaigns WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
