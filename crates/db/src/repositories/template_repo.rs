//! Repository for the `templates` table.
//!
//! Users see their own templates plus every public one; only the owner may
//! change or delete a template.

use reelcraft_core::scene::ASPECT_LANDSCAPE;
use reelcraft_core::types::DbId;
use sqlx::PgPool;

use crate::models::template::{CreateTemplate, Template, UpdateTemplate};

const COLUMNS: &str = "id, user_id, name, description, category, aspect_ratio, brief, \
    scene_outline, is_public, use_count, created_at, updated_at";

pub struct TemplateRepo;

impl TemplateRepo {
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateTemplate,
    ) -> Result<Template, sqlx::Error> {
        let outline = input
            .scene_outline
            .as_ref()
            .map(|o| serde_json::to_value(o).unwrap_or_default());
        let query = format!(
            "INSERT INTO templates
                (user_id, name, description, category, aspect_ratio, brief, scene_outline, is_public)
             VALUES ($1, $2, $3, $4, COALESCE($5, '{ASPECT_LANDSCAPE}'), COALESCE($6, '{{}}'::jsonb),
                     COALESCE($7, '[]'::jsonb), COALESCE($8, false))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Template>(&query)
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.category)
            .bind(&input.aspect_ratio)
            .bind(&input.brief)
            .bind(outline)
            .bind(input.is_public)
            .fetch_one(pool)
            .await
    }

    /// Templates visible to `user_id`, optionally filtered by category.
    pub async fn list_visible(
        pool: &PgPool,
        user_id: DbId,
        category: Option<&str>,
    ) -> Result<Vec<Template>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM templates
             WHERE (user_id = $1 OR is_public)
               AND ($2::TEXT IS NULL OR category = $2)
             ORDER BY use_count DESC, name, id"
        );
        sqlx::query_as::<_, Template>(&query)
            .bind(user_id)
            .bind(category)
            .fetch_all(pool)
            .await
    }

    pub async fn find_visible(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Template>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM templates WHERE id = $1 AND (user_id = $2 OR is_public)"
        );
        sqlx::query_as::<_, Template>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        input: &UpdateTemplate,
    ) -> Result<Option<Template>, sqlx::Error> {
        let outline = input
            .scene_outline
            .as_ref()
            .map(|o| serde_json::to_value(o).unwrap_or_default());
        let query = format!(
            "UPDATE templates SET
                name = COALESCE($3, name),
                description = COALESCE($4, description),
                category = COALESCE($5, category),
                aspect_ratio = COALESCE($6, aspect_ratio),
                brief = COALESCE($7, brief),
                scene_outline = COALESCE($8, scene_outline),
                is_public = COALESCE($9, is_public)
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Template>(&query)
            .bind(id)
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.category)
            .bind(&input.aspect_ratio)
            .bind(&input.brief)
            .bind(outline)
            .bind(input.is_public)
            .fetch_optional(pool)
            .await
    }

    pub async fn increment_use_count(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE templates SET use_count = use_count + 1 WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn delete(pool: &PgPool, id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM templates WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
