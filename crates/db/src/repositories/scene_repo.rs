//! Repository for the `scenes` table.

use reelcraft_core::scene::{snap_duration, DEFAULT_DURATION_SECS};
use reelcraft_core::types::DbId;
use sqlx::PgPool;

use crate::models::scene::{CreateScene, Scene, UpdateScene};

const COLUMNS: &str = "id, project_id, sort_order, description, optimized_prompt, \
    negative_prompt, is_approved, audio_config, duration_secs, created_at, updated_at";

/// Provides CRUD operations for scenes. Every write snaps `duration_secs`
/// to an allowed clip length.
pub struct SceneRepo;

impl SceneRepo {
    /// Insert a scene. Without an explicit `sort_order` it is appended after
    /// the project's last scene.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateScene,
    ) -> Result<Scene, sqlx::Error> {
        let query = format!(
            "INSERT INTO scenes (project_id, sort_order, description, duration_secs, audio_config)
             VALUES ($1,
                     COALESCE($2, (SELECT COALESCE(MAX(sort_order) + 1, 0) FROM scenes WHERE project_id = $1)),
                     $3, $4, COALESCE($5, '{{}}'::jsonb))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Scene>(&query)
            .bind(project_id)
            .bind(input.sort_order)
            .bind(&input.description)
            .bind(snap_duration(input.duration_secs.unwrap_or(DEFAULT_DURATION_SECS)))
            .bind(&input.audio_config)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Scene>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM scenes WHERE id = $1");
        sqlx::query_as::<_, Scene>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a scene whose (live) project belongs to `user_id`.
    pub async fn find_for_user(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Scene>, sqlx::Error> {
        let query = format!(
            "SELECT {cols} FROM scenes s
             JOIN projects p ON p.id = s.project_id
             WHERE s.id = $1 AND p.user_id = $2 AND p.deleted_at IS NULL",
            cols = prefixed("s"),
        );
        sqlx::query_as::<_, Scene>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Scene>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM scenes WHERE project_id = $1 ORDER BY sort_order, id"
        );
        sqlx::query_as::<_, Scene>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    pub async fn list_approved(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Scene>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM scenes
             WHERE project_id = $1 AND is_approved
             ORDER BY sort_order, id"
        );
        sqlx::query_as::<_, Scene>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// `(total, approved)` scene counts for a project.
    pub async fn approval_counts(pool: &PgPool, project_id: DbId) -> Result<(i64, i64), sqlx::Error> {
        sqlx::query_as(
            "SELECT COUNT(*), COUNT(*) FILTER (WHERE is_approved)
             FROM scenes WHERE project_id = $1",
        )
        .bind(project_id)
        .fetch_one(pool)
        .await
    }

    /// Update a scene. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateScene,
    ) -> Result<Option<Scene>, sqlx::Error> {
        let query = format!(
            "UPDATE scenes SET
                description = COALESCE($2, description),
                sort_order = COALESCE($3, sort_order),
                optimized_prompt = COALESCE($4, optimized_prompt),
                negative_prompt = COALESCE($5, negative_prompt),
                is_approved = COALESCE($6, is_approved),
                duration_secs = COALESCE($7, duration_secs),
                audio_config = COALESCE($8, audio_config)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Scene>(&query)
            .bind(id)
            .bind(&input.description)
            .bind(input.sort_order)
            .bind(&input.optimized_prompt)
            .bind(&input.negative_prompt)
            .bind(input.is_approved)
            .bind(input.duration_secs.map(snap_duration))
            .bind(&input.audio_config)
            .fetch_optional(pool)
            .await
    }

    pub async fn set_prompts(
        pool: &PgPool,
        id: DbId,
        optimized_prompt: &str,
        negative_prompt: &str,
    ) -> Result<Option<Scene>, sqlx::Error> {
        let query = format!(
            "UPDATE scenes SET optimized_prompt = $2, negative_prompt = $3
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Scene>(&query)
            .bind(id)
            .bind(optimized_prompt)
            .bind(negative_prompt)
            .fetch_optional(pool)
            .await
    }

    /// Replace every scene of a project with `scenes`, in order, inside one
    /// transaction.
    pub async fn replace_for_project(
        pool: &PgPool,
        project_id: DbId,
        scenes: &[CreateScene],
    ) -> Result<Vec<Scene>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM scenes WHERE project_id = $1")
            .bind(project_id)
            .execute(&mut *tx)
            .await?;

        let query = format!(
            "INSERT INTO scenes (project_id, sort_order, description, duration_secs, audio_config)
             VALUES ($1, $2, $3, $4, COALESCE($5, '{{}}'::jsonb))
             RETURNING {COLUMNS}"
        );
        let mut created = Vec::with_capacity(scenes.len());
        for (idx, input) in scenes.iter().enumerate() {
            let scene = sqlx::query_as::<_, Scene>(&query)
                .bind(project_id)
                .bind(input.sort_order.unwrap_or(idx as i32))
                .bind(&input.description)
                .bind(snap_duration(input.duration_secs.unwrap_or(DEFAULT_DURATION_SECS)))
                .bind(&input.audio_config)
                .fetch_one(&mut *tx)
                .await?;
            created.push(scene);
        }

        tx.commit().await?;
        Ok(created)
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM scenes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn prefixed(alias: &str) -> String {
    COLUMNS
        .split(", ")
        .map(|c| format!("{alias}.{}", c.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}
