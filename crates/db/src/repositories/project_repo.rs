//! Repository for the `projects` table.

use reelcraft_core::scene::ASPECT_LANDSCAPE;
use reelcraft_core::types::DbId;
use reelcraft_core::workflow::ProjectStatus;
use sqlx::PgPool;

use crate::models::project::{CreateProject, Project, ProjectStatusCount, UpdateProject};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, brand_kit_id, campaign_id, name, description, brief, \
    strategy, status, current_step, aspect_ratio, final_video_url, created_at, updated_at";

/// Provides CRUD and workflow operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project in `draft`, returning the created row.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateProject,
    ) -> Result<Project, sqlx::Error> {
        let draft = ProjectStatus::Draft;
        let query = format!(
            "INSERT INTO projects
                (user_id, name, description, brief, brand_kit_id, campaign_id, aspect_ratio,
                 status, current_step)
             VALUES ($1, $2, $3, COALESCE($4, '{{}}'::jsonb), $5, $6, COALESCE($7, '{ASPECT_LANDSCAPE}'),
                     '{status}', {step})
             RETURNING {COLUMNS}",
            status = draft.as_str(),
            step = draft.step(),
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.brief)
            .bind(input.brand_kit_id)
            .bind(input.campaign_id)
            .bind(&input.aspect_ratio)
            .fetch_one(pool)
            .await
    }

    /// Find a project by ID regardless of owner. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_for_user(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's projects, most recently updated first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE user_id = $1 AND deleted_at IS NULL
             ORDER BY updated_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Update a project. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                name = COALESCE($3, name),
                description = COALESCE($4, description),
                brief = COALESCE($5, brief),
                brand_kit_id = COALESCE($6, brand_kit_id),
                campaign_id = COALESCE($7, campaign_id),
                aspect_ratio = COALESCE($8, aspect_ratio)
             WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.brief)
            .bind(input.brand_kit_id)
            .bind(input.campaign_id)
            .bind(&input.aspect_ratio)
            .fetch_optional(pool)
            .await
    }

    pub async fn set_strategy(
        pool: &PgPool,
        id: DbId,
        strategy: &serde_json::Value,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET strategy = $2
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(strategy)
            .fetch_optional(pool)
            .await
    }

    /// Move a project to `target`, writing `status` and `current_step`
    /// together.
    ///
    /// The row is only touched while its status is one of `from`, so two
    /// racing transitions cannot both win. Returns `None` when the guard
    /// did not match.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        from: &[ProjectStatus],
        target: ProjectStatus,
    ) -> Result<Option<Project>, sqlx::Error> {
        let allowed: Vec<String> = from.iter().map(|s| s.as_str().to_string()).collect();
        let query = format!(
            "UPDATE projects SET status = $2, current_step = $3
             WHERE id = $1 AND deleted_at IS NULL AND status = ANY($4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(target.as_str())
            .bind(target.step())
            .bind(&allowed)
            .fetch_optional(pool)
            .await
    }

    /// Record the stitched export and finish the workflow in one write.
    pub async fn complete_with_video(
        pool: &PgPool,
        id: DbId,
        final_video_url: &str,
    ) -> Result<Option<Project>, sqlx::Error> {
        let done = ProjectStatus::Completed;
        let query = format!(
            "UPDATE projects SET final_video_url = $2, status = $3, current_step = $4
             WHERE id = $1 AND deleted_at IS NULL AND status = $5
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(final_video_url)
            .bind(done.as_str())
            .bind(done.step())
            .bind(ProjectStatus::PostProduction.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a project. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE projects SET deleted_at = NOW()
             WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count_by_status(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<ProjectStatusCount>, sqlx::Error> {
        sqlx::query_as::<_, ProjectStatusCount>(
            "SELECT status, COUNT(*) AS count FROM projects
             WHERE user_id = $1 AND deleted_at IS NULL
             GROUP BY status
             ORDER BY MIN(current_step), status",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}
