//! Repository for the `generations` table.
//!
//! Status writes are compare-and-set: each guards on the status (and for
//! poll failures, the retry count) the caller last observed, so the worker
//! poller and on-demand HTTP polls never double-apply a transition.

use reelcraft_core::generation::{
    KIND_VIDEO, STATUS_COMPLETED, STATUS_FAILED, STATUS_PROCESSING, STATUS_QUEUED,
};
use reelcraft_core::types::DbId;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::generation::{CreateGeneration, Generation, GenerationCount};

const COLUMNS: &str = "id, user_id, project_id, scene_id, batch_id, kind, status, provider, \
    model, prompt, negative_prompt, operation_name, output_url, storage_key, error_message, \
    retry_count, estimated_cost_cents, duration_secs, started_at, completed_at, last_polled_at, \
    created_at, updated_at";

pub struct GenerationRepo;

impl GenerationRepo {
    pub async fn create(pool: &PgPool, input: &CreateGeneration) -> Result<Generation, sqlx::Error> {
        let query = format!(
            "INSERT INTO generations
                (user_id, project_id, scene_id, batch_id, kind, status, provider, model,
                 prompt, negative_prompt, estimated_cost_cents, duration_secs, started_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12,
                     CASE WHEN $6 = '{STATUS_PROCESSING}' THEN NOW() END)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Generation>(&query)
            .bind(input.user_id)
            .bind(input.project_id)
            .bind(input.scene_id)
            .bind(input.batch_id)
            .bind(&input.kind)
            .bind(&input.status)
            .bind(&input.provider)
            .bind(&input.model)
            .bind(&input.prompt)
            .bind(&input.negative_prompt)
            .bind(input.estimated_cost_cents)
            .bind(input.duration_secs)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Generation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM generations WHERE id = $1");
        sqlx::query_as::<_, Generation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_for_user(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Generation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM generations WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, Generation>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List a project's generations, newest first, optionally of one kind.
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
        kind: Option<&str>,
    ) -> Result<Vec<Generation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM generations
             WHERE project_id = $1 AND ($2::TEXT IS NULL OR kind = $2)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Generation>(&query)
            .bind(project_id)
            .bind(kind)
            .fetch_all(pool)
            .await
    }

    /// `queued -> processing` once the provider accepted the job.
    pub async fn mark_processing(
        pool: &PgPool,
        id: DbId,
        operation_name: &str,
    ) -> Result<Option<Generation>, sqlx::Error> {
        let query = format!(
            "UPDATE generations
             SET status = '{STATUS_PROCESSING}', operation_name = $2, started_at = NOW()
             WHERE id = $1 AND status = '{STATUS_QUEUED}'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Generation>(&query)
            .bind(id)
            .bind(operation_name)
            .fetch_optional(pool)
            .await
    }

    /// `processing -> completed` with the stored output.
    pub async fn mark_completed(
        pool: &PgPool,
        id: DbId,
        output_url: &str,
        storage_key: &str,
    ) -> Result<Option<Generation>, sqlx::Error> {
        let query = format!(
            "UPDATE generations
             SET status = '{STATUS_COMPLETED}', output_url = $2, storage_key = $3,
                 error_message = NULL, completed_at = NOW()
             WHERE id = $1 AND status = '{STATUS_PROCESSING}'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Generation>(&query)
            .bind(id)
            .bind(output_url)
            .bind(storage_key)
            .fetch_optional(pool)
            .await
    }

    /// Fail a row that has not reached a terminal status.
    pub async fn mark_failed(
        pool: &PgPool,
        id: DbId,
        error_message: &str,
    ) -> Result<Option<Generation>, sqlx::Error> {
        let query = format!(
            "UPDATE generations
             SET status = '{STATUS_FAILED}', error_message = $2, completed_at = NOW()
             WHERE id = $1 AND status NOT IN ('{STATUS_COMPLETED}', '{STATUS_FAILED}')
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Generation>(&query)
            .bind(id)
            .bind(error_message)
            .fetch_optional(pool)
            .await
    }

    /// Record one polling failure on a processing row.
    ///
    /// Guards on `expected_retry_count` so a concurrent poll that already
    /// recorded this failure makes the call a no-op (`None`). With
    /// `give_up` the row is also moved to `failed`.
    pub async fn record_poll_failure(
        pool: &PgPool,
        id: DbId,
        expected_retry_count: i32,
        new_retry_count: i32,
        error_message: &str,
        give_up: bool,
    ) -> Result<Option<Generation>, sqlx::Error> {
        let query = format!(
            "UPDATE generations
             SET retry_count = $3,
                 error_message = $4,
                 status = CASE WHEN $5 THEN '{STATUS_FAILED}' ELSE status END,
                 completed_at = CASE WHEN $5 THEN NOW() ELSE completed_at END
             WHERE id = $1 AND status = '{STATUS_PROCESSING}' AND retry_count = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Generation>(&query)
            .bind(id)
            .bind(expected_retry_count)
            .bind(new_retry_count)
            .bind(error_message)
            .bind(give_up)
            .fetch_optional(pool)
            .await
    }

    /// Stamp `last_polled_at` on a processing row before it is polled.
    ///
    /// Returns `None` if the row left `processing` in the meantime.
    pub async fn touch_polled(pool: &PgPool, id: DbId) -> Result<Option<Generation>, sqlx::Error> {
        let query = format!(
            "UPDATE generations SET last_polled_at = NOW()
             WHERE id = $1 AND status = '{STATUS_PROCESSING}'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Generation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Processing video rows with a remote operation, never-polled rows
    /// first, then least recently polled.
    pub async fn list_pollable(pool: &PgPool, limit: i64) -> Result<Vec<Generation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM generations
             WHERE status = '{STATUS_PROCESSING}' AND kind = '{KIND_VIDEO}'
               AND operation_name IS NOT NULL
             ORDER BY last_polled_at NULLS FIRST, id
             LIMIT $1"
        );
        sqlx::query_as::<_, Generation>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Statuses of every row in a submission batch.
    pub async fn batch_statuses(pool: &PgPool, batch_id: Uuid) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT status FROM generations WHERE batch_id = $1")
            .bind(batch_id)
            .fetch_all(pool)
            .await
    }

    /// The most recent completed video per scene, in scene order.
    pub async fn latest_completed_videos(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Generation>, sqlx::Error> {
        let cols = COLUMNS
            .split(", ")
            .map(|c| format!("g.{c}"))
            .collect::<Vec<_>>()
            .join(", ");
        let query = format!(
            "SELECT {cols} FROM (
                SELECT DISTINCT ON (g.scene_id) {cols}, s.sort_order AS scene_order
                FROM generations g
                JOIN scenes s ON s.id = g.scene_id
                WHERE g.project_id = $1 AND g.kind = '{KIND_VIDEO}'
                  AND g.status = '{STATUS_COMPLETED}'
                ORDER BY g.scene_id, g.completed_at DESC
             ) g
             ORDER BY g.scene_order, g.scene_id"
        );
        sqlx::query_as::<_, Generation>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    pub async fn count_by_kind_status(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<GenerationCount>, sqlx::Error> {
        sqlx::query_as::<_, GenerationCount>(
            "SELECT kind, status, COUNT(*) AS count FROM generations
             WHERE user_id = $1
             GROUP BY kind, status
             ORDER BY kind, status",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}
