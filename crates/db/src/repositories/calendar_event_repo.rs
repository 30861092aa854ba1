//! Repository for the `calendar_events` table.

use reelcraft_core::calendar::EVENT_PUBLISH;
use reelcraft_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::calendar::{CalendarEvent, CreateCalendarEvent, UpdateCalendarEvent};

const COLUMNS: &str = "id, user_id, project_id, campaign_id, title, description, event_type, \
    platform, starts_at, ends_at, created_at, updated_at";

pub struct CalendarEventRepo;

impl CalendarEventRepo {
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateCalendarEvent,
    ) -> Result<CalendarEvent, sqlx::Error> {
        let query = format!(
            "INSERT INTO calendar_events
                (user_id, project_id, campaign_id, title, description, event_type, platform,
                 starts_at, ends_at)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, '{EVENT_PUBLISH}'), $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CalendarEvent>(&query)
            .bind(user_id)
            .bind(input.project_id)
            .bind(input.campaign_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.event_type)
            .bind(&input.platform)
            .bind(input.starts_at)
            .bind(input.ends_at)
            .fetch_one(pool)
            .await
    }

    /// Events starting inside the optional `[from, to]` window, by start time.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        from: Option<Timestamp>,
        to: Option<Timestamp>,
    ) -> Result<Vec<CalendarEvent>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM calendar_events
             WHERE user_id = $1
               AND ($2::TIMESTAMPTZ IS NULL OR starts_at >= $2)
               AND ($3::TIMESTAMPTZ IS NULL OR starts_at <= $3)
             ORDER BY starts_at, id"
        );
        sqlx::query_as::<_, CalendarEvent>(&query)
            .bind(user_id)
            .bind(from)
            .bind(to)
            .fetch_all(pool)
            .await
    }

    pub async fn find_for_user(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<CalendarEvent>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM calendar_events WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, CalendarEvent>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        input: &UpdateCalendarEvent,
    ) -> Result<Option<CalendarEvent>, sqlx::Error> {
        let query = format!(
            "UPDATE calendar_events SET
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                event_type = COALESCE($5, event_type),
                platform = COALESCE($6, platform),
                project_id = COALESCE($7, project_id),
                campaign_id = COALESCE($8, campaign_id),
                starts_at = COALESCE($9, starts_at),
                ends_at = COALESCE($10, ends_at)
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CalendarEvent>(&query)
            .bind(id)
            .bind(user_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.event_type)
            .bind(&input.platform)
            .bind(input.project_id)
            .bind(input.campaign_id)
            .bind(input.starts_at)
            .bind(input.ends_at)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM calendar_events WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
