//! Repository for the `brand_kits` table.
//!
//! A user has at most one default kit. Writes that set `is_default` clear
//! the flag on the user's other kits in the same transaction.

use reelcraft_core::brand::{DEFAULT_WATERMARK_OPACITY, DEFAULT_WATERMARK_POSITION};
use reelcraft_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::brand::{BrandKit, CreateBrandKit, UpdateBrandKit};

const COLUMNS: &str = "id, user_id, name, primary_color, secondary_color, accent_color, \
    font_family, logo_url, watermark_url, watermark_key, watermark_position, watermark_opacity, \
    is_default, created_at, updated_at";

pub struct BrandKitRepo;

impl BrandKitRepo {
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateBrandKit,
    ) -> Result<BrandKit, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let is_default = input.is_default.unwrap_or(false);
        if is_default {
            clear_default(&mut tx, user_id, None).await?;
        }

        let query = format!(
            "INSERT INTO brand_kits
                (user_id, name, primary_color, secondary_color, accent_color, font_family,
                 logo_url, watermark_position, watermark_opacity, is_default)
             VALUES ($1, $2, $3, $4, $5, $6, $7, COALESCE($8, '{DEFAULT_WATERMARK_POSITION}'),
                     COALESCE($9, {DEFAULT_WATERMARK_OPACITY}), $10)
             RETURNING {COLUMNS}"
        );
        let kit = sqlx::query_as::<_, BrandKit>(&query)
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.primary_color)
            .bind(&input.secondary_color)
            .bind(&input.accent_color)
            .bind(&input.font_family)
            .bind(&input.logo_url)
            .bind(&input.watermark_position)
            .bind(input.watermark_opacity)
            .bind(is_default)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(kit)
    }

    pub async fn find_for_user(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<BrandKit>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM brand_kits WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, BrandKit>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<BrandKit>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM brand_kits WHERE id = $1");
        sqlx::query_as::<_, BrandKit>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_default(pool: &PgPool, user_id: DbId) -> Result<Option<BrandKit>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM brand_kits WHERE user_id = $1 AND is_default");
        sqlx::query_as::<_, BrandKit>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Default kit first, then by name.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<BrandKit>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM brand_kits WHERE user_id = $1
             ORDER BY is_default DESC, name, id"
        );
        sqlx::query_as::<_, BrandKit>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        input: &UpdateBrandKit,
    ) -> Result<Option<BrandKit>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        if input.is_default == Some(true) {
            clear_default(&mut tx, user_id, Some(id)).await?;
        }

        let query = format!(
            "UPDATE brand_kits SET
                name = COALESCE($3, name),
                primary_color = COALESCE($4, primary_color),
                secondary_color = COALESCE($5, secondary_color),
                accent_color = COALESCE($6, accent_color),
                font_family = COALESCE($7, font_family),
                logo_url = COALESCE($8, logo_url),
                watermark_position = COALESCE($9, watermark_position),
                watermark_opacity = COALESCE($10, watermark_opacity),
                is_default = COALESCE($11, is_default)
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        let kit = sqlx::query_as::<_, BrandKit>(&query)
            .bind(id)
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.primary_color)
            .bind(&input.secondary_color)
            .bind(&input.accent_color)
            .bind(&input.font_family)
            .bind(&input.logo_url)
            .bind(&input.watermark_position)
            .bind(input.watermark_opacity)
            .bind(input.is_default)
            .fetch_optional(&mut *tx)
            .await?;

        // Unknown or foreign kit: keep the caller's current default.
        if kit.is_none() {
            tx.rollback().await?;
            return Ok(None);
        }
        tx.commit().await?;
        Ok(kit)
    }

    /// Point the kit's watermark at an uploaded object.
    pub async fn set_watermark(
        pool: &PgPool,
        id: DbId,
        url: &str,
        storage_key: &str,
    ) -> Result<Option<BrandKit>, sqlx::Error> {
        let query = format!(
            "UPDATE brand_kits SET watermark_url = $2, watermark_key = $3
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BrandKit>(&query)
            .bind(id)
            .bind(url)
            .bind(storage_key)
            .fetch_optional(pool)
            .await
    }

    pub async fn set_logo(pool: &PgPool, id: DbId, url: &str) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE brand_kits SET logo_url = $2 WHERE id = $1")
            .bind(id)
            .bind(url)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn delete(pool: &PgPool, id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM brand_kits WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

async fn clear_default(
    tx: &mut Transaction<'_, Postgres>,
    user_id: DbId,
    except: Option<DbId>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE brand_kits SET is_default = false
         WHERE user_id = $1 AND is_default AND ($2::BIGINT IS NULL OR id <> $2)",
    )
    .bind(user_id)
    .bind(except)
    .execute(&mut **tx)
    .await?;
    Ok(())
}
