//! Repository for the `brand_assets` table.

use reelcraft_core::types::DbId;
use sqlx::PgPool;

use crate::models::brand::{BrandAsset, CreateBrandAsset};

const COLUMNS: &str = "id, brand_kit_id, asset_type, filename, content_type, size_bytes, \
    storage_key, url, created_at, updated_at";

pub struct BrandAssetRepo;

impl BrandAssetRepo {
    pub async fn create(pool: &PgPool, input: &CreateBrandAsset) -> Result<BrandAsset, sqlx::Error> {
        let query = format!(
            "INSERT INTO brand_assets
                (brand_kit_id, asset_type, filename, content_type, size_bytes, storage_key, url)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BrandAsset>(&query)
            .bind(input.brand_kit_id)
            .bind(&input.asset_type)
            .bind(&input.filename)
            .bind(&input.content_type)
            .bind(input.size_bytes)
            .bind(&input.storage_key)
            .bind(&input.url)
            .fetch_one(pool)
            .await
    }

    pub async fn list_for_kit(
        pool: &PgPool,
        brand_kit_id: DbId,
    ) -> Result<Vec<BrandAsset>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM brand_assets WHERE brand_kit_id = $1 ORDER BY created_at, id"
        );
        sqlx::query_as::<_, BrandAsset>(&query)
            .bind(brand_kit_id)
            .fetch_all(pool)
            .await
    }

    /// Find an asset whose kit belongs to `user_id`.
    pub async fn find_for_user(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<BrandAsset>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM brand_assets
             WHERE id = $1
               AND brand_kit_id IN (SELECT id FROM brand_kits WHERE user_id = $2)"
        );
        sqlx::query_as::<_, BrandAsset>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM brand_assets WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
