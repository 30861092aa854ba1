//! Brand kit and brand asset models and DTOs.

use reelcraft_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `brand_kits` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BrandKit {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub accent_color: Option<String>,
    pub font_family: Option<String>,
    pub logo_url: Option<String>,
    pub watermark_url: Option<String>,
    /// Object key of the watermark image, used when stitching.
    #[serde(skip_serializing)]
    pub watermark_key: Option<String>,
    pub watermark_position: String,
    pub watermark_opacity: f64,
    pub is_default: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBrandKit {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub accent_color: Option<String>,
    pub font_family: Option<String>,
    pub logo_url: Option<String>,
    pub watermark_position: Option<String>,
    pub watermark_opacity: Option<f64>,
    pub is_default: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateBrandKit {
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub accent_color: Option<String>,
    pub font_family: Option<String>,
    pub logo_url: Option<String>,
    pub watermark_position: Option<String>,
    pub watermark_opacity: Option<f64>,
    pub is_default: Option<bool>,
}

/// A row from the `brand_assets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BrandAsset {
    pub id: DbId,
    pub brand_kit_id: DbId,
    pub asset_type: String,
    pub filename: String,
    pub content_type: String,
    pub size_bytes: i64,
    #[serde(skip_serializing)]
    pub storage_key: String,
    pub url: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert DTO, built by the upload handler after the object is stored.
#[derive(Debug, Clone)]
pub struct CreateBrandAsset {
    pub brand_kit_id: DbId,
    pub asset_type: String,
    pub filename: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub storage_key: String,
    pub url: String,
}
