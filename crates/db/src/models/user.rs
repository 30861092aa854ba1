//! User entity model and DTOs.

use reelcraft_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub display_name: Option<String>,
    pub role: String,
    pub daily_budget_cents: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for provisioning a user. Not exposed over HTTP.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub display_name: Option<String>,
    /// Defaults to `member` if omitted.
    pub role: Option<String>,
    pub daily_budget_cents: Option<i32>,
}

/// DTO for a user updating their own profile.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateUser {
    #[validate(length(min = 1, max = 120))]
    pub display_name: Option<String>,
    #[validate(range(min = 0, max = 1_000_000))]
    pub daily_budget_cents: Option<i32>,
}
