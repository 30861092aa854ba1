//! Campaign and ad deployment rules plus performance math.

use serde::Serialize;

use crate::error::CoreError;

pub const PLATFORM_META: &str = "meta";
pub const PLATFORM_GOOGLE: &str = "google";

pub const VALID_PLATFORMS: &[&str] = &[PLATFORM_META, PLATFORM_GOOGLE];

pub const CAMPAIGN_DRAFT: &str = "draft";
pub const CAMPAIGN_ACTIVE: &str = "active";
pub const CAMPAIGN_PAUSED: &str = "paused";
pub const CAMPAIGN_COMPLETED: &str = "completed";

pub const VALID_CAMPAIGN_STATUSES: &[&str] = &[
    CAMPAIGN_DRAFT,
    CAMPAIGN_ACTIVE,
    CAMPAIGN_PAUSED,
    CAMPAIGN_COMPLETED,
];

pub const DEPLOYMENT_PENDING: &str = "pending";
pub const DEPLOYMENT_PUBLISHED: &str = "published";
pub const DEPLOYMENT_FAILED: &str = "failed";

pub const VALID_DEPLOYMENT_STATUSES: &[&str] =
    &[DEPLOYMENT_PENDING, DEPLOYMENT_PUBLISHED, DEPLOYMENT_FAILED];

pub fn validate_platform(platform: &str) -> Result<(), CoreError> {
    if VALID_PLATFORMS.contains(&platform) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid platform '{platform}'. Must be one of: {}",
            VALID_PLATFORMS.join(", ")
        )))
    }
}

pub fn validate_campaign_status(status: &str) -> Result<(), CoreError> {
    if VALID_CAMPAIGN_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid campaign status '{status}'. Must be one of: {}",
            VALID_CAMPAIGN_STATUSES.join(", ")
        )))
    }
}

/// Summed metrics with derived rates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PerformanceTotals {
    pub impressions: i64,
    pub clicks: i64,
    pub conversions: i64,
    pub spend_cents: i64,
    /// Click-through rate as a fraction (clicks / impressions).
    pub ctr: f64,
    /// Cost per click in cents.
    pub cpc_cents: f64,
}

impl PerformanceTotals {
    pub fn new(impressions: i64, clicks: i64, conversions: i64, spend_cents: i64) -> Self {
        let ctr = if impressions > 0 {
            clicks as f64 / impressions as f64
        } else {
            0.0
        };
        let cpc_cents = if clicks > 0 {
            spend_cents as f64 / clicks as f64
        } else {
            0.0
        };
        Self {
            impressions,
            clicks,
            conversions,
            spend_cents,
            ctr,
            cpc_cents,
        }
    }
}
