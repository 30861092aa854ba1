//! Ad platform publishing and performance sync.
//!
//! Real Meta and Google Ads integrations are not wired up yet; both
//! platforms are served by stubs that mint external ids and simulate
//! plausible daily metrics.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rand::Rng;
use reelcraft_core::ads::{validate_platform, DEPLOYMENT_PUBLISHED, PLATFORM_GOOGLE, PLATFORM_META};
use reelcraft_core::error::CoreError;
use reelcraft_core::types::DbId;
use reelcraft_db::models::campaign::{
    AdDeployment, Campaign, CreateAdDeployment, PerformanceDay, PerformanceMetrics,
};
use reelcraft_db::repositories::{AdDeploymentRepo, CampaignRepo, PerformanceRepo};
use reelcraft_events::{PlatformEvent, DEPLOYMENT_PUBLISHED as DEPLOYMENT_PUBLISHED_EVENT};

use crate::context::PipelineContext;
use crate::creative::load_project;
use crate::error::{PipelineError, PipelineResult};

/// What the platform handed back after creating the ad.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedAd {
    pub external_campaign_id: String,
    pub external_ad_id: String,
}

/// Creative details sent to a platform.
#[derive(Debug, Clone)]
pub struct AdCreative<'a> {
    pub campaign_name: &'a str,
    pub headline: &'a str,
    pub video_url: &'a str,
    pub daily_budget_cents: Option<i64>,
}

#[async_trait]
pub trait AdPublisher: Send + Sync {
    fn platform(&self) -> &'static str;

    async fn publish(&self, creative: &AdCreative<'_>) -> Result<PublishedAd, String>;

    async fn fetch_daily_metrics(
        &self,
        external_ad_id: &str,
        date: NaiveDate,
        daily_budget_cents: Option<i64>,
    ) -> Result<PerformanceMetrics, String>;
}

/// Simulate one day of delivery for an ad.
///
/// Impressions land in 500..=20000, click-through in 0.5%..3%, conversion
/// in 2%..10% of clicks, and spend follows a CPM of $3..$12 capped at the
/// daily budget.
pub fn simulate_metrics<R: Rng + ?Sized>(
    rng: &mut R,
    daily_budget_cents: Option<i64>,
) -> PerformanceMetrics {
    let impressions: i64 = rng.random_range(500..=20_000);
    let ctr: f64 = rng.random_range(0.005..=0.03);
    let clicks = (impressions as f64 * ctr).round() as i64;
    let conversion_rate: f64 = rng.random_range(0.02..=0.10);
    let conversions = (clicks as f64 * conversion_rate).round() as i64;
    let cpm_cents: i64 = rng.random_range(300..=1_200);
    let mut spend_cents = impressions * cpm_cents / 1_000;
    if let Some(budget) = daily_budget_cents {
        spend_cents = spend_cents.min(budget.max(0));
    }
    PerformanceMetrics {
        impressions,
        clicks,
        conversions,
        spend_cents,
    }
}

fn stub_id(prefix: &str) -> String {
    let n: u64 = rand::rng().random_range(10_000_000_000..100_000_000_000);
    format!("{prefix}{n}")
}

/// Stand-in for the Meta Marketing API.
pub struct MetaAdsStub;

#[async_trait]
impl AdPublisher for MetaAdsStub {
    fn platform(&self) -> &'static str {
        PLATFORM_META
    }

    async fn publish(&self, creative: &AdCreative<'_>) -> Result<PublishedAd, String> {
        tracing::info!(
            platform = PLATFORM_META,
            campaign = creative.campaign_name,
            "Publishing ad (stub)"
        );
        Ok(PublishedAd {
            external_campaign_id: stub_id("act_"),
            external_ad_id: stub_id(""),
        })
    }

    async fn fetch_daily_metrics(
        &self,
        _external_ad_id: &str,
        _date: NaiveDate,
        daily_budget_cents: Option<i64>,
    ) -> Result<PerformanceMetrics, String> {
        Ok(simulate_metrics(&mut rand::rng(), daily_budget_cents))
    }
}

/// Stand-in for the Google Ads API.
pub struct GoogleAdsStub;

#[async_trait]
impl AdPublisher for GoogleAdsStub {
    fn platform(&self) -> &'static str {
        PLATFORM_GOOGLE
    }

    async fn publish(&self, creative: &AdCreative<'_>) -> Result<PublishedAd, String> {
        tracing::info!(
            platform = PLATFORM_GOOGLE,
            campaign = creative.campaign_name,
            "Publishing ad (stub)"
        );
        Ok(PublishedAd {
            external_campaign_id: stub_id("customers/campaigns/"),
            external_ad_id: stub_id("adGroupAds/"),
        })
    }

    async fn fetch_daily_metrics(
        &self,
        _external_ad_id: &str,
        _date: NaiveDate,
        daily_budget_cents: Option<i64>,
    ) -> Result<PerformanceMetrics, String> {
        Ok(simulate_metrics(&mut rand::rng(), daily_budget_cents))
    }
}

/// Publishers keyed by platform name.
#[derive(Default)]
pub struct AdPublishers {
    by_platform: HashMap<&'static str, Arc<dyn AdPublisher>>,
}

impl AdPublishers {
    /// Stub publishers for every supported platform.
    pub fn stubs() -> Self {
        Self::default()
            .with(Arc::new(MetaAdsStub))
            .with(Arc::new(GoogleAdsStub))
    }

    pub fn with(mut self, publisher: Arc<dyn AdPublisher>) -> Self {
        self.by_platform.insert(publisher.platform(), publisher);
        self
    }

    pub fn get(&self, platform: &str) -> Result<Arc<dyn AdPublisher>, CoreError> {
        self.by_platform.get(platform).cloned().ok_or_else(|| {
            CoreError::Validation(format!("No publisher configured for platform '{platform}'"))
        })
    }
}

async fn load_campaign(
    ctx: &PipelineContext,
    campaign_id: DbId,
    user_id: DbId,
) -> PipelineResult<Campaign> {
    CampaignRepo::find_for_user(&ctx.pool, campaign_id, user_id)
        .await?
        .ok_or_else(|| PipelineError::not_found("Campaign", campaign_id))
}

/// Publish a completed project's final video to an ad platform.
///
/// The deployment row is written `pending` first so a publisher failure
/// still leaves a `failed` record with the error.
pub async fn publish_deployment(
    ctx: &PipelineContext,
    user_id: DbId,
    campaign_id: DbId,
    input: &CreateAdDeployment,
) -> PipelineResult<AdDeployment> {
    validate_platform(&input.platform)?;
    if input.daily_budget_cents.is_some_and(|b| b < 0) {
        return Err(PipelineError::Core(CoreError::Validation(
            "daily_budget_cents must not be negative".to_string(),
        )));
    }

    let campaign = load_campaign(ctx, campaign_id, user_id).await?;
    let project = load_project(ctx, input.project_id, user_id).await?;
    let video_url = project
        .final_video_url
        .clone()
        .ok_or_else(|| PipelineError::conflict("Project has no final video to publish"))?;
    let publisher = ctx.publishers.get(&input.platform)?;

    let deployment = AdDeploymentRepo::create(
        &ctx.pool,
        campaign.id,
        project.id,
        &input.platform,
        &video_url,
        input.daily_budget_cents,
    )
    .await?;

    let creative = AdCreative {
        campaign_name: &campaign.name,
        headline: &project.name,
        video_url: &video_url,
        daily_budget_cents: input.daily_budget_cents,
    };
    let outcome = match publisher.publish(&creative).await {
        Ok(ad) => {
            let published = AdDeploymentRepo::mark_published(
                &ctx.pool,
                deployment.id,
                &ad.external_campaign_id,
                &ad.external_ad_id,
            )
            .await?;
            tracing::info!(
                deployment_id = deployment.id,
                platform = %input.platform,
                external_ad_id = %ad.external_ad_id,
                "Ad published"
            );
            ctx.publish(
                PlatformEvent::new(DEPLOYMENT_PUBLISHED_EVENT)
                    .with_source("ad_deployment", deployment.id)
                    .with_actor(user_id)
                    .with_payload(serde_json::json!({
                        "platform": input.platform,
                        "campaign_id": campaign.id,
                        "project_id": project.id,
                    })),
            );
            published
        }
        Err(message) => {
            tracing::warn!(
                deployment_id = deployment.id,
                platform = %input.platform,
                error = %message,
                "Ad publish failed"
            );
            AdDeploymentRepo::mark_failed(&ctx.pool, deployment.id, &message).await?
        }
    };

    outcome.ok_or_else(|| PipelineError::not_found("AdDeployment", deployment.id))
}

/// Pull today's metrics for a published deployment and upsert them.
pub async fn sync_performance(
    ctx: &PipelineContext,
    user_id: DbId,
    deployment_id: DbId,
) -> PipelineResult<PerformanceDay> {
    let deployment = AdDeploymentRepo::find_for_user(&ctx.pool, deployment_id, user_id)
        .await?
        .ok_or_else(|| PipelineError::not_found("AdDeployment", deployment_id))?;
    if deployment.status != DEPLOYMENT_PUBLISHED {
        return Err(PipelineError::conflict(format!(
            "Deployment is {}, only published deployments report metrics",
            deployment.status
        )));
    }
    let external_ad_id = deployment.external_ad_id.as_deref().unwrap_or_default();

    let publisher = ctx.publishers.get(&deployment.platform)?;
    let today = Utc::now().date_naive();
    let metrics = publisher
        .fetch_daily_metrics(external_ad_id, today, deployment.daily_budget_cents)
        .await
        .map_err(|e| PipelineError::Core(CoreError::Internal(format!("Metrics fetch failed: {e}"))))?;

    let row = PerformanceRepo::upsert_day(&ctx.pool, deployment.id, today, &metrics).await?;
    tracing::debug!(deployment_id, %today, impressions = metrics.impressions, "Performance synced");
    Ok(row)
}
