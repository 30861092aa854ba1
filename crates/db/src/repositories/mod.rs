//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Methods that take a
//! `user_id` scope their query to rows that user owns and return `None`
//! for rows owned by someone else.

pub mod ad_deployment_repo;
pub mod api_key_repo;
pub mod brand_asset_repo;
pub mod brand_kit_repo;
pub mod calendar_event_repo;
pub mod campaign_repo;
pub mod generation_repo;
pub mod notification_repo;
pub mod performance_repo;
pub mod project_repo;
pub mod scene_repo;
pub mod template_repo;
pub mod usage_repo;
pub mod user_repo;

pub use ad_deployment_repo::AdDeploymentRepo;
pub use api_key_repo::ApiKeyRepo;
pub use brand_asset_repo::BrandAssetRepo;
pub use brand_kit_repo::BrandKitRepo;
pub use calendar_event_repo::CalendarEventRepo;
pub use campaign_repo::CampaignRepo;
pub use generation_repo::GenerationRepo;
pub use notification_repo::NotificationRepo;
pub use performance_repo::PerformanceRepo;
pub use project_repo::ProjectRepo;
pub use scene_repo::SceneRepo;
pub use template_repo::TemplateRepo;
pub use usage_repo::UsageRepo;
pub use user_repo::UserRepo;
