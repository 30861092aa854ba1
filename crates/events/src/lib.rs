//! Reelcraft event bus and notification infrastructure.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`PlatformEvent`]: the domain event envelope.
//! - [`NotificationWriter`]: background service that turns user-facing
//!   events into `notifications` rows.

pub mod bus;
pub mod notifications;

pub use bus::{EventBus, PlatformEvent};
pub use notifications::NotificationWriter;

// Event type names.
pub const GENERATION_COMPLETED: &str = "generation.completed";
pub const GENERATION_FAILED: &str = "generation.failed";
pub const PROJECT_COMPLETED: &str = "project.completed";
pub const DEPLOYMENT_PUBLISHED: &str = "deployment.published";
