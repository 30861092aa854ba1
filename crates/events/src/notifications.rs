//! Turns user-facing platform events into notification rows.
//!
//! [`NotificationWriter`] subscribes to the bus and inserts one
//! `notifications` row per recognised event that names an owner. Events
//! without an actor, or of a type nobody is notified about, are skipped.

use reelcraft_db::models::notification::CreateNotification;
use reelcraft_db::repositories::NotificationRepo;
use reelcraft_db::DbPool;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::bus::PlatformEvent;
use crate::{DEPLOYMENT_PUBLISHED, GENERATION_COMPLETED, GENERATION_FAILED, PROJECT_COMPLETED};

pub struct NotificationWriter;

impl NotificationWriter {
    /// Run until the bus closes or `cancel` fires.
    pub async fn run(
        pool: DbPool,
        mut receiver: broadcast::Receiver<PlatformEvent>,
        cancel: CancellationToken,
    ) {
        loop {
            let received = tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Notification writer cancelled");
                    break;
                }
                received = receiver.recv() => received,
            };

            match received {
                Ok(event) => {
                    let Some(input) = notification_for(&event) else {
                        continue;
                    };
                    if let Err(e) = NotificationRepo::create(&pool, &input).await {
                        tracing::error!(
                            error = %e,
                            event_type = %event.event_type,
                            "Failed to write notification"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Notification writer lagged, events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, notification writer shutting down");
                    break;
                }
            }
        }
    }
}

/// Build the notification for an event, or `None` if it is not user-facing.
pub fn notification_for(event: &PlatformEvent) -> Option<CreateNotification> {
    let user_id = event.actor_user_id?;

    let (title, body) = match event.event_type.as_str() {
        GENERATION_COMPLETED => {
            let kind = event.payload_str("kind").unwrap_or("generation");
            (format!("Your {kind} is ready"), None)
        }
        GENERATION_FAILED => {
            let kind = event.payload_str("kind").unwrap_or("generation");
            (
                format!("Your {kind} failed"),
                event.payload_str("error").map(str::to_string),
            )
        }
        PROJECT_COMPLETED => {
            let name = event.payload_str("project_name").unwrap_or("Your project");
            (
                format!("{name} is complete"),
                event.payload_str("final_video_url").map(str::to_string),
            )
        }
        DEPLOYMENT_PUBLISHED => {
            let platform = event.payload_str("platform").unwrap_or("ad platform");
            (format!("Ad published to {platform}"), None)
        }
        _ => return None,
    };

    Some(CreateNotification {
        user_id,
        event_type: event.event_type.clone(),
        title,
        body,
        entity_type: event.source_entity_type.clone(),
        entity_id: event.source_entity_id,
    })
}
