//! Webhook fan-out routing.
//!
//! One inbound Jira event becomes at most one notification, delivered to
//! every room whose connection record contains the event's project. The
//! batch never aborts: per-room failures are logged, recorded in the
//! returned outcomes, and the remaining rooms still get their delivery.

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::notify::{Notifier, notification_for_event};
use crate::registry::{ConnectionRegistry, Result};
use crate::types::RoomId;

use super::events::JiraEvent;

/// Per-room outcome of one fan-out, for observability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DispatchOutcome {
    /// The notification reached the room.
    Delivered { room: RoomId },

    /// The room no longer exists on the chat host.
    RoomMissing { room: RoomId },

    /// The chat host rejected the delivery.
    DeliveryFailed { room: RoomId, message: String },
}

impl DispatchOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, DispatchOutcome::Delivered { .. })
    }
}

/// Fans one parsed event out to every connected room.
///
/// Short-circuits with success when no rooms are connected at all or when
/// the notifier has no sender identity; both cases leave nothing to do.
/// Rooms not connected to the event's project are filtered out silently and
/// do not appear in the outcomes.
///
/// # Errors
///
/// Returns an error only if the connection registry cannot be read. Per-room
/// resolution and delivery failures are contained in the outcome list.
pub async fn route_event<N: Notifier>(
    event: &JiraEvent,
    registry: &ConnectionRegistry,
    notifier: &N,
) -> Result<Vec<DispatchOutcome>> {
    let records = registry.get_connections(None)?;
    if records.is_empty() {
        info!(
            event = event.kind(),
            "webhook received, but no rooms are connected"
        );
        return Ok(Vec::new());
    }

    let Some(sender) = notifier.resolve_sender().await else {
        error!("no sender configured for the bridge");
        return Ok(Vec::new());
    };

    let notification = notification_for_event(event);
    let project_key = event.project_key();

    let mut outcomes = Vec::new();
    for record in records {
        if !record.contains_project(project_key) {
            continue;
        }

        let Some(room) = notifier.resolve_room(&record.room_id).await else {
            warn!(room = %record.room_id, "room no longer exists, skipping");
            outcomes.push(DispatchOutcome::RoomMissing {
                room: record.room_id,
            });
            continue;
        };

        match notifier.deliver(&sender, &room, &notification).await {
            Ok(()) => {
                debug!(room = %room, event = event.kind(), "notification delivered");
                outcomes.push(DispatchOutcome::Delivered { room });
            }
            Err(e) => {
                warn!(room = %room, error = %e, "delivery failed, skipping room");
                outcomes.push(DispatchOutcome::DeliveryFailed {
                    room,
                    message: e.to_string(),
                });
            }
        }
    }

    Ok(outcomes)
}
