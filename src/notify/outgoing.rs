//! Notification delivery over an outgoing chat webhook.
//!
//! The binary ships one concrete [`Notifier`]: it POSTs each notification to
//! the chat platform's incoming-webhook URL, addressed to the target room by
//! name. Both the URL and the sender identity come from configuration; when
//! either is missing the bridge has nothing to send as, and fan-out
//! short-circuits through `resolve_sender` returning `None`.

use serde_json::json;
use thiserror::Error;

use crate::types::RoomId;

use super::{Notification, Notifier};

/// Errors that can occur delivering over the outgoing webhook.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The HTTP request could not be sent.
    #[error("webhook request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The chat host answered with a non-success status.
    #[error("webhook rejected delivery (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },
}

/// Delivers notifications by POSTing them to a chat webhook URL.
#[derive(Debug, Clone)]
pub struct OutgoingWebhookNotifier {
    http: reqwest::Client,
    url: Option<String>,
    sender: Option<String>,
}

impl OutgoingWebhookNotifier {
    pub fn new(url: Option<String>, sender: Option<String>) -> Self {
        OutgoingWebhookNotifier {
            http: reqwest::Client::new(),
            url,
            sender,
        }
    }
}

/// The JSON body one delivery posts to the webhook.
fn delivery_payload(sender: &str, room: &RoomId, notification: &Notification) -> serde_json::Value {
    json!({
        "channel": room,
        "username": sender,
        "text": notification.text,
        "attachments": notification.attachments,
    })
}

impl Notifier for OutgoingWebhookNotifier {
    type Error = DeliveryError;

    async fn resolve_sender(&self) -> Option<String> {
        // No URL means no way to deliver, regardless of the sender name.
        self.url.as_ref()?;
        self.sender.clone()
    }

    async fn resolve_room(&self, room: &RoomId) -> Option<RoomId> {
        // A plain webhook cannot enumerate rooms; unknown rooms surface as
        // rejected deliveries instead.
        Some(room.clone())
    }

    async fn deliver(
        &self,
        sender: &str,
        room: &RoomId,
        notification: &Notification,
    ) -> Result<(), DeliveryError> {
        let url = self.url.as_deref().unwrap_or_default();
        let response = self
            .http
            .post(url)
            .json(&delivery_payload(sender, room, notification))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeliveryError::Rejected {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }
        Ok(())
    }
}
