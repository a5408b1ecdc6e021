//! Notification types and the delivery seam toward the chat host.
//!
//! The bridge core builds [`Notification`] values; the embedding chat
//! platform implements [`Notifier`] to resolve rooms and actually send
//! messages. Keeping delivery behind a trait keeps the router pure enough to
//! test with a recording mock.

pub mod format;
pub mod outgoing;

use std::fmt;
use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::types::RoomId;

pub use format::{issue_card, notification_for_event, project_card, url_origin};
pub use outgoing::OutgoingWebhookNotifier;

/// One chat message: a text line plus optional rich attachments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// The message text, in chat markdown.
    pub text: String,

    /// Rich attachments rendered under the text.
    #[serde(default)]
    pub attachments: Vec<MessageAttachment>,
}

impl Notification {
    pub fn text_only(text: impl Into<String>) -> Self {
        Notification {
            text: text.into(),
            attachments: Vec::new(),
        }
    }

    pub fn with_attachment(text: impl Into<String>, attachment: MessageAttachment) -> Self {
        Notification {
            text: text.into(),
            attachments: vec![attachment],
        }
    }
}

/// A rich message attachment in the chat host's shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageAttachment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<AttachmentTitle>,

    /// Attachment body text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Short labeled fields rendered in columns.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<AttachmentField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentTitle {
    pub value: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentField {
    pub title: String,
    pub value: String,
    pub short: bool,
}

impl AttachmentField {
    pub fn short(title: impl Into<String>, value: impl Into<String>) -> Self {
        AttachmentField {
            title: title.into(),
            value: value.into(),
            short: true,
        }
    }
}

/// Message delivery toward the chat host.
///
/// The router resolves a sender once per event, resolves each target room,
/// and delivers one notification per room. A mock implementation that records
/// deliveries is enough for testing the fan-out.
pub trait Notifier {
    /// The error type returned by failed deliveries.
    type Error: fmt::Display;

    /// Resolves the identity notifications are sent as.
    ///
    /// `None` means the host has no sender configured for the bridge;
    /// dispatch short-circuits with success because there is nothing to
    /// send messages as.
    fn resolve_sender(&self) -> impl Future<Output = Option<String>> + Send;

    /// Resolves a room id to a deliverable room.
    ///
    /// `None` when the room no longer exists on the chat host.
    fn resolve_room(&self, room: &RoomId) -> impl Future<Output = Option<RoomId>> + Send;

    /// Delivers one notification to one room as `sender`.
    fn deliver(
        &self,
        sender: &str,
        room: &RoomId,
        notification: &Notification,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;
}
