//! Jira webhook ingestion and fan-out.
//!
//! This module handles inbound Jira webhooks end to end:
//! - Typed event definitions (`events`)
//! - Payload parsing keyed on the `webhookEvent` discriminator (`parser`)
//! - Fan-out of one event to every connected room (`router`)
//!
//! Unknown event types are dropped, not errored: Jira expects a 200
//! acknowledgement regardless of whether the bridge cares about the event.

pub mod events;
pub mod parser;
pub mod router;

pub use events::{CommentInfo, IssueSnapshot, JiraEvent};
pub use parser::{ParseError, parse_webhook};
pub use router::{DispatchOutcome, route_event};
