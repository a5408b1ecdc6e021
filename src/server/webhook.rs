//! The Jira webhook endpoint.
//!
//! Jira retries deliveries that fail with an error status, and a tenant we
//! cannot parse is not a tenant we want redelivering forever. So this
//! endpoint acknowledges everything with 200: malformed bodies and unknown
//! events are logged and dropped, and per-room delivery failures never leak
//! back into the response.

use axum::extract::State;
use axum::http::StatusCode;
use tracing::{debug, error, info, warn};

use super::AppState;
use crate::jira::JiraApi;
use crate::notify::Notifier;
use crate::webhooks::{DispatchOutcome, parse_webhook, route_event};

/// Handler for `POST /webhook`.
pub async fn webhook_handler<N, J>(
    State(state): State<AppState<N, J>>,
    body: axum::body::Bytes,
) -> (StatusCode, &'static str)
where
    N: Notifier + Send + Sync,
    J: JiraApi + Send + Sync,
{
    let event = match parse_webhook(&body) {
        Ok(Some(event)) => event,
        Ok(None) => {
            debug!("ignoring webhook for unsubscribed event");
            return (StatusCode::OK, "ignored");
        }
        Err(e) => {
            warn!(error = %e, "ignoring malformed webhook payload");
            return (StatusCode::OK, "ignored");
        }
    };

    info!(
        kind = event.kind(),
        project = %event.project_key(),
        "dispatching webhook event"
    );

    match route_event(&event, state.registry(), state.notifier()).await {
        Ok(outcomes) => {
            for outcome in &outcomes {
                match outcome {
                    DispatchOutcome::Delivered { room } => {
                        debug!(%room, "notification delivered");
                    }
                    DispatchOutcome::RoomMissing { room } => {
                        warn!(%room, "skipping connected room the chat host does not know");
                    }
                    DispatchOutcome::DeliveryFailed { room, message } => {
                        error!(%room, error = %message, "notification delivery failed");
                    }
                }
            }
        }
        Err(e) => {
            error!(error = %e, "failed to read connection registry");
        }
    }

    (StatusCode::OK, "accepted")
}
