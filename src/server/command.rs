//! The slash-command endpoint.
//!
//! The chat host relays `/jira ...` invocations here as JSON and posts the
//! returned notification back into the room as the bot's reply. Commands
//! run one at a time under a lock: connect and disconnect rewrite a room's
//! whole connection record, and concurrent rewrites would silently drop
//! each other's projects.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use super::AppState;
use crate::commands::{CommandError, run_command};
use crate::jira::JiraApi;
use crate::notify::{Notification, Notifier};
use crate::types::RoomId;

/// A relayed slash-command invocation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandRequest {
    /// The room the command was typed in.
    pub room_id: RoomId,

    /// Everything after `/jira `.
    pub text: String,
}

#[derive(Debug, Error)]
pub enum CommandEndpointError {
    #[error("malformed command request: {0}")]
    MalformedRequest(#[from] serde_json::Error),

    #[error(transparent)]
    Command(#[from] CommandError),
}

impl IntoResponse for CommandEndpointError {
    fn into_response(self) -> Response {
        let status = match &self {
            CommandEndpointError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            CommandEndpointError::Command(CommandError::Registry(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            CommandEndpointError::Command(CommandError::Jira(_)) => StatusCode::BAD_GATEWAY,
        };
        warn!(error = %self, "command execution failed");
        (status, self.to_string()).into_response()
    }
}

/// Handler for `POST /command`.
pub async fn command_handler<N, J>(
    State(state): State<AppState<N, J>>,
    body: axum::body::Bytes,
) -> Result<Json<Notification>, CommandEndpointError>
where
    N: Notifier + Send + Sync,
    J: JiraApi + Send + Sync,
{
    let request: CommandRequest = serde_json::from_slice(&body)?;

    info!(room = %request.room_id, text = %request.text, "running command");

    let _guard = state.command_lock().lock().await;
    let reply = run_command(
        state.registry(),
        state.jira(),
        &request.room_id,
        &request.text,
        state.app_base_url(),
    )
    .await?;

    Ok(Json(reply))
}
