//! The install lifecycle callback.
//!
//! When a Jira administrator installs the app, Jira POSTs the installation
//! payload here. The shared secret in that payload is what every later
//! request to the Jira REST API is signed with, so losing it means the
//! bridge is dead until a reinstall.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{info, warn};

use super::AppState;
use crate::auth::{Credential, CredentialError};

#[derive(Debug, Error)]
pub enum InstallError {
    #[error("malformed installation payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    #[error("failed to store credential: {0}")]
    Store(#[from] CredentialError),
}

impl IntoResponse for InstallError {
    fn into_response(self) -> Response {
        let status = match &self {
            InstallError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            InstallError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        warn!(error = %self, "install callback failed");
        (status, self.to_string()).into_response()
    }
}

/// Handler for `POST /installed`.
///
/// Stores the credential from the payload, replacing any previous
/// installation. Returns 204 so Jira marks the install as successful.
pub async fn install_handler<N, J>(
    State(state): State<AppState<N, J>>,
    body: axum::body::Bytes,
) -> Result<StatusCode, InstallError> {
    let credential: Credential = serde_json::from_slice(&body)?;

    info!(
        client_key = %credential.client_key,
        base_url = %credential.base_url,
        "storing installation credential"
    );
    state.credentials().set(&credential)?;

    Ok(StatusCode::NO_CONTENT)
}
