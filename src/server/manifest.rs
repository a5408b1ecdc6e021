//! The Atlassian Connect descriptor endpoint.
//!
//! A Jira administrator installs the bridge by pointing their instance at
//! `GET /atlassian-connect.json`. The descriptor declares the install
//! lifecycle callback and the webhook events the bridge subscribes to.

use axum::Json;
use axum::extract::State;

use super::AppState;

/// Jira webhook events the bridge subscribes to.
///
/// All four are routed to the same `/webhook` endpoint; the parser sorts
/// them out by their `webhookEvent` field.
const WEBHOOK_EVENTS: [&str; 4] = [
    "comment_created",
    "comment_updated",
    "jira:issue_created",
    "jira:issue_updated",
];

/// Builds the Connect descriptor for this deployment.
pub fn descriptor(app_key: &str, app_base_url: &str) -> serde_json::Value {
    let webhooks: Vec<serde_json::Value> = WEBHOOK_EVENTS
        .iter()
        .map(|event| serde_json::json!({ "event": event, "url": "/webhook" }))
        .collect();

    serde_json::json!({
        "key": app_key,
        "name": "Chat Bridge for Jira",
        "description": "Delivers Jira issue and comment updates into chat rooms",
        "baseUrl": app_base_url,
        "vendor": {
            "name": "Jira Bridge",
            "url": app_base_url,
        },
        "links": {
            "self": format!("{}/atlassian-connect.json", app_base_url),
        },
        "scopes": ["read", "write"],
        "authentication": {
            "type": "jwt",
        },
        "lifecycle": {
            "installed": "/installed",
        },
        "modules": {
            "webhooks": webhooks,
        },
    })
}

/// Handler for `GET /atlassian-connect.json`.
pub async fn manifest_handler<N, J>(
    State(state): State<AppState<N, J>>,
) -> Json<serde_json::Value> {
    Json(descriptor(state.app_key(), state.app_base_url()))
}
