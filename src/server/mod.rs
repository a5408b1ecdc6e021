//! HTTP server for the Jira bridge.
//!
//! This module implements the HTTP surface Jira and the chat host talk to:
//! - Serves the Atlassian Connect descriptor so a Jira instance can install
//!   the bridge
//! - Accepts the install lifecycle callback and stores the credential
//! - Accepts issue/comment webhooks and fans them out to connected rooms
//! - Runs `/jira` slash commands relayed by the chat host
//! - Provides a health check for liveness probes
//!
//! # Endpoints
//!
//! - `GET /atlassian-connect.json` - The Connect descriptor
//! - `POST /installed` - Install lifecycle callback (returns 204)
//! - `POST /webhook` - Jira webhook deliveries (always returns 200)
//! - `POST /command` - Slash-command execution for a room
//! - `GET /health` - Returns 200 if the server is running

use std::sync::Arc;

pub mod command;
pub mod health;
pub mod install;
pub mod manifest;
pub mod webhook;

pub use command::command_handler;
pub use health::health_handler;
pub use install::install_handler;
pub use manifest::manifest_handler;
pub use webhook::webhook_handler;

use crate::auth::CredentialStore;
use crate::jira::JiraApi;
use crate::notify::Notifier;
use crate::persistence::KeyedStore;
use crate::registry::ConnectionRegistry;

/// Shared application state.
///
/// Passed to all handlers via Axum's `State` extractor. Generic over the
/// notifier and the Jira API so tests can substitute recording fakes for
/// both seams.
pub struct AppState<N, J> {
    inner: Arc<AppStateInner<N, J>>,
}

struct AppStateInner<N, J> {
    /// Holds the single active installation credential.
    credentials: CredentialStore,

    /// Room-to-project connection records.
    registry: ConnectionRegistry,

    /// Delivery seam toward the chat host.
    notifier: N,

    /// Signed Jira REST access.
    jira: J,

    /// The Connect app key (descriptor `key`, JWT issuer).
    app_key: String,

    /// Public base URL of this service.
    app_base_url: String,

    /// Serializes slash-command execution.
    ///
    /// Registry mutations are read-modify-write with last-writer-wins; this
    /// lock keeps concurrent commands from losing each other's writes.
    command_lock: tokio::sync::Mutex<()>,
}

impl<N, J> Clone for AppState<N, J> {
    fn clone(&self) -> Self {
        AppState {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<N, J> AppState<N, J> {
    /// Creates a new `AppState` over one data directory.
    pub fn new(
        store: KeyedStore,
        notifier: N,
        jira: J,
        app_key: impl Into<String>,
        app_base_url: impl Into<String>,
    ) -> Self {
        AppState {
            inner: Arc::new(AppStateInner {
                credentials: CredentialStore::new(store.clone()),
                registry: ConnectionRegistry::new(store),
                notifier,
                jira,
                app_key: app_key.into(),
                app_base_url: app_base_url.into(),
                command_lock: tokio::sync::Mutex::new(()),
            }),
        }
    }

    /// Returns the credential store.
    pub fn credentials(&self) -> &CredentialStore {
        &self.inner.credentials
    }

    /// Returns the connection registry.
    pub fn registry(&self) -> &ConnectionRegistry {
        &self.inner.registry
    }

    /// Returns the notifier.
    pub fn notifier(&self) -> &N {
        &self.inner.notifier
    }

    /// Returns the Jira API client.
    pub fn jira(&self) -> &J {
        &self.inner.jira
    }

    /// Returns the Connect app key.
    pub fn app_key(&self) -> &str {
        &self.inner.app_key
    }

    /// Returns this service's public base URL.
    pub fn app_base_url(&self) -> &str {
        &self.inner.app_base_url
    }

    pub(crate) fn command_lock(&self) -> &tokio::sync::Mutex<()> {
        &self.inner.command_lock
    }
}

/// Builds the axum Router with all endpoints.
pub fn build_router<N, J>(app_state: AppState<N, J>) -> axum::Router
where
    N: Notifier + Send + Sync + 'static,
    J: JiraApi + Send + Sync + 'static,
{
    use axum::routing::{get, post};

    axum::Router::new()
        .route("/atlassian-connect.json", get(manifest_handler::<N, J>))
        .route("/installed", post(install_handler::<N, J>))
        .route("/webhook", post(webhook_handler::<N, J>))
        .route("/command", post(command_handler::<N, J>))
        .route("/health", get(health_handler))
        .with_state(app_state)
}
