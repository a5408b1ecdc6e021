use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use jira_bridge::config::Config;
use jira_bridge::jira::JiraClient;
use jira_bridge::notify::OutgoingWebhookNotifier;
use jira_bridge::persistence::KeyedStore;
use jira_bridge::server::{AppState, build_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jira_bridge=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::parse();

    let store = KeyedStore::new(&config.data_dir);
    let jira = JiraClient::new(
        jira_bridge::auth::CredentialStore::new(store.clone()),
        config.app_key.clone(),
    );
    let notifier =
        OutgoingWebhookNotifier::new(config.chat_webhook_url.clone(), Some(config.sender.clone()));

    let state = AppState::new(
        store,
        notifier,
        jira,
        config.app_key.clone(),
        config.app_base_url.clone(),
    );
    let app = build_router(state);

    tracing::info!("listening on {}", config.listen_addr);
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .unwrap();
    axum::serve(listener, app).await.unwrap();
}
