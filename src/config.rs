//! Runtime configuration.
//!
//! All settings come from command-line flags or the matching environment
//! variables; there is no configuration file.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

/// Configuration for the Jira bridge service.
#[derive(Debug, Clone, Parser)]
#[command(name = "jira-bridge")]
pub struct Config {
    /// Address the HTTP server listens on.
    #[arg(long, env = "JIRA_BRIDGE_LISTEN_ADDR", default_value = "0.0.0.0:3000")]
    pub listen_addr: SocketAddr,

    /// Directory where the installation credential and connection records
    /// are persisted.
    #[arg(long, env = "JIRA_BRIDGE_DATA_DIR", default_value = "./data")]
    pub data_dir: PathBuf,

    /// The Connect app key: the JWT issuer and the descriptor's `key` field.
    #[arg(long, env = "JIRA_BRIDGE_APP_KEY", default_value = "chat.jira.bridge")]
    pub app_key: String,

    /// Public base URL Jira reaches this service at, e.g.
    /// `https://bridge.example.com`.
    #[arg(long, env = "JIRA_BRIDGE_BASE_URL")]
    pub app_base_url: String,

    /// Chat webhook URL notifications are POSTed to. Without it the bridge
    /// still accepts webhooks but delivers nothing.
    #[arg(long, env = "JIRA_BRIDGE_CHAT_WEBHOOK_URL")]
    pub chat_webhook_url: Option<String>,

    /// Sender name notifications appear under in chat.
    #[arg(long, env = "JIRA_BRIDGE_SENDER", default_value = "jira.bot")]
    pub sender: String,
}
