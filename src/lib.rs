//! Jira Bridge - A chat integration for Jira Cloud over Atlassian Connect.
//!
//! This library provides the install lifecycle, request signing, webhook
//! fan-out, markup translation, and slash-command layer behind the bridge.

pub mod auth;
pub mod commands;
pub mod config;
pub mod jira;
pub mod markup;
pub mod notify;
pub mod persistence;
pub mod registry;
pub mod server;
pub mod types;
pub mod webhooks;

#[cfg(test)]
pub mod test_utils;
