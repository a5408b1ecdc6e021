//! Command types for the `/jira` slash command.
//!
//! These commands are parsed from the argument string the chat host hands
//! over when a user invokes `/jira ...` in a room.

use serde::{Deserialize, Serialize};

use crate::types::{IssueKey, ProjectKey};

/// A parsed `/jira` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Shows usage: `/jira help` (also the empty argument string).
    Help,

    /// Shows the steps to install the app on a Jira instance: `/jira install`.
    Install,

    /// Connects the room to a project: `/jira connect [KEY]`.
    ///
    /// Without a key, lists connected and available projects instead.
    Connect(Option<ProjectKey>),

    /// Disconnects the room from a project: `/jira disconnect [KEY]`.
    ///
    /// Without a key, lists the projects currently connected to the room.
    Disconnect(Option<ProjectKey>),

    /// Looks up one issue by key: `/jira PROJ-123`.
    IssueLookup(IssueKey),
}
