//! The `/jira` slash-command surface.
//!
//! This module provides types, parsing and execution for the commands users
//! issue from chat rooms to interact with the bridge.
//!
//! # Supported Commands
//!
//! - `/jira help` (or no arguments) - Shows usage
//! - `/jira install` - Instructions to install the app on a Jira instance
//! - `/jira connect [KEY]` - Connects the room to a project, or lists projects
//! - `/jira disconnect [KEY]` - Disconnects a project, or lists connected ones
//! - `/jira PROJ-123` - Shows a card for one issue
//!
//! # Example
//!
//! ```
//! use jira_bridge::commands::{Command, parse_command};
//! use jira_bridge::types::ProjectKey;
//!
//! assert_eq!(
//!     parse_command("connect proj"),
//!     Ok(Command::Connect(Some(ProjectKey::new("PROJ"))))
//! );
//! assert_eq!(parse_command("help"), Ok(Command::Help));
//! ```

mod handler;
mod parser;
mod types;

pub use handler::{CommandError, run_command};
pub use parser::{ParseCommandError, parse_command};
pub use types::Command;
