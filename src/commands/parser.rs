//! Parser for `/jira` slash-command arguments.
//!
//! This is a pure parser over the argument string that follows the slash
//! command itself. It never touches the registry or the network.

use thiserror::Error;

use crate::types::{IssueKey, ProjectKey};

use super::types::Command;

/// Errors produced while parsing a command argument string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCommandError {
    /// The first argument is neither a command word nor issue-key shaped.
    ///
    /// Anything that is not a known command word is treated as an issue-key
    /// lookup, so a word without the `KEY-123` shape can only be a typo.
    #[error("{0:?} is not a command or an issue key")]
    InvalidIssueKey(String),
}

/// Parses a slash-command argument string.
///
/// # Parsing Rules
///
/// - Command words (`help`, `install`, `connect`, `disconnect`) are
///   case-insensitive
/// - Whitespace between tokens is flexible (spaces, tabs)
/// - Project keys are uppercased, matching how Jira stores them
/// - An empty argument string parses as `Help`
/// - Any other first word must look like an issue key (`PROJ-123`) and
///   parses as an issue lookup, uppercased
/// - Trailing arguments beyond those a command consumes are ignored
///
/// # Examples
///
/// ```
/// use jira_bridge::commands::{Command, parse_command};
/// use jira_bridge::types::{IssueKey, ProjectKey};
///
/// assert_eq!(parse_command(""), Ok(Command::Help));
/// assert_eq!(
///     parse_command("connect proj"),
///     Ok(Command::Connect(Some(ProjectKey::new("PROJ"))))
/// );
/// assert_eq!(
///     parse_command("proj-42"),
///     Ok(Command::IssueLookup(IssueKey::new("PROJ-42")))
/// );
/// assert!(parse_command("frobnicate").is_err());
/// ```
pub fn parse_command(args: &str) -> Result<Command, ParseCommandError> {
    let args = args.trim();
    if args.is_empty() {
        return Ok(Command::Help);
    }

    let (word, rest) = split_first_word(args);

    match word.to_ascii_lowercase().as_str() {
        "help" => Ok(Command::Help),
        "install" => Ok(Command::Install),
        "connect" => Ok(Command::Connect(parse_project_key(rest))),
        "disconnect" => Ok(Command::Disconnect(parse_project_key(rest))),
        _ => parse_issue_key(word)
            .map(Command::IssueLookup)
            .ok_or_else(|| ParseCommandError::InvalidIssueKey(word.to_string())),
    }
}

/// Parses an optional project-key argument, uppercasing it.
fn parse_project_key(text: &str) -> Option<ProjectKey> {
    let (word, _) = split_first_word(text.trim_start());
    if word.is_empty() {
        None
    } else {
        Some(ProjectKey::new(word))
    }
}

/// Accepts words shaped like a Jira issue key: letters-and-digits, a hyphen,
/// then the issue number.
fn parse_issue_key(word: &str) -> Option<IssueKey> {
    let (prefix, number) = word.split_once('-')?;

    let valid_prefix = prefix
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic())
        && prefix.chars().all(|c| c.is_ascii_alphanumeric());
    let valid_number = !number.is_empty() && number.chars().all(|c| c.is_ascii_digit());

    if valid_prefix && valid_number {
        Some(IssueKey::new(word.to_ascii_uppercase()))
    } else {
        None
    }
}

/// Splits text at the first whitespace, returning (word, rest).
/// If no whitespace, returns (text, "").
fn split_first_word(text: &str) -> (&str, &str) {
    match text.find(|c: char| c.is_ascii_whitespace()) {
        Some(pos) => (&text[..pos], &text[pos..]),
        None => (text, ""),
    }
}
