//! Newtype wrappers for domain identifiers.
//!
//! These types prevent accidental mixing of different ID types (e.g., using a
//! RoomId where a ProjectKey is expected) and make the code more self-documenting.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A chat room identifier, as assigned by the host chat platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub String);

impl RoomId {
    pub fn new(s: impl Into<String>) -> Self {
        RoomId(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for RoomId {
    fn from(s: String) -> Self {
        RoomId(s)
    }
}

impl From<&str> for RoomId {
    fn from(s: &str) -> Self {
        RoomId(s.to_string())
    }
}

/// A Jira project key (e.g., "PROJ").
///
/// Jira keys are uppercase; [`ProjectKey::new`] normalizes its input so that
/// user-typed lowercase keys compare equal to keys from webhook payloads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectKey(pub String);

impl ProjectKey {
    /// Creates a new ProjectKey, uppercasing the input.
    pub fn new(s: impl AsRef<str>) -> Self {
        ProjectKey(s.as_ref().to_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ProjectKey {
    fn from(s: &str) -> Self {
        ProjectKey::new(s)
    }
}

/// A Jira issue key (e.g., "PROJ-123").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueKey(pub String);

impl IssueKey {
    pub fn new(s: impl Into<String>) -> Self {
        IssueKey(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the project portion of the key (the part before the first `-`).
    ///
    /// Jira project keys cannot contain hyphens, so the first `-` always
    /// separates project from issue number. Returns `None` if the key has
    /// no hyphen at all.
    pub fn project_key(&self) -> Option<ProjectKey> {
        let (prefix, _) = self.0.split_once('-')?;
        if prefix.is_empty() {
            return None;
        }
        Some(ProjectKey::new(prefix))
    }
}

impl fmt::Display for IssueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for IssueKey {
    fn from(s: String) -> Self {
        IssueKey(s)
    }
}

impl From<&str> for IssueKey {
    fn from(s: &str) -> Self {
        IssueKey(s.to_string())
    }
}

/// The client key Jira assigns to one installation of the add-on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientKey(pub String);

impl ClientKey {
    pub fn new(s: impl Into<String>) -> Self {
        ClientKey(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ClientKey {
    fn from(s: String) -> Self {
        ClientKey(s)
    }
}
