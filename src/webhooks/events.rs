//! Jira webhook event types.
//!
//! Typed representations of the Jira webhook events the bridge routes to
//! chat rooms. Jira delivers many more event types; only these four carry
//! notifications, and the parser ignores the rest.

use serde::{Deserialize, Serialize};

use crate::jira::types::Attachment;
use crate::types::{IssueKey, ProjectKey};

/// A parsed Jira webhook event.
///
/// Unknown or irrelevant events are represented by the parser returning
/// `None`, never by a variant here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum JiraEvent {
    /// A comment was added to an issue.
    CommentCreated {
        issue: IssueSnapshot,
        comment: CommentInfo,
    },

    /// An existing comment was edited.
    CommentUpdated {
        issue: IssueSnapshot,
        comment: CommentInfo,
    },

    /// An issue was created.
    IssueCreated {
        issue: IssueSnapshot,
        /// Display name of whoever created the issue.
        author: Option<String>,
    },

    /// An issue's fields changed.
    IssueUpdated {
        issue: IssueSnapshot,
        /// Display name of whoever made the change.
        author: Option<String>,
    },
}

impl JiraEvent {
    /// Returns the issue this event concerns.
    pub fn issue(&self) -> &IssueSnapshot {
        match self {
            JiraEvent::CommentCreated { issue, .. } => issue,
            JiraEvent::CommentUpdated { issue, .. } => issue,
            JiraEvent::IssueCreated { issue, .. } => issue,
            JiraEvent::IssueUpdated { issue, .. } => issue,
        }
    }

    /// Returns the key of the project the issue belongs to.
    ///
    /// Fan-out matches this against each room's connected projects.
    pub fn project_key(&self) -> &ProjectKey {
        &self.issue().project_key
    }

    /// The wire name of the event, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            JiraEvent::CommentCreated { .. } => "comment_created",
            JiraEvent::CommentUpdated { .. } => "comment_updated",
            JiraEvent::IssueCreated { .. } => "jira:issue_created",
            JiraEvent::IssueUpdated { .. } => "jira:issue_updated",
        }
    }
}

/// The slice of an issue a webhook payload carries that notifications need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueSnapshot {
    /// Issue key, e.g. `PROJ-42`.
    pub key: IssueKey,

    /// REST self link; its origin is the Jira instance base URL, used to
    /// build browse links.
    pub self_url: String,

    /// One-line issue summary.
    pub summary: String,

    /// Issue type display name, e.g. `Bug`.
    pub issue_type: String,

    /// Status display name, e.g. `In Progress`.
    pub status: String,

    /// Key of the owning project.
    pub project_key: ProjectKey,

    /// Issue description, already reduced to plain text.
    pub description: Option<String>,

    /// Attachments, used to resolve thumbnail references in markup.
    pub attachments: Vec<Attachment>,
}

/// The slice of a comment a webhook payload carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentInfo {
    /// Jira comment id, used to build the focused-comment browse link.
    pub id: String,

    /// Raw comment body.
    pub body: String,

    /// Display name of the comment's last author.
    pub author: Option<String>,
}
