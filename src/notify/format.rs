//! Notification and card formatting.
//!
//! Every user-visible message the bridge produces is assembled here: the
//! one-line webhook notification texts, the comment deep links, and the rich
//! issue/project cards the command layer replies with.

use std::sync::LazyLock;

use regex::Regex;

use crate::jira::types::{Issue, Project};
use crate::markup::translate;
use crate::types::IssueKey;
use crate::webhooks::events::{CommentInfo, IssueSnapshot, JiraEvent};

use super::{AttachmentField, AttachmentTitle, MessageAttachment, Notification};

/// Rendered author name when the payload carries none.
const UNKNOWN_AUTHOR: &str = "Unknown user";

static URL_ORIGIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://[^/]+").expect("Invalid URL origin regex"));

/// Returns the scheme-plus-host origin of a URL, e.g.
/// `https://example.atlassian.net` from a REST self link.
///
/// Returns `None` when the input does not start with an HTTP origin.
pub fn url_origin(url: &str) -> Option<&str> {
    URL_ORIGIN_RE.find(url).map(|m| m.as_str())
}

/// Deep link to one comment on the issue's browse page.
fn comment_link(origin: &str, key: &IssueKey, comment_id: &str) -> String {
    format!(
        "{}/browse/{}?focusedCommentId={}&page=com.atlassian.jira.plugin.system.issuetabpanels%3Acomment-tabpanel#comment-{}",
        origin, key, comment_id, comment_id
    )
}

/// Builds the chat notification for a routed webhook event.
pub fn notification_for_event(event: &JiraEvent) -> Notification {
    match event {
        JiraEvent::CommentCreated { issue, comment } => {
            comment_notification(issue, comment, "commented on a")
        }
        JiraEvent::CommentUpdated { issue, comment } => {
            comment_notification(issue, comment, "edited a comment on a")
        }
        JiraEvent::IssueCreated { issue, author } => {
            issue_notification(issue, author.as_deref(), "created a")
        }
        JiraEvent::IssueUpdated { issue, author } => {
            issue_notification(issue, author.as_deref(), "updated a")
        }
    }
}

fn comment_notification(
    issue: &IssueSnapshot,
    comment: &CommentInfo,
    verb_phrase: &str,
) -> Notification {
    let author = comment.author.as_deref().unwrap_or(UNKNOWN_AUTHOR);
    let text = format!(
        "*{}* {} `{}` in `{}`",
        author, verb_phrase, issue.issue_type, issue.status
    );

    let link = url_origin(&issue.self_url)
        .map(|origin| comment_link(origin, &issue.key, &comment.id));
    let attachment = MessageAttachment {
        title: Some(AttachmentTitle {
            value: format!("{}: {}", issue.key, issue.summary),
            link,
        }),
        text: (!comment.body.is_empty()).then(|| comment.body.clone()),
        fields: Vec::new(),
    };

    Notification::with_attachment(text, attachment)
}

fn issue_notification(
    issue: &IssueSnapshot,
    author: Option<&str>,
    verb_phrase: &str,
) -> Notification {
    let author = author.unwrap_or(UNKNOWN_AUTHOR);
    let text = format!(
        "*{}* {} `{}` in `{}`",
        author, verb_phrase, issue.issue_type, issue.status
    );

    let link = url_origin(&issue.self_url).map(|origin| format!("{}/browse/{}", origin, issue.key));
    let body = translate(issue.description.as_deref(), &issue.attachments);
    let attachment = MessageAttachment {
        title: Some(AttachmentTitle {
            value: format!("{}: {}", issue.key, issue.summary),
            link,
        }),
        text: (!body.is_empty()).then_some(body),
        fields: Vec::new(),
    };

    Notification::with_attachment(text, attachment)
}

/// Builds the rich card for one issue, as replied to an issue-key lookup.
///
/// The description is translated from Jira markup; Status, Priority and Type
/// render backtick-wrapped; a missing assignee renders as `Unassigned`.
pub fn issue_card(issue: &Issue) -> MessageAttachment {
    let link = url_origin(&issue.self_url).map(|origin| format!("{}/browse/{}", origin, issue.key));

    let mut fields = vec![AttachmentField::short(
        "Status",
        format!("`{}`", issue.fields.status.name),
    )];
    if let Some(priority) = &issue.fields.priority {
        fields.push(AttachmentField::short(
            "Priority",
            format!("`{}`", priority.name),
        ));
    }
    fields.push(AttachmentField::short(
        "Type",
        format!("`{}`", issue.fields.issuetype.name),
    ));
    fields.push(AttachmentField::short(
        "Assignee",
        issue
            .fields
            .assignee
            .as_ref()
            .map(|a| a.display_name.clone())
            .unwrap_or_else(|| "Unassigned".to_string()),
    ));

    let body = translate(issue.fields.description.as_deref(), &issue.fields.attachment);

    MessageAttachment {
        title: Some(AttachmentTitle {
            value: format!("{} - {}", issue.key, issue.fields.summary),
            link,
        }),
        text: (!body.is_empty()).then_some(body),
        fields,
    }
}

/// Builds the confirmation card for one project, as replied to `connect`.
pub fn project_card(project: &Project) -> MessageAttachment {
    let link =
        url_origin(&project.self_url).map(|origin| format!("{}/browse/{}", origin, project.key));

    MessageAttachment {
        title: Some(AttachmentTitle {
            value: format!("{} - {}", project.key, project.name),
            link,
        }),
        text: project.description.clone(),
        fields: Vec::new(),
    }
}
