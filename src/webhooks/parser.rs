//! Jira webhook payload parser.
//!
//! This module parses raw webhook JSON payloads into typed [`JiraEvent`]
//! values. The parser is designed to be robust against unknown fields and
//! event types.
//!
//! # Parsing Strategy
//!
//! Jira carries the event discriminator inside the body (`webhookEvent`)
//! rather than in a header, so parsing happens in two steps:
//!
//! 1. Peek at the envelope to read `webhookEvent`
//! 2. Parse the full payload according to the event type
//! 3. Unknown event types return `Ok(None)` (ignored, not error)
//! 4. Malformed payloads return `Err` with details

use serde::Deserialize;
use thiserror::Error;

use crate::jira::types::Attachment;
use crate::types::IssueKey;

use super::events::{CommentInfo, IssueSnapshot, JiraEvent};

/// Error type for webhook parsing failures.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON deserialization failed (includes missing required fields).
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Field has an invalid value (e.g., empty issue or project key).
    #[error("invalid field value for {field}: {value:?}")]
    InvalidField { field: &'static str, value: String },
}

/// Parses a webhook payload into a typed event.
///
/// # Returns
///
/// * `Ok(Some(event))` - Successfully parsed a known event type
/// * `Ok(None)` - Unknown event type (ignored, not an error)
/// * `Err(e)` - Malformed payload or missing required fields
///
/// # Examples
///
/// ```
/// use jira_bridge::webhooks::parse_webhook;
///
/// let payload = br#"{
///     "webhookEvent": "comment_created",
///     "issue": {
///         "id": "10002",
///         "self": "https://example.atlassian.net/rest/api/3/issue/10002",
///         "key": "PROJ-7",
///         "fields": {
///             "summary": "Widget is broken",
///             "issuetype": { "name": "Bug" },
///             "status": { "name": "To Do" },
///             "project": { "key": "PROJ" }
///         }
///     },
///     "comment": {
///         "id": "10000",
///         "body": "Confirmed on my machine",
///         "updateAuthor": { "displayName": "Jane Doe" }
///     }
/// }"#;
///
/// let result = parse_webhook(payload);
/// assert!(result.is_ok());
/// ```
pub fn parse_webhook(payload: &[u8]) -> Result<Option<JiraEvent>, ParseError> {
    let envelope: RawEnvelope = serde_json::from_slice(payload)?;

    match envelope.webhook_event.as_str() {
        "comment_created" => {
            let (issue, comment) = parse_comment_payload(payload)?;
            Ok(Some(JiraEvent::CommentCreated { issue, comment }))
        }
        "comment_updated" => {
            let (issue, comment) = parse_comment_payload(payload)?;
            Ok(Some(JiraEvent::CommentUpdated { issue, comment }))
        }
        "jira:issue_created" => {
            let (issue, author) = parse_issue_payload(payload)?;
            Ok(Some(JiraEvent::IssueCreated { issue, author }))
        }
        "jira:issue_updated" => {
            let (issue, author) = parse_issue_payload(payload)?;
            Ok(Some(JiraEvent::IssueUpdated { issue, author }))
        }
        // Unknown event types are ignored (not an error)
        _ => Ok(None),
    }
}

// ============================================================================
// Raw payload structures for deserialization
//
// These match Jira's webhook JSON structure. Option<T> is used liberally to
// handle missing fields gracefully; required fields are validated explicitly.
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawEnvelope {
    #[serde(rename = "webhookEvent")]
    webhook_event: String,
}

#[derive(Debug, Deserialize)]
struct RawIssue {
    #[serde(rename = "self")]
    self_url: String,
    key: IssueKey,
    fields: RawIssueFields,
}

#[derive(Debug, Deserialize)]
struct RawIssueFields {
    summary: Option<String>,
    issuetype: RawNamed,
    status: RawNamed,
    project: RawProject,
    #[serde(default, deserialize_with = "crate::jira::types::text_or_adf")]
    description: Option<String>,
    #[serde(default)]
    attachment: Vec<Attachment>,
}

#[derive(Debug, Deserialize)]
struct RawNamed {
    name: String,
}

#[derive(Debug, Deserialize)]
struct RawProject {
    key: String,
}

#[derive(Debug, Deserialize)]
struct RawUser {
    #[serde(rename = "displayName")]
    display_name: String,
}

fn convert_issue(raw: RawIssue) -> Result<IssueSnapshot, ParseError> {
    if raw.key.as_str().is_empty() {
        return Err(ParseError::InvalidField {
            field: "issue.key",
            value: String::new(),
        });
    }
    if raw.fields.project.key.is_empty() {
        return Err(ParseError::InvalidField {
            field: "issue.fields.project.key",
            value: String::new(),
        });
    }

    Ok(IssueSnapshot {
        key: raw.key,
        self_url: raw.self_url,
        summary: raw.fields.summary.unwrap_or_default(),
        issue_type: raw.fields.issuetype.name,
        status: raw.fields.status.name,
        project_key: raw.fields.project.key.as_str().into(),
        description: raw.fields.description,
        attachments: raw.fields.attachment,
    })
}

// ============================================================================
// comment_created / comment_updated events
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawCommentPayload {
    issue: RawIssue,
    comment: RawComment,
}

#[derive(Debug, Deserialize)]
struct RawComment {
    id: String,
    #[serde(default, deserialize_with = "crate::jira::types::text_or_adf")]
    body: Option<String>,
    // Jira sets updateAuthor on creation too; it always names the latest
    // author of the comment text
    #[serde(rename = "updateAuthor", default)]
    update_author: Option<RawUser>,
}

fn parse_comment_payload(payload: &[u8]) -> Result<(IssueSnapshot, CommentInfo), ParseError> {
    let raw: RawCommentPayload = serde_json::from_slice(payload)?;

    let issue = convert_issue(raw.issue)?;
    let comment = CommentInfo {
        id: raw.comment.id,
        body: raw.comment.body.unwrap_or_default(),
        author: raw.comment.update_author.map(|u| u.display_name),
    };

    Ok((issue, comment))
}

// ============================================================================
// jira:issue_created / jira:issue_updated events
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawIssuePayload {
    issue: RawIssue,
    #[serde(default)]
    user: Option<RawUser>,
}

fn parse_issue_payload(payload: &[u8]) -> Result<(IssueSnapshot, Option<String>), ParseError> {
    let raw: RawIssuePayload = serde_json::from_slice(payload)?;

    let issue = convert_issue(raw.issue)?;
    let author = raw.user.map(|u| u.display_name);

    Ok((issue, author))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProjectKey;

    // ========================================================================
    // Unit tests for each event type
    // ========================================================================

    #[test]
    fn parse_comment_created() {
        let payload = r#"{
            "timestamp": 1525698237764,
            "webhookEvent": "comment_created",
            "issue": {
                "id": "10002",
                "self": "https://example.atlassian.net/rest/api/3/issue/10002",
                "key": "PROJ-7",
                "fields": {
                    "summary": "Widget is broken",
                    "issuetype": { "name": "Bug" },
                    "status": { "name": "In Progress" },
                    "project": {
                        "id": "10000",
                        "key": "PROJ",
                        "name": "Main",
                        "self": "https://example.atlassian.net/rest/api/3/project/10000"
                    }
                }
            },
            "comment": {
                "self": "https://example.atlassian.net/rest/api/3/issue/10002/comment/10000",
                "id": "10000",
                "author": { "displayName": "John Smith" },
                "updateAuthor": { "displayName": "Jane Doe" },
                "body": "Confirmed on my machine",
                "created": "2018-05-07T13:43:57.764+0200",
                "updated": "2018-05-07T13:43:57.764+0200"
            }
        }"#;

        let event = parse_webhook(payload.as_bytes())
            .unwrap()
            .expect("should parse");

        match event {
            JiraEvent::CommentCreated { issue, comment } => {
                assert_eq!(issue.key, IssueKey::new("PROJ-7"));
                assert_eq!(issue.summary, "Widget is broken");
                assert_eq!(issue.issue_type, "Bug");
                assert_eq!(issue.status, "In Progress");
                assert_eq!(issue.project_key, ProjectKey::new("PROJ"));
                assert_eq!(comment.id, "10000");
                assert_eq!(comment.body, "Confirmed on my machine");
                assert_eq!(comment.author.as_deref(), Some("Jane Doe"));
            }
            other => panic!("expected CommentCreated, got {:?}", other),
        }
    }

    #[test]
    fn parse_comment_updated() {
        let payload = r#"{
            "webhookEvent": "comment_updated",
            "issue": {
                "id": "1",
                "self": "https://example.atlassian.net/rest/api/3/issue/1",
                "key": "OPS-1",
                "fields": {
                    "summary": "s",
                    "issuetype": { "name": "Task" },
                    "status": { "name": "Done" },
                    "project": { "key": "OPS" }
                }
            },
            "comment": {
                "id": "42",
                "body": "edited text",
                "updateAuthor": { "displayName": "Editor" }
            }
        }"#;

        let event = parse_webhook(payload.as_bytes())
            .unwrap()
            .expect("should parse");
        assert!(matches!(event, JiraEvent::CommentUpdated { .. }));
        assert_eq!(event.kind(), "comment_updated");
        assert_eq!(event.project_key(), &ProjectKey::new("OPS"));
    }

    #[test]
    fn parse_comment_without_author_or_body() {
        let payload = r#"{
            "webhookEvent": "comment_created",
            "issue": {
                "id": "1",
                "self": "https://example.atlassian.net/rest/api/3/issue/1",
                "key": "OPS-1",
                "fields": {
                    "summary": "s",
                    "issuetype": { "name": "Task" },
                    "status": { "name": "Done" },
                    "project": { "key": "OPS" }
                }
            },
            "comment": { "id": "42" }
        }"#;

        let event = parse_webhook(payload.as_bytes())
            .unwrap()
            .expect("should parse");
        match event {
            JiraEvent::CommentCreated { comment, .. } => {
                assert_eq!(comment.body, "");
                assert_eq!(comment.author, None);
            }
            other => panic!("expected CommentCreated, got {:?}", other),
        }
    }

    #[test]
    fn parse_issue_created_with_user() {
        let payload = r#"{
            "webhookEvent": "jira:issue_created",
            "user": { "displayName": "Creator Person" },
            "issue": {
                "id": "10042",
                "self": "https://example.atlassian.net/rest/api/3/issue/10042",
                "key": "PROJ-42",
                "fields": {
                    "summary": "New widget request",
                    "issuetype": { "name": "Story" },
                    "status": { "name": "To Do" },
                    "project": { "key": "PROJ" },
                    "description": "Please add a widget"
                }
            }
        }"#;

        let event = parse_webhook(payload.as_bytes())
            .unwrap()
            .expect("should parse");

        match event {
            JiraEvent::IssueCreated { issue, author } => {
                assert_eq!(issue.key, IssueKey::new("PROJ-42"));
                assert_eq!(issue.description.as_deref(), Some("Please add a widget"));
                assert_eq!(author.as_deref(), Some("Creator Person"));
            }
            other => panic!("expected IssueCreated, got {:?}", other),
        }
    }

    #[test]
    fn parse_issue_updated_without_user() {
        let payload = r#"{
            "webhookEvent": "jira:issue_updated",
            "issue": {
                "id": "10042",
                "self": "https://example.atlassian.net/rest/api/3/issue/10042",
                "key": "PROJ-42",
                "fields": {
                    "summary": "New widget request",
                    "issuetype": { "name": "Story" },
                    "status": { "name": "In Review" },
                    "project": { "key": "PROJ" }
                }
            }
        }"#;

        let event = parse_webhook(payload.as_bytes())
            .unwrap()
            .expect("should parse");

        match event {
            JiraEvent::IssueUpdated { author, .. } => assert_eq!(author, None),
            other => panic!("expected IssueUpdated, got {:?}", other),
        }
    }

    #[test]
    fn parse_issue_with_adf_description_and_attachments() {
        let payload = r#"{
            "webhookEvent": "jira:issue_created",
            "issue": {
                "id": "10042",
                "self": "https://example.atlassian.net/rest/api/3/issue/10042",
                "key": "PROJ-42",
                "fields": {
                    "summary": "s",
                    "issuetype": { "name": "Bug" },
                    "status": { "name": "To Do" },
                    "project": { "key": "PROJ" },
                    "description": {
                        "type": "doc",
                        "version": 1,
                        "content": [
                            { "type": "paragraph", "content": [{ "type": "text", "text": "hello" }] }
                        ]
                    },
                    "attachment": [
                        { "filename": "shot.png", "thumbnail": "https://j/t/1" },
                        { "filename": "log.txt" }
                    ]
                }
            }
        }"#;

        let event = parse_webhook(payload.as_bytes())
            .unwrap()
            .expect("should parse");

        let issue = event.issue();
        assert_eq!(issue.description.as_deref(), Some("hello"));
        assert_eq!(issue.attachments.len(), 2);
        assert_eq!(issue.attachments[0].thumbnail.as_deref(), Some("https://j/t/1"));
        assert_eq!(issue.attachments[1].thumbnail, None);
    }

    // ========================================================================
    // Unknown events and malformed payloads
    // ========================================================================

    #[test]
    fn unknown_event_returns_none() {
        for event_name in [
            "jira:issue_deleted",
            "comment_deleted",
            "sprint_started",
            "jira:version_released",
            "",
        ] {
            let payload = format!(r#"{{"webhookEvent": "{}"}}"#, event_name);
            let result = parse_webhook(payload.as_bytes()).unwrap();
            assert!(result.is_none(), "event {:?} should be ignored", event_name);
        }
    }

    #[test]
    fn invalid_json_is_an_error() {
        let result = parse_webhook(b"not json at all");
        assert!(matches!(result, Err(ParseError::Json(_))));
    }

    #[test]
    fn missing_webhook_event_field_is_an_error() {
        let result = parse_webhook(br#"{"issue": {}}"#);
        assert!(matches!(result, Err(ParseError::Json(_))));
    }

    #[test]
    fn known_event_with_missing_issue_is_an_error() {
        let payload = br#"{"webhookEvent": "comment_created", "comment": {"id": "1"}}"#;
        let result = parse_webhook(payload);
        assert!(matches!(result, Err(ParseError::Json(_))));
    }

    #[test]
    fn empty_project_key_is_rejected() {
        let payload = r#"{
            "webhookEvent": "jira:issue_created",
            "issue": {
                "id": "1",
                "self": "https://example.atlassian.net/rest/api/3/issue/1",
                "key": "PROJ-1",
                "fields": {
                    "summary": "s",
                    "issuetype": { "name": "Bug" },
                    "status": { "name": "To Do" },
                    "project": { "key": "" }
                }
            }
        }"#;

        let result = parse_webhook(payload.as_bytes());
        assert!(matches!(
            result,
            Err(ParseError::InvalidField {
                field: "issue.fields.project.key",
                ..
            })
        ));
    }

    #[test]
    fn project_key_is_uppercased_on_parse() {
        // The registry compares normalized uppercase keys
        let payload = r#"{
            "webhookEvent": "jira:issue_updated",
            "issue": {
                "id": "1",
                "self": "https://example.atlassian.net/rest/api/3/issue/1",
                "key": "proj-1",
                "fields": {
                    "summary": "s",
                    "issuetype": { "name": "Bug" },
                    "status": { "name": "To Do" },
                    "project": { "key": "proj" }
                }
            }
        }"#;

        let event = parse_webhook(payload.as_bytes())
            .unwrap()
            .expect("should parse");
        assert_eq!(event.project_key(), &ProjectKey::new("PROJ"));
    }
}
