//! Jira REST payload types.
//!
//! Shapes follow the Jira Cloud v3 REST API, trimmed to the fields the
//! bridge reads. Everything else in the payloads is ignored.

use serde::{Deserialize, Deserializer, Serialize};

use crate::types::{IssueKey, ProjectKey};

/// One project as returned by `/rest/api/3/project/search`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,

    /// REST self link; its origin is the Jira instance base URL.
    #[serde(rename = "self")]
    pub self_url: String,

    pub key: ProjectKey,

    pub name: String,

    /// Present when the search ran with `expand=description`.
    #[serde(default)]
    pub description: Option<String>,
}

/// Paged search envelope wrapping project results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSearchPage {
    #[serde(rename = "self", default)]
    pub self_url: Option<String>,

    pub max_results: u32,

    pub start_at: u32,

    pub total: u32,

    pub is_last: bool,

    pub values: Vec<Project>,
}

/// One issue as returned by `/rest/api/3/issue/<KEY>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub id: String,

    #[serde(rename = "self")]
    pub self_url: String,

    pub key: IssueKey,

    pub fields: IssueFields,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueFields {
    pub summary: String,

    /// Issue description as text.
    ///
    /// The v3 API returns Atlassian Document Format here; older payloads
    /// carry a plain string. Both deserialize to the plain text.
    #[serde(default, deserialize_with = "text_or_adf")]
    pub description: Option<String>,

    pub status: NamedField,

    #[serde(default)]
    pub priority: Option<NamedField>,

    pub issuetype: NamedField,

    #[serde(default)]
    pub assignee: Option<User>,

    #[serde(default)]
    pub attachment: Vec<Attachment>,
}

/// A field the bridge only reads the display name of (status, priority,
/// issue type).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedField {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub display_name: String,
}

/// An issue attachment, as embedded in issue fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub filename: String,

    /// Thumbnail URL; absent for attachments Jira cannot preview.
    #[serde(default)]
    pub thumbnail: Option<String>,
}

/// Accepts a plain string, an ADF document, or null.
pub(crate) fn text_or_adf<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(extract_text_from_adf(&other)),
    })
}

/// Extracts plain text from an Atlassian Document Format tree.
fn extract_text_from_adf(adf: &serde_json::Value) -> String {
    fn walk(node: &serde_json::Value, text: &mut String) {
        if let Some(t) = node.get("text").and_then(|t| t.as_str()) {
            text.push_str(t);
        }
        if let Some(content) = node.get("content").and_then(|c| c.as_array()) {
            for child in content {
                walk(child, text);
            }
            if node.get("type").and_then(|t| t.as_str()) == Some("paragraph") && !text.is_empty() {
                text.push('\n');
            }
        }
    }

    let mut text = String::new();
    walk(adf, &mut text);
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_page_deserializes() {
        let json = r#"{
            "self": "https://example.atlassian.net/rest/api/3/project/search",
            "maxResults": 50,
            "startAt": 0,
            "total": 2,
            "isLast": true,
            "values": [
                {
                    "expand": "description",
                    "self": "https://example.atlassian.net/rest/api/3/project/10000",
                    "id": "10000",
                    "key": "PROJ",
                    "description": "the main project",
                    "name": "Main",
                    "projectTypeKey": "software",
                    "simplified": false,
                    "style": "classic"
                },
                {
                    "self": "https://example.atlassian.net/rest/api/3/project/10001",
                    "id": "10001",
                    "key": "OPS",
                    "name": "Operations"
                }
            ]
        }"#;

        let page: ProjectSearchPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.total, 2);
        assert!(page.is_last);
        assert_eq!(page.values[0].key, ProjectKey::new("PROJ"));
        assert_eq!(page.values[0].description.as_deref(), Some("the main project"));
        assert_eq!(page.values[1].description, None);
    }

    #[test]
    fn issue_deserializes_with_string_description() {
        let json = r#"{
            "id": "10042",
            "self": "https://example.atlassian.net/rest/api/3/issue/10042",
            "key": "PROJ-42",
            "fields": {
                "summary": "Fix the flux capacitor",
                "description": "It *melted*",
                "status": {"name": "In Progress"},
                "priority": {"name": "High"},
                "issuetype": {"name": "Bug"},
                "assignee": {"displayName": "Emmett Brown"}
            }
        }"#;

        let issue: Issue = serde_json::from_str(json).unwrap();
        assert_eq!(issue.key, IssueKey::new("PROJ-42"));
        assert_eq!(issue.fields.description.as_deref(), Some("It *melted*"));
        assert_eq!(issue.fields.status.name, "In Progress");
        assert_eq!(
            issue.fields.assignee.as_ref().unwrap().display_name,
            "Emmett Brown"
        );
        assert!(issue.fields.attachment.is_empty());
    }

    #[test]
    fn issue_deserializes_with_adf_description() {
        let json = r#"{
            "id": "10042",
            "self": "https://example.atlassian.net/rest/api/3/issue/10042",
            "key": "PROJ-42",
            "fields": {
                "summary": "Fix it",
                "description": {
                    "type": "doc",
                    "version": 1,
                    "content": [
                        {
                            "type": "paragraph",
                            "content": [{"type": "text", "text": "first line"}]
                        },
                        {
                            "type": "paragraph",
                            "content": [{"type": "text", "text": "second line"}]
                        }
                    ]
                },
                "status": {"name": "To Do"},
                "issuetype": {"name": "Task"}
            }
        }"#;

        let issue: Issue = serde_json::from_str(json).unwrap();
        assert_eq!(
            issue.fields.description.as_deref(),
            Some("first line\nsecond line")
        );
        assert!(issue.fields.priority.is_none());
        assert!(issue.fields.assignee.is_none());
    }

    #[test]
    fn issue_tolerates_null_description() {
        let json = r#"{
            "id": "1",
            "self": "https://example.atlassian.net/rest/api/3/issue/1",
            "key": "A-1",
            "fields": {
                "summary": "s",
                "description": null,
                "status": {"name": "Done"},
                "issuetype": {"name": "Task"}
            }
        }"#;

        let issue: Issue = serde_json::from_str(json).unwrap();
        assert_eq!(issue.fields.description, None);
    }

    #[test]
    fn attachment_thumbnail_is_optional() {
        let json = r#"{"filename": "diagram.png"}"#;
        let attachment: Attachment = serde_json::from_str(json).unwrap();
        assert_eq!(attachment.filename, "diagram.png");
        assert_eq!(attachment.thumbnail, None);
    }
}
