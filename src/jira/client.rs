//! Signed HTTP client for the Jira Cloud REST API.
//!
//! Every call reads the active installation credential, mints a fresh
//! QSH-bearing JWT for the exact method/path/query being requested, and sends
//! it as an `Authorization: JWT <token>` header. Tokens are never reused
//! across calls.
//!
//! The [`JiraApi`] trait is the seam the command layer depends on; tests
//! substitute a canned implementation instead of a live Jira instance.

use std::future::Future;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::auth::{CredentialStore, sign_request};
use crate::types::IssueKey;

use super::error::JiraApiError;
use super::types::{Issue, ProjectSearchPage};

/// Result type for Jira API operations.
pub type ApiResult<T> = Result<T, JiraApiError>;

/// The Jira operations the bridge performs.
pub trait JiraApi {
    /// Lists all projects visible to the installation, with descriptions.
    fn list_projects(&self) -> impl Future<Output = ApiResult<ProjectSearchPage>> + Send;

    /// Searches projects by name or key fragment.
    fn search_projects(
        &self,
        query: &str,
    ) -> impl Future<Output = ApiResult<ProjectSearchPage>> + Send;

    /// Fetches one issue by key.
    fn get_issue(&self, key: &IssueKey) -> impl Future<Output = ApiResult<Issue>> + Send;
}

/// A Jira REST client bound to one credential store.
///
/// The credential is re-read on every call, so a re-install takes effect
/// immediately without rebuilding the client.
#[derive(Clone)]
pub struct JiraClient {
    http: reqwest::Client,
    credentials: CredentialStore,
    app_key: String,
}

impl JiraClient {
    pub fn new(credentials: CredentialStore, app_key: impl Into<String>) -> Self {
        JiraClient {
            http: reqwest::Client::new(),
            credentials,
            app_key: app_key.into(),
        }
    }

    /// Issues a signed GET and decodes the JSON response.
    async fn get<T: DeserializeOwned>(&self, path: &str, query: &str) -> ApiResult<T> {
        let credential = self.credentials.get()?;
        let token = sign_request(&self.app_key, "GET", path, query, &credential)?;

        let url = request_url(&credential.base_url, path, query);
        debug!(path, query, "Jira API request");

        let response = self
            .http
            .get(&url)
            .header("Authorization", format!("JWT {}", token.raw))
            .send()
            .await
            .map_err(JiraApiError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(JiraApiError::from_status(
                status.as_u16(),
                if body.is_empty() {
                    status.to_string()
                } else {
                    body
                },
            ));
        }

        response.json().await.map_err(JiraApiError::from_reqwest)
    }
}

impl JiraApi for JiraClient {
    async fn list_projects(&self) -> ApiResult<ProjectSearchPage> {
        self.get("/rest/api/3/project/search", "expand=description")
            .await
    }

    async fn search_projects(&self, query: &str) -> ApiResult<ProjectSearchPage> {
        let query = format!("query={}&expand=description", urlencoding::encode(query));
        self.get("/rest/api/3/project/search", &query).await
    }

    async fn get_issue(&self, key: &IssueKey) -> ApiResult<Issue> {
        self.get(&format!("/rest/api/3/issue/{}", key), "").await
    }
}

impl std::fmt::Debug for JiraClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JiraClient")
            .field("app_key", &self.app_key)
            .finish_non_exhaustive()
    }
}

/// Joins a base URL, path and query into the full request URL.
fn request_url(base_url: &str, path: &str, query: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if query.is_empty() {
        format!("{}{}", base, path)
    } else {
        format!("{}{}?{}", base, path, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::KeyedStore;
    use tempfile::tempdir;

    #[test]
    fn request_url_joins_parts() {
        assert_eq!(
            request_url(
                "https://example.atlassian.net",
                "/rest/api/3/project/search",
                "expand=description"
            ),
            "https://example.atlassian.net/rest/api/3/project/search?expand=description"
        );
    }

    #[test]
    fn request_url_without_query_has_no_question_mark() {
        assert_eq!(
            request_url("https://example.atlassian.net", "/rest/api/3/issue/A-1", ""),
            "https://example.atlassian.net/rest/api/3/issue/A-1"
        );
    }

    #[test]
    fn request_url_tolerates_trailing_slash_in_base() {
        assert_eq!(
            request_url("https://example.atlassian.net/", "/rest/api/3/issue/A-1", ""),
            "https://example.atlassian.net/rest/api/3/issue/A-1"
        );
    }

    #[test]
    fn debug_does_not_leak_credentials() {
        let dir = tempdir().unwrap();
        let client = JiraClient::new(
            CredentialStore::new(KeyedStore::new(dir.path())),
            "jira-bridge",
        );

        let debug = format!("{:?}", client);
        assert!(debug.contains("jira-bridge"));
        assert!(!debug.contains("secret"));
    }

    #[tokio::test]
    async fn calls_without_installation_fail_not_installed() {
        let dir = tempdir().unwrap();
        let client = JiraClient::new(
            CredentialStore::new(KeyedStore::new(dir.path())),
            "jira-bridge",
        );

        let err = client.list_projects().await.unwrap_err();
        assert_eq!(err.kind, super::super::error::JiraErrorKind::NotInstalled);
    }
}
