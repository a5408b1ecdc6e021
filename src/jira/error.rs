//! Jira REST API error types.
//!
//! This module defines error types that distinguish between transient and
//! permanent Jira API failures:
//!
//! - **Transient** errors are retriable (5xx, rate limits, network failures)
//! - **Permanent** errors require a different request or human intervention
//!   (most 4xx, including unknown project keys and missing issues)
//!
//! Special case:
//! - **NotInstalled** means no installation credential exists yet, so no
//!   request could even be signed. The command layer renders this as an
//!   instruction to run the install flow rather than as an API failure.

use std::fmt;
use thiserror::Error;

use crate::auth::{CredentialError, SignError};

/// The kind of Jira API error, categorized for retry decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JiraErrorKind {
    /// Transient error - safe to retry with backoff.
    ///
    /// Examples:
    /// - HTTP 5xx (server errors)
    /// - HTTP 429 (rate limited)
    /// - Network timeouts and connection failures
    Transient,

    /// Permanent error - retrying the same request will fail again.
    ///
    /// Examples:
    /// - HTTP 404 (unknown issue or project)
    /// - HTTP 401/403 (bad or expired signing secret)
    /// - HTTP 400 (malformed request)
    /// - Unparseable response bodies
    Permanent,

    /// No installation credential exists, so the request was never signed
    /// or sent. Resolved by installing the app on a Jira instance.
    NotInstalled,
}

impl JiraErrorKind {
    /// Returns true if this error is retriable.
    pub fn is_retriable(&self) -> bool {
        matches!(self, JiraErrorKind::Transient)
    }
}

/// A Jira API error with categorization for retry decisions.
#[derive(Debug, Error)]
pub struct JiraApiError {
    /// The kind of error (transient, permanent, or not installed).
    pub kind: JiraErrorKind,

    /// The HTTP status code, if a response was received.
    pub status_code: Option<u16>,

    /// A human-readable description of the error.
    pub message: String,

    /// The underlying reqwest error, if available.
    #[source]
    pub source: Option<reqwest::Error>,
}

impl fmt::Display for JiraApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status_code {
            Some(code) => write!(f, "Jira API error (HTTP {}): {}", code, self.message),
            None => write!(f, "Jira API error: {}", self.message),
        }
    }
}

impl JiraApiError {
    /// Creates a permanent error without an underlying reqwest source.
    pub fn permanent_without_source(message: impl Into<String>) -> Self {
        Self {
            kind: JiraErrorKind::Permanent,
            status_code: None,
            message: message.into(),
            source: None,
        }
    }

    /// Creates a not-installed error.
    pub fn not_installed() -> Self {
        Self {
            kind: JiraErrorKind::NotInstalled,
            status_code: None,
            message: "no installation credential stored".to_string(),
            source: None,
        }
    }

    /// Categorizes a non-success HTTP status returned by Jira.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let kind = match status {
            429 => JiraErrorKind::Transient,
            code if (500..600).contains(&code) => JiraErrorKind::Transient,
            _ => JiraErrorKind::Permanent,
        };
        Self {
            kind,
            status_code: Some(status),
            message: message.into(),
            source: None,
        }
    }

    /// Categorizes a reqwest transport or decode error.
    ///
    /// Connection-level failures (timeouts, DNS, refused connections) are
    /// transient; anything else (builder misuse, body decode failures) is
    /// permanent.
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        let status_code = err.status().map(|s| s.as_u16());
        let message = err.to_string();

        let kind = match status_code {
            Some(429) => JiraErrorKind::Transient,
            Some(code) if (500..600).contains(&code) => JiraErrorKind::Transient,
            Some(_) => JiraErrorKind::Permanent,
            None => {
                if err.is_timeout() || err.is_connect() || err.is_request() {
                    JiraErrorKind::Transient
                } else {
                    JiraErrorKind::Permanent
                }
            }
        };

        Self {
            kind,
            status_code,
            message,
            source: Some(err),
        }
    }
}

impl From<CredentialError> for JiraApiError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::NotInstalled => JiraApiError::not_installed(),
            CredentialError::Store(e) => {
                JiraApiError::permanent_without_source(format!("credential store error: {}", e))
            }
        }
    }
}

impl From<SignError> for JiraApiError {
    fn from(err: SignError) -> Self {
        match err {
            SignError::MissingCredential => JiraApiError::not_installed(),
            SignError::InvalidInput(msg) => {
                JiraApiError::permanent_without_source(format!("invalid signing input: {}", msg))
            }
        }
    }
}
