//! Jira Cloud REST API integration.
//!
//! This module contains:
//! - Payload types for the v3 REST API (`types`)
//! - Error categorization for retry decisions (`error`)
//! - A signed HTTP client and the [`JiraApi`] seam (`client`)

pub mod client;
pub mod error;
pub mod types;

pub use client::{ApiResult, JiraApi, JiraClient};
pub use error::{JiraApiError, JiraErrorKind};
