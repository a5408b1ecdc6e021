//! Core domain types for the Jira bridge.
//!
//! This module contains all the fundamental types used throughout the application,
//! designed to encode invariants via the type system.

pub mod ids;
pub mod project;

// Re-export commonly used types at the module level
pub use ids::{ClientKey, IssueKey, ProjectKey, RoomId};
pub use project::{ConnectionRecord, ProjectRef};
