//! Project and connection types.
//!
//! These types represent the room<->project associations maintained by the
//! connection registry.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ids::{ProjectKey, RoomId};

/// Minimal cached identity of a Jira project.
///
/// Enough to render a link and a confirmation message without re-fetching
/// the project from the Jira API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRef {
    /// The project's numeric ID, as a string (Jira returns it that way).
    pub id: String,

    /// The project's REST self URL.
    #[serde(rename = "self")]
    pub self_url: String,

    /// The project key (e.g., "PROJ").
    pub key: ProjectKey,

    /// The human-readable project name.
    pub name: String,
}

impl ProjectRef {
    pub fn new(
        id: impl Into<String>,
        self_url: impl Into<String>,
        key: ProjectKey,
        name: impl Into<String>,
    ) -> Self {
        ProjectRef {
            id: id.into(),
            self_url: self_url.into(),
            key,
            name: name.into(),
        }
    }
}

/// The set of projects a single chat room is connected to.
///
/// One record exists per room. The same project may appear in many rooms'
/// records (the room<->project relationship is many-to-many). Every mutation
/// replaces the whole persisted record; there is no field-level merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionRecord {
    /// The room this record belongs to.
    pub room_id: RoomId,

    /// Connected projects, keyed by project key.
    ///
    /// A BTreeMap keeps listings and persisted JSON in a stable order.
    pub connected_projects: BTreeMap<ProjectKey, ProjectRef>,
}

impl ConnectionRecord {
    /// Creates an empty record for a room.
    pub fn new(room_id: RoomId) -> Self {
        ConnectionRecord {
            room_id,
            connected_projects: BTreeMap::new(),
        }
    }

    /// Inserts or overwrites the project keyed by its own key.
    ///
    /// Returns the previous entry for that key, if any.
    pub fn insert_project(&mut self, project: ProjectRef) -> Option<ProjectRef> {
        self.connected_projects.insert(project.key.clone(), project)
    }

    /// Removes the project with the given key, returning it if present.
    pub fn remove_project(&mut self, key: &ProjectKey) -> Option<ProjectRef> {
        self.connected_projects.remove(key)
    }

    /// Returns true if the room is connected to the given project.
    pub fn contains_project(&self, key: &ProjectKey) -> bool {
        self.connected_projects.contains_key(key)
    }

    /// Returns true if the room has no connected projects.
    pub fn is_empty(&self) -> bool {
        self.connected_projects.is_empty()
    }
}
