//! Room-to-project connection registry.
//!
//! Each chat room owns at most one [`ConnectionRecord`] listing every Jira
//! project the room subscribes to. Records persist as individual JSON files
//! keyed `room.<roomId>`; every mutation rewrites the whole record through
//! the store's atomic replace.
//!
//! # Concurrency
//!
//! Mutations are read-modify-write over a single record with no
//! compare-and-swap, so two concurrent writers to the same room race and the
//! last write wins. Slash commands are human-triggered and low-contention;
//! callers needing stronger guarantees must serialize mutations per room
//! (the HTTP layer holds a mutex across them).

use thiserror::Error;
use tracing::debug;

use crate::persistence::{KeyedStore, StoreError};
use crate::types::{ConnectionRecord, ProjectKey, ProjectRef, RoomId};

/// Store key prefix for room connection records.
const ROOM_KEY_PREFIX: &str = "room.";

/// Errors that can occur during registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Disconnect targeted a project the room is not connected to.
    ///
    /// Callers render this as a user-facing "not connected" message rather
    /// than treating the disconnect as a silent no-op.
    #[error("project {project} is not connected to room {room}")]
    NotConnected { room: RoomId, project: ProjectKey },

    /// Underlying store failure.
    #[error("registry store error: {0}")]
    Store(#[from] StoreError),
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Persistent registry of which rooms follow which Jira projects.
#[derive(Debug, Clone)]
pub struct ConnectionRegistry {
    store: KeyedStore,
}

impl ConnectionRegistry {
    pub fn new(store: KeyedStore) -> Self {
        ConnectionRegistry { store }
    }

    fn room_key(room: &RoomId) -> String {
        format!("{}{}", ROOM_KEY_PREFIX, room)
    }

    /// Returns connection records.
    ///
    /// With a room given, returns at most that room's record. With `None`,
    /// scans the store for every room record; webhook fan-out uses this to
    /// find all rooms following a project.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn get_connections(&self, room: Option<&RoomId>) -> Result<Vec<ConnectionRecord>> {
        match room {
            Some(room) => {
                let record = self.store.try_load(&Self::room_key(room))?;
                Ok(record.into_iter().collect())
            }
            None => {
                let keys = self.store.list_keys(ROOM_KEY_PREFIX)?;
                let mut records = Vec::with_capacity(keys.len());
                for key in keys {
                    // A record removed between the scan and the load is skipped
                    if let Some(record) = self.store.try_load(&key)? {
                        records.push(record);
                    }
                }
                Ok(records)
            }
        }
    }

    /// Connects a room to a project.
    ///
    /// Idempotent upsert: inserts or overwrites the entry keyed by
    /// `project.key` in the room's record, then persists the entire record.
    /// Returns the room's updated record.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    pub fn connect(&self, room: &RoomId, project: ProjectRef) -> Result<ConnectionRecord> {
        let key = Self::room_key(room);
        let mut record = self
            .store
            .try_load(&key)?
            .unwrap_or_else(|| ConnectionRecord::new(room.clone()));

        let replaced = record.insert_project(project.clone());
        self.store.save(&key, &record)?;

        debug!(
            room = %room,
            project = %project.key,
            replaced = replaced.is_some(),
            "connected project to room"
        );
        Ok(record)
    }

    /// Disconnects a project from a room.
    ///
    /// Returns the removed [`ProjectRef`] so the caller can confirm what was
    /// dropped.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::NotConnected` if the room has no record or the
    /// record does not contain `project`.
    pub fn disconnect(&self, room: &RoomId, project: &ProjectKey) -> Result<ProjectRef> {
        let key = Self::room_key(room);
        let mut record: ConnectionRecord =
            self.store
                .try_load(&key)?
                .ok_or_else(|| RegistryError::NotConnected {
                    room: room.clone(),
                    project: project.clone(),
                })?;

        let removed = record
            .remove_project(project)
            .ok_or_else(|| RegistryError::NotConnected {
                room: room.clone(),
                project: project.clone(),
            })?;

        // An emptied record stays on disk; the room keeps its (empty) entry
        self.store.save(&key, &record)?;

        debug!(room = %room, project = %project, "disconnected project from room");
        Ok(removed)
    }

    /// Returns true if any room (or the given room) is connected to `project`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn is_project_connected(
        &self,
        project: &ProjectKey,
        room: Option<&RoomId>,
    ) -> Result<bool> {
        let records = self.get_connections(room)?;
        Ok(records.iter().any(|r| r.contains_project(project)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{arb_project_key, arb_project_ref, arb_room_id};
    use proptest::prelude::*;
    use tempfile::tempdir;

    fn registry_in(dir: &std::path::Path) -> ConnectionRegistry {
        ConnectionRegistry::new(KeyedStore::new(dir))
    }

    fn project(key: &str) -> ProjectRef {
        ProjectRef::new(
            "10000",
            format!("https://example.atlassian.net/rest/api/3/project/{}", key),
            ProjectKey::new(key),
            format!("{} project", key),
        )
    }

    // ─── Unit tests ───

    #[test]
    fn get_connections_for_unknown_room_is_empty() {
        let dir = tempdir().unwrap();
        let registry = registry_in(dir.path());

        let records = registry
            .get_connections(Some(&RoomId::new("nowhere")))
            .unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn get_all_connections_on_empty_store_is_empty() {
        let dir = tempdir().unwrap();
        let registry = registry_in(dir.path());

        assert!(registry.get_connections(None).unwrap().is_empty());
    }

    #[test]
    fn connect_then_lookup_round_trips() {
        let dir = tempdir().unwrap();
        let registry = registry_in(dir.path());
        let room = RoomId::new("general");

        let record = registry.connect(&room, project("PROJ")).unwrap();
        assert!(record.contains_project(&ProjectKey::new("PROJ")));

        let records = registry.get_connections(Some(&room)).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0], record);
    }

    #[test]
    fn connect_twice_is_idempotent_upsert() {
        let dir = tempdir().unwrap();
        let registry = registry_in(dir.path());
        let room = RoomId::new("general");

        registry.connect(&room, project("PROJ")).unwrap();
        let mut renamed = project("PROJ");
        renamed.name = "renamed".to_string();
        let record = registry.connect(&room, renamed.clone()).unwrap();

        assert_eq!(record.connected_projects.len(), 1);
        assert_eq!(
            record.connected_projects[&ProjectKey::new("PROJ")].name,
            "renamed"
        );
    }

    #[test]
    fn connect_accumulates_distinct_projects() {
        let dir = tempdir().unwrap();
        let registry = registry_in(dir.path());
        let room = RoomId::new("general");

        registry.connect(&room, project("ALPHA")).unwrap();
        let record = registry.connect(&room, project("BETA")).unwrap();

        assert_eq!(record.connected_projects.len(), 2);
        assert!(record.contains_project(&ProjectKey::new("ALPHA")));
        assert!(record.contains_project(&ProjectKey::new("BETA")));
    }

    #[test]
    fn disconnect_returns_removed_project() {
        let dir = tempdir().unwrap();
        let registry = registry_in(dir.path());
        let room = RoomId::new("general");

        registry.connect(&room, project("PROJ")).unwrap();
        let removed = registry.disconnect(&room, &ProjectKey::new("PROJ")).unwrap();

        assert_eq!(removed.key, ProjectKey::new("PROJ"));
        assert!(!registry
            .is_project_connected(&ProjectKey::new("PROJ"), Some(&room))
            .unwrap());
    }

    #[test]
    fn disconnect_unknown_room_fails_not_connected() {
        let dir = tempdir().unwrap();
        let registry = registry_in(dir.path());

        let result = registry.disconnect(&RoomId::new("nowhere"), &ProjectKey::new("PROJ"));
        assert!(matches!(result, Err(RegistryError::NotConnected { .. })));
    }

    #[test]
    fn second_disconnect_fails_not_connected() {
        let dir = tempdir().unwrap();
        let registry = registry_in(dir.path());
        let room = RoomId::new("general");
        let key = ProjectKey::new("PROJ");

        registry.connect(&room, project("PROJ")).unwrap();
        registry.disconnect(&room, &key).unwrap();

        let result = registry.disconnect(&room, &key);
        assert!(matches!(result, Err(RegistryError::NotConnected { .. })));
    }

    #[test]
    fn disconnect_leaves_empty_record_in_place() {
        let dir = tempdir().unwrap();
        let registry = registry_in(dir.path());
        let room = RoomId::new("general");

        registry.connect(&room, project("PROJ")).unwrap();
        registry.disconnect(&room, &ProjectKey::new("PROJ")).unwrap();

        let records = registry.get_connections(Some(&room)).unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].is_empty());
    }

    #[test]
    fn fan_out_scan_sees_every_room() {
        let dir = tempdir().unwrap();
        let registry = registry_in(dir.path());

        registry
            .connect(&RoomId::new("general"), project("ALPHA"))
            .unwrap();
        registry
            .connect(&RoomId::new("dev"), project("ALPHA"))
            .unwrap();
        registry
            .connect(&RoomId::new("ops"), project("BETA"))
            .unwrap();

        let records = registry.get_connections(None).unwrap();
        assert_eq!(records.len(), 3);

        let following_alpha: Vec<_> = records
            .iter()
            .filter(|r| r.contains_project(&ProjectKey::new("ALPHA")))
            .collect();
        assert_eq!(following_alpha.len(), 2);
    }

    #[test]
    fn is_project_connected_scopes_to_room_when_given() {
        let dir = tempdir().unwrap();
        let registry = registry_in(dir.path());
        let key = ProjectKey::new("ALPHA");

        registry
            .connect(&RoomId::new("general"), project("ALPHA"))
            .unwrap();

        assert!(registry.is_project_connected(&key, None).unwrap());
        assert!(registry
            .is_project_connected(&key, Some(&RoomId::new("general")))
            .unwrap());
        assert!(!registry
            .is_project_connected(&key, Some(&RoomId::new("dev")))
            .unwrap());
    }

    #[test]
    fn rooms_do_not_share_records() {
        let dir = tempdir().unwrap();
        let registry = registry_in(dir.path());

        registry
            .connect(&RoomId::new("general"), project("ALPHA"))
            .unwrap();
        registry
            .disconnect(&RoomId::new("general"), &ProjectKey::new("ALPHA"))
            .unwrap();

        // Another room connecting the same project is unaffected
        registry
            .connect(&RoomId::new("dev"), project("ALPHA"))
            .unwrap();
        assert!(registry
            .is_project_connected(&ProjectKey::new("ALPHA"), Some(&RoomId::new("dev")))
            .unwrap());
    }

    // ─── Property tests ───

    proptest! {
        /// connect then is_project_connected is always true; disconnect makes
        /// it false and a second disconnect fails.
        #[test]
        fn connect_disconnect_lifecycle(
            room in arb_room_id(),
            project in arb_project_ref(),
        ) {
            let dir = tempdir().unwrap();
            let registry = registry_in(dir.path());
            let key = project.key.clone();

            registry.connect(&room, project).unwrap();
            prop_assert!(registry.is_project_connected(&key, Some(&room)).unwrap());

            let removed = registry.disconnect(&room, &key).unwrap();
            prop_assert_eq!(&removed.key, &key);
            prop_assert!(!registry.is_project_connected(&key, Some(&room)).unwrap());

            let not_connected = matches!(
                registry.disconnect(&room, &key),
                Err(RegistryError::NotConnected { .. })
            );
            prop_assert!(not_connected);
        }

        /// A room's record always reflects the latest connect set.
        #[test]
        fn connects_accumulate(
            room in arb_room_id(),
            projects in proptest::collection::vec(arb_project_ref(), 1..6),
        ) {
            let dir = tempdir().unwrap();
            let registry = registry_in(dir.path());

            let mut expected_keys = std::collections::BTreeSet::new();
            for project in &projects {
                expected_keys.insert(project.key.clone());
                registry.connect(&room, project.clone()).unwrap();
            }

            let records = registry.get_connections(Some(&room)).unwrap();
            prop_assert_eq!(records.len(), 1);
            let stored_keys: std::collections::BTreeSet<_> =
                records[0].connected_projects.keys().cloned().collect();
            prop_assert_eq!(stored_keys, expected_keys);
        }

        /// Disconnecting a key that was never connected fails for any room.
        #[test]
        fn disconnect_never_connected_fails(
            room in arb_room_id(),
            key in arb_project_key(),
        ) {
            let dir = tempdir().unwrap();
            let registry = registry_in(dir.path());

            let not_connected = matches!(
                registry.disconnect(&room, &key),
                Err(RegistryError::NotConnected { .. })
            );
            prop_assert!(not_connected);
        }
    }
}
