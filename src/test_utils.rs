//! Shared test utilities and arbitrary generators for property-based testing.

use crate::auth::Credential;
use crate::types::{ClientKey, ConnectionRecord, IssueKey, ProjectKey, ProjectRef, RoomId};
use proptest::prelude::*;

pub fn arb_room_id() -> impl Strategy<Value = RoomId> {
    "[a-zA-Z0-9]{1,20}".prop_map(RoomId::new)
}

pub fn arb_project_key() -> impl Strategy<Value = ProjectKey> {
    "[A-Z][A-Z0-9]{1,9}".prop_map(ProjectKey::new)
}

pub fn arb_issue_key() -> impl Strategy<Value = IssueKey> {
    ("[A-Z][A-Z0-9]{1,9}", 1u32..100_000)
        .prop_map(|(key, number)| IssueKey::new(format!("{}-{}", key, number)))
}

pub fn arb_project_ref() -> impl Strategy<Value = ProjectRef> {
    (any::<u32>(), arb_project_key(), "[a-zA-Z][a-zA-Z ]{0,29}").prop_map(|(id, key, name)| {
        ProjectRef::new(
            id.to_string(),
            format!("https://example.atlassian.net/rest/api/3/project/{}", id),
            key,
            name,
        )
    })
}

pub fn arb_connection_record() -> impl Strategy<Value = ConnectionRecord> {
    (arb_room_id(), prop::collection::vec(arb_project_ref(), 0..5)).prop_map(
        |(room_id, projects)| {
            let mut record = ConnectionRecord::new(room_id);
            for project in projects {
                record.insert_project(project);
            }
            record
        },
    )
}

pub fn arb_credential() -> impl Strategy<Value = Credential> {
    (
        "[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}",
        "[A-Za-z0-9]{32,64}",
        "[a-z0-9]{3,12}",
    )
        .prop_map(|(client_key, shared_secret, site)| Credential {
            client_key: ClientKey::new(client_key),
            public_key: "MIGfMA0GCSqGSIb3DQEBAQUAA4GNADCBiQKBgQC".to_string(),
            shared_secret,
            base_url: format!("https://{}.atlassian.net", site),
            server_version: "100100".to_string(),
            plugins_version: "1.500.0".to_string(),
            product_type: "jira".to_string(),
            description: "Atlassian JIRA at example".to_string(),
        })
}
