//! Installation credential storage.
//!
//! Jira hands the add-on a shared secret and base URL through the install
//! lifecycle callback. The bridge supports exactly one installation at a
//! time: installing against a new Jira instance replaces the previous
//! credential wholesale. The store key is a fixed constant, which keeps that
//! single-tenant limitation explicit in one place.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::persistence::{KeyedStore, StoreError};
use crate::types::ClientKey;

/// Fixed store key for the single active credential.
const CREDENTIAL_KEY: &str = "credential";

/// Errors that can occur during credential operations.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// No credential has been stored, or it was cleared.
    #[error("no installation credential stored")]
    NotInstalled,

    /// Underlying store failure.
    #[error("credential store error: {0}")]
    Store(#[from] StoreError),
}

/// Result type for credential operations.
pub type Result<T> = std::result::Result<T, CredentialError>;

/// The per-installation credential delivered by the install callback.
///
/// Field names mirror the Atlassian Connect lifecycle payload, so this type
/// deserializes the callback body directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    /// Identifies this installation on the Jira side.
    pub client_key: ClientKey,

    /// Jira's public key for this installation.
    pub public_key: String,

    /// The HMAC signing secret for outbound request tokens.
    pub shared_secret: String,

    /// Base URL of the Jira instance (e.g., "https://example.atlassian.net").
    pub base_url: String,

    /// Jira server version string.
    pub server_version: String,

    /// Connect plugin version string.
    pub plugins_version: String,

    /// Product type (e.g., "jira").
    pub product_type: String,

    /// Human-readable description of the instance.
    pub description: String,
}

/// Holds the single active installation credential.
///
/// `set` replaces the credential atomically: the backing store renames a
/// fully-written temp file over the old record, so readers never observe a
/// window with zero or two credentials.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    store: KeyedStore,
}

impl CredentialStore {
    pub fn new(store: KeyedStore) -> Self {
        CredentialStore { store }
    }

    /// Returns the active credential.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError::NotInstalled` when no credential has ever
    /// been set or when it was removed.
    pub fn get(&self) -> Result<Credential> {
        self.store
            .try_load(CREDENTIAL_KEY)?
            .ok_or(CredentialError::NotInstalled)
    }

    /// Replaces the active credential atomically.
    pub fn set(&self, credential: &Credential) -> Result<()> {
        self.store.save(CREDENTIAL_KEY, credential)?;
        Ok(())
    }

    /// Removes the active credential.
    ///
    /// Returns `true` if a credential was removed, `false` if none existed.
    pub fn clear(&self) -> Result<bool> {
        Ok(self.store.remove(CREDENTIAL_KEY)?)
    }
}
