//! High-level API for the persisted bearer token.

use crate::{CredentialStorage, StorageKeys, StorageResult};

/// High-level API for storing and retrieving the session token.
///
/// Wraps a [`CredentialStorage`] backend and pins the single well-known key
/// under which the bearer token lives.
pub struct TokenVault {
    storage: Box<dyn CredentialStorage>,
}

impl TokenVault {
    /// Create a new vault with the given storage backend
    pub fn new(storage: Box<dyn CredentialStorage>) -> Self {
        Self { storage }
    }

    /// Persist the bearer token, replacing any previous one
    pub fn set_auth_token(&self, token: &str) -> StorageResult<()> {
        self.storage.set(StorageKeys::AUTH_TOKEN, token)
    }

    /// Retrieve the persisted bearer token
    pub fn auth_token(&self) -> StorageResult<Option<String>> {
        self.storage.get(StorageKeys::AUTH_TOKEN)
    }

    /// Remove the persisted bearer token
    pub fn clear_auth_token(&self) -> StorageResult<()> {
        self.storage.remove(StorageKeys::AUTH_TOKEN)?;
        Ok(())
    }

    /// Check whether a bearer token is persisted
    pub fn has_auth_token(&self) -> StorageResult<bool> {
        self.storage.has(StorageKeys::AUTH_TOKEN)
    }
}
