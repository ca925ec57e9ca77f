//! Durable client-side credential storage.
//!
//! This crate provides the storage layer that holds the bearer token between
//! runs of the client:
//! - [`CredentialStorage`]: the get/set/remove/has abstraction
//! - [`FileStorage`]: a JSON file under the client base directory
//! - [`MemoryStorage`]: an in-memory backend for tests and embedders
//! - [`TokenVault`]: the high-level auth-token API used by the session layer

mod file;
mod keys;
mod memory;
mod traits;
mod vault;

pub use file::FileStorage;
pub use keys::StorageKeys;
pub use memory::MemoryStorage;
pub use traits::CredentialStorage;
pub use vault::TokenVault;

use hub_config_and_utils::Paths;
use thiserror::Error;

/// Error type for storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Backend-specific storage error
    #[error("Storage backend error: {0}")]
    Backend(String),

    /// Key not found
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Encoding/decoding error
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Create the default file-backed storage implementation.
pub fn create_storage(paths: &Paths) -> StorageResult<Box<dyn CredentialStorage>> {
    let storage = FileStorage::open(paths.credentials_file())?;
    Ok(Box::new(storage))
}

/// Create a TokenVault backed by the default storage.
pub fn create_token_vault(paths: &Paths) -> StorageResult<TokenVault> {
    let storage = create_storage(paths)?;
    Ok(TokenVault::new(storage))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage() {
        let storage = MemoryStorage::new();

        // Test set and get
        storage.set("test_key", "test_value").unwrap();
        assert_eq!(
            storage.get("test_key").unwrap(),
            Some("test_value".to_string())
        );

        // Test has
        assert!(storage.has("test_key").unwrap());
        assert!(!storage.has("nonexistent").unwrap());

        // Test remove
        assert!(storage.remove("test_key").unwrap());
        assert!(!storage.remove("test_key").unwrap());
        assert_eq!(storage.get("test_key").unwrap(), None);
    }

    #[test]
    fn test_token_vault() {
        let storage = Box::new(MemoryStorage::new());
        let vault = TokenVault::new(storage);

        // Initially empty
        assert!(!vault.has_auth_token().unwrap());
        assert_eq!(vault.auth_token().unwrap(), None);

        // Store and read back
        vault.set_auth_token("bearer-abc").unwrap();
        assert!(vault.has_auth_token().unwrap());
        assert_eq!(vault.auth_token().unwrap(), Some("bearer-abc".to_string()));

        // Exactly one token at a time: a second set overwrites
        vault.set_auth_token("bearer-def").unwrap();
        assert_eq!(vault.auth_token().unwrap(), Some("bearer-def".to_string()));

        // Clear
        vault.clear_auth_token().unwrap();
        assert!(!vault.has_auth_token().unwrap());
    }

    #[test]
    fn test_storage_keys_constants() {
        assert!(!StorageKeys::AUTH_TOKEN.is_empty());
    }
}
