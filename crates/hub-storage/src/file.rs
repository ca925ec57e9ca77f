//! File-backed storage backend.

use crate::{CredentialStorage, StorageError, StorageResult};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

/// JSON-file-backed storage. The whole map is cached in memory and written
/// through on every mutation.
pub struct FileStorage {
    path: PathBuf,
    data: Mutex<HashMap<String, String>>,
}

impl FileStorage {
    /// Open the storage file, creating an empty map if it does not exist yet.
    pub fn open(path: PathBuf) -> StorageResult<Self> {
        let data = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            serde_json::from_str(&content)
                .map_err(|e| StorageError::Encoding(format!("invalid credentials file: {}", e)))?
        } else {
            HashMap::new()
        };

        Ok(Self {
            path,
            data: Mutex::new(data),
        })
    }

    fn persist(&self, data: &HashMap<String, String>) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(data)
            .map_err(|e| StorageError::Encoding(e.to_string()))?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

impl CredentialStorage for FileStorage {
    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut data = self.data.lock().unwrap();
        data.insert(key.to_string(), value.to_string());
        self.persist(&data)
    }

    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let data = self.data.lock().unwrap();
        Ok(data.get(key).cloned())
    }

    fn remove(&self, key: &str) -> StorageResult<bool> {
        let mut data = self.data.lock().unwrap();
        let existed = data.remove(key).is_some();
        if existed {
            self.persist(&data)?;
        }
        Ok(existed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_storage_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("credentials.json");

        let storage = FileStorage::open(path.clone()).unwrap();
        storage.set("auth_token", "abc123").unwrap();

        // A fresh instance reads what the first one wrote
        let reopened = FileStorage::open(path).unwrap();
        assert_eq!(
            reopened.get("auth_token").unwrap(),
            Some("abc123".to_string())
        );
    }

    #[test]
    fn test_file_storage_remove_persists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("credentials.json");

        let storage = FileStorage::open(path.clone()).unwrap();
        storage.set("auth_token", "abc123").unwrap();
        assert!(storage.remove("auth_token").unwrap());

        let reopened = FileStorage::open(path).unwrap();
        assert_eq!(reopened.get("auth_token").unwrap(), None);
    }

    #[test]
    fn test_file_storage_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::open(dir.path().join("nope.json")).unwrap();
        assert_eq!(storage.get("auth_token").unwrap(), None);
        assert!(!storage.remove("auth_token").unwrap());
    }

    #[test]
    fn test_file_storage_corrupt_file_errors() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(FileStorage::open(path).is_err());
    }
}
