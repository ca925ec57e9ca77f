//! In-memory storage backend.

use crate::{CredentialStorage, StorageResult};
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory storage. Nothing survives the process; intended for tests and
/// for embedders that manage persistence themselves.
#[derive(Default)]
pub struct MemoryStorage {
    data: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStorage for MemoryStorage {
    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut data = self.data.lock().unwrap();
        data.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let data = self.data.lock().unwrap();
        Ok(data.get(key).cloned())
    }

    fn remove(&self, key: &str) -> StorageResult<bool> {
        let mut data = self.data.lock().unwrap();
        Ok(data.remove(key).is_some())
    }
}
