//! In-memory storage backend.
//!
//! Objects live in a `RwLock<HashMap>`. Used by tests and demos, and handy
//! for exercising the readiness gate (insert the marker object from another
//! task to release a waiting gate).

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use super::{Storage, StorageError};

/// In-memory object store.
#[derive(Default)]
pub struct MemoryStorage {
    objects: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces an object.
    pub fn put(&self, name: impl Into<String>, data: impl Into<Vec<u8>>) {
        let mut objects = self.objects.write().unwrap_or_else(|e| e.into_inner());
        objects.insert(name.into(), data.into());
    }

    /// Removes an object if present.
    pub fn remove(&self, name: &str) {
        let mut objects = self.objects.write().unwrap_or_else(|e| e.into_inner());
        objects.remove(name);
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    fn kind(&self) -> &'static str {
        "memory"
    }

    async fn load(&self, name: &str) -> Result<Vec<u8>, StorageError> {
        let objects = self.objects.read().unwrap_or_else(|e| e.into_inner());
        objects
            .get(name)
            .cloned()
            .ok_or_else(|| StorageError::not_found(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_tri_state() {
        let storage = MemoryStorage::new();
        storage.put("snapshot.pb", b"data".to_vec());

        assert_eq!(storage.load("snapshot.pb").await.unwrap(), b"data");

        let err = storage.load("missing").await.unwrap_err();
        assert!(err.is_not_found());

        storage.remove("snapshot.pb");
        assert!(storage.load("snapshot.pb").await.unwrap_err().is_not_found());
    }
}
