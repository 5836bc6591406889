use std::collections::HashMap;
use std::sync::RwLock;

use super::{BlobError, BlobStore, validate_key};

/// In-memory blob store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryBlobStore {
    inner: RwLock<HashMap<String, String>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for InMemoryBlobStore {
    fn get(&self, key: &str) -> Result<Option<String>, BlobError> {
        validate_key(key)?;
        let map = self.inner.read().map_err(|_| BlobError::Poisoned)?;
        Ok(map.get(key).cloned())
    }

    fn put_batch(&self, entries: Vec<(String, String)>) -> Result<(), BlobError> {
        for (key, _) in &entries {
            validate_key(key)?;
        }
        let mut map = self.inner.write().map_err(|_| BlobError::Poisoned)?;
        map.extend(entries);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), BlobError> {
        validate_key(key)?;
        let mut map = self.inner.write().map_err(|_| BlobError::Poisoned)?;
        map.remove(key);
        Ok(())
    }
}
