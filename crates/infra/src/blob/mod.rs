//! Key → serialized blob storage.
//!
//! The lowest storage layer: string keys mapping to opaque serialized
//! values. Repositories build tables on top of it.

pub mod file;
pub mod in_memory;

use std::sync::Arc;

use thiserror::Error;

pub use file::FileBlobStore;
pub use in_memory::InMemoryBlobStore;

#[derive(Debug, Error)]
pub enum BlobError {
    #[error("invalid blob key '{0}'")]
    InvalidKey(String),

    #[error("blob io failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("lock poisoned")]
    Poisoned,
}

/// Key/value blob store.
pub trait BlobStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, BlobError>;

    /// Write every entry. On error, keys already written are restored to
    /// their previous values before returning.
    fn put_batch(&self, entries: Vec<(String, String)>) -> Result<(), BlobError>;

    fn put(&self, key: &str, value: String) -> Result<(), BlobError> {
        self.put_batch(vec![(key.to_string(), value)])
    }

    /// Remove a key; removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), BlobError>;
}

impl<S> BlobStore for Arc<S>
where
    S: BlobStore + ?Sized,
{
    fn get(&self, key: &str) -> Result<Option<String>, BlobError> {
        (**self).get(key)
    }

    fn put_batch(&self, entries: Vec<(String, String)>) -> Result<(), BlobError> {
        (**self).put_batch(entries)
    }

    fn remove(&self, key: &str) -> Result<(), BlobError> {
        (**self).remove(key)
    }
}

/// Keys are restricted to `[A-Za-z0-9_-]` so they map 1:1 onto file names.
pub(crate) fn validate_key(key: &str) -> Result<(), BlobError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(BlobError::InvalidKey(key.to_string()))
    }
}
