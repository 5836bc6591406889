//! Storage wiring for the configured backend.

use std::sync::Arc;

use anyhow::Context;

use crate::blob::{BlobStore, FileBlobStore, InMemoryBlobStore};
use crate::config::StorageBackend;
use crate::repository::{BlobLedgerRepository, LedgerRepository};
use crate::session_store::{BlobSessionStore, SessionStore};

/// Ledger tables and session snapshots over one shared blob store.
#[derive(Clone)]
pub struct Storage {
    pub ledger: Arc<dyn LedgerRepository>,
    pub sessions: Arc<dyn SessionStore>,
}

pub fn open_storage(backend: &StorageBackend) -> anyhow::Result<Storage> {
    let blobs: Arc<dyn BlobStore> = match backend {
        StorageBackend::Memory => Arc::new(InMemoryBlobStore::new()),
        StorageBackend::Directory(dir) => {
            let store = FileBlobStore::open(dir.clone())
                .with_context(|| format!("failed to open data directory {}", dir.display()))?;
            tracing::info!(dir = %store.dir().display(), "using file-backed storage");
            Arc::new(store)
        }
    };

    Ok(Storage {
        ledger: Arc::new(BlobLedgerRepository::new(blobs.clone())),
        sessions: Arc::new(BlobSessionStore::new(blobs)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger_service::{LedgerService, LedgerSettings};
    use ucash_wallet::NewAccount;

    #[test]
    fn directory_backend_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let backend = StorageBackend::Directory(dir.path().to_path_buf());

        let storage = open_storage(&backend).unwrap();
        let svc = LedgerService::new(storage.ledger.clone(), LedgerSettings::default());
        let session = svc
            .register(NewAccount::new("Alice", "01711111111", "1234", "a@example.com"))
            .unwrap();
        storage.sessions.save(&session).unwrap();

        let reopened = open_storage(&backend).unwrap();
        let svc = LedgerService::new(reopened.ledger.clone(), LedgerSettings::default());
        svc.authenticate("01711111111", "1234").unwrap();
        assert_eq!(reopened.sessions.load(session.id()).unwrap(), Some(session));
    }

    #[test]
    fn memory_backend_starts_empty() {
        let storage = open_storage(&StorageBackend::Memory).unwrap();
        assert!(storage.ledger.accounts().unwrap().is_empty());
    }
}
