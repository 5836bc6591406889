//! Persisted session snapshots, one blob per session id.

use std::sync::Arc;

use ucash_core::SessionId;
use ucash_wallet::Session;

use crate::blob::BlobStore;
use crate::repository::RepositoryError;

pub const SESSION_KEY_PREFIX: &str = "ucash_session_";

pub trait SessionStore: Send + Sync {
    fn load(&self, id: SessionId) -> Result<Option<Session>, RepositoryError>;
    fn save(&self, session: &Session) -> Result<(), RepositoryError>;
    fn remove(&self, id: SessionId) -> Result<(), RepositoryError>;
}

impl<S> SessionStore for Arc<S>
where
    S: SessionStore + ?Sized,
{
    fn load(&self, id: SessionId) -> Result<Option<Session>, RepositoryError> {
        (**self).load(id)
    }

    fn save(&self, session: &Session) -> Result<(), RepositoryError> {
        (**self).save(session)
    }

    fn remove(&self, id: SessionId) -> Result<(), RepositoryError> {
        (**self).remove(id)
    }
}

#[derive(Debug)]
pub struct BlobSessionStore<B> {
    blobs: B,
}

impl<B: BlobStore> BlobSessionStore<B> {
    pub fn new(blobs: B) -> Self {
        Self { blobs }
    }

    fn key(id: SessionId) -> String {
        format!("{SESSION_KEY_PREFIX}{}", id.as_uuid().simple())
    }
}

impl<B: BlobStore> SessionStore for BlobSessionStore<B> {
    fn load(&self, id: SessionId) -> Result<Option<Session>, RepositoryError> {
        match self.blobs.get(&Self::key(id))? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn save(&self, session: &Session) -> Result<(), RepositoryError> {
        let raw = serde_json::to_string(session)?;
        self.blobs.put(&Self::key(session.id()), raw)?;
        Ok(())
    }

    fn remove(&self, id: SessionId) -> Result<(), RepositoryError> {
        self.blobs.remove(&Self::key(id))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::InMemoryBlobStore;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use ucash_wallet::NewAccount;

    #[test]
    fn save_load_remove() {
        let store = BlobSessionStore::new(InMemoryBlobStore::new());
        let account = NewAccount::new("A", "01711111111", "1234", "a@example.com")
            .into_account(Decimal::from(500), Utc::now())
            .unwrap();
        let session = Session::start(account, Utc::now());

        assert_eq!(store.load(session.id()).unwrap(), None);
        store.save(&session).unwrap();
        assert_eq!(store.load(session.id()).unwrap(), Some(session.clone()));

        store.remove(session.id()).unwrap();
        assert_eq!(store.load(session.id()).unwrap(), None);
    }
}
