use std::sync::Mutex;

use serde::Serialize;
use serde::de::DeserializeOwned;

use ucash_core::AccountId;
use ucash_wallet::{Account, TransactionRecord};

use super::r#trait::{LedgerRepository, RepositoryError};
use crate::blob::BlobStore;

/// Blob key holding the JSON array of accounts (creation order).
pub const ACCOUNTS_KEY: &str = "ucash_users";

/// Blob key holding the JSON array of transaction records (newest first).
pub const TRANSACTIONS_KEY: &str = "ucash_transactions";

/// Ledger tables serialized as two whole-collection blobs.
///
/// Every operation reads, mutates and rewrites complete collections under a
/// single lock, so operations are serialized against each other.
#[derive(Debug)]
pub struct BlobLedgerRepository<B> {
    blobs: B,
    lock: Mutex<()>,
}

impl<B: BlobStore> BlobLedgerRepository<B> {
    pub fn new(blobs: B) -> Self {
        Self {
            blobs,
            lock: Mutex::new(()),
        }
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, RepositoryError> {
        match self.blobs.get(key)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    fn encode<T: Serialize>(key: &str, rows: &[T]) -> Result<(String, String), RepositoryError> {
        Ok((key.to_string(), serde_json::to_string(rows)?))
    }

    fn read<T>(&self, f: impl FnOnce(&Self) -> Result<T, RepositoryError>) -> Result<T, RepositoryError> {
        let _guard = self.lock.lock().map_err(|_| RepositoryError::Poisoned)?;
        f(self)
    }
}

impl<B: BlobStore> LedgerRepository for BlobLedgerRepository<B> {
    fn account(&self, id: AccountId) -> Result<Option<Account>, RepositoryError> {
        self.read(|repo| {
            let accounts: Vec<Account> = repo.load(ACCOUNTS_KEY)?;
            Ok(accounts.into_iter().find(|a| a.id == id))
        })
    }

    fn account_by_phone(&self, phone: &str) -> Result<Option<Account>, RepositoryError> {
        self.read(|repo| {
            let accounts: Vec<Account> = repo.load(ACCOUNTS_KEY)?;
            Ok(accounts.into_iter().find(|a| a.phone == phone))
        })
    }

    fn accounts(&self) -> Result<Vec<Account>, RepositoryError> {
        self.read(|repo| repo.load(ACCOUNTS_KEY))
    }

    fn insert_account(&self, account: Account) -> Result<(), RepositoryError> {
        let _guard = self.lock.lock().map_err(|_| RepositoryError::Poisoned)?;
        let mut accounts: Vec<Account> = self.load(ACCOUNTS_KEY)?;
        if accounts.iter().any(|a| a.phone == account.phone) {
            return Err(RepositoryError::DuplicatePhone(account.phone));
        }
        accounts.push(account);
        self.blobs.put_batch(vec![Self::encode(ACCOUNTS_KEY, &accounts)?])?;
        Ok(())
    }

    fn commit_posting(
        &self,
        updated: Vec<Account>,
        record: TransactionRecord,
    ) -> Result<(), RepositoryError> {
        let _guard = self.lock.lock().map_err(|_| RepositoryError::Poisoned)?;
        let mut accounts: Vec<Account> = self.load(ACCOUNTS_KEY)?;
        let mut log: Vec<TransactionRecord> = self.load(TRANSACTIONS_KEY)?;

        for account in updated {
            let slot = accounts
                .iter_mut()
                .find(|a| a.id == account.id)
                .ok_or(RepositoryError::AccountNotFound(account.id))?;
            *slot = account;
        }
        log.insert(0, record);

        self.blobs.put_batch(vec![
            Self::encode(ACCOUNTS_KEY, &accounts)?,
            Self::encode(TRANSACTIONS_KEY, &log)?,
        ])?;
        Ok(())
    }

    fn transactions(&self) -> Result<Vec<TransactionRecord>, RepositoryError> {
        self.read(|repo| repo.load(TRANSACTIONS_KEY))
    }
}
