use std::sync::Arc;

use thiserror::Error;

use ucash_core::AccountId;
use ucash_wallet::{Account, LedgerError, TransactionRecord};

use crate::blob::BlobError;

/// Repository failure.
///
/// These are **infrastructure errors**, except `DuplicatePhone` which is the
/// unique phone index refusing an insert.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("phone {0} is already registered")]
    DuplicatePhone(String),

    #[error("account {0} not found")]
    AccountNotFound(AccountId),

    #[error("stored data could not be (de)serialized: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Blob(#[from] BlobError),

    #[error("lock poisoned")]
    Poisoned,
}

impl From<RepositoryError> for LedgerError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::DuplicatePhone(_) => LedgerError::DuplicatePhone,
            RepositoryError::AccountNotFound(_) => LedgerError::AccountNotFound,
            other => LedgerError::Storage(other.to_string()),
        }
    }
}

/// Storage contract for the ledger.
///
/// Implementations must make every method atomic with respect to the others:
/// a reader never observes half of a [`commit_posting`](Self::commit_posting).
pub trait LedgerRepository: Send + Sync {
    fn account(&self, id: AccountId) -> Result<Option<Account>, RepositoryError>;

    fn account_by_phone(&self, phone: &str) -> Result<Option<Account>, RepositoryError>;

    /// All accounts in creation order.
    fn accounts(&self) -> Result<Vec<Account>, RepositoryError>;

    /// Insert a new account, refusing a phone that is already indexed.
    fn insert_account(&self, account: Account) -> Result<(), RepositoryError>;

    /// Upsert `accounts` by id and prepend `record` to the log, all or nothing.
    ///
    /// Every account must already exist.
    fn commit_posting(
        &self,
        accounts: Vec<Account>,
        record: TransactionRecord,
    ) -> Result<(), RepositoryError>;

    /// Every record, newest first.
    fn transactions(&self) -> Result<Vec<TransactionRecord>, RepositoryError>;

    /// Records initiated by `account_id` or addressed to `phone`, newest first.
    fn transactions_involving(
        &self,
        account_id: AccountId,
        phone: &str,
    ) -> Result<Vec<TransactionRecord>, RepositoryError> {
        Ok(self
            .transactions()?
            .into_iter()
            .filter(|t| t.involves(account_id, phone))
            .collect())
    }
}

impl<S> LedgerRepository for Arc<S>
where
    S: LedgerRepository + ?Sized,
{
    fn account(&self, id: AccountId) -> Result<Option<Account>, RepositoryError> {
        (**self).account(id)
    }

    fn account_by_phone(&self, phone: &str) -> Result<Option<Account>, RepositoryError> {
        (**self).account_by_phone(phone)
    }

    fn accounts(&self) -> Result<Vec<Account>, RepositoryError> {
        (**self).accounts()
    }

    fn insert_account(&self, account: Account) -> Result<(), RepositoryError> {
        (**self).insert_account(account)
    }

    fn commit_posting(
        &self,
        accounts: Vec<Account>,
        record: TransactionRecord,
    ) -> Result<(), RepositoryError> {
        (**self).commit_posting(accounts, record)
    }

    fn transactions(&self) -> Result<Vec<TransactionRecord>, RepositoryError> {
        (**self).transactions()
    }

    fn transactions_involving(
        &self,
        account_id: AccountId,
        phone: &str,
    ) -> Result<Vec<TransactionRecord>, RepositoryError> {
        (**self).transactions_involving(account_id, phone)
    }
}
