use std::collections::HashMap;
use std::sync::RwLock;

use ucash_core::AccountId;
use ucash_wallet::{Account, TransactionRecord};

use super::r#trait::{LedgerRepository, RepositoryError};

#[derive(Debug, Default)]
struct Tables {
    accounts: HashMap<AccountId, Account>,
    creation_order: Vec<AccountId>,
    by_phone: HashMap<String, AccountId>,
    /// Oldest first; reads reverse it.
    log: Vec<TransactionRecord>,
}

/// In-memory ledger tables.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryLedgerRepository {
    tables: RwLock<Tables>,
}

impl InMemoryLedgerRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LedgerRepository for InMemoryLedgerRepository {
    fn account(&self, id: AccountId) -> Result<Option<Account>, RepositoryError> {
        let tables = self.tables.read().map_err(|_| RepositoryError::Poisoned)?;
        Ok(tables.accounts.get(&id).cloned())
    }

    fn account_by_phone(&self, phone: &str) -> Result<Option<Account>, RepositoryError> {
        let tables = self.tables.read().map_err(|_| RepositoryError::Poisoned)?;
        Ok(tables
            .by_phone
            .get(phone)
            .and_then(|id| tables.accounts.get(id))
            .cloned())
    }

    fn accounts(&self) -> Result<Vec<Account>, RepositoryError> {
        let tables = self.tables.read().map_err(|_| RepositoryError::Poisoned)?;
        Ok(tables
            .creation_order
            .iter()
            .filter_map(|id| tables.accounts.get(id).cloned())
            .collect())
    }

    fn insert_account(&self, account: Account) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().map_err(|_| RepositoryError::Poisoned)?;
        if tables.by_phone.contains_key(&account.phone) {
            return Err(RepositoryError::DuplicatePhone(account.phone));
        }
        tables.by_phone.insert(account.phone.clone(), account.id);
        tables.creation_order.push(account.id);
        tables.accounts.insert(account.id, account);
        Ok(())
    }

    fn commit_posting(
        &self,
        accounts: Vec<Account>,
        record: TransactionRecord,
    ) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().map_err(|_| RepositoryError::Poisoned)?;

        // Validate the whole batch before touching anything.
        if let Some(missing) = accounts.iter().find(|a| !tables.accounts.contains_key(&a.id)) {
            return Err(RepositoryError::AccountNotFound(missing.id));
        }

        for account in accounts {
            tables.accounts.insert(account.id, account);
        }
        tables.log.push(record);
        Ok(())
    }

    fn transactions(&self) -> Result<Vec<TransactionRecord>, RepositoryError> {
        let tables = self.tables.read().map_err(|_| RepositoryError::Poisoned)?;
        Ok(tables.log.iter().rev().cloned().collect())
    }
}
