//! Ledger tables: accounts (unique phone index) and the transaction log.

pub mod blob;
pub mod in_memory;
pub mod r#trait;

pub use blob::{ACCOUNTS_KEY, BlobLedgerRepository, TRANSACTIONS_KEY};
pub use in_memory::InMemoryLedgerRepository;
pub use r#trait::{LedgerRepository, RepositoryError};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::{BlobStore, FileBlobStore, InMemoryBlobStore};
    use chrono::Utc;
    use rust_decimal::Decimal;
    use std::sync::Arc;
    use ucash_core::TransactionId;
    use ucash_wallet::{
        Account, NewAccount, PostingPlan, PostingPolicy, PostingRequest, TransactionKind,
        TransactionRecord,
    };

    fn account(phone: &str) -> Account {
        NewAccount::new("Test", phone, "1234", "t@example.com")
            .into_account(Decimal::from(500), Utc::now())
            .unwrap()
    }

    /// Debit `account` for a bill payment and return the updated account + record.
    fn pay_bill(mut account: Account, amount: i64) -> (Account, TransactionRecord) {
        let policy = PostingPolicy {
            cash_out_agent_phone: "01804985430".to_string(),
        };
        let request = PostingRequest::new(TransactionKind::BillPayment, Decimal::from(amount));
        let counterparty = request.counterparty(account.role, &policy).unwrap();
        let plan = PostingPlan::decide(&account, &request, counterparty, None).unwrap();
        plan.apply(&mut account, None).unwrap();
        let record = plan.into_record(TransactionId::new(), account.id, Utc::now());
        (account, record)
    }

    fn exercise(repo: &dyn LedgerRepository) {
        let alice = account("01711111111");
        let bob = account("01722222222");
        repo.insert_account(alice.clone()).unwrap();
        repo.insert_account(bob.clone()).unwrap();

        // Unique phone index.
        let err = repo.insert_account(account("01711111111")).unwrap_err();
        assert!(matches!(err, RepositoryError::DuplicatePhone(p) if p == "01711111111"));
        assert_eq!(repo.accounts().unwrap().len(), 2);

        // Lookups.
        assert_eq!(repo.account(alice.id).unwrap(), Some(alice.clone()));
        assert_eq!(repo.account_by_phone("01722222222").unwrap(), Some(bob.clone()));
        assert_eq!(repo.account_by_phone("01799999999").unwrap(), None);
        let order: Vec<_> = repo.accounts().unwrap().into_iter().map(|a| a.id).collect();
        assert_eq!(order, vec![alice.id, bob.id]);

        // Commits upsert balances and prepend records.
        let (alice, first) = pay_bill(alice, 100);
        repo.commit_posting(vec![alice.clone()], first.clone()).unwrap();
        let (alice, second) = pay_bill(alice, 50);
        repo.commit_posting(vec![alice.clone()], second.clone()).unwrap();

        assert_eq!(repo.account(alice.id).unwrap().unwrap().balance, Decimal::from(350));
        assert_eq!(repo.transactions().unwrap(), vec![second.clone(), first.clone()]);
        assert_eq!(
            repo.transactions_involving(alice.id, &alice.phone).unwrap(),
            vec![second.clone(), first.clone()]
        );
        assert!(repo.transactions_involving(bob.id, &bob.phone).unwrap().is_empty());

        // Unknown account: nothing is written.
        let (ghost, ghost_record) = pay_bill(account("01733333333"), 1);
        let err = repo.commit_posting(vec![ghost], ghost_record).unwrap_err();
        assert!(matches!(err, RepositoryError::AccountNotFound(_)));
        assert_eq!(repo.transactions().unwrap().len(), 2);
    }

    #[test]
    fn in_memory_repository_contract() {
        exercise(&InMemoryLedgerRepository::new());
    }

    #[test]
    fn blob_repository_contract_in_memory() {
        exercise(&BlobLedgerRepository::new(InMemoryBlobStore::new()));
    }

    #[test]
    fn blob_repository_persists_original_layout() {
        let dir = tempfile::tempdir().unwrap();
        let blobs = Arc::new(FileBlobStore::open(dir.path()).unwrap());
        let repo = BlobLedgerRepository::new(blobs.clone());
        exercise(&repo);

        let users: serde_json::Value =
            serde_json::from_str(&blobs.get(ACCOUNTS_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(users.as_array().unwrap().len(), 2);
        let txs: serde_json::Value =
            serde_json::from_str(&blobs.get(TRANSACTIONS_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(txs[0]["amount"], "50");
        assert_eq!(txs[0]["kind"], "BILL_PAYMENT");

        let reopened = BlobLedgerRepository::new(FileBlobStore::open(dir.path()).unwrap());
        assert_eq!(reopened.transactions().unwrap().len(), 2);
        assert_eq!(reopened.accounts().unwrap().len(), 2);
    }
}
