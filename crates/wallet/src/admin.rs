use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ucash_core::AccountId;

use crate::{Account, LedgerError, LedgerResult, TransactionRecord};

/// Derived dashboard aggregates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_accounts: usize,
    /// Sum of transaction amounts; fees excluded.
    pub total_volume: Decimal,
    /// Accounts that initiated at least one transaction.
    pub active_accounts: usize,
}

/// Read-only view of the whole ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminSnapshot {
    pub accounts: Vec<Account>,
    pub transactions: Vec<TransactionRecord>,
    pub stats: AdminStats,
}

impl AdminSnapshot {
    pub fn compute(accounts: Vec<Account>, transactions: Vec<TransactionRecord>) -> LedgerResult<Self> {
        let initiators: HashSet<AccountId> = transactions.iter().map(|t| t.account_id()).collect();
        let total_volume = transactions
            .iter()
            .try_fold(Decimal::ZERO, |total, t| total.checked_add(t.amount()))
            .ok_or_else(|| LedgerError::InvalidAmount("total volume out of range".to_string()))?;

        let stats = AdminStats {
            total_accounts: accounts.len(),
            total_volume,
            active_accounts: accounts.iter().filter(|a| initiators.contains(&a.id)).count(),
        };

        Ok(Self {
            accounts,
            transactions,
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NewAccount, PostingPlan, PostingPolicy, PostingRequest, TransactionKind};
    use chrono::Utc;
    use ucash_core::TransactionId;

    #[test]
    fn aggregates_exclude_fees_and_count_initiators() {
        let policy = PostingPolicy {
            cash_out_agent_phone: "01804985430".to_string(),
        };
        let mut alice = NewAccount::new("Alice", "01711111111", "1234", "a@example.com")
            .into_account(Decimal::from(500), Utc::now())
            .unwrap();
        let mut bob = NewAccount::new("Bob", "01722222222", "1234", "b@example.com")
            .into_account(Decimal::from(500), Utc::now())
            .unwrap();
        let idle = NewAccount::new("Idle", "01733333333", "1234", "i@example.com")
            .into_account(Decimal::from(500), Utc::now())
            .unwrap();

        let request = PostingRequest::new(TransactionKind::SendMoney, Decimal::from(200)).to("01722222222");
        let counterparty = request.counterparty(alice.role, &policy).unwrap();
        let plan = PostingPlan::decide(&alice, &request, counterparty, Some(&bob)).unwrap();
        plan.apply(&mut alice, Some(&mut bob)).unwrap();
        let record = plan.into_record(TransactionId::new(), alice.id, Utc::now());

        let snapshot = AdminSnapshot::compute(vec![alice, bob, idle], vec![record]).unwrap();
        assert_eq!(snapshot.stats.total_accounts, 3);
        assert_eq!(snapshot.stats.total_volume, Decimal::from(200));
        assert_eq!(snapshot.stats.active_accounts, 1);
    }

    #[test]
    fn unrepresentable_volume_is_an_error() {
        let record = |id: AccountId| {
            TransactionRecord::new(
                TransactionId::new(),
                id,
                TransactionKind::CashIn,
                Decimal::MAX,
                Decimal::ZERO,
                None,
                Utc::now(),
                "Bank Transfer / Card".to_string(),
                Default::default(),
            )
        };
        let id = AccountId::new();

        let err = AdminSnapshot::compute(Vec::new(), vec![record(id), record(id)]).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount(_)));
    }

    #[test]
    fn empty_ledger_has_zero_stats() {
        let snapshot = AdminSnapshot::compute(Vec::new(), Vec::new()).unwrap();
        assert_eq!(
            snapshot.stats,
            AdminStats {
                total_accounts: 0,
                total_volume: Decimal::ZERO,
                active_accounts: 0
            }
        );
    }
}
