//! Ledger posting: decide balance effects, apply them, mint the record.
//!
//! Posting is split the same way as any command in this codebase:
//! [`PostingRequest::counterparty`] and [`PostingPlan::decide`] are pure
//! decisions that never mutate state, [`PostingPlan::apply`] mutates the
//! loaded accounts, and [`PostingPlan::into_record`] produces the immutable
//! record. The caller persists accounts and record together.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ucash_auth::{Permission, Role, authorize};
use ucash_core::{AccountId, TransactionId, validate_amount};

use crate::{
    Account, LedgerError, LedgerResult, Metadata, TransactionKind, TransactionRecord, fee_for,
};

/// Static posting configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostingPolicy {
    /// Agent credited by CASH_OUT when the request names none.
    pub cash_out_agent_phone: String,
}

/// Request to post a transaction from one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingRequest {
    pub kind: TransactionKind,
    pub amount: Decimal,
    #[serde(default)]
    pub recipient: Option<String>,
    #[serde(default)]
    pub metadata: Metadata,
}

/// Who sits on the other side of a posting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Counterparty {
    /// Funds land in the wallet account registered to this phone.
    Account(String),
    /// Nothing inside the wallet is credited; the label is kept on the record.
    External(Option<String>),
}

impl Counterparty {
    /// Phone that must be resolved to an account before deciding.
    pub fn phone_to_resolve(&self) -> Option<&str> {
        match self {
            Counterparty::Account(phone) => Some(phone),
            Counterparty::External(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreditTarget {
    Initiator,
    Recipient(AccountId),
}

impl PostingRequest {
    pub fn new(kind: TransactionKind, amount: Decimal) -> Self {
        Self {
            kind,
            amount,
            recipient: None,
            metadata: Metadata::new(),
        }
    }

    pub fn to(mut self, recipient: impl Into<String>) -> Self {
        self.recipient = Some(recipient.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    fn recipient_label(&self) -> Option<String> {
        self.recipient
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string)
    }

    /// Validate the amount and work out the counterparty for `initiator_role`.
    pub fn counterparty(&self, initiator_role: Role, policy: &PostingPolicy) -> LedgerResult<Counterparty> {
        validate_amount(self.amount)?;

        let recipient = self.recipient_label();
        let counterparty = match self.kind {
            TransactionKind::CashIn => {
                let mints = authorize(initiator_role, Permission::MintCashIn).is_ok();
                match recipient {
                    Some(phone) if mints => Counterparty::Account(phone),
                    _ => Counterparty::External(None),
                }
            }
            TransactionKind::SendMoney => Counterparty::Account(
                recipient.ok_or(LedgerError::MissingRequiredField("recipient"))?,
            ),
            TransactionKind::CashOut => Counterparty::Account(
                recipient.unwrap_or_else(|| policy.cash_out_agent_phone.clone()),
            ),
            TransactionKind::MobileRecharge | TransactionKind::MerchantPay => Counterparty::External(
                Some(recipient.ok_or(LedgerError::MissingRequiredField("recipient"))?),
            ),
            TransactionKind::BillPayment => Counterparty::External(recipient),
        };
        Ok(counterparty)
    }
}

/// Decided balance effects of one posting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostingPlan {
    kind: TransactionKind,
    amount: Decimal,
    fee: Decimal,
    debit: Decimal,
    credit: Option<CreditTarget>,
    recipient: Option<String>,
    description: String,
    metadata: Metadata,
}

impl PostingPlan {
    /// Decide what `request` does to `initiator` (and `recipient`).
    ///
    /// `recipient` is the account resolved from
    /// [`Counterparty::phone_to_resolve`]; `None` means the phone matched nothing.
    pub fn decide(
        initiator: &Account,
        request: &PostingRequest,
        counterparty: Counterparty,
        recipient: Option<&Account>,
    ) -> LedgerResult<Self> {
        let amount = request.amount;
        let fee = fee_for(request.kind, amount);

        let (debit, credit, label) = if request.kind == TransactionKind::CashIn {
            match counterparty {
                Counterparty::Account(phone) => {
                    let target = recipient.ok_or_else(|| LedgerError::RecipientNotFound(phone.clone()))?;
                    let credit = if target.id == initiator.id {
                        CreditTarget::Initiator
                    } else {
                        CreditTarget::Recipient(target.id)
                    };
                    (Decimal::ZERO, Some(credit), Some(phone))
                }
                Counterparty::External(_) => (Decimal::ZERO, Some(CreditTarget::Initiator), None),
            }
        } else {
            let total = amount
                .checked_add(fee)
                .ok_or_else(|| LedgerError::InvalidAmount("amount out of range".to_string()))?;
            if initiator.balance < total {
                return Err(LedgerError::InsufficientBalance {
                    available: initiator.balance,
                    required: total,
                });
            }
            match counterparty {
                Counterparty::Account(phone) => {
                    let target = recipient.ok_or_else(|| LedgerError::RecipientNotFound(phone.clone()))?;
                    if target.id == initiator.id {
                        return Err(LedgerError::SelfTransfer);
                    }
                    (total, Some(CreditTarget::Recipient(target.id)), Some(phone))
                }
                Counterparty::External(label) => (total, None, label),
            }
        };

        let description = describe(request.kind, label.as_deref(), credit);

        Ok(Self {
            kind: request.kind,
            amount,
            fee,
            debit,
            credit,
            recipient: label,
            description,
            metadata: request.metadata.clone(),
        })
    }

    pub fn fee(&self) -> Decimal {
        self.fee
    }

    /// Total leaving the initiator (amount + fee, or zero for cash-in).
    pub fn debit(&self) -> Decimal {
        self.debit
    }

    pub fn credit_target(&self) -> Option<CreditTarget> {
        self.credit
    }

    pub fn changes_initiator(&self) -> bool {
        self.debit > Decimal::ZERO || self.credit == Some(CreditTarget::Initiator)
    }

    pub fn credits_recipient(&self) -> bool {
        matches!(self.credit, Some(CreditTarget::Recipient(_)))
    }

    /// Apply the decided effects to the loaded accounts.
    pub fn apply(&self, initiator: &mut Account, recipient: Option<&mut Account>) -> LedgerResult<()> {
        if self.debit > Decimal::ZERO {
            initiator.debit(self.debit)?;
        }
        match self.credit {
            Some(CreditTarget::Initiator) => initiator.credit(self.amount)?,
            Some(CreditTarget::Recipient(id)) => {
                let target = recipient
                    .filter(|r| r.id == id)
                    .ok_or(LedgerError::AccountNotFound)?;
                target.credit(self.amount)?;
            }
            None => {}
        }
        Ok(())
    }

    pub fn into_record(self, id: TransactionId, initiator: AccountId, at: DateTime<Utc>) -> TransactionRecord {
        TransactionRecord::new(
            id,
            initiator,
            self.kind,
            self.amount,
            self.fee,
            self.recipient,
            at,
            self.description,
            self.metadata,
        )
    }
}

fn describe(kind: TransactionKind, recipient: Option<&str>, credit: Option<CreditTarget>) -> String {
    let to = recipient.unwrap_or("");
    match kind {
        TransactionKind::SendMoney => format!("Sent to {to}"),
        TransactionKind::CashIn => match (recipient, credit) {
            (Some(r), Some(_)) => format!("Agent Cash In to {r}"),
            _ => "Bank Transfer / Card".to_string(),
        },
        TransactionKind::CashOut => format!("Cash out to {to}"),
        TransactionKind::MobileRecharge => format!("Recharge for {to}"),
        TransactionKind::BillPayment => "Bill Payment".to_string(),
        TransactionKind::MerchantPay => format!("Payment to {to}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NewAccount, TransactionStatus};
    use proptest::prelude::*;

    const AGENT: &str = "01804985430";

    fn policy() -> PostingPolicy {
        PostingPolicy {
            cash_out_agent_phone: AGENT.to_string(),
        }
    }

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn account(phone: &str, balance: &str, role: Role) -> Account {
        let mut a = NewAccount::new("Test", phone, "1234", "t@example.com")
            .into_account(d(balance), Utc::now())
            .unwrap();
        a.role = role;
        a
    }

    /// Run the full decide/apply cycle the way the ledger service does.
    fn post(
        initiator: &mut Account,
        recipient: Option<&mut Account>,
        request: &PostingRequest,
    ) -> LedgerResult<TransactionRecord> {
        let counterparty = request.counterparty(initiator.role, &policy())?;
        let resolved = match (counterparty.phone_to_resolve(), recipient) {
            (Some(phone), Some(r)) if r.phone == phone => Some(r),
            _ => None,
        };
        let plan = PostingPlan::decide(initiator, request, counterparty, resolved.as_deref())?;
        plan.apply(initiator, resolved)?;
        Ok(plan.into_record(TransactionId::new(), initiator.id, Utc::now()))
    }

    #[test]
    fn cash_out_charges_fee_and_credits_agent() {
        let mut user = account("01711111111", "200", Role::User);
        let mut agent = account(AGENT, "0", Role::Admin);

        let record = post(
            &mut user,
            Some(&mut agent),
            &PostingRequest::new(TransactionKind::CashOut, d("100")),
        )
        .unwrap();

        assert_eq!(record.fee(), d("1.85"));
        assert_eq!(record.amount(), d("100"));
        assert_eq!(record.status(), TransactionStatus::Success);
        assert_eq!(record.recipient(), Some(AGENT));
        assert_eq!(record.description(), format!("Cash out to {AGENT}"));
        assert_eq!(user.balance, d("98.15"));
        assert_eq!(agent.balance, d("100"));
    }

    #[test]
    fn send_money_beyond_balance_is_rejected_untouched() {
        let mut user = account("01711111111", "100", Role::User);
        let mut friend = account("01722222222", "0", Role::User);

        let err = post(
            &mut user,
            Some(&mut friend),
            &PostingRequest::new(TransactionKind::SendMoney, d("150")).to("01722222222"),
        )
        .unwrap_err();

        assert!(matches!(err, LedgerError::InsufficientBalance { .. }));
        assert_eq!(user.balance, d("100"));
        assert_eq!(friend.balance, d("0"));
    }

    #[test]
    fn send_money_fee_is_never_shared_with_recipient() {
        let mut user = account("01711111111", "500", Role::User);
        let mut friend = account("01722222222", "0", Role::User);

        post(
            &mut user,
            Some(&mut friend),
            &PostingRequest::new(TransactionKind::SendMoney, d("200")).to("01722222222"),
        )
        .unwrap();

        assert_eq!(user.balance, d("295"));
        assert_eq!(friend.balance, d("200"));
    }

    #[test]
    fn unresolved_send_money_recipient_fails_without_debit() {
        let mut user = account("01711111111", "500", Role::User);

        let err = post(
            &mut user,
            None,
            &PostingRequest::new(TransactionKind::SendMoney, d("50")).to("01999999999"),
        )
        .unwrap_err();

        assert_eq!(err, LedgerError::RecipientNotFound("01999999999".to_string()));
        assert_eq!(user.balance, d("500"));
    }

    #[test]
    fn send_money_requires_recipient_and_rejects_self() {
        let mut user = account("01711111111", "500", Role::User);
        let err = post(&mut user, None, &PostingRequest::new(TransactionKind::SendMoney, d("5"))).unwrap_err();
        assert_eq!(err, LedgerError::MissingRequiredField("recipient"));

        let mut me = user.clone();
        let err = post(
            &mut user,
            Some(&mut me),
            &PostingRequest::new(TransactionKind::SendMoney, d("5")).to("01711111111"),
        )
        .unwrap_err();
        assert_eq!(err, LedgerError::SelfTransfer);
        assert_eq!(user.balance, d("500"));
    }

    #[test]
    fn admin_cash_in_mints_into_recipient() {
        let mut admin = account(AGENT, "1000000", Role::Admin);
        let mut user = account("01711111111", "10", Role::User);

        let record = post(
            &mut admin,
            Some(&mut user),
            &PostingRequest::new(TransactionKind::CashIn, d("250")).to("01711111111"),
        )
        .unwrap();

        assert_eq!(admin.balance, d("1000000"));
        assert_eq!(user.balance, d("260"));
        assert_eq!(record.description(), "Agent Cash In to 01711111111");
        assert_eq!(record.fee(), Decimal::ZERO);
    }

    #[test]
    fn admin_cash_in_to_unknown_phone_fails() {
        let mut admin = account(AGENT, "1000000", Role::Admin);
        let err = post(
            &mut admin,
            None,
            &PostingRequest::new(TransactionKind::CashIn, d("250")).to("01999999999"),
        )
        .unwrap_err();
        assert_eq!(err, LedgerError::RecipientNotFound("01999999999".to_string()));
        assert_eq!(admin.balance, d("1000000"));
    }

    #[test]
    fn user_cash_in_self_funds_and_drops_recipient() {
        let mut user = account("01711111111", "10", Role::User);
        let mut other = account("01722222222", "10", Role::User);

        let record = post(
            &mut user,
            Some(&mut other),
            &PostingRequest::new(TransactionKind::CashIn, d("40")).to("01722222222"),
        )
        .unwrap();

        assert_eq!(user.balance, d("50"));
        assert_eq!(other.balance, d("10"));
        assert_eq!(record.recipient(), None);
        assert_eq!(record.description(), "Bank Transfer / Card");
    }

    #[test]
    fn debit_only_kinds_credit_nobody() {
        let mut user = account("01711111111", "300", Role::User);

        let recharge = post(
            &mut user,
            None,
            &PostingRequest::new(TransactionKind::MobileRecharge, d("20"))
                .to("01733333333")
                .with_metadata("operator", "Grameenphone"),
        )
        .unwrap();
        let bill = post(&mut user, None, &PostingRequest::new(TransactionKind::BillPayment, d("30"))).unwrap();
        let merchant = post(
            &mut user,
            None,
            &PostingRequest::new(TransactionKind::MerchantPay, d("50"))
                .to("Star Coffee House")
                .with_metadata("merchantId", "MERCH_88291"),
        )
        .unwrap();

        assert_eq!(user.balance, d("200"));
        assert_eq!(recharge.description(), "Recharge for 01733333333");
        assert_eq!(recharge.metadata().get("operator").map(String::as_str), Some("Grameenphone"));
        assert_eq!(bill.description(), "Bill Payment");
        assert_eq!(merchant.description(), "Payment to Star Coffee House");
    }

    #[test]
    fn recharge_and_merchant_pay_need_a_recipient() {
        let user = account("01711111111", "300", Role::User);
        for kind in [TransactionKind::MobileRecharge, TransactionKind::MerchantPay] {
            let err = PostingRequest::new(kind, d("1")).to("  ").counterparty(user.role, &policy()).unwrap_err();
            assert_eq!(err, LedgerError::MissingRequiredField("recipient"));
        }
    }

    #[test]
    fn amounts_must_be_positive_currency_values() {
        for raw in ["0", "-1", "1.005"] {
            let err = PostingRequest::new(TransactionKind::BillPayment, d(raw))
                .counterparty(Role::User, &policy())
                .unwrap_err();
            assert!(matches!(err, LedgerError::InvalidAmount(_)), "{raw}");
        }
    }

    #[test]
    fn oversized_amounts_are_rejected_before_any_balance_moves() {
        let mut user = account("01711111111", "10", Role::User);
        let request = PostingRequest::new(TransactionKind::CashIn, Decimal::MAX);

        let err = post(&mut user, None, &request).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount(_)));
        assert_eq!(user.balance, d("10"));
    }

    #[test]
    fn deciding_an_unrepresentable_total_fails() {
        let user = account("01711111111", "10", Role::User);
        let request = PostingRequest::new(TransactionKind::SendMoney, Decimal::MAX).to(AGENT);
        let counterparty = Counterparty::Account(AGENT.to_string());

        let err = PostingPlan::decide(&user, &request, counterparty, None).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount(_)));
    }

    #[test]
    fn crediting_a_full_balance_fails_instead_of_wrapping() {
        let mut admin = account(AGENT, "0", Role::Admin);
        let mut rich = account("01711111111", "0", Role::User);
        rich.balance = Decimal::MAX;

        let err = post(
            &mut admin,
            Some(&mut rich),
            &PostingRequest::new(TransactionKind::CashIn, d("1")).to("01711111111"),
        )
        .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount(_)));
        assert_eq!(rich.balance, Decimal::MAX);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: successful debits lower the balance by exactly amount + fee,
        /// rejected ones leave it untouched, and the balance never goes negative.
        #[test]
        fn balance_moves_by_amount_plus_fee_or_not_at_all(
            balance_cents in 0i64..100_000i64,
            amount_cents in 1i64..100_000i64,
            kind_idx in 0usize..5,
        ) {
            let kinds = [
                TransactionKind::SendMoney,
                TransactionKind::CashOut,
                TransactionKind::MobileRecharge,
                TransactionKind::BillPayment,
                TransactionKind::MerchantPay,
            ];
            let kind = kinds[kind_idx];
            let balance = Decimal::new(balance_cents, 2);
            let amount = Decimal::new(amount_cents, 2);

            let mut user = account("01711111111", "0", Role::User);
            user.balance = balance;
            let mut other = account(AGENT, "0", Role::Admin);
            let request = PostingRequest::new(kind, amount).to(AGENT);

            match post(&mut user, Some(&mut other), &request) {
                Ok(record) => {
                    prop_assert_eq!(user.balance, balance - amount - record.fee());
                    prop_assert!(user.balance >= Decimal::ZERO);
                    let credited = if kind.credits_recipient_account() { amount } else { Decimal::ZERO };
                    prop_assert_eq!(other.balance, credited);
                }
                Err(LedgerError::InsufficientBalance { .. }) => {
                    prop_assert!(balance < amount + fee_for(kind, amount));
                    prop_assert_eq!(user.balance, balance);
                    prop_assert_eq!(other.balance, Decimal::ZERO);
                }
                Err(other) => prop_assert!(false, "unexpected error {other:?}"),
            }
        }
    }
}
