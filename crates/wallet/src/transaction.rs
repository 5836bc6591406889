use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ucash_core::{AccountId, Entity, TransactionId};

/// Free-form posting metadata (`operator`, `billType`, `merchantName`, `merchantId`, ...).
pub type Metadata = BTreeMap<String, String>;

/// Transaction kind (selects fee policy and balance-update policy).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    SendMoney,
    CashIn,
    CashOut,
    MobileRecharge,
    BillPayment,
    MerchantPay,
}

impl TransactionKind {
    pub const ALL: [TransactionKind; 6] = [
        TransactionKind::SendMoney,
        TransactionKind::CashIn,
        TransactionKind::CashOut,
        TransactionKind::MobileRecharge,
        TransactionKind::BillPayment,
        TransactionKind::MerchantPay,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::SendMoney => "SEND_MONEY",
            TransactionKind::CashIn => "CASH_IN",
            TransactionKind::CashOut => "CASH_OUT",
            TransactionKind::MobileRecharge => "MOBILE_RECHARGE",
            TransactionKind::BillPayment => "BILL_PAYMENT",
            TransactionKind::MerchantPay => "MERCHANT_PAY",
        }
    }

    /// Kinds whose recipient is another wallet account credited by `amount`.
    pub fn credits_recipient_account(&self) -> bool {
        matches!(self, TransactionKind::SendMoney | TransactionKind::CashOut)
    }
}

impl core::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TransactionKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown transaction kind '{s}'"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Success,
    Pending,
    Failed,
}

impl core::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            TransactionStatus::Success => "SUCCESS",
            TransactionStatus::Pending => "PENDING",
            TransactionStatus::Failed => "FAILED",
        })
    }
}

/// Immutable record of one posting.
///
/// Fields are private; a record is only ever built by
/// [`PostingPlan::into_record`](crate::PostingPlan::into_record) and read afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    id: TransactionId,
    account_id: AccountId,
    kind: TransactionKind,
    amount: Decimal,
    fee: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    recipient: Option<String>,
    status: TransactionStatus,
    timestamp: DateTime<Utc>,
    description: String,
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    metadata: Metadata,
}

impl TransactionRecord {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        id: TransactionId,
        account_id: AccountId,
        kind: TransactionKind,
        amount: Decimal,
        fee: Decimal,
        recipient: Option<String>,
        timestamp: DateTime<Utc>,
        description: String,
        metadata: Metadata,
    ) -> Self {
        Self {
            id,
            account_id,
            kind,
            amount,
            fee,
            recipient,
            status: TransactionStatus::Success,
            timestamp,
            description,
            metadata,
        }
    }

    pub fn transaction_id(&self) -> TransactionId {
        self.id
    }

    /// Originating account.
    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn fee(&self) -> Decimal {
        self.fee
    }

    pub fn recipient(&self) -> Option<&str> {
        self.recipient.as_deref()
    }

    pub fn status(&self) -> TransactionStatus {
        self.status
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// True when the account initiated this record or its current phone is the recipient.
    pub fn involves(&self, account_id: AccountId, phone: &str) -> bool {
        self.account_id == account_id || self.recipient.as_deref() == Some(phone)
    }
}

impl Entity for TransactionRecord {
    type Id = TransactionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
