use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ucash_ai::TransactionLine;
use ucash_auth::Role;
use ucash_core::AccountId;
use ucash_wallet::{
    Account, AdminSnapshot, AdminStats, Metadata, PostingRequest, TransactionKind,
    TransactionRecord,
};

/// Tagged result envelope used by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            code: None,
        }
    }

    pub fn failure(code: &str, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            code: Some(code.to_string()),
        }
    }
}

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub pin: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub phone: String,
    pub pin: String,
}

#[derive(Debug, Deserialize)]
pub struct PostTransactionRequest {
    pub kind: TransactionKind,
    pub amount: Decimal,
    #[serde(default)]
    pub recipient: Option<String>,
    /// Re-entered PIN confirming the posting.
    pub pin: String,
    #[serde(default)]
    pub metadata: Metadata,
}

impl PostTransactionRequest {
    pub fn into_parts(self) -> (String, PostingRequest) {
        let request = PostingRequest {
            kind: self.kind,
            amount: self.amount,
            recipient: self.recipient,
            metadata: self.metadata,
        };
        (self.pin, request)
    }
}

#[derive(Debug, Deserialize)]
pub struct AssistantRequest {
    pub query: String,
}

// -------------------------
// Response DTOs
// -------------------------

/// Account as shown to clients (no PIN hash).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    pub id: AccountId,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub balance: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub is_kyc_verified: bool,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<&Account> for AccountView {
    fn from(a: &Account) -> Self {
        Self {
            id: a.id,
            name: a.name.clone(),
            phone: a.phone.clone(),
            email: a.email.clone(),
            balance: a.balance,
            avatar_url: a.avatar_url.clone(),
            is_kyc_verified: a.is_kyc_verified,
            role: a.role,
            created_at: a.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub account: AccountView,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantReply {
    pub reply: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminSnapshotView {
    pub accounts: Vec<AccountView>,
    pub transactions: Vec<TransactionRecord>,
    pub stats: AdminStats,
}

impl From<AdminSnapshot> for AdminSnapshotView {
    fn from(s: AdminSnapshot) -> Self {
        Self {
            accounts: s.accounts.iter().map(AccountView::from).collect(),
            transactions: s.transactions,
            stats: s.stats,
        }
    }
}

pub fn transaction_line(record: &TransactionRecord) -> TransactionLine {
    TransactionLine {
        kind: record.kind().to_string(),
        amount: record.amount(),
        timestamp: record.timestamp(),
        status: record.status().to_string(),
    }
}
