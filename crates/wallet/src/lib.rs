//! Wallet module (accounts, fee policy, ledger posting).
//!
//! Pure domain logic only: no IO, no HTTP, no persistence concerns. Storage
//! and orchestration live in `ucash-infra`.

pub mod account;
pub mod admin;
pub mod error;
pub mod fee;
pub mod posting;
pub mod session;
pub mod transaction;

pub use account::{Account, NewAccount};
pub use admin::{AdminSnapshot, AdminStats};
pub use error::{LedgerError, LedgerResult};
pub use fee::{CASH_OUT_FEE_RATE, SEND_MONEY_FEE_THRESHOLD, SEND_MONEY_FLAT_FEE, fee_for};
pub use posting::{Counterparty, CreditTarget, PostingPlan, PostingPolicy, PostingRequest};
pub use session::Session;
pub use transaction::{Metadata, TransactionKind, TransactionRecord, TransactionStatus};
