use rust_decimal::Decimal;
use thiserror::Error;

use ucash_core::DomainError;

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Failure of a wallet operation.
///
/// Display strings are user-facing; `code()` is the stable machine tag.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Phone number already registered.")]
    DuplicatePhone,

    #[error("Invalid phone or PIN.")]
    InvalidCredentials,

    #[error("Recipient {0} not found. Please check the phone number.")]
    RecipientNotFound(String),

    #[error("Insufficient balance: {available} available, {required} required")]
    InsufficientBalance { available: Decimal, required: Decimal },

    #[error("{0} is required")]
    MissingRequiredField(&'static str),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("Cannot transfer to your own account.")]
    SelfTransfer,

    #[error("Account not found")]
    AccountNotFound,

    #[error("storage failure: {0}")]
    Storage(String),
}

impl LedgerError {
    pub fn code(&self) -> &'static str {
        match self {
            LedgerError::DuplicatePhone => "duplicate_phone",
            LedgerError::InvalidCredentials => "invalid_credentials",
            LedgerError::RecipientNotFound(_) => "recipient_not_found",
            LedgerError::InsufficientBalance { .. } => "insufficient_balance",
            LedgerError::MissingRequiredField(_) => "missing_required_field",
            LedgerError::InvalidAmount(_) => "invalid_amount",
            LedgerError::Validation(_) => "validation_error",
            LedgerError::SelfTransfer => "self_transfer",
            LedgerError::AccountNotFound => "account_not_found",
            LedgerError::Storage(_) => "storage_error",
        }
    }
}

impl From<DomainError> for LedgerError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::InvalidAmount(msg) => LedgerError::InvalidAmount(msg),
            DomainError::InvalidId(msg) => LedgerError::Validation(msg),
        }
    }
}
