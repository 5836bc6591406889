use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ucash_auth::{PinHash, Role};
use ucash_core::{AccountId, Entity};

use crate::{LedgerError, LedgerResult};

/// Wallet account.
///
/// # Invariants
/// - `balance` is never negative.
/// - `phone` is unique across accounts (enforced by the repository).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub pin_hash: PinHash,
    pub balance: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub is_kyc_verified: bool,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Registration input, validated before an [`Account`] is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub name: String,
    pub phone: String,
    pub pin: String,
    pub email: String,
}

impl NewAccount {
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        pin: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            pin: pin.into(),
            email: email.into(),
        }
    }

    /// Build a fresh USER account funded with `signup_bonus`.
    pub fn into_account(self, signup_bonus: Decimal, now: DateTime<Utc>) -> LedgerResult<Account> {
        let name = required(&self.name, "name")?;
        let phone = required(&self.phone, "phone")?;
        let email = required(&self.email, "email")?;
        if self.pin.trim().is_empty() {
            return Err(LedgerError::MissingRequiredField("pin"));
        }
        let pin_hash = PinHash::new(&self.pin).map_err(|_| LedgerError::MissingRequiredField("pin"))?;

        Ok(Account {
            id: AccountId::new(),
            name,
            phone,
            email,
            pin_hash,
            balance: signup_bonus,
            avatar_url: None,
            is_kyc_verified: false,
            role: Role::User,
            created_at: now,
        })
    }
}

fn required(value: &str, field: &'static str) -> LedgerResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::MissingRequiredField(field));
    }
    Ok(trimmed.to_string())
}

impl Account {
    pub fn verify_pin(&self, pin: &str) -> bool {
        self.pin_hash.verify(pin)
    }

    /// Credit `amount`, failing when the balance would leave the representable range.
    pub fn credit(&mut self, amount: Decimal) -> LedgerResult<()> {
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or_else(|| LedgerError::InvalidAmount("balance out of range".to_string()))?;
        Ok(())
    }

    /// Debit `amount`, failing (never clamping) when the balance would go negative.
    pub fn debit(&mut self, amount: Decimal) -> LedgerResult<()> {
        let remaining = self
            .balance
            .checked_sub(amount)
            .filter(|rest| *rest >= Decimal::ZERO)
            .ok_or(LedgerError::InsufficientBalance {
                available: self.balance,
                required: amount,
            })?;
        self.balance = remaining;
        Ok(())
    }
}

impl Entity for Account {
    type Id = AccountId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
