//! `ucash-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! identifiers, money rounding and the shared error model.

pub mod entity;
pub mod error;
pub mod id;
pub mod money;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{AccountId, SessionId, TransactionId};
pub use money::{CURRENCY_SCALE, MAX_AMOUNT, is_currency_precise, round_currency, validate_amount};
