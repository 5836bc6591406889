//! `ucash-ai`
//!
//! **Responsibility:** the chat assistant's advice collaborator.
//!
//! This crate is intentionally **not** part of the wallet domain:
//! - It does not depend on wallet types; callers hand it a plain snapshot.
//! - It never mutates balances or records.
//! - Every failure turns into a fixed user-facing sentence, never an error.

pub mod advisor;
pub mod gemini;
pub mod prompt;
pub mod result;

pub use advisor::{Advisor, advise_or_fallback};
pub use gemini::{GeminiAdvisor, GeminiConfig};
pub use prompt::{AdviceRequest, TransactionLine, MAX_CONTEXT_TRANSACTIONS};
pub use result::{AiError, FALLBACK_EMPTY, FALLBACK_MISSING_KEY, FALLBACK_UNAVAILABLE};
