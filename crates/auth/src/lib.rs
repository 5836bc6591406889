//! `ucash-auth`: credential and authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: it knows how
//! to hash and verify PINs, how to mint and check session tokens, and which
//! role may do what. It never looks up an account.

pub mod authorize;
pub mod claims;
pub mod permissions;
pub mod pin;
pub mod roles;

pub use authorize::{AuthzError, authorize};
pub use claims::{Hs256Tokens, SessionClaims, TokenError, TokenValidationError, validate_claims};
pub use permissions::Permission;
pub use pin::{PinError, PinHash};
pub use roles::Role;
