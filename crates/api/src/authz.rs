//! API-side authorization guard.
//!
//! Checked at the route boundary, before the ledger service is called.

use ucash_auth::{AuthzError, Permission, authorize};

use crate::context::SessionContext;

pub fn require(ctx: &SessionContext, permission: Permission) -> Result<(), AuthzError> {
    authorize(ctx.role(), permission).inspect_err(|_| {
        tracing::warn!(
            account_id = %ctx.account_id(),
            role = %ctx.role(),
            permission = permission.as_str(),
            "access denied"
        )
    })
}
