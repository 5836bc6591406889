use thiserror::Error;

use crate::{Permission, Role};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: role {role} lacks permission '{permission}'")]
    Forbidden { role: Role, permission: Permission },
}

/// Authorize a role for a permission.
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check)
pub fn authorize(role: Role, required: Permission) -> Result<(), AuthzError> {
    if Permission::granted_to(role).contains(&required) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden {
            role,
            permission: required,
        })
    }
}
