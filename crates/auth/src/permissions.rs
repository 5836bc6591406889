use serde::{Deserialize, Serialize};

use crate::Role;

/// Capability checked at the API boundary before a wallet operation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Post transactions from one's own account.
    Transact,
    /// Credit another account without a matching debit (admin cash-in).
    MintCashIn,
    /// Read every account and transaction.
    ViewAdminDashboard,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::Transact => "wallet.transact",
            Permission::MintCashIn => "wallet.mint_cash_in",
            Permission::ViewAdminDashboard => "admin.dashboard",
        }
    }

    /// Permissions granted to a role.
    pub fn granted_to(role: Role) -> &'static [Permission] {
        match role {
            Role::Admin => &[
                Permission::Transact,
                Permission::MintCashIn,
                Permission::ViewAdminDashboard,
            ],
            Role::User | Role::Agent | Role::Merchant => &[Permission::Transact],
        }
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
