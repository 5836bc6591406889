use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ucash_auth::Role;
use ucash_core::{AccountId, Entity, SessionId};

use crate::Account;

/// An authenticated session.
///
/// Holds a denormalized snapshot of the account taken when the session was
/// established. The snapshot is only rewritten through [`Session::absorb`]
/// (after a posting, or an explicit refresh), never implicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    id: SessionId,
    account: Account,
    started_at: DateTime<Utc>,
}

impl Session {
    pub fn start(account: Account, now: DateTime<Utc>) -> Self {
        Self {
            id: SessionId::new(),
            account,
            started_at: now,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    pub fn account_id(&self) -> AccountId {
        self.account.id
    }

    pub fn role(&self) -> Role {
        self.account.role
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Replace the snapshot when `account` is this session's account.
    ///
    /// Returns whether the snapshot was rewritten.
    pub fn absorb(&mut self, account: &Account) -> bool {
        if !self.account.is_same_entity(account) {
            return false;
        }
        self.account = account.clone();
        true
    }
}
