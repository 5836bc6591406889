use ucash_auth::Role;
use ucash_core::{AccountId, SessionId};
use ucash_wallet::Session;

/// Authenticated session for a request.
///
/// Inserted by the auth middleware; present on every protected route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    session: Session,
}

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub fn session_id(&self) -> SessionId {
        self.session.id()
    }

    pub fn account_id(&self) -> AccountId {
        self.session.account_id()
    }

    pub fn role(&self) -> Role {
        self.session.role()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn into_session(self) -> Session {
        self.session
    }
}
