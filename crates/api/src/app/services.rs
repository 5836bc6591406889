//! Runtime wiring: storage, ledger service, tokens, advisor.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use ucash_ai::{Advisor, GeminiAdvisor};
use ucash_auth::{Hs256Tokens, SessionClaims, TokenError};
use ucash_infra::{LedgerRepository, LedgerService, SessionStore, Storage, WalletConfig, open_storage};
use ucash_wallet::Session;

pub type WalletService = LedgerService<Arc<dyn LedgerRepository>>;

/// Everything a handler needs, shared behind one `Arc`.
pub struct AppServices {
    pub ledger: WalletService,
    pub sessions: Arc<dyn SessionStore>,
    pub tokens: Arc<Hs256Tokens>,
    pub advisor: Arc<dyn Advisor>,
    session_ttl: chrono::Duration,
    simulated_latency: Duration,
}

impl AppServices {
    pub fn new(config: &WalletConfig, storage: Storage, advisor: Arc<dyn Advisor>) -> Self {
        Self {
            ledger: LedgerService::new(storage.ledger, config.ledger.clone()),
            sessions: storage.sessions,
            tokens: Arc::new(Hs256Tokens::new(config.jwt_secret.as_bytes())),
            advisor,
            session_ttl: config.session_ttl,
            simulated_latency: config.simulated_latency,
        }
    }

    /// Token for `session`, valid for the configured TTL.
    pub fn issue_token(&self, session: &Session) -> Result<String, TokenError> {
        let claims = SessionClaims::new(
            session.account_id(),
            session.id(),
            session.role(),
            Utc::now(),
            self.session_ttl,
        );
        self.tokens.issue(&claims)
    }

    /// Artificial delay applied to the slow paths (register/login/posting).
    pub async fn simulate_latency(&self) {
        if !self.simulated_latency.is_zero() {
            tokio::time::sleep(self.simulated_latency).await;
        }
    }
}

pub fn build_services(config: &WalletConfig) -> anyhow::Result<AppServices> {
    let storage = open_storage(&config.storage)?;
    let advisor = Arc::new(GeminiAdvisor::new(config.gemini.clone())?);
    Ok(AppServices::new(config, storage, advisor))
}
