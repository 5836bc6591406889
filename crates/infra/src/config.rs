//! Process configuration, read from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use rust_decimal::Decimal;

use ucash_ai::GeminiConfig;

use crate::ledger_service::{AdminSeed, LedgerSettings};

const DEV_JWT_SECRET: &str = "ucash-dev-secret";

/// Where ledger and session blobs live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// Lost on restart.
    Memory,
    /// One JSON file per key under this directory.
    Directory(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletConfig {
    pub bind_addr: SocketAddr,
    pub storage: StorageBackend,
    pub ledger: LedgerSettings,
    /// Artificial delay before register/login/posting responses.
    pub simulated_latency: Duration,
    pub jwt_secret: String,
    pub session_ttl: chrono::Duration,
    pub gemini: GeminiConfig,
}

impl WalletConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let bind_addr = get("UCASH_BIND_ADDR")
            .unwrap_or_else(|| "0.0.0.0:8080".to_string())
            .parse::<SocketAddr>()
            .context("UCASH_BIND_ADDR must be a socket address")?;

        let storage = match get("UCASH_DATA_DIR") {
            Some(dir) => StorageBackend::Directory(PathBuf::from(dir)),
            None => StorageBackend::Memory,
        };

        let defaults = LedgerSettings::default();
        let signup_bonus = decimal(get("UCASH_SIGNUP_BONUS"), "UCASH_SIGNUP_BONUS")?
            .unwrap_or(defaults.signup_bonus);
        let admin_balance = decimal(get("UCASH_ADMIN_SEED_BALANCE"), "UCASH_ADMIN_SEED_BALANCE")?
            .unwrap_or(defaults.admin.balance);
        let ledger = LedgerSettings {
            signup_bonus,
            admin: AdminSeed {
                phone: get("UCASH_ADMIN_PHONE").unwrap_or(defaults.admin.phone),
                pin: get("UCASH_ADMIN_PIN").unwrap_or(defaults.admin.pin),
                balance: admin_balance,
                ..defaults.admin
            },
        };

        let latency_ms = match get("UCASH_SIMULATED_LATENCY_MS") {
            Some(raw) => raw
                .parse::<u64>()
                .context("UCASH_SIMULATED_LATENCY_MS must be a whole number of milliseconds")?,
            None => 0,
        };

        let jwt_secret = get("UCASH_JWT_SECRET").unwrap_or_else(|| {
            tracing::warn!("UCASH_JWT_SECRET not set; using insecure dev default");
            DEV_JWT_SECRET.to_string()
        });

        let session_ttl = match get("UCASH_SESSION_TTL_MINUTES") {
            Some(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|m| *m > 0)
                .and_then(chrono::Duration::try_minutes)
                .context("UCASH_SESSION_TTL_MINUTES must be a positive number of minutes")?,
            None => chrono::Duration::hours(12),
        };

        let mut gemini = GeminiConfig {
            api_key: get("GEMINI_API_KEY").or_else(|| get("API_KEY")),
            ..GeminiConfig::default()
        };
        if let Some(model) = get("UCASH_GEMINI_MODEL") {
            gemini.model = model;
        }
        if gemini.api_key.is_none() {
            tracing::warn!("no Gemini API key configured; the assistant will answer with a fallback");
        }

        Ok(Self {
            bind_addr,
            storage,
            ledger,
            simulated_latency: Duration::from_millis(latency_ms),
            jwt_secret,
            session_ttl,
            gemini,
        })
    }
}

fn decimal(raw: Option<String>, key: &str) -> anyhow::Result<Option<Decimal>> {
    raw.map(|v| {
        let value = v
            .parse::<Decimal>()
            .with_context(|| format!("{key} must be a decimal amount"))?;
        anyhow::ensure!(value >= Decimal::ZERO, "{key} must not be negative");
        Ok(value)
    })
    .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> anyhow::Result<WalletConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        WalletConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.bind_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(cfg.storage, StorageBackend::Memory);
        assert_eq!(cfg.ledger, LedgerSettings::default());
        assert_eq!(cfg.simulated_latency, Duration::ZERO);
        assert_eq!(cfg.jwt_secret, DEV_JWT_SECRET);
        assert_eq!(cfg.session_ttl, chrono::Duration::hours(12));
        assert_eq!(cfg.gemini.api_key, None);
        assert_eq!(cfg.gemini.model, ucash_ai::gemini::DEFAULT_MODEL);
    }

    #[test]
    fn overrides_are_read() {
        let cfg = config(&[
            ("UCASH_BIND_ADDR", "127.0.0.1:9000"),
            ("UCASH_DATA_DIR", "/var/lib/ucash"),
            ("UCASH_SIGNUP_BONUS", "250.50"),
            ("UCASH_ADMIN_PHONE", "01900000000"),
            ("UCASH_ADMIN_PIN", "123456"),
            ("UCASH_SIMULATED_LATENCY_MS", "800"),
            ("UCASH_JWT_SECRET", "s3cret"),
            ("UCASH_SESSION_TTL_MINUTES", "30"),
            ("API_KEY", "key-from-fallback"),
            ("UCASH_GEMINI_MODEL", "gemini-pro"),
        ])
        .unwrap();

        assert_eq!(cfg.storage, StorageBackend::Directory(PathBuf::from("/var/lib/ucash")));
        assert_eq!(cfg.ledger.signup_bonus, "250.50".parse::<Decimal>().unwrap());
        assert_eq!(cfg.ledger.admin.phone, "01900000000");
        assert_eq!(cfg.ledger.admin.pin, "123456");
        assert_eq!(cfg.ledger.admin.name, "System Administrator");
        assert_eq!(cfg.simulated_latency, Duration::from_millis(800));
        assert_eq!(cfg.session_ttl, chrono::Duration::minutes(30));
        assert_eq!(cfg.gemini.api_key.as_deref(), Some("key-from-fallback"));
        assert_eq!(cfg.gemini.model, "gemini-pro");
    }

    #[test]
    fn gemini_key_takes_precedence() {
        let cfg = config(&[("GEMINI_API_KEY", "primary"), ("API_KEY", "secondary")]).unwrap();
        assert_eq!(cfg.gemini.api_key.as_deref(), Some("primary"));
    }

    #[test]
    fn malformed_values_are_errors() {
        assert!(config(&[("UCASH_BIND_ADDR", "nowhere")]).is_err());
        assert!(config(&[("UCASH_SIGNUP_BONUS", "lots")]).is_err());
        assert!(config(&[("UCASH_SIGNUP_BONUS", "-1")]).is_err());
        assert!(config(&[("UCASH_SESSION_TTL_MINUTES", "0")]).is_err());
        assert!(config(&[("UCASH_SIMULATED_LATENCY_MS", "fast")]).is_err());
    }
}
