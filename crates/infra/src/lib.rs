//! Infrastructure layer: blob storage, ledger tables, sessions, config.

pub mod blob;
pub mod config;
pub mod ledger_service;
pub mod repository;
pub mod session_store;
pub mod storage;

pub use config::{StorageBackend, WalletConfig};
pub use ledger_service::{AdminSeed, LedgerService, LedgerSettings, Posted};
pub use repository::{LedgerRepository, RepositoryError};
pub use session_store::SessionStore;
pub use storage::{Storage, open_storage};
