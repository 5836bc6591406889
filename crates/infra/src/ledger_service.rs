//! Ledger Store: the application service behind every wallet operation.
//!
//! ```text
//! request
//!   ↓
//! 1. Load initiator (and resolve the recipient phone, if any)
//!   ↓
//! 2. Decide (pure: fee, balance check, credit target)
//!   ↓
//! 3. Apply to the loaded accounts
//!   ↓
//! 4. Commit balances + record in one repository call
//! ```
//!
//! The service holds no "current user": callers pass the [`Session`] they
//! got from [`LedgerService::authenticate`] / [`LedgerService::register`].

use std::sync::{Mutex, PoisonError};

use chrono::Utc;
use rust_decimal::Decimal;

use ucash_auth::{PinHash, Role};
use ucash_core::{AccountId, TransactionId};
use ucash_wallet::{
    Account, AdminSnapshot, LedgerError, LedgerResult, NewAccount, PostingPlan, PostingPolicy,
    PostingRequest, Session, TransactionRecord,
};

use crate::repository::{LedgerRepository, RepositoryError};

/// Reserved administrator account, provisioned on the first login attempt
/// with its phone.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminSeed {
    pub phone: String,
    pub pin: String,
    pub name: String,
    pub email: String,
    pub balance: Decimal,
}

impl Default for AdminSeed {
    fn default() -> Self {
        Self {
            phone: "01804985430".to_string(),
            pin: "558510".to_string(),
            name: "System Administrator".to_string(),
            email: "admin@ucash.com".to_string(),
            balance: Decimal::new(100_000_000, 2),
        }
    }
}

impl core::fmt::Debug for AdminSeed {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AdminSeed")
            .field("phone", &self.phone)
            .field("pin", &"<redacted>")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("balance", &self.balance)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerSettings {
    /// Opening balance of every registered account.
    pub signup_bonus: Decimal,
    pub admin: AdminSeed,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            signup_bonus: Decimal::new(50_000, 2),
            admin: AdminSeed::default(),
        }
    }
}

impl LedgerSettings {
    /// CASH_OUT without an explicit agent goes to the administrator.
    pub fn posting_policy(&self) -> PostingPolicy {
        PostingPolicy {
            cash_out_agent_phone: self.admin.phone.clone(),
        }
    }
}

/// Result of a successful posting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posted {
    pub record: TransactionRecord,
    /// Initiator as committed (balance after the posting).
    pub initiator: Account,
}

pub struct LedgerService<R> {
    repo: R,
    settings: LedgerSettings,
    policy: PostingPolicy,
    /// Held across load → decide → commit so concurrent postings never
    /// decide against the same balance.
    posting_lock: Mutex<()>,
}

impl<R: LedgerRepository> LedgerService<R> {
    pub fn new(repo: R, settings: LedgerSettings) -> Self {
        let policy = settings.posting_policy();
        Self {
            repo,
            settings,
            policy,
            posting_lock: Mutex::new(()),
        }
    }

    pub fn settings(&self) -> &LedgerSettings {
        &self.settings
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Verify phone + PIN and establish a session.
    ///
    /// The reserved administrator phone provisions its account on first use.
    pub fn authenticate(&self, phone: &str, pin: &str) -> LedgerResult<Session> {
        let phone = phone.trim();
        if phone == self.settings.admin.phone {
            self.ensure_admin()?;
        }

        let account = self
            .repo
            .account_by_phone(phone)?
            .filter(|a| a.verify_pin(pin))
            .ok_or_else(|| {
                tracing::warn!(phone, "login rejected");
                LedgerError::InvalidCredentials
            })?;

        tracing::info!(account_id = %account.id, role = %account.role, "login succeeded");
        Ok(Session::start(account, Utc::now()))
    }

    /// Create a USER account funded with the signup bonus and establish a session.
    pub fn register(&self, input: NewAccount) -> LedgerResult<Session> {
        let account = input.into_account(self.settings.signup_bonus, Utc::now())?;

        if account.phone == self.settings.admin.phone {
            tracing::warn!(phone = %account.phone, "registration with reserved phone rejected");
            return Err(LedgerError::DuplicatePhone);
        }

        self.repo.insert_account(account.clone()).map_err(|e| {
            match &e {
                RepositoryError::DuplicatePhone(phone) => {
                    tracing::warn!(%phone, "registration rejected: phone already registered")
                }
                other => tracing::error!(error = %other, "registration failed"),
            }
            LedgerError::from(e)
        })?;

        tracing::info!(account_id = %account.id, "account registered");
        Ok(Session::start(account, Utc::now()))
    }

    /// Re-check the PIN of an already authenticated account.
    pub fn confirm_pin(&self, account_id: AccountId, pin: &str) -> LedgerResult<()> {
        let account = self.account(account_id)?;
        if account.verify_pin(pin) {
            Ok(())
        } else {
            tracing::warn!(%account_id, "PIN confirmation failed");
            Err(LedgerError::InvalidCredentials)
        }
    }

    pub fn account(&self, account_id: AccountId) -> LedgerResult<Account> {
        self.repo.account(account_id)?.ok_or(LedgerError::AccountNotFound)
    }

    /// Apply `request` on behalf of `account_id` and record it.
    ///
    /// On failure nothing is written: no balance changes, no record.
    pub fn post(&self, account_id: AccountId, request: PostingRequest) -> LedgerResult<Posted> {
        let kind = request.kind;
        let amount = request.amount;
        self.try_post(account_id, request)
            .inspect(|posted| {
                tracing::info!(
                    %account_id,
                    transaction_id = %posted.record.transaction_id(),
                    %kind,
                    %amount,
                    fee = %posted.record.fee(),
                    "posting committed"
                )
            })
            .inspect_err(|err| match err {
                LedgerError::Storage(msg) => {
                    tracing::error!(%account_id, %kind, error = %msg, "posting failed")
                }
                other => {
                    tracing::warn!(%account_id, %kind, %amount, code = other.code(), "posting rejected")
                }
            })
    }

    fn try_post(&self, account_id: AccountId, request: PostingRequest) -> LedgerResult<Posted> {
        let _guard = self.posting_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut initiator = self.account(account_id)?;
        let counterparty = request.counterparty(initiator.role, &self.policy)?;
        let mut recipient = match counterparty.phone_to_resolve() {
            Some(phone) => self.repo.account_by_phone(phone)?,
            None => None,
        };

        let plan = PostingPlan::decide(&initiator, &request, counterparty, recipient.as_ref())?;
        plan.apply(&mut initiator, recipient.as_mut())?;

        let mut updated = Vec::with_capacity(2);
        if plan.changes_initiator() {
            updated.push(initiator.clone());
        }
        if plan.credits_recipient() {
            updated.extend(recipient);
        }

        let record = plan.into_record(TransactionId::new(), initiator.id, Utc::now());
        self.repo.commit_posting(updated, record.clone())?;

        Ok(Posted { record, initiator })
    }

    /// Post from the session's account and rewrite the session snapshot.
    pub fn post_in_session(
        &self,
        session: &mut Session,
        request: PostingRequest,
    ) -> LedgerResult<TransactionRecord> {
        let posted = self.post(session.account_id(), request)?;
        session.absorb(&posted.initiator);
        Ok(posted.record)
    }

    /// Reload the session snapshot from the backing account.
    pub fn refresh_session(&self, session: &mut Session) -> LedgerResult<()> {
        let account = self.account(session.account_id())?;
        session.absorb(&account);
        Ok(())
    }

    /// Records the account initiated or received (by its current phone), newest first.
    pub fn list_transactions(&self, account_id: AccountId) -> LedgerResult<Vec<TransactionRecord>> {
        let account = self.account(account_id)?;
        Ok(self.repo.transactions_involving(account.id, &account.phone)?)
    }

    pub fn admin_snapshot(&self) -> LedgerResult<AdminSnapshot> {
        let accounts = self.repo.accounts()?;
        let transactions = self.repo.transactions()?;
        AdminSnapshot::compute(accounts, transactions)
    }

    fn ensure_admin(&self) -> LedgerResult<()> {
        let seed = &self.settings.admin;
        if self.repo.account_by_phone(&seed.phone)?.is_some() {
            return Ok(());
        }

        let pin_hash = PinHash::new(&seed.pin).map_err(|_| LedgerError::MissingRequiredField("pin"))?;
        let admin = Account {
            id: AccountId::new(),
            name: seed.name.clone(),
            phone: seed.phone.clone(),
            email: seed.email.clone(),
            pin_hash,
            balance: seed.balance,
            avatar_url: None,
            is_kyc_verified: true,
            role: Role::Admin,
            created_at: Utc::now(),
        };
        let admin_id = admin.id;

        match self.repo.insert_account(admin) {
            Ok(()) => {
                tracing::info!(account_id = %admin_id, "administrator account provisioned");
                Ok(())
            }
            // Provisioned concurrently; the existing account wins.
            Err(RepositoryError::DuplicatePhone(_)) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
