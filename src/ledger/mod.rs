// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Transaction Ledger
//!
//! Records "sent" transactions and simulates their confirmation.
//!
//! ## Lifecycle
//!
//! 1. `submit` validates the request, synthesizes a hash and a sender
//!    address, stores the record as `pending` with 0 confirmations and
//!    returns it immediately.
//! 2. A confirmation is scheduled `confirmation_delay` after creation.
//! 3. When it fires, a record that still exists and is still pending becomes
//!    `confirmed` with `confirmation_count` confirmations. A record that has
//!    disappeared is skipped silently.
//!
//! `failed` and `cancelled` are never produced.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use ring::rand::SystemRandom;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::identifiers::{self, RandomnessError};
use crate::models::{EstimateFeeRequest, FeeEstimate, SendTransactionRequest};
use crate::storage::{
    Currency, Direction, OwnedBy, StorageError, TransactionRecord, TransactionStore, TxStatus,
    WalletStore,
};

pub mod fees;
pub mod scheduler;

pub use fees::Priority;
pub use scheduler::{ConfirmationScheduler, ScheduleError};

/// Maximum note length, in characters, after trimming.
pub const MAX_NOTE_LEN: usize = 500;

/// Default delay between submission and confirmation.
pub const DEFAULT_CONFIRMATION_DELAY: Duration = Duration::from_secs(30);

/// Default confirmation depth reported once confirmed.
pub const DEFAULT_CONFIRMATION_COUNT: u32 = 6;

/// Default network fee, also the base of fee estimates.
pub const DEFAULT_BASE_FEE: f64 = 0.0001;

/// Errors surfaced by ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Missing or invalid input.
    #[error("{0}")]
    Validation(String),
    /// Unknown identifier, or one owned by another user.
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Randomness(#[from] RandomnessError),
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

/// Tunables for the simulated network.
#[derive(Debug, Clone)]
pub struct LedgerSettings {
    pub confirmation_delay: Duration,
    pub confirmation_count: u32,
    pub base_fee: f64,
    /// Currency recorded when the sending wallet is not registered.
    pub fallback_currency: Currency,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            confirmation_delay: DEFAULT_CONFIRMATION_DELAY,
            confirmation_count: DEFAULT_CONFIRMATION_COUNT,
            base_fee: DEFAULT_BASE_FEE,
            fallback_currency: Currency::Btc,
        }
    }
}

/// A send request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedSend {
    pub wallet_id: String,
    pub to_address: String,
    pub amount: f64,
    pub note: Option<String>,
}

impl ValidatedSend {
    /// Check a raw send request.
    pub fn parse(request: &SendTransactionRequest) -> Result<Self, LedgerError> {
        let required = || {
            LedgerError::Validation(
                "Wallet ID, recipient address, and amount are required".to_string(),
            )
        };

        let wallet_id = non_blank(request.wallet_id.as_deref()).ok_or_else(required)?;
        let to_address = non_blank(request.to_address.as_deref()).ok_or_else(required)?;
        let amount = request.amount.as_ref().ok_or_else(required)?;

        let amount = match amount.value() {
            Some(value) if value > 0.0 => value,
            _ => {
                return Err(LedgerError::Validation(
                    "Amount must be greater than 0".to_string(),
                ))
            }
        };

        let note = non_blank(request.note.as_deref());
        if note.as_ref().is_some_and(|n| n.chars().count() > MAX_NOTE_LEN) {
            return Err(LedgerError::Validation(format!(
                "Note cannot exceed {MAX_NOTE_LEN} characters"
            )));
        }

        Ok(Self {
            wallet_id,
            to_address,
            amount,
            note,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// The ledger service.
pub struct TransactionLedger {
    store: Arc<dyn TransactionStore>,
    wallets: Arc<dyn WalletStore>,
    scheduler: ConfirmationScheduler,
    settings: LedgerSettings,
    rng: SystemRandom,
}

impl TransactionLedger {
    /// Create a ledger. Pending confirmations are cancelled when `shutdown`
    /// is triggered.
    pub fn new(
        store: Arc<dyn TransactionStore>,
        wallets: Arc<dyn WalletStore>,
        settings: LedgerSettings,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            store,
            wallets,
            scheduler: ConfirmationScheduler::new(shutdown),
            settings,
            rng: SystemRandom::new(),
        }
    }

    pub fn scheduler(&self) -> &ConfirmationScheduler {
        &self.scheduler
    }

    /// Record a new outgoing transaction and schedule its confirmation.
    pub async fn submit(
        &self,
        caller_id: &str,
        request: &SendTransactionRequest,
    ) -> Result<TransactionRecord, LedgerError> {
        let send = ValidatedSend::parse(request)?;

        let wallet = self.wallets.get(&send.wallet_id).await?.owned_by(caller_id);
        let (currency, from_address) = match wallet {
            Some(wallet) => (wallet.currency, wallet.address),
            None => {
                debug!(
                    wallet_id = %send.wallet_id,
                    "Sending wallet not registered, using placeholder sender"
                );
                let currency = self.settings.fallback_currency;
                (currency, identifiers::wallet_address(&self.rng, currency)?)
            }
        };

        let record = TransactionRecord {
            id: uuid::Uuid::new_v4().to_string(),
            hash: identifiers::transaction_hash(&self.rng)?,
            user_id: caller_id.to_string(),
            wallet_id: send.wallet_id,
            direction: Direction::Sent,
            amount: send.amount,
            currency: currency.code().to_string(),
            from_address,
            to_address: send.to_address,
            note: send.note,
            status: TxStatus::Pending,
            confirmations: 0,
            fee: self.settings.base_fee,
            date: Utc::now(),
        };

        self.store.insert(record.clone()).await?;

        let scheduled = self.scheduler.schedule(
            record.id.clone(),
            self.settings.confirmation_delay,
            confirm(
                Arc::clone(&self.store),
                record.id.clone(),
                self.settings.confirmation_count,
            ),
        );
        match scheduled {
            Ok(()) => {}
            Err(ScheduleError::ShutDown) => warn!(
                transaction_id = %record.id,
                "Ledger is shutting down, confirmation not scheduled"
            ),
            Err(e) => {
                // A record that can never confirm is not kept.
                self.store.remove(&record.id).await?;
                return Err(e.into());
            }
        }

        info!(
            transaction_id = %record.id,
            user_id = %caller_id,
            wallet_id = %record.wallet_id,
            amount = record.amount,
            currency = %record.currency,
            "Transaction submitted"
        );

        Ok(record)
    }

    /// Fetch one of the caller's transactions.
    pub async fn get(&self, id: &str, caller_id: &str) -> Result<TransactionRecord, LedgerError> {
        self.store
            .get(id)
            .await?
            .owned_by(caller_id)
            .ok_or(LedgerError::NotFound("Transaction"))
    }

    /// All of the caller's transactions, newest first.
    pub async fn list(&self, caller_id: &str) -> Result<Vec<TransactionRecord>, LedgerError> {
        Ok(self.store.list_by_owner(caller_id).await?)
    }

    /// Transactions sent from one of the caller's wallets, newest first.
    pub async fn list_for_wallet(
        &self,
        wallet_id: &str,
        caller_id: &str,
    ) -> Result<Vec<TransactionRecord>, LedgerError> {
        self.wallets
            .get(wallet_id)
            .await?
            .owned_by(caller_id)
            .ok_or(LedgerError::NotFound("Wallet"))?;

        let mut records = self.store.list_by_owner(caller_id).await?;
        records.retain(|record| record.wallet_id == wallet_id);
        Ok(records)
    }

    /// Price a prospective transaction. Reads no state.
    pub fn estimate_fee(&self, request: &EstimateFeeRequest) -> Result<FeeEstimate, LedgerError> {
        let amount = request
            .amount
            .as_ref()
            .and_then(|amount| amount.value())
            .filter(|amount| *amount >= 0.0)
            .ok_or_else(|| {
                LedgerError::Validation("Amount must be a non-negative number".to_string())
            })?;

        Ok(fees::estimate(
            self.settings.base_fee,
            request.currency.clone(),
            amount,
            request.priority.as_deref(),
        ))
    }

    /// Cancel every pending confirmation.
    pub fn shutdown(&self) {
        let pending = self.scheduler.pending();
        self.scheduler.shutdown();
        info!(pending, "Ledger stopped, pending confirmations dropped");
    }
}

/// Deferred confirmation of a single record.
async fn confirm(store: Arc<dyn TransactionStore>, id: String, confirmations: u32) {
    let mut record = match store.get(&id).await {
        Ok(Some(record)) => record,
        Ok(None) => {
            debug!(transaction_id = %id, "Transaction gone before confirmation, skipping");
            return;
        }
        Err(e) => {
            warn!(transaction_id = %id, error = %e, "Failed to load transaction for confirmation");
            return;
        }
    };

    if !record.mark_confirmed(confirmations) {
        debug!(transaction_id = %id, status = %record.status, "Transaction no longer pending");
        return;
    }

    match store.update(record).await {
        Ok(true) => info!(transaction_id = %id, confirmations, "Transaction confirmed"),
        Ok(false) => debug!(transaction_id = %id, "Transaction removed during confirmation"),
        Err(e) => warn!(transaction_id = %id, error = %e, "Failed to store confirmation"),
    }
}
