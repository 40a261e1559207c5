// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! Record stores for users, wallets and ledger transactions.
//!
//! Stores are expressed as async traits ([`TransactionStore`], [`WalletStore`],
//! [`UserStore`]) so that handlers and the ledger only ever hold an
//! `Arc<dyn ...Store>`.
//! The in-memory implementations are the only backing stores shipped; they
//! live for the lifetime of the process and nothing survives a restart.
//!
//! ## Layout
//!
//! ```text
//! InMemoryTransactionStore
//!   records:  id   -> TransactionRecord
//!   order:    [id] (insertion order)
//!   hashes:   {hash}
//! InMemoryWalletStore
//!   wallets:  id   -> WalletRecord
//! InMemoryUserStore
//!   by_id:    id    -> UserRecord
//!   by_email: email -> id
//! ```

use thiserror::Error;

pub mod ownership;
pub mod repository;

pub use ownership::{OwnedBy, OwnedResource};
pub use repository::{
    Currency, Direction, InMemoryTransactionStore, InMemoryUserStore, InMemoryWalletStore,
    TransactionRecord, TransactionStore, TxStatus, UserRecord, UserStore, WalletKind,
    WalletRecord, WalletStore,
};

/// Error type for store operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A record with this identifier is already stored.
    #[error("Already exists: {0}")]
    AlreadyExists(String),
    /// Another transaction already carries this hash.
    #[error("Duplicate transaction hash: {0}")]
    DuplicateHash(String),
}

/// Result type for store operations.
pub type StorageResult<T> = Result<T, StorageError>;
