// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Repository layer: record types, store traits and in-memory stores.
//!
//! Each repository defines the stored entity, the async trait callers
//! depend on, and the in-memory implementation used by the server.

pub mod transactions;
pub mod users;
pub mod wallets;

pub use transactions::{
    Direction, InMemoryTransactionStore, TransactionRecord, TransactionStore, TxStatus,
};
pub use users::{InMemoryUserStore, UserRecord, UserStore};
pub use wallets::{Currency, InMemoryWalletStore, WalletKind, WalletRecord, WalletStore};
