// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transaction records and the ledger's record store.
//!
//! The in-memory store is append-only from the API's point of view: records
//! are inserted on send, replaced in place by the confirmation task, and
//! only removed through [`TransactionStore::remove`], which no HTTP route
//! exposes.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use utoipa::ToSchema;

use super::super::{OwnedResource, StorageError, StorageResult};

/// Transaction status.
///
/// Only `Pending` and `Confirmed` are ever produced; `Failed` and
/// `Cancelled` are part of the wire format but have no trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    /// Recorded, waiting for the scheduled confirmation
    Pending,
    /// Confirmation delay elapsed
    Confirmed,
    /// Reserved
    Failed,
    /// Reserved
    Cancelled,
}

impl TxStatus {
    /// Whether moving from `self` to `next` is a legal forward transition.
    pub fn can_transition_to(self, next: TxStatus) -> bool {
        matches!(
            (self, next),
            (TxStatus::Pending, TxStatus::Confirmed)
                | (TxStatus::Pending, TxStatus::Failed)
                | (TxStatus::Pending, TxStatus::Cancelled)
        )
    }

    /// Terminal states never change again.
    pub fn is_terminal(self) -> bool {
        !matches!(self, TxStatus::Pending)
    }
}

impl std::fmt::Display for TxStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TxStatus::Pending => write!(f, "pending"),
            TxStatus::Confirmed => write!(f, "confirmed"),
            TxStatus::Failed => write!(f, "failed"),
            TxStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Direction of a transaction relative to the owning wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Outgoing
    Sent,
    /// Incoming
    Received,
}

/// A ledger entry for one send/receive event and its confirmation state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    /// Unique transaction identifier (UUID)
    pub id: String,
    /// Mock transaction hash (`0x` + 64 hex chars)
    pub hash: String,
    /// User who submitted the transaction
    pub user_id: String,
    /// Wallet the transaction was sent from
    pub wallet_id: String,
    /// Direction relative to the wallet
    #[serde(rename = "type")]
    pub direction: Direction,
    /// Amount transferred
    pub amount: f64,
    /// Currency code (e.g., "BTC")
    pub currency: String,
    /// Sender address
    pub from_address: String,
    /// Recipient address
    pub to_address: String,
    /// Optional free-text note
    pub note: Option<String>,
    /// Current status
    pub status: TxStatus,
    /// Simulated confirmation depth
    pub confirmations: u32,
    /// Network fee charged
    pub fee: f64,
    /// Creation timestamp
    pub date: DateTime<Utc>,
}

impl TransactionRecord {
    /// Mark the transaction as confirmed.
    ///
    /// Returns `false` and leaves the record untouched unless it is pending.
    pub fn mark_confirmed(&mut self, confirmations: u32) -> bool {
        if !self.status.can_transition_to(TxStatus::Confirmed) {
            return false;
        }
        self.status = TxStatus::Confirmed;
        self.confirmations = confirmations;
        true
    }
}

impl OwnedResource for TransactionRecord {
    fn owner_user_id(&self) -> &str {
        &self.user_id
    }
}

/// Storage abstraction for ledger records.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Append a new record. Identifier and hash must both be unused.
    async fn insert(&self, record: TransactionRecord) -> StorageResult<()>;

    /// Fetch a record by identifier, regardless of owner.
    async fn get(&self, id: &str) -> StorageResult<Option<TransactionRecord>>;

    /// Replace an existing record. Returns `false` if the id is unknown.
    async fn update(&self, record: TransactionRecord) -> StorageResult<bool>;

    /// All records owned by `user_id`, newest first.
    async fn list_by_owner(&self, user_id: &str) -> StorageResult<Vec<TransactionRecord>>;

    /// Remove a record, returning it if it existed.
    async fn remove(&self, id: &str) -> StorageResult<Option<TransactionRecord>>;

    /// Number of stored records.
    async fn len(&self) -> StorageResult<usize>;
}

#[derive(Default)]
struct TransactionTable {
    records: HashMap<String, TransactionRecord>,
    order: Vec<String>,
    hashes: HashSet<String>,
}

/// Process-local transaction store.
#[derive(Default, Clone)]
pub struct InMemoryTransactionStore {
    inner: Arc<RwLock<TransactionTable>>,
}

impl InMemoryTransactionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TransactionStore for InMemoryTransactionStore {
    async fn insert(&self, record: TransactionRecord) -> StorageResult<()> {
        let mut table = self.inner.write().await;
        if table.records.contains_key(&record.id) {
            return Err(StorageError::AlreadyExists(format!("Transaction {}", record.id)));
        }
        if table.hashes.contains(&record.hash) {
            return Err(StorageError::DuplicateHash(record.hash));
        }
        table.hashes.insert(record.hash.clone());
        table.order.push(record.id.clone());
        table.records.insert(record.id.clone(), record);
        Ok(())
    }

    async fn get(&self, id: &str) -> StorageResult<Option<TransactionRecord>> {
        let table = self.inner.read().await;
        Ok(table.records.get(id).cloned())
    }

    async fn update(&self, record: TransactionRecord) -> StorageResult<bool> {
        let mut table = self.inner.write().await;
        let Some(existing) = table.records.get_mut(&record.id) else {
            return Ok(false);
        };
        let previous_hash = std::mem::replace(existing, record).hash;
        let current_hash = existing.hash.clone();
        if previous_hash != current_hash {
            table.hashes.remove(&previous_hash);
            table.hashes.insert(current_hash);
        }
        Ok(true)
    }

    async fn list_by_owner(&self, user_id: &str) -> StorageResult<Vec<TransactionRecord>> {
        let table = self.inner.read().await;
        // Walk newest-inserted first so the stable sort breaks timestamp ties
        // in favour of the most recent insert.
        let mut records: Vec<TransactionRecord> = table
            .order
            .iter()
            .rev()
            .filter_map(|id| table.records.get(id))
            .filter(|record| record.is_owned_by(user_id))
            .cloned()
            .collect();
        records.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(records)
    }

    async fn remove(&self, id: &str) -> StorageResult<Option<TransactionRecord>> {
        let mut table = self.inner.write().await;
        let removed = table.records.remove(id);
        if let Some(record) = &removed {
            table.hashes.remove(&record.hash);
            table.order.retain(|existing| existing != id);
        }
        Ok(removed)
    }

    async fn len(&self) -> StorageResult<usize> {
        Ok(self.inner.read().await.records.len())
    }
}
