// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet registry records.
//!
//! A wallet here is only metadata: owner, currency, a mock address and a
//! balance. No key material is generated or stored.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use utoipa::ToSchema;

use super::super::{OwnedResource, StorageError, StorageResult};

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Btc,
    Eth,
    Ltc,
    Bch,
    Ada,
    Dot,
}

impl Currency {
    /// Ticker code as used on the wire.
    pub fn code(self) -> &'static str {
        match self {
            Currency::Btc => "BTC",
            Currency::Eth => "ETH",
            Currency::Ltc => "LTC",
            Currency::Bch => "BCH",
            Currency::Ada => "ADA",
            Currency::Dot => "DOT",
        }
    }

    /// Parse a ticker code (case-insensitive, surrounding whitespace ignored).
    pub fn from_code(code: &str) -> Option<Currency> {
        match code.trim().to_uppercase().as_str() {
            "BTC" => Some(Currency::Btc),
            "ETH" => Some(Currency::Eth),
            "LTC" => Some(Currency::Ltc),
            "BCH" => Some(Currency::Bch),
            "ADA" => Some(Currency::Ada),
            "DOT" => Some(Currency::Dot),
            _ => None,
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Custody style chosen at wallet creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum WalletKind {
    Hot,
    Cold,
}

impl WalletKind {
    pub fn from_str(s: &str) -> Option<WalletKind> {
        match s.trim().to_lowercase().as_str() {
            "hot" => Some(WalletKind::Hot),
            "cold" => Some(WalletKind::Cold),
            _ => None,
        }
    }
}

/// Wallet metadata as stored and returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WalletRecord {
    /// Unique wallet identifier (UUID)
    pub id: String,
    /// User who owns this wallet
    pub user_id: String,
    /// Human-readable name
    pub name: String,
    /// Wallet currency
    pub currency: Currency,
    /// Hot or cold
    #[serde(rename = "type")]
    pub kind: WalletKind,
    /// Mock receiving address
    pub address: String,
    /// Simulated balance
    pub balance: f64,
    /// When the wallet was created
    pub created_at: DateTime<Utc>,
    /// When the wallet was last renamed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl OwnedResource for WalletRecord {
    fn owner_user_id(&self) -> &str {
        &self.user_id
    }
}

/// Storage abstraction for the wallet registry.
#[async_trait]
pub trait WalletStore: Send + Sync {
    async fn insert(&self, wallet: WalletRecord) -> StorageResult<()>;

    async fn get(&self, id: &str) -> StorageResult<Option<WalletRecord>>;

    /// All wallets owned by `user_id`, oldest first.
    async fn list_by_owner(&self, user_id: &str) -> StorageResult<Vec<WalletRecord>>;

    /// Replace an existing wallet. Returns `false` if the id is unknown.
    async fn update(&self, wallet: WalletRecord) -> StorageResult<bool>;

    async fn remove(&self, id: &str) -> StorageResult<Option<WalletRecord>>;
}

/// Process-local wallet registry.
#[derive(Default, Clone)]
pub struct InMemoryWalletStore {
    wallets: Arc<RwLock<HashMap<String, WalletRecord>>>,
}

impl InMemoryWalletStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WalletStore for InMemoryWalletStore {
    async fn insert(&self, wallet: WalletRecord) -> StorageResult<()> {
        let mut wallets = self.wallets.write().await;
        if wallets.contains_key(&wallet.id) {
            return Err(StorageError::AlreadyExists(format!("Wallet {}", wallet.id)));
        }
        wallets.insert(wallet.id.clone(), wallet);
        Ok(())
    }

    async fn get(&self, id: &str) -> StorageResult<Option<WalletRecord>> {
        Ok(self.wallets.read().await.get(id).cloned())
    }

    async fn list_by_owner(&self, user_id: &str) -> StorageResult<Vec<WalletRecord>> {
        let wallets = self.wallets.read().await;
        let mut owned: Vec<WalletRecord> = wallets
            .values()
            .filter(|wallet| wallet.is_owned_by(user_id))
            .cloned()
            .collect();
        owned.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(owned)
    }

    async fn update(&self, wallet: WalletRecord) -> StorageResult<bool> {
        let mut wallets = self.wallets.write().await;
        match wallets.get_mut(&wallet.id) {
            Some(existing) => {
                *existing = wallet;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove(&self, id: &str) -> StorageResult<Option<WalletRecord>> {
        Ok(self.wallets.write().await.remove(id))
    }
}
