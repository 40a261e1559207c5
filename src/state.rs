// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;
use std::time::Instant;

use ring::rand::SystemRandom;
use tokio_util::sync::CancellationToken;

use crate::api::rate_limit::ApiRateLimiter;
use crate::auth::AuthConfig;
use crate::config::Config;
use crate::ledger::TransactionLedger;
use crate::storage::{
    InMemoryTransactionStore, InMemoryUserStore, InMemoryWalletStore, TransactionStore, UserStore,
    WalletStore,
};

#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<TransactionLedger>,
    pub wallets: Arc<dyn WalletStore>,
    pub users: Arc<dyn UserStore>,
    pub auth: AuthConfig,
    pub rate_limiter: Arc<ApiRateLimiter>,
    pub rng: SystemRandom,
    /// CORS origins; `None` allows any origin.
    pub allowed_origins: Option<Vec<String>>,
    /// Cancelled on shutdown. Pending confirmations hang off this token.
    pub shutdown: CancellationToken,
    pub started_at: Instant,
}

impl AppState {
    /// State backed by fresh in-memory stores.
    pub fn from_config(config: &Config) -> Self {
        Self::with_stores(
            config,
            Arc::new(InMemoryTransactionStore::new()),
            Arc::new(InMemoryWalletStore::new()),
            Arc::new(InMemoryUserStore::new()),
        )
    }

    pub fn with_stores(
        config: &Config,
        transactions: Arc<dyn TransactionStore>,
        wallets: Arc<dyn WalletStore>,
        users: Arc<dyn UserStore>,
    ) -> Self {
        let shutdown = CancellationToken::new();
        let ledger = TransactionLedger::new(
            transactions,
            Arc::clone(&wallets),
            config.ledger_settings(),
            shutdown.child_token(),
        );

        Self {
            ledger: Arc::new(ledger),
            wallets,
            users,
            auth: AuthConfig::from_secret(&config.jwt_secret),
            rate_limiter: Arc::new(ApiRateLimiter::new(config.rate_limit)),
            rng: SystemRandom::new(),
            allowed_origins: config.allowed_origins.clone(),
            shutdown,
            started_at: Instant::now(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
