// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Registered user accounts.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use utoipa::ToSchema;

use crate::storage::{StorageError, StorageResult};

/// A registered user. The password hash is never serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Unique user identifier (UUID), carried as `userId` in tokens
    pub id: String,
    /// Display name
    pub name: String,
    /// Login email, stored lowercased
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
    /// When the account was registered
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Store a new user. Fails if the id or the email is taken.
    async fn insert(&self, user: UserRecord) -> StorageResult<()>;

    async fn get(&self, id: &str) -> StorageResult<Option<UserRecord>>;

    async fn find_by_email(&self, email: &str) -> StorageResult<Option<UserRecord>>;
}

#[derive(Default)]
struct Users {
    by_id: HashMap<String, UserRecord>,
    /// email -> id
    by_email: HashMap<String, String>,
}

/// Process-local user accounts.
#[derive(Default, Clone)]
pub struct InMemoryUserStore {
    users: Arc<RwLock<Users>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn insert(&self, user: UserRecord) -> StorageResult<()> {
        let mut users = self.users.write().await;
        if users.by_email.contains_key(&user.email) {
            return Err(StorageError::AlreadyExists(format!("User {}", user.email)));
        }
        if users.by_id.contains_key(&user.id) {
            return Err(StorageError::AlreadyExists(format!("User {}", user.id)));
        }
        users.by_email.insert(user.email.clone(), user.id.clone());
        users.by_id.insert(user.id.clone(), user);
        Ok(())
    }

    async fn get(&self, id: &str) -> StorageResult<Option<UserRecord>> {
        Ok(self.users.read().await.by_id.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> StorageResult<Option<UserRecord>> {
        let users = self.users.read().await;
        Ok(users
            .by_email
            .get(email)
            .and_then(|id| users.by_id.get(id))
            .cloned())
    }
}
