// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Confirmation Scheduler
//!
//! One-shot deferred actions keyed by transaction id.
//!
//! Every scheduled action runs in its own tokio task guarded by a child of
//! the scheduler's root `CancellationToken`, following the same shutdown
//! pattern as the other background tasks in this service:
//!
//! - [`ConfirmationScheduler::cancel`] aborts one pending action.
//! - [`ConfirmationScheduler::shutdown`] aborts all of them and refuses new
//!   ones.
//! - Scheduling an id that is already pending replaces the earlier action.
//!
//! Finished or cancelled tasks remove their own registry entry.
//!
//! A delay whose deadline cannot be represented is rejected up front.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Reasons an action could not be scheduled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("Scheduler is shut down")]
    ShutDown,
    #[error("Delay of {0:?} is out of range")]
    DelayOutOfRange(Duration),
}

struct Entry {
    generation: u64,
    token: CancellationToken,
}

/// Registry of pending deferred actions.
pub struct ConfirmationScheduler {
    root: CancellationToken,
    tasks: Arc<Mutex<HashMap<String, Entry>>>,
    next_generation: AtomicU64,
}

impl ConfirmationScheduler {
    /// Create a scheduler whose tasks are cancelled when `root` is.
    pub fn new(root: CancellationToken) -> Self {
        Self {
            root,
            tasks: Arc::new(Mutex::new(HashMap::new())),
            next_generation: AtomicU64::new(0),
        }
    }

    /// Run `action` once `delay` from now, unless cancelled first.
    ///
    /// Nothing is scheduled once the scheduler has been shut down, or when
    /// the deadline would overflow the clock.
    pub fn schedule<F>(
        &self,
        id: impl Into<String>,
        delay: Duration,
        action: F,
    ) -> Result<(), ScheduleError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self.root.is_cancelled() {
            return Err(ScheduleError::ShutDown);
        }

        let deadline = tokio::time::Instant::now()
            .checked_add(delay)
            .ok_or(ScheduleError::DelayOutOfRange(delay))?;
        let id = id.into();
        let token = self.root.child_token();
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);

        if let Ok(mut tasks) = self.tasks.lock() {
            let replaced = tasks.insert(
                id.clone(),
                Entry {
                    generation,
                    token: token.clone(),
                },
            );
            if let Some(previous) = replaced {
                previous.token.cancel();
            }
        }

        let tasks = Arc::clone(&self.tasks);
        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    debug!(transaction_id = %id, "Scheduled confirmation cancelled");
                }
                _ = tokio::time::sleep_until(deadline) => {
                    action.await;
                }
            }

            if let Ok(mut tasks) = tasks.lock() {
                if tasks.get(&id).is_some_and(|entry| entry.generation == generation) {
                    tasks.remove(&id);
                }
            }
        });

        Ok(())
    }

    /// Cancel the pending action for `id`. Returns `true` if one was pending.
    pub fn cancel(&self, id: &str) -> bool {
        let Ok(mut tasks) = self.tasks.lock() else {
            return false;
        };
        match tasks.remove(id) {
            Some(entry) => {
                entry.token.cancel();
                true
            }
            None => false,
        }
    }

    /// Whether an action for `id` is still pending.
    pub fn is_scheduled(&self, id: &str) -> bool {
        self.tasks
            .lock()
            .map(|tasks| tasks.contains_key(id))
            .unwrap_or(false)
    }

    /// Number of pending actions.
    pub fn pending(&self) -> usize {
        self.tasks.lock().map(|tasks| tasks.len()).unwrap_or(0)
    }

    /// Cancel every pending action and stop accepting new ones.
    pub fn shutdown(&self) {
        self.root.cancel();
        if let Ok(mut tasks) = self.tasks.lock() {
            tasks.clear();
        }
    }

    pub fn is_shut_down(&self) -> bool {
        self.root.is_cancelled()
    }
}
