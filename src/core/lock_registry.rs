//! Per-user lock registry
//!
//! Hands out one mutual-exclusion lock per user id. Locks are created lazily
//! on first request and shared by every later caller for that id.
//!
//! # Design
//!
//! The registry is a `DashMap<UserId, Arc<Mutex<()>>>`. Creation goes through
//! `entry().or_insert_with()`, which holds the shard's write lock while the
//! entry is inspected, so concurrent first requests for the same id all
//! receive the single instance that won the insertion.
//!
//! The locks are `tokio::sync::Mutex`, which grants waiters in the order they
//! called `lock()`. Contended users are therefore served first-come
//! first-served and no request starves.
//!
//! Entries are never removed: memory grows with the number of distinct ids
//! ever seen.

use crate::types::UserId;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Lock guarding one user's read-modify-write sequence
pub type UserLock = Arc<Mutex<()>>;

/// Lazily populated map of user id to its dedicated lock
#[derive(Debug, Default)]
pub struct LockRegistry {
    locks: DashMap<UserId, UserLock>,
}

impl LockRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// Get the lock for a user, creating it on first access
    ///
    /// Every call for the same id returns a handle to the same lock.
    pub fn lock_for(&self, user: UserId) -> UserLock {
        let entry = self
            .locks
            .entry(user)
            .or_insert_with(|| Arc::new(Mutex::new(())));
        Arc::clone(entry.value())
    }

    /// Number of locks created so far
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// Whether no lock has been created yet
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
