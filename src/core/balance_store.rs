//! In-memory balance store
//!
//! This module provides `InMemoryBalanceStore`, the authoritative holder of each
//! user's current point balance.
//!
//! # Design
//!
//! Records live in a `DashMap`, whose internal sharding means writes for
//! different users never contend on a single global lock. The store performs
//! plain snapshot reads and unconditional writes; it does not serialize a
//! caller's read-then-write sequence. That is the coordinator's job.

use crate::core::traits::BalanceStore;
use crate::types::{Point, PointError, Result, UserId, UserPoint};
use dashmap::DashMap;

/// Thread-safe in-memory balance store
#[derive(Debug, Default)]
pub struct InMemoryBalanceStore {
    /// Current record per user
    balances: DashMap<UserId, UserPoint>,
}

impl InMemoryBalanceStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            balances: DashMap::new(),
        }
    }

    /// Number of users with a stored balance
    pub fn len(&self) -> usize {
        self.balances.len()
    }

    /// Whether no balance has been written yet
    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }
}

impl BalanceStore for InMemoryBalanceStore {
    fn get(&self, user: UserId) -> Result<UserPoint> {
        self.balances
            .get(&user)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| PointError::user_not_exist(user))
    }

    fn put(&self, user: UserId, point: Point) -> UserPoint {
        let record = UserPoint::new(user, point);
        self.balances.insert(user, record.clone());
        record
    }

    fn all(&self) -> Vec<UserPoint> {
        self.balances
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }
}
