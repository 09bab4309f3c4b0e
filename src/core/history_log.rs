//! In-memory history log
//!
//! Append-only record of committed balance changes, grouped per user. Entry
//! ids come from one atomic counter, so ids are unique across users and
//! increase in append order.

use crate::core::traits::HistoryLog;
use crate::types::{
    HistoryId, Point, PointError, PointHistory, Result, TransactionType, UserId,
};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe in-memory history log
#[derive(Debug)]
pub struct InMemoryHistoryLog {
    /// Entries per user, in insertion order
    entries: DashMap<UserId, Vec<PointHistory>>,

    /// Next entry id
    cursor: AtomicU64,
}

impl InMemoryHistoryLog {
    /// Create an empty log whose first entry gets id 1
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            cursor: AtomicU64::new(1),
        }
    }

    fn next_id(&self) -> HistoryId {
        self.cursor.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for InMemoryHistoryLog {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryLog for InMemoryHistoryLog {
    fn list_by_user(&self, user: UserId) -> Vec<PointHistory> {
        self.entries
            .get(&user)
            .map(|entries| entries.value().clone())
            .unwrap_or_default()
    }

    fn append(
        &self,
        user: UserId,
        amount: Point,
        tx_type: Option<TransactionType>,
        timestamp: DateTime<Utc>,
    ) -> Result<PointHistory> {
        let tx_type = tx_type.ok_or_else(|| PointError::invalid_transaction_type("<unset>"))?;

        let entry = PointHistory {
            id: self.next_id(),
            user_id: user,
            amount,
            tx_type,
            timestamp,
        };

        self.entries.entry(user).or_default().push(entry.clone());

        Ok(entry)
    }

    fn all(&self) -> Vec<PointHistory> {
        let mut all: Vec<PointHistory> = self
            .entries
            .iter()
            .flat_map(|entries| entries.value().clone())
            .collect();
        all.sort_by_key(|entry| entry.id);
        all
    }
}
