//! Core traits for balance storage and history logging
//!
//! The coordinator talks to both resources only through these traits, so it
//! can be driven against alternative implementations (for example a history
//! log that fails on demand).

use crate::types::{Point, PointHistory, Result, TransactionType, UserId, UserPoint};
use chrono::{DateTime, Utc};

/// Authoritative current balance per user
///
/// Implementations do not serialize callers. Read-modify-write sequences are
/// protected by the coordinator's per-user locks.
pub trait BalanceStore: Send + Sync {
    /// Get the stored record for a user
    ///
    /// # Errors
    ///
    /// Returns `PointError::UserNotExist` if the user has never been written.
    fn get(&self, user: UserId) -> Result<UserPoint>;

    /// Create or overwrite the record for a user with a fresh timestamp
    fn put(&self, user: UserId, point: Point) -> UserPoint;

    /// Snapshot of every stored record, in no particular order
    fn all(&self) -> Vec<UserPoint>;
}

/// Append-only per-user transaction history
pub trait HistoryLog: Send + Sync {
    /// All entries for a user in insertion order; empty if there are none
    fn list_by_user(&self, user: UserId) -> Vec<PointHistory>;

    /// Append a new entry
    ///
    /// # Errors
    ///
    /// Returns `PointError::InvalidTransactionType` when `tx_type` is unset.
    /// Implementations may fail for other reasons; the coordinator treats any
    /// error here as a reason to roll back the balance write.
    fn append(
        &self,
        user: UserId,
        amount: Point,
        tx_type: Option<TransactionType>,
        timestamp: DateTime<Utc>,
    ) -> Result<PointHistory>;

    /// Every entry across all users, ordered by entry id
    fn all(&self) -> Vec<PointHistory>;
}
