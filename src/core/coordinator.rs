//! Point transaction coordinator
//!
//! This module provides `PointCoordinator`, which executes charge and use
//! requests as single logically-atomic operations against two independent
//! resources: the balance store and the history log.
//!
//! # Protocol
//!
//! ```text
//! Idle → Locked → Validated → BalanceWritten ─┬→ HistoryAppended → Idle
//!                                             └→ RolledBack      → Idle
//! ```
//!
//! 1. Acquire the user's lock from the [`LockRegistry`]
//! 2. Read the current balance (`UserNotExist` if absent)
//! 3. Validate the amount and, for a use, the remaining balance
//! 4. Write the new balance
//! 5. Append the history entry
//! 6. If the append fails, write the original balance back and return the
//!    append error
//!
//! The lock is held from step 2 through step 6 and released when the guard
//! drops, on every exit path.
//!
//! # Architecture
//!
//! ```text
//! PointCoordinator
//!     ├── Arc<S: BalanceStore>   (current balances)
//!     ├── Arc<H: HistoryLog>     (append-only history)
//!     └── Arc<LockRegistry>      (one fair lock per user)
//! ```
//!
//! # Thread Safety
//!
//! The coordinator is cheap to clone and every clone shares the same state,
//! so it can be handed to any number of tokio tasks. Requests for different
//! users never wait on each other.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::core::balance_store::InMemoryBalanceStore;
use crate::core::history_log::InMemoryHistoryLog;
use crate::core::lock_registry::LockRegistry;
use crate::core::traits::{BalanceStore, HistoryLog};
use crate::types::{
    CommandKind, Point, PointCommand, PointError, PointHistory, Result, TransactionType, UserId,
    UserPoint,
};

/// Outcome of the write phase of a balance change
#[derive(Debug)]
enum Commit {
    /// Balance written and history appended
    Applied(UserPoint),

    /// History append failed; the original balance was written back
    RolledBack {
        restored: UserPoint,
        cause: PointError,
    },
}

/// Serializes balance changes per user and keeps balance and history consistent
#[derive(Debug)]
pub struct PointCoordinator<S = InMemoryBalanceStore, H = InMemoryHistoryLog> {
    balances: Arc<S>,
    history: Arc<H>,
    locks: Arc<LockRegistry>,
}

impl<S, H> Clone for PointCoordinator<S, H> {
    fn clone(&self) -> Self {
        Self {
            balances: Arc::clone(&self.balances),
            history: Arc::clone(&self.history),
            locks: Arc::clone(&self.locks),
        }
    }
}

impl PointCoordinator {
    /// Create a coordinator backed by empty in-memory stores
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryBalanceStore::new()),
            Arc::new(InMemoryHistoryLog::new()),
        )
    }
}

impl<S, H> PointCoordinator<S, H>
where
    S: BalanceStore,
    H: HistoryLog,
{
    /// Create a coordinator over the given stores with a fresh lock registry
    pub fn new(balances: Arc<S>, history: Arc<H>) -> Self {
        Self {
            balances,
            history,
            locks: Arc::new(LockRegistry::new()),
        }
    }

    /// Current balance of a user
    ///
    /// A snapshot read taken without the user's lock; it may be superseded by
    /// a concurrent charge or use.
    ///
    /// # Errors
    ///
    /// Returns `PointError::UserNotExist` for a user that was never written.
    pub fn get_balance(&self, user: UserId) -> Result<UserPoint> {
        self.balances.get(user)
    }

    /// Transaction history of a user in chronological order
    ///
    /// Returns an empty list for unknown users.
    pub fn get_history(&self, user: UserId) -> Vec<PointHistory> {
        self.history.list_by_user(user)
    }

    /// Create a user with a zero balance if it does not exist yet
    ///
    /// Returns the existing record unchanged when the user is already known.
    /// No history entry is written since the balance does not change.
    ///
    /// # Errors
    ///
    /// Propagates any balance store error other than `UserNotExist`; the
    /// stored record is left untouched in that case.
    pub async fn register(&self, user: UserId) -> Result<UserPoint> {
        let lock = self.locks.lock_for(user);
        let _guard = lock.lock().await;

        match self.balances.get(user) {
            Ok(existing) => Ok(existing),
            Err(e) if e.is_not_found() => {
                debug!(user, "registered user");
                Ok(self.balances.put(user, 0))
            }
            Err(e) => Err(e),
        }
    }

    /// Credit points to a user
    ///
    /// # Errors
    ///
    /// - `UserNotExist` if the user was never written
    /// - `InvalidPointAmount` if `amount` is zero or negative
    /// - `BalanceOverflow` if the new balance is not representable
    /// - any history log error, after the balance has been restored
    pub async fn charge(&self, user: UserId, amount: i64) -> Result<UserPoint> {
        self.apply(user, amount, TransactionType::Charge).await
    }

    /// Debit points from a user
    ///
    /// # Errors
    ///
    /// - `UserNotExist` if the user was never written
    /// - `InvalidPointAmount` if `amount` is zero or negative
    /// - `InsufficientBalance` if `amount` exceeds the current balance
    /// - any history log error, after the balance has been restored
    pub async fn use_points(&self, user: UserId, amount: i64) -> Result<UserPoint> {
        self.apply(user, amount, TransactionType::Use).await
    }

    /// Run one input command
    ///
    /// A charge or use without an amount is treated as a zero request and
    /// rejected with `InvalidPointAmount`.
    pub async fn execute(&self, command: &PointCommand) -> Result<UserPoint> {
        let amount = command.amount.unwrap_or_default();
        match command.kind {
            CommandKind::Register => self.register(command.user).await,
            CommandKind::Charge => self.charge(command.user, amount).await,
            CommandKind::Use => self.use_points(command.user, amount).await,
        }
    }

    /// Snapshot of every balance, in no particular order
    pub fn balances(&self) -> Vec<UserPoint> {
        self.balances.all()
    }

    /// Snapshot of the whole history, ordered by entry id
    pub fn histories(&self) -> Vec<PointHistory> {
        self.history.all()
    }

    /// The registry handing out per-user locks
    pub fn lock_registry(&self) -> &LockRegistry {
        &self.locks
    }

    async fn apply(
        &self,
        user: UserId,
        amount: i64,
        tx_type: TransactionType,
    ) -> Result<UserPoint> {
        let lock = self.locks.lock_for(user);
        let _guard = lock.lock().await;

        let original = self.balances.get(user)?;
        let amount = validate_amount(user, amount)?;
        let updated = next_balance(&original, amount, tx_type)?;

        match self.commit(&original, updated, amount, tx_type) {
            Commit::Applied(record) => {
                debug!(user, amount, %tx_type, point = record.point, "transaction committed");
                Ok(record)
            }
            Commit::RolledBack { restored, cause } => {
                warn!(
                    user,
                    amount,
                    %tx_type,
                    restored = restored.point,
                    error = %cause,
                    "history append failed, balance rolled back"
                );
                Err(cause)
            }
        }
    }

    /// Write the new balance, then the history entry, undoing the balance
    /// write if the history append fails.
    ///
    /// Must be called with the user's lock held.
    fn commit(
        &self,
        original: &UserPoint,
        updated: Point,
        amount: Point,
        tx_type: TransactionType,
    ) -> Commit {
        let written = self.balances.put(original.id, updated);

        match self
            .history
            .append(original.id, amount, Some(tx_type), written.updated_at)
        {
            Ok(_) => Commit::Applied(written),
            Err(cause) => Commit::RolledBack {
                restored: self.balances.put(original.id, original.point),
                cause,
            },
        }
    }
}

fn validate_amount(user: UserId, amount: i64) -> Result<Point> {
    if amount <= 0 {
        return Err(PointError::invalid_point_amount(user, amount));
    }
    Point::try_from(amount).map_err(|_| PointError::invalid_point_amount(user, amount))
}

fn next_balance(current: &UserPoint, amount: Point, tx_type: TransactionType) -> Result<Point> {
    match tx_type {
        TransactionType::Charge => current
            .point
            .checked_add(amount)
            .ok_or_else(|| PointError::balance_overflow(current.id, current.point, amount)),
        TransactionType::Use => current
            .point
            .checked_sub(amount)
            .ok_or_else(|| PointError::insufficient_balance(current.id, current.point, amount)),
    }
}
