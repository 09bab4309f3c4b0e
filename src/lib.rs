//! Point Ledger Library
//! # Overview
//!
//! An in-memory point ledger: users hold a non-negative point balance that is
//! charged and spent through a coordinator serializing every balance change
//! per user. Each successful change also appends an entry to the point
//! history, and a failed history write rolls the balance back.
//!
//! # Architecture
//!
//! - [`types`] - Core data types (UserPoint, PointHistory, PointError, etc.)
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Business logic components:
//!   - [`core::coordinator`] - Charge/use orchestration under per-user locks
//!   - [`core::lock_registry`] - One FIFO lock per user id
//!   - [`core::balance_store`] - Balance records
//!   - [`core::history_log`] - Append-only point history
//!   - [`core::batch_processor`] - Per-user concurrent batch execution
//! - [`io`] - CSV command parsing and ledger output
//! - [`strategy`] - Sequential and batched replay pipelines
//!
//! # Operations
//!
//! - **register**: Create a user with a zero balance (no-op if it exists)
//! - **charge**: Add a positive amount to an existing user's balance
//! - **use**: Deduct a positive amount, never taking the balance below zero
//!
//! # Example
//!
//! ```
//! use point_ledger::PointCoordinator;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let ledger = PointCoordinator::in_memory();
//! ledger.register(1).await.unwrap();
//! ledger.charge(1, 100).await.unwrap();
//! let after = ledger.use_points(1, 30).await.unwrap();
//! assert_eq!(after.point, 70);
//! assert_eq!(ledger.get_history(1).len(), 2);
//! # });
//! ```

pub mod cli;
pub mod core;
pub mod io;
pub mod strategy;
pub mod types;

pub use core::{
    BalanceStore, HistoryLog, InMemoryBalanceStore, InMemoryHistoryLog, LockRegistry,
    PointCoordinator,
};
pub use io::{write_balances_csv, write_history_csv};
pub use types::{
    HistoryId, Point, PointError, PointHistory, TransactionType, UserId, UserPoint,
};
