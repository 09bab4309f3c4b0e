//! Core business logic module
//!
//! This module contains the balance-mutation engine:
//! - `traits` - Storage abstractions the coordinator is written against
//! - `balance_store` - Current balance per user
//! - `history_log` - Append-only transaction history
//! - `lock_registry` - One fair lock per user id
//! - `coordinator` - Serialized, compensating charge/use protocol
//! - `batch_processor` - Per-user partitioned batch execution

pub mod balance_store;
pub mod batch_processor;
pub mod coordinator;
pub mod history_log;
pub mod lock_registry;
pub mod traits;

pub use balance_store::InMemoryBalanceStore;
pub use batch_processor::{BatchProcessor, ProcessingResult};
pub use coordinator::PointCoordinator;
pub use history_log::InMemoryHistoryLog;
pub use lock_registry::{LockRegistry, UserLock};
pub use traits::{BalanceStore, HistoryLog};
