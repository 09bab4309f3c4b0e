//! Types module
//!
//! Contains core data structures used throughout the ledger.
//! - `user_point`: balance records and identifiers
//! - `history`: transaction history entries and the transaction type
//! - `command`: input commands replayed by the batch CLI
//! - `error`: error taxonomy

pub mod command;
pub mod error;
pub mod history;
pub mod user_point;

pub use command::{CommandKind, PointCommand};
pub use error::{PointError, Result};
pub use history::{HistoryId, PointHistory, TransactionType};
pub use user_point::{Point, UserId, UserPoint};
