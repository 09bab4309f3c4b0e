//! Balance record types
//!
//! Defines the user identifier, the point unit, and the `UserPoint` record held
//! by the balance store.

use chrono::{DateTime, Utc};

/// User identifier
pub type UserId = u64;

/// Point balance unit
///
/// Balances are unsigned, so a stored balance can never be negative.
pub type Point = u64;

/// Current point balance of a single user
///
/// Records are immutable values: every write to the balance store builds a
/// fresh `UserPoint` instead of mutating the previous one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPoint {
    /// The user this balance belongs to
    pub id: UserId,

    /// Current balance
    pub point: Point,

    /// Time of the write that produced this record
    pub updated_at: DateTime<Utc>,
}

impl UserPoint {
    /// Create a record stamped with the current time
    pub fn new(id: UserId, point: Point) -> Self {
        UserPoint {
            id,
            point,
            updated_at: Utc::now(),
        }
    }
}
