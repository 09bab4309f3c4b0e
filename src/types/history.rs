//! Transaction history types
//!
//! This module defines the transaction type enumeration and the immutable
//! `PointHistory` entry appended for every committed balance change.

use super::error::PointError;
use super::user_point::{Point, UserId};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// History entry identifier
///
/// Assigned from a single increasing sequence shared by all users.
pub type HistoryId = u64;

/// Kind of balance change recorded in the history log
///
/// The set is closed. Parsing any other string fails with
/// [`PointError::InvalidTransactionType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    /// Points credited to the user
    Charge,

    /// Points debited from the user, bounded by the current balance
    Use,
}

impl TransactionType {
    /// Canonical upper-case name, as written to output
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Charge => "CHARGE",
            TransactionType::Use => "USE",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = PointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "charge" => Ok(TransactionType::Charge),
            "use" => Ok(TransactionType::Use),
            _ => Err(PointError::invalid_transaction_type(s)),
        }
    }
}

/// One committed balance change
///
/// `amount` is the magnitude that was applied; the direction is carried by
/// `tx_type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PointHistory {
    /// Sequence number of this entry
    pub id: HistoryId,

    /// The user whose balance changed
    #[serde(rename = "user")]
    pub user_id: UserId,

    /// Amount applied
    pub amount: Point,

    /// Whether the change was a charge or a use
    #[serde(rename = "type")]
    pub tx_type: TransactionType,

    /// Time the change was committed
    pub timestamp: DateTime<Utc>,
}
