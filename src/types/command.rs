//! Command records replayed through the coordinator
//!
//! A command is one input row of the batch CLI: create a user, charge
//! points, or use points.

use super::user_point::UserId;

/// Kind of command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// Create the user with a zero balance if it does not exist
    Register,

    /// Credit points
    Charge,

    /// Debit points
    Use,
}

/// One parsed input command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointCommand {
    /// What to do
    pub kind: CommandKind,

    /// The user it applies to
    pub user: UserId,

    /// Requested amount
    ///
    /// Always present for charge and use; ignored for register. Kept signed so
    /// that zero and negative requests reach the coordinator and are rejected
    /// there.
    pub amount: Option<i64>,
}
