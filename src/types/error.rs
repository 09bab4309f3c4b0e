//! Error types for the point ledger
//!
//! This module defines every failure the ledger can report. The core
//! operations (charge, use, history append) only ever produce the domain
//! variants; the I/O and parse variants belong to the CSV adapter layer.
//!
//! # Error Categories
//!
//! - **Pre-mutation rejections**: unknown user, invalid amount, insufficient
//!   balance, balance overflow. Nothing has been written when these occur.
//! - **Post-mutation failures**: a history append that fails after the balance
//!   was written. The coordinator restores the original balance before
//!   surfacing these.
//! - **Adapter errors**: file I/O and CSV parsing.
//!
//! None of the domain errors are retried by the ledger itself.

use crate::types::{Point, UserId};
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, PointError>;

/// Main error type for the point ledger
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PointError {
    /// No balance record exists for the user
    #[error("User {user} does not exist")]
    UserNotExist {
        /// The user that was looked up
        user: UserId,
    },

    /// The requested amount is zero or negative
    #[error("Invalid point amount {amount} for user {user}: amount must be greater than zero")]
    InvalidPointAmount {
        /// User the request was made for
        user: UserId,
        /// The rejected amount
        amount: i64,
    },

    /// A use would drive the balance below zero
    #[error("Insufficient balance for user {user}: balance {balance}, requested {requested}")]
    InsufficientBalance {
        /// User the request was made for
        user: UserId,
        /// Balance at the time of the request
        balance: Point,
        /// Amount the caller tried to use
        requested: Point,
    },

    /// A history entry was appended with an unset or unknown transaction type
    #[error("Invalid transaction type '{value}'")]
    InvalidTransactionType {
        /// The offending value (`<unset>` when no type was given)
        value: String,
    },

    /// A charge would exceed the representable balance
    #[error("Balance overflow for user {user}: balance {balance}, charge {amount}")]
    BalanceOverflow {
        /// User the request was made for
        user: UserId,
        /// Balance at the time of the request
        balance: Point,
        /// Amount the caller tried to charge
        amount: Point,
    },

    /// I/O error while reading commands or writing output
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
    },

    /// CSV parsing error
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    Parse {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },
}

impl From<std::io::Error> for PointError {
    fn from(error: std::io::Error) -> Self {
        PointError::Io {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for PointError {
    fn from(error: csv::Error) -> Self {
        if error.is_io_error() {
            return PointError::Io {
                message: error.to_string(),
            };
        }

        let line = error.position().map(|pos| pos.line());

        PointError::Parse {
            line,
            message: error.to_string(),
        }
    }
}

impl PointError {
    /// Create a UserNotExist error
    pub fn user_not_exist(user: UserId) -> Self {
        PointError::UserNotExist { user }
    }

    /// Create an InvalidPointAmount error
    pub fn invalid_point_amount(user: UserId, amount: i64) -> Self {
        PointError::InvalidPointAmount { user, amount }
    }

    /// Create an InsufficientBalance error
    pub fn insufficient_balance(user: UserId, balance: Point, requested: Point) -> Self {
        PointError::InsufficientBalance {
            user,
            balance,
            requested,
        }
    }

    /// Create an InvalidTransactionType error
    pub fn invalid_transaction_type(value: &str) -> Self {
        PointError::InvalidTransactionType {
            value: value.to_string(),
        }
    }

    /// Create a BalanceOverflow error
    pub fn balance_overflow(user: UserId, balance: Point, amount: Point) -> Self {
        PointError::BalanceOverflow {
            user,
            balance,
            amount,
        }
    }

    /// Create a Parse error for a record that could not be converted
    pub fn parse(line: Option<u64>, message: impl Into<String>) -> Self {
        PointError::Parse {
            line,
            message: message.into(),
        }
    }

    /// Stable machine-readable code for adapters
    ///
    /// Transport layers map these codes to their own status values instead of
    /// matching on display messages.
    pub fn code(&self) -> &'static str {
        match self {
            PointError::UserNotExist { .. } => "USER_NOT_EXIST",
            PointError::InvalidPointAmount { .. } => "POINT_AMOUNT_INVALID",
            PointError::InsufficientBalance { .. } => "POINT_BALANCE_INSUFFICIENT",
            PointError::InvalidTransactionType { .. } => "INVALID_TRANSACTION_TYPE",
            PointError::BalanceOverflow { .. } => "POINT_BALANCE_OVERFLOW",
            PointError::Io { .. } => "IO_ERROR",
            PointError::Parse { .. } => "PARSE_ERROR",
        }
    }

    /// Whether the error means the addressed user does not exist
    ///
    /// Every other domain error is a rejection of the request itself.
    pub fn is_not_found(&self) -> bool {
        matches!(self, PointError::UserNotExist { .. })
    }

    /// True for failures that should stop a replay instead of skipping a row
    pub fn is_fatal(&self) -> bool {
        matches!(self, PointError::Io { .. })
    }
}
