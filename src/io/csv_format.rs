//! CSV format handling for command records and ledger output
//!
//! This module centralizes all CSV format concerns, providing:
//! - CsvRecord structure for deserialization
//! - Conversion from CSV records to commands
//! - Balance and history output serialization
//!
//! All functions are pure (no file handling) for easy testing.

use crate::types::{CommandKind, PointCommand, PointError, PointHistory, Result, UserId, UserPoint};
use serde::Deserialize;
use std::io::Write;

/// CSV record structure for deserialization
///
/// Matches the input CSV format with columns: type, user, amount.
/// The amount column is optional because register commands carry none.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvRecord {
    #[serde(rename = "type")]
    pub kind: String,
    pub user: UserId,
    pub amount: Option<String>,
}

/// Convert a CsvRecord to a PointCommand
///
/// - The command type is matched case-insensitively
/// - Charge and use require an integer amount; zero and negative values are
///   passed through so the coordinator can reject them
/// - Any amount on a register row is ignored
///
/// # Errors
///
/// Returns `PointError::Parse` tagged with `line` for an unknown command type,
/// a missing amount, or an amount that is not an integer.
pub fn convert_csv_record(csv_record: CsvRecord, line: Option<u64>) -> Result<PointCommand> {
    let kind = match csv_record.kind.trim().to_lowercase().as_str() {
        "register" => CommandKind::Register,
        "charge" => CommandKind::Charge,
        "use" => CommandKind::Use,
        _ => {
            return Err(PointError::parse(
                line,
                format!(
                    "Invalid command type '{}' for user {}",
                    csv_record.kind, csv_record.user
                ),
            ))
        }
    };

    let amount = match kind {
        CommandKind::Register => None,
        CommandKind::Charge | CommandKind::Use => {
            Some(parse_amount(kind, &csv_record, line)?)
        }
    };

    Ok(PointCommand {
        kind,
        user: csv_record.user,
        amount,
    })
}

fn parse_amount(kind: CommandKind, csv_record: &CsvRecord, line: Option<u64>) -> Result<i64> {
    let amount_str = csv_record
        .amount
        .as_deref()
        .map(str::trim)
        .filter(|amount| !amount.is_empty())
        .ok_or_else(|| {
            PointError::parse(
                line,
                format!(
                    "{:?} command for user {} requires an amount",
                    kind, csv_record.user
                ),
            )
        })?;

    amount_str.parse::<i64>().map_err(|_| {
        PointError::parse(
            line,
            format!(
                "Invalid amount '{}' for user {}",
                amount_str, csv_record.user
            ),
        )
    })
}

/// Write balances to CSV format
///
/// Writes rows with columns: user, point, sorted by user id for deterministic
/// output.
///
/// # Errors
///
/// Returns `PointError::Io` if writing or flushing fails.
pub fn write_balances_csv(balances: &[UserPoint], output: &mut dyn Write) -> Result<()> {
    let mut writer = csv::Writer::from_writer(output);

    writer
        .write_record(["user", "point"])
        .map_err(|e| write_error("header", e))?;

    let mut sorted = balances.to_vec();
    sorted.sort_by_key(|record| record.id);

    for record in sorted {
        writer
            .write_record(&[record.id.to_string(), record.point.to_string()])
            .map_err(|e| write_error("balance record", e))?;
    }

    writer.flush()?;

    Ok(())
}

/// Write history entries to CSV format
///
/// Writes rows with columns: id, user, amount, type, timestamp (RFC 3339), in
/// the order given. The header is written even when there are no entries.
///
/// # Errors
///
/// Returns `PointError::Io` if writing or flushing fails.
pub fn write_history_csv(entries: &[PointHistory], output: &mut dyn Write) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(output);

    writer
        .write_record(["id", "user", "amount", "type", "timestamp"])
        .map_err(|e| write_error("header", e))?;

    for entry in entries {
        writer
            .serialize(entry)
            .map_err(|e| write_error("history record", e))?;
    }

    writer.flush()?;

    Ok(())
}

fn write_error(what: &str, error: csv::Error) -> PointError {
    PointError::Io {
        message: format!("Failed to write CSV {}: {}", what, error),
    }
}
