//! Processing strategy module for command replay
//!
//! This module defines the Strategy pattern for complete replay pipelines,
//! covering both CSV parsing and execution through the coordinator, so the
//! sequential and batched implementations can be selected at runtime.

use crate::cli::StrategyType;
use crate::core::PointCoordinator;
use crate::io::csv_format::write_balances_csv;
use crate::types::Result;
use std::io::Write;
use std::path::Path;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Processing strategy trait for complete replay pipelines
pub trait ProcessingStrategy: Send + Sync {
    /// Replay every command in `input_path` through a fresh in-memory ledger
    ///
    /// Individual command failures and malformed rows are logged and skipped.
    /// The returned coordinator holds the final balances and history.
    ///
    /// # Errors
    ///
    /// Returns an error only for fatal conditions: the input cannot be opened
    /// or the runtime cannot be started.
    fn run(&self, input_path: &Path) -> Result<PointCoordinator>;

    /// Replay `input_path` and write the final balances as CSV to `output`
    ///
    /// # Errors
    ///
    /// Returns an error if [`run`](Self::run) fails or the output cannot be written.
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<()> {
        let coordinator = self.run(input_path)?;
        write_balances_csv(&coordinator.balances(), output)
    }
}

/// Create a processing strategy based on the specified strategy type
///
/// `config` is only used by the async strategy; `None` selects its defaults.
pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<BatchConfig>,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy),
        StrategyType::Async => {
            let config = config.unwrap_or_default();
            Box::new(AsyncProcessingStrategy::new(config))
        }
    }
}
