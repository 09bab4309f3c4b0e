//! Sequential processing strategy
//!
//! Replays commands one at a time in file order on a single-threaded tokio
//! runtime. Each command completes before the next one is read, so the
//! outcome is exactly what a single caller issuing the commands in order
//! would observe.

use crate::core::PointCoordinator;
use crate::io::sync_reader::SyncReader;
use crate::strategy::ProcessingStrategy;
use crate::types::{PointError, Result};
use std::path::Path;
use tracing::warn;

/// Sequential processing strategy
#[derive(Debug, Clone, Copy)]
pub struct SyncProcessingStrategy;

impl ProcessingStrategy for SyncProcessingStrategy {
    fn run(&self, input_path: &Path) -> Result<PointCoordinator> {
        let reader = SyncReader::new(input_path)?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .map_err(|e| PointError::Io {
                message: format!("Failed to create tokio runtime: {}", e),
            })?;

        let coordinator = PointCoordinator::in_memory();

        runtime.block_on(async {
            for result in reader {
                match result {
                    Ok(command) => {
                        if let Err(e) = coordinator.execute(&command).await {
                            warn!(user = command.user, kind = ?command.kind, error = %e, "command rejected");
                        }
                    }
                    Err(e) if e.is_fatal() => return Err(e),
                    Err(e) => warn!(error = %e, "skipping malformed record"),
                }
            }
            Ok(())
        })?;

        Ok(coordinator)
    }
}
