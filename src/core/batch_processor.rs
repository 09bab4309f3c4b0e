//! Batch processing with user-based partitioning
//!
//! This module provides the `BatchProcessor` struct, which runs batches of
//! commands through a [`PointCoordinator`] with one tokio task per user.
//!
//! # Design
//!
//! A batch is partitioned by user id. Each user's commands run sequentially in
//! input order inside one task, while tasks for different users run
//! concurrently. The coordinator's per-user locks would keep each user's
//! balance consistent regardless, but partitioning also keeps each user's
//! commands in file order, which makes the final balances deterministic.

use std::collections::HashMap;

use tracing::{error, warn};

use crate::core::coordinator::PointCoordinator;
use crate::core::traits::{BalanceStore, HistoryLog};
use crate::types::{PointCommand, Result, UserId, UserPoint};

/// Result of running a single command
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    /// The command that was run
    pub command: PointCommand,

    /// The outcome
    pub result: Result<UserPoint>,
}

/// Batch processor with user-based partitioning
#[derive(Debug)]
pub struct BatchProcessor<S, H> {
    coordinator: PointCoordinator<S, H>,
}

impl<S, H> Clone for BatchProcessor<S, H> {
    fn clone(&self) -> Self {
        Self {
            coordinator: self.coordinator.clone(),
        }
    }
}

impl<S, H> BatchProcessor<S, H>
where
    S: BalanceStore + 'static,
    H: HistoryLog + 'static,
{
    /// Create a processor that runs commands through `coordinator`
    pub fn new(coordinator: PointCoordinator<S, H>) -> Self {
        Self { coordinator }
    }

    /// Partition a batch by user id
    ///
    /// Every command lands in exactly one partition, and each partition keeps
    /// the commands in their original order.
    pub fn partition_by_user(&self, batch: Vec<PointCommand>) -> HashMap<UserId, Vec<PointCommand>> {
        let mut user_batches: HashMap<UserId, Vec<PointCommand>> = HashMap::new();

        for command in batch {
            user_batches.entry(command.user).or_default().push(command);
        }

        user_batches
    }

    /// Run one user's commands in order
    ///
    /// Failed commands are logged and recorded; later commands still run.
    pub async fn process_user_commands(&self, commands: Vec<PointCommand>) -> Vec<ProcessingResult> {
        let mut results = Vec::with_capacity(commands.len());

        for command in commands {
            let result = self.coordinator.execute(&command).await;
            if let Err(e) = &result {
                warn!(user = command.user, kind = ?command.kind, error = %e, "command rejected");
            }
            results.push(ProcessingResult { command, result });
        }

        results
    }

    /// Run a batch with one concurrent task per user
    ///
    /// Results are grouped by user; the order between users is unspecified.
    pub async fn process_batch(&self, batch: Vec<PointCommand>) -> Vec<ProcessingResult> {
        let user_batches = self.partition_by_user(batch);

        let mut tasks = Vec::with_capacity(user_batches.len());
        for (_user, commands) in user_batches {
            let processor = self.clone();
            tasks.push(tokio::spawn(async move {
                processor.process_user_commands(commands).await
            }));
        }

        let mut results = Vec::new();
        for task in tasks {
            match task.await {
                Ok(user_results) => results.extend(user_results),
                Err(e) => error!(error = %e, "batch task failed"),
            }
        }

        results
    }
}
