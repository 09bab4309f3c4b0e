//! Benchmark suite for the processing strategies and the coordinator
//!
//! ```bash
//! cargo bench
//! ```
//!
//! # Benchmark Fixtures
//!
//! - `benchmark_small.csv` - 10 users, 100 charge/use commands
//! - `benchmark_medium.csv` - 100 users, 10,000 charge/use commands
//!
//! The coordinator benchmarks compare many tasks charging one user (every
//! request waits on the same lock) against the same load spread over many
//! users.

use point_ledger::cli::StrategyType;
use point_ledger::strategy::{create_strategy, BatchConfig};
use point_ledger::PointCoordinator;
use std::path::Path;

fn main() {
    divan::main();
}

fn run_fixture(strategy_type: StrategyType, fixture: &str) {
    let config = match strategy_type {
        StrategyType::Async => Some(BatchConfig::default()),
        StrategyType::Sync => None,
    };
    let strategy = create_strategy(strategy_type, config);
    let path = Path::new("benches/fixtures").join(fixture);
    let mut output = Vec::new();

    strategy
        .process(&path, &mut output)
        .expect("Processing failed");
}

#[divan::bench]
fn sync_strategy_small() {
    run_fixture(StrategyType::Sync, "benchmark_small.csv");
}

#[divan::bench]
fn async_strategy_small() {
    run_fixture(StrategyType::Async, "benchmark_small.csv");
}

#[divan::bench]
fn sync_strategy_medium() {
    run_fixture(StrategyType::Sync, "benchmark_medium.csv");
}

#[divan::bench]
fn async_strategy_medium() {
    run_fixture(StrategyType::Async, "benchmark_medium.csv");
}

fn charge_from_tasks(users: u64) {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(4)
        .build()
        .expect("Failed to create runtime");

    runtime.block_on(async {
        let coordinator = PointCoordinator::in_memory();
        for user in 0..users {
            coordinator.register(user).await.expect("Register failed");
        }

        let handles: Vec<_> = (0..1000u64)
            .map(|i| {
                let coordinator = coordinator.clone();
                tokio::spawn(async move { coordinator.charge(i % users, 1).await })
            })
            .collect();

        for handle in handles {
            handle
                .await
                .expect("Task panicked")
                .expect("Charge failed");
        }
    });
}

/// 1,000 concurrent charges against a single user
#[divan::bench]
fn charge_contended() {
    charge_from_tasks(1);
}

/// 1,000 concurrent charges spread over 100 users
#[divan::bench]
fn charge_uncontended() {
    charge_from_tasks(100);
}
