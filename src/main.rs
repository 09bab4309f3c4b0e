//! Point Ledger CLI
//!
//! Replays point commands from a CSV file and prints the final balances.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- commands.csv > balances.csv
//! cargo run -- --strategy sync commands.csv > balances.csv
//! cargo run -- --strategy async --batch-size 2000 --max-concurrent 8 commands.csv > balances.csv
//! cargo run -- --history-output history.csv commands.csv > balances.csv
//! ```
//!
//! Balances go to stdout as `user,point`. Diagnostics go to stderr through
//! `tracing`; set `RUST_LOG=debug` to see every committed command.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (file not found, file not readable, output not writable)

use point_ledger::cli;
use point_ledger::io::{write_balances_csv, write_history_csv};
use point_ledger::strategy;
use point_ledger::types::{PointError, Result};
use std::fs::File;
use std::io::BufWriter;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = cli::parse_args();

    if let Err(e) = run(&args) {
        tracing::error!(code = e.code(), "{}", e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: &cli::CliArgs) -> Result<()> {
    let config = match args.strategy {
        cli::StrategyType::Async => Some(args.to_batch_config()),
        cli::StrategyType::Sync => None,
    };
    let strategy = strategy::create_strategy(args.strategy, config);

    let coordinator = strategy.run(&args.input_file)?;

    let mut stdout = std::io::stdout().lock();
    write_balances_csv(&coordinator.balances(), &mut stdout)?;

    if let Some(path) = &args.history_output {
        let file = File::create(path).map_err(|e| PointError::Io {
            message: format!("Failed to create file '{}': {}", path.display(), e),
        })?;
        write_history_csv(&coordinator.histories(), &mut BufWriter::new(file))?;
    }

    Ok(())
}
