use crate::strategy::BatchConfig;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Replay a point command log and print every user's final balance
///
/// Rows are `type,user,amount` with type `register`, `charge` or `use`.
/// Rejected commands and malformed rows are logged to stderr and skipped;
/// the balances of all registered users go to stdout as `user,point`.
#[derive(Parser, Debug)]
#[command(name = "point-ledger", version)]
pub struct CliArgs {
    /// Command log to replay (CSV with header `type,user,amount`)
    #[arg(value_name = "INPUT")]
    pub input_file: PathBuf,

    /// `sync` replays strictly in file order; `async` runs each user's
    /// commands in their own task and reaches the same final balances
    #[arg(long, value_name = "STRATEGY", default_value = "async")]
    pub strategy: StrategyType,

    /// Commands read per batch before they are dispatched to user tasks
    /// [async only, default: 1000]
    #[arg(long, value_name = "SIZE")]
    pub batch_size: Option<usize>,

    /// Tokio worker threads executing user tasks [async only, default: CPU cores]
    #[arg(long = "max-concurrent", value_name = "THREADS")]
    pub worker_threads: Option<usize>,

    /// Also write the point history (id,user,amount,type,timestamp) here
    #[arg(long, value_name = "PATH")]
    pub history_output: Option<PathBuf>,
}

/// How the command log is replayed
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

impl CliArgs {
    /// Batch settings for the async strategy
    ///
    /// Unset values take their defaults; a zero is replaced by the default
    /// with a warning.
    pub fn to_batch_config(&self) -> BatchConfig {
        let default = BatchConfig::default();
        BatchConfig::new(
            self.batch_size.unwrap_or(default.batch_size),
            self.worker_threads.unwrap_or(default.worker_threads),
        )
    }
}
