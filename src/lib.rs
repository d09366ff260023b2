pub mod bench;
pub mod cli;
pub mod config;
pub mod coordinator;
pub mod distribute;
pub mod error;
pub mod group;
pub mod job;
pub mod matrix;
pub mod partition;
pub mod report;
pub mod worker;

pub use coordinator::{Coordinator, Product};
pub use error::{CommError, MatmulError};
pub use group::{ChannelGroup, WorkerGroup};
pub use job::{run_distributed, run_local};
pub use matrix::{Matrix, RowBlock};
pub use partition::PartitionPlan;
pub use worker::Worker;

use tracing_subscriber::EnvFilter;

/// Diagnostics go to stderr, filtered by `RUST_LOG` (default `warn`), so
/// stdout carries only the run's report.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
