use thiserror::Error;

/// Failures of a collective operation on a [`WorkerGroup`](crate::group::WorkerGroup).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommError {
    #[error("rank {rank} expected a {expected} message from rank {peer}, got {found}")]
    Mismatch {
        rank: usize,
        peer: usize,
        expected: &'static str,
        found: &'static str,
    },
    #[error("rank {rank} lost its channel to rank {peer}")]
    Disconnected { rank: usize, peer: usize },
    #[error("{op}: buffer holds {actual} elements, expected {expected}")]
    BufferLength {
        op: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("{op}: the coordinator must supply the full buffer")]
    MissingRootBuffer { op: &'static str },
    #[error("rank {0} panicked")]
    RankPanicked(usize),
    #[error("group of {0} ranks cannot be launched")]
    InvalidGroupSize(usize),
}

#[derive(Debug, Error)]
pub enum MatmulError {
    #[error("{0}")]
    Usage(#[from] clap::Error),
    #[error("Matrix size must be positive.")]
    InvalidSize(i64),
    #[error("Matrix size ({0}) is too large to allocate.")]
    SizeTooLarge(i64),
    #[error("Matrix size ({size}) must be divisible by number of processes ({workers}).")]
    Partition { size: usize, workers: usize },
    #[error("worker group is empty")]
    NoWorkers,
    #[error("rank {0} is not the coordinator")]
    NotCoordinator(usize),
    #[error("matrix dimensions incompatible: {left}x{left} * {right}x{right}")]
    DimensionMismatch { left: usize, right: usize },
    #[error("data length {len} does not match a {rows}x{cols} block")]
    BadLength { len: usize, rows: usize, cols: usize },
    #[error("collective failed: {0}")]
    Comm(#[from] CommError),
    #[error("invalid MATMUL_* environment: {0}")]
    Config(#[from] envy::Error),
    #[error("MATMUL_PROCESSES must be at least 1")]
    ZeroProcesses,
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

impl MatmulError {
    /// Errors that are informational output (help, version) rather than failures.
    pub fn is_informational(&self) -> bool {
        matches!(self, MatmulError::Usage(e) if !e.use_stderr())
    }
}

pub type Result<T, E = MatmulError> = std::result::Result<T, E>;
