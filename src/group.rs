//! The fixed set of cooperating ranks and the collectives they share.
//!
//! Every collective is rooted at [`COORDINATOR`] and must be entered by
//! every rank in the same order. Data only ever moves by value: each rank
//! passes in its own buffer and gets its own copy back.

pub mod channel;
#[cfg(feature = "mpi")]
pub mod mpi;

use crate::error::CommError;

pub use channel::ChannelGroup;
#[cfg(feature = "mpi")]
pub use self::mpi::MpiGroup;

/// Rank holding the full matrices before distribution and after collection.
pub const COORDINATOR: usize = 0;

pub trait WorkerGroup {
    /// Label used in the timing summary ("Distributed", "MPI", ...).
    fn mode(&self) -> &'static str;

    fn rank(&self) -> usize;

    fn size(&self) -> usize;

    fn is_coordinator(&self) -> bool {
        self.rank() == COORDINATOR
    }

    /// Broadcast: the coordinator's `buf` is copied into `buf` on every rank.
    fn replicate(&self, buf: &mut [f64]) -> Result<(), CommError>;

    /// Scatter: the coordinator passes `Some(full)` with `size() * recv.len()`
    /// elements; rank r receives `full[r * recv.len()..(r + 1) * recv.len()]`.
    ///
    /// A buffer error on the coordinator is returned before it enters the
    /// collective. Under MPI the other ranks then stay blocked; under the
    /// channel transport they see `Disconnected` once the coordinator exits.
    fn partition_scatter(&self, send: Option<&[f64]>, recv: &mut [f64]) -> Result<(), CommError>;

    /// Gather: inverse of [`partition_scatter`](WorkerGroup::partition_scatter).
    /// Only the coordinator passes `Some(recv)`.
    ///
    /// As with scatter, a coordinator-side buffer error leaves the other ranks
    /// blocked under MPI.
    fn gather_collect(&self, send: &[f64], recv: Option<&mut [f64]>) -> Result<(), CommError>;

    fn barrier(&self) -> Result<(), CommError>;
}

pub(crate) fn check_len(op: &'static str, expected: usize, actual: usize) -> Result<(), CommError> {
    if expected != actual {
        return Err(CommError::BufferLength {
            op,
            expected,
            actual,
        });
    }
    Ok(())
}
