//! MPI transport: one OS process per rank over `MPI_COMM_WORLD`.

use mpi::environment::Universe;
use mpi::topology::SimpleCommunicator;
use mpi::traits::*;

use super::{check_len, WorkerGroup, COORDINATOR};
use crate::error::CommError;

pub struct MpiGroup {
    // dropped before the universe, which finalizes MPI
    world: SimpleCommunicator,
    rank: usize,
    size: usize,
    _universe: Universe,
}

impl MpiGroup {
    /// Initialize MPI. Returns `None` if it was already initialized.
    pub fn initialize() -> Option<Self> {
        let universe = mpi::initialize()?;
        let world = universe.world();
        let rank = world.rank() as usize;
        let size = world.size() as usize;
        Some(MpiGroup {
            world,
            rank,
            size,
            _universe: universe,
        })
    }
}

impl WorkerGroup for MpiGroup {
    fn mode(&self) -> &'static str {
        "MPI"
    }

    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn replicate(&self, buf: &mut [f64]) -> Result<(), CommError> {
        self.world
            .process_at_rank(COORDINATOR as i32)
            .broadcast_into(buf);
        Ok(())
    }

    fn partition_scatter(&self, send: Option<&[f64]>, recv: &mut [f64]) -> Result<(), CommError> {
        let root = self.world.process_at_rank(COORDINATOR as i32);
        if self.is_coordinator() {
            let send = send.ok_or(CommError::MissingRootBuffer { op: "scatter" })?;
            check_len("scatter", self.size * recv.len(), send.len())?;
            root.scatter_into_root(send, recv);
        } else {
            root.scatter_into(recv);
        }
        Ok(())
    }

    fn gather_collect(&self, send: &[f64], recv: Option<&mut [f64]>) -> Result<(), CommError> {
        let root = self.world.process_at_rank(COORDINATOR as i32);
        if self.is_coordinator() {
            let recv = recv.ok_or(CommError::MissingRootBuffer { op: "gather" })?;
            check_len("gather", self.size * send.len(), recv.len())?;
            root.gather_into_root(send, recv);
        } else {
            root.gather_into(send);
        }
        Ok(())
    }

    fn barrier(&self) -> Result<(), CommError> {
        self.world.barrier();
        Ok(())
    }
}
