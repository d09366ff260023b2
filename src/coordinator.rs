use std::time::Duration;

use tracing::info;

use crate::distribute;
use crate::error::{MatmulError, Result};
use crate::group::WorkerGroup;
use crate::matrix::Matrix;
use crate::partition::PartitionPlan;
use crate::report::timed_phase;

/// Inputs, result and compute time of a finished run, as seen by the coordinator.
#[derive(Debug, Clone)]
pub struct Product {
    pub a: Matrix,
    pub b: Matrix,
    pub c: Matrix,
    pub elapsed: Duration,
}

/// Rank 0: owns A, B and C and also computes the first row block.
pub struct Coordinator<'g, G: WorkerGroup> {
    group: &'g G,
    plan: PartitionPlan,
}

impl<'g, G: WorkerGroup> Coordinator<'g, G> {
    pub fn new(group: &'g G, plan: PartitionPlan) -> Result<Self> {
        if !group.is_coordinator() {
            return Err(MatmulError::NotCoordinator(group.rank()));
        }
        Ok(Coordinator { group, plan })
    }

    /// Number of ranks computing row blocks, the coordinator included.
    pub fn worker_count(&self) -> usize {
        self.plan.workers
    }

    /// Compute C = A * B across the whole group.
    ///
    /// Every other rank must be inside [`Worker::process_work`](crate::worker::Worker::process_work)
    /// for the same plan.
    pub fn multiply(&self, a: Matrix, b: Matrix) -> Result<Product> {
        for m in [&a, &b] {
            if m.n != self.plan.n {
                return Err(MatmulError::DimensionMismatch {
                    left: self.plan.n,
                    right: m.n,
                });
            }
        }
        info!(
            n = self.plan.n,
            workers = self.plan.workers,
            local_rows = self.plan.local_rows,
            "[coordinator] distributing B in full and A by row blocks"
        );

        let b = distribute::replicate(self.group, &self.plan, Some(b))?;
        let local_a = distribute::partition(self.group, &self.plan, Some(&a))?;

        let (local_c, elapsed) = timed_phase(self.group, || local_a.multiply(&b))?;

        let c = distribute::collect(self.group, &self.plan, &local_c)?
            .ok_or(MatmulError::NotCoordinator(self.group.rank()))?;
        info!(
            elapsed_secs = elapsed.as_secs_f64(),
            "[coordinator] multiplication complete"
        );

        Ok(Product { a, b, c, elapsed })
    }
}
