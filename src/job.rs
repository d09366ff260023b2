use crate::coordinator::{Coordinator, Product};
use crate::error::{MatmulError, Result};
use crate::group::{ChannelGroup, WorkerGroup};
use crate::matrix::Matrix;
use crate::partition::PartitionPlan;
use crate::worker::Worker;

/// The SPMD entry point: every rank of `group` calls this with the same `n`.
///
/// The partition precondition is checked first, identically on every rank,
/// so an invalid size fails everywhere before any data moves. `inputs` runs
/// only on the coordinator, which alone returns `Some(product)`.
pub fn run_distributed<G, F>(group: &G, n: usize, inputs: F) -> Result<Option<Product>>
where
    G: WorkerGroup,
    F: FnOnce() -> (Matrix, Matrix),
{
    let plan = PartitionPlan::new(n, group.size())?;
    if group.is_coordinator() {
        let (a, b) = inputs();
        let product = Coordinator::new(group, plan)?.multiply(a, b)?;
        Ok(Some(product))
    } else {
        Worker::new(group, plan).process_work()?;
        Ok(None)
    }
}

/// Multiply `a` by `b` on a fresh in-process group of `workers` ranks.
///
/// When several ranks fail, the error of the lowest rank is returned.
pub fn run_local(workers: usize, a: Matrix, b: Matrix) -> Result<Product> {
    let n = a.n;
    let outcomes = ChannelGroup::launch(workers, |group| {
        run_distributed(group, n, || (a.clone(), b.clone()))
    })?;
    let mut product = None;
    for outcome in outcomes {
        if let Some(p) = outcome? {
            product = Some(p);
        }
    }
    product.ok_or(MatmulError::NoWorkers)
}
