use std::time::Duration;

use tracing::debug;

use crate::distribute;
use crate::error::Result;
use crate::group::WorkerGroup;
use crate::partition::PartitionPlan;
use crate::report::timed_phase;

/// Any rank other than the coordinator.
pub struct Worker<'g, G: WorkerGroup> {
    group: &'g G,
    plan: PartitionPlan,
}

impl<'g, G: WorkerGroup> Worker<'g, G> {
    pub fn new(group: &'g G, plan: PartitionPlan) -> Self {
        Worker { group, plan }
    }

    pub fn rank(&self) -> usize {
        self.group.rank()
    }

    /// Take part in one multiplication: receive B and this rank's rows of A,
    /// compute the matching rows of C and hand them back to the coordinator.
    ///
    /// Returns the time measured for the compute phase.
    pub fn process_work(&self) -> Result<Duration> {
        debug!(rank = self.rank(), "[worker] waiting for B");
        let b = distribute::replicate(self.group, &self.plan, None)?;
        let local_a = distribute::partition(self.group, &self.plan, None)?;

        let (local_c, elapsed) = timed_phase(self.group, || local_a.multiply(&b))?;
        debug!(
            rank = self.rank(),
            rows = ?local_c.row_range(),
            elapsed_secs = elapsed.as_secs_f64(),
            "[worker] computed row block"
        );

        distribute::collect(self.group, &self.plan, &local_c)?;
        Ok(elapsed)
    }
}
