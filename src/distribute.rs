//! Moving matrices between the coordinator and the workers.
//!
//! All three operations are collective: every rank of the group calls them in
//! the same order, passing `Some` only on the coordinator.

use tracing::debug;

use crate::error::{CommError, Result};
use crate::group::WorkerGroup;
use crate::matrix::{Matrix, RowBlock};
use crate::partition::PartitionPlan;

/// Give every rank its own full copy of the coordinator's matrix.
///
/// The coordinator passes `Some(matrix)` and gets the same matrix back; every
/// other rank passes `None` and receives a copy. The coordinator's matrix is
/// checked before the collective is entered.
pub fn replicate<G: WorkerGroup>(group: &G, plan: &PartitionPlan, source: Option<Matrix>) -> Result<Matrix> {
    let mut matrix = if group.is_coordinator() {
        let matrix = source.ok_or(CommError::MissingRootBuffer { op: "replicate" })?;
        if matrix.data.len() != plan.matrix_len() {
            return Err(CommError::BufferLength {
                op: "replicate",
                expected: plan.matrix_len(),
                actual: matrix.data.len(),
            }
            .into());
        }
        matrix
    } else {
        Matrix::zeroed(plan.n)
    };
    group.replicate(&mut matrix.data)?;
    debug!(rank = group.rank(), n = plan.n, "replicated full matrix");
    Ok(matrix)
}

/// Split the coordinator's matrix into equal row blocks; rank r receives
/// rows `plan.rows_for(r)`.
pub fn partition<G: WorkerGroup>(group: &G, plan: &PartitionPlan, source: Option<&Matrix>) -> Result<RowBlock> {
    let rows = plan.rows_for(group.rank());
    let mut block = RowBlock::zeroed(rows.start, plan.local_rows, plan.n);
    let send = if group.is_coordinator() {
        source.map(|m| m.data.as_slice())
    } else {
        None
    };
    group.partition_scatter(send, &mut block.data)?;
    debug!(rank = group.rank(), rows = ?block.row_range(), "received row block");
    Ok(block)
}

/// Reassemble every rank's block on the coordinator, block r at rows
/// `plan.rows_for(r)`. Returns `None` on every other rank.
pub fn collect<G: WorkerGroup>(group: &G, plan: &PartitionPlan, block: &RowBlock) -> Result<Option<Matrix>> {
    if block.data.len() != plan.block_len() {
        return Err(CommError::BufferLength {
            op: "gather",
            expected: plan.block_len(),
            actual: block.data.len(),
        }
        .into());
    }
    if !group.is_coordinator() {
        group.gather_collect(&block.data, None)?;
        debug!(rank = group.rank(), rows = ?block.row_range(), "sent result block");
        return Ok(None);
    }
    let mut result = Matrix::zeroed(plan.n);
    group.gather_collect(&block.data, Some(&mut result.data))?;
    debug!(rank = group.rank(), workers = plan.workers, "collected all result blocks");
    Ok(Some(result))
}
