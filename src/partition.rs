use std::ops::Range;

use crate::error::{MatmulError, Result};

/// Equal row blocks of an n×n problem over a fixed number of workers.
///
/// Rank `r` always owns rows `[r * local_rows, (r + 1) * local_rows)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionPlan {
    pub n: usize,
    pub workers: usize,
    pub local_rows: usize,
}

impl PartitionPlan {
    /// Every rank evaluates this with the same inputs, so every rank reaches
    /// the same verdict without talking to the others.
    pub fn new(n: usize, workers: usize) -> Result<Self> {
        if workers == 0 {
            return Err(MatmulError::NoWorkers);
        }
        if n == 0 {
            return Err(MatmulError::InvalidSize(0));
        }
        if n % workers != 0 {
            return Err(MatmulError::Partition { size: n, workers });
        }
        Ok(PartitionPlan {
            n,
            workers,
            local_rows: n / workers,
        })
    }

    pub fn rows_for(&self, rank: usize) -> Range<usize> {
        let start = rank * self.local_rows;
        start..start + self.local_rows
    }

    /// Number of f64 elements in one row block.
    pub fn block_len(&self) -> usize {
        self.local_rows * self.n
    }

    pub fn matrix_len(&self) -> usize {
        self.n * self.n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_tile_rows_without_gaps() {
        for n in 1..=24 {
            for w in (1..=n).filter(|w| n % w == 0) {
                let plan = PartitionPlan::new(n, w).unwrap();
                let mut next = 0;
                for rank in 0..w {
                    let rows = plan.rows_for(rank);
                    assert_eq!(rows.start, next);
                    assert_eq!(rows.len(), n / w);
                    next = rows.end;
                }
                assert_eq!(next, n);
            }
        }
    }

    #[test]
    fn rejects_uneven_split() {
        match PartitionPlan::new(10, 3) {
            Err(MatmulError::Partition { size, workers }) => {
                assert_eq!((size, workers), (10, 3));
            }
            other => panic!("expected partition error, got {:?}", other),
        }
    }

    #[test]
    fn rejects_empty_problem_and_group() {
        assert!(matches!(
            PartitionPlan::new(0, 2),
            Err(MatmulError::InvalidSize(0))
        ));
        assert!(matches!(PartitionPlan::new(4, 0), Err(MatmulError::NoWorkers)));
    }

    #[test]
    fn four_by_two_layout() {
        let plan = PartitionPlan::new(4, 2).unwrap();
        assert_eq!(plan.local_rows, 2);
        assert_eq!(plan.rows_for(0), 0..2);
        assert_eq!(plan.rows_for(1), 2..4);
        assert_eq!(plan.block_len(), 8);
    }
}
