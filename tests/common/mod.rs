#![allow(dead_code)]

use row_matmul::{ChannelGroup, Matrix, MatmulError, Product};
use row_matmul::run_distributed;

/// Matrix whose elements are 1, 2, 3, ... in row-major order.
pub fn sequential(n: usize) -> Matrix {
    Matrix::from_vec((1..=n * n).map(|x| x as f64).collect(), n).unwrap()
}

/// Deterministic but irregular values, including non-integers.
pub fn scrambled(n: usize, salt: u64) -> Matrix {
    let data = (0..n * n)
        .map(|i| {
            let x = (i as u64).wrapping_mul(2_654_435_761).wrapping_add(salt) % 1000;
            x as f64 / 7.0 - 50.0
        })
        .collect();
    Matrix::from_vec(data, n).unwrap()
}

/// Run a full group of `workers` ranks and return every rank's outcome.
pub fn run_group(
    workers: usize,
    n: usize,
    a: &Matrix,
    b: &Matrix,
) -> Vec<Result<Option<Product>, MatmulError>> {
    ChannelGroup::launch(workers, |group| {
        run_distributed(group, n, || (a.clone(), b.clone()))
    })
    .unwrap()
}
