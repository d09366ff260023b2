use std::fmt;
use std::ops::{Index, IndexMut, Range};

use rand::Rng;

use crate::error::{MatmulError, Result};

/// Dense n×n matrix stored as one contiguous row-major buffer.
///
/// Element (i, j) lives at `data[i * n + j]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    pub data: Vec<f64>,
    pub n: usize,
}

/// Number of f64 elements in an n×n matrix, or `None` when n² elements (or
/// their byte size) cannot be addressed.
pub fn element_count(n: usize) -> Option<usize> {
    let len = n.checked_mul(n)?;
    let bytes = len.checked_mul(std::mem::size_of::<f64>())?;
    if bytes > isize::MAX as usize {
        return None;
    }
    Some(len)
}

impl Matrix {
    /// Allocate an n×n matrix filled with zeros.
    pub fn zeroed(n: usize) -> Self {
        Matrix {
            data: vec![0.0; n * n],
            n,
        }
    }

    /// Wrap an existing row-major buffer of length n².
    pub fn from_vec(data: Vec<f64>, n: usize) -> Result<Self> {
        if data.len() != n * n {
            return Err(MatmulError::BadLength {
                len: data.len(),
                rows: n,
                cols: n,
            });
        }
        Ok(Matrix { data, n })
    }

    pub fn identity(n: usize) -> Self {
        let mut m = Matrix::zeroed(n);
        for i in 0..n {
            m[(i, i)] = 1.0;
        }
        m
    }

    /// Allocate an n×n matrix and fill it from `rng`.
    pub fn random<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Self {
        let mut m = Matrix::zeroed(n);
        m.randomize(rng);
        m
    }

    /// Fill with integers drawn uniformly from [0, 100), stored as f64.
    ///
    /// The generator is owned by the caller and seeded once per process, so
    /// successive calls produce independent matrices.
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for value in self.data.iter_mut() {
            *value = rng.gen_range(0..100u32) as f64;
        }
    }

    pub fn zero(&mut self) {
        self.data.fill(0.0);
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.n..(i + 1) * self.n]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        // chunks_exact(0) panics; an empty matrix simply has no rows
        self.data.chunks_exact(self.n.max(1))
    }

    /// Copy rows `range` out into a block owned by the caller.
    pub fn row_block(&self, range: Range<usize>) -> Result<RowBlock> {
        if range.start > range.end || range.end > self.n {
            return Err(MatmulError::BadLength {
                len: range.end,
                rows: self.n,
                cols: self.n,
            });
        }
        let data = self.data[range.start * self.n..range.end * self.n].to_vec();
        Ok(RowBlock {
            first_row: range.start,
            rows: range.len(),
            n: self.n,
            data,
        })
    }

    /// Serial baseline: C = self * other with k accumulated in increasing order.
    pub fn multiply(&self, other: &Matrix) -> Result<Matrix> {
        if self.n != other.n {
            return Err(MatmulError::DimensionMismatch {
                left: self.n,
                right: other.n,
            });
        }
        let mut result = Matrix::zeroed(self.n);
        multiply_rows(&self.data, &other.data, &mut result.data, self.n);
        Ok(result)
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        assert!(j < self.n, "column {} out of bounds for n={}", j, self.n);
        &self.data[i * self.n + j]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut f64 {
        assert!(j < self.n, "column {} out of bounds for n={}", j, self.n);
        &mut self.data[i * self.n + j]
    }
}

/// Renders one row per line, every value as `%6.2f` followed by a space.
impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for value in row {
                write!(f, "{:6.2} ", value)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// `rows` consecutive full rows of an n×n matrix, starting at `first_row`.
#[derive(Debug, Clone, PartialEq)]
pub struct RowBlock {
    pub first_row: usize,
    pub rows: usize,
    pub n: usize,
    pub data: Vec<f64>,
}

impl RowBlock {
    pub fn zeroed(first_row: usize, rows: usize, n: usize) -> Self {
        RowBlock {
            first_row,
            rows,
            n,
            data: vec![0.0; rows * n],
        }
    }

    pub fn from_vec(first_row: usize, data: Vec<f64>, rows: usize, n: usize) -> Result<Self> {
        if data.len() != rows * n {
            return Err(MatmulError::BadLength {
                len: data.len(),
                rows,
                cols: n,
            });
        }
        Ok(RowBlock {
            first_row,
            rows,
            n,
            data,
        })
    }

    /// Global row indices covered by this block.
    pub fn row_range(&self) -> Range<usize> {
        self.first_row..self.first_row + self.rows
    }

    /// Local row `i` (0-based within the block).
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.n..(i + 1) * self.n]
    }

    /// Product rows for this block: `out[i][j] = Σ_k self[i][k] · b[k][j]`.
    ///
    /// Uses the same kernel as [`Matrix::multiply`], so every element is
    /// bit-identical to the serial result.
    pub fn multiply(&self, b: &Matrix) -> Result<RowBlock> {
        if self.n != b.n {
            return Err(MatmulError::DimensionMismatch {
                left: self.n,
                right: b.n,
            });
        }
        let mut out = RowBlock::zeroed(self.first_row, self.rows, self.n);
        multiply_rows(&self.data, &b.data, &mut out.data, self.n);
        Ok(out)
    }
}

/// Row-major triple loop over whole rows of A. Each output element is a
/// single running sum over k = 0..n in order; no reassociation.
fn multiply_rows(a_rows: &[f64], b: &[f64], out: &mut [f64], n: usize) {
    if n == 0 {
        return;
    }
    for (a_row, out_row) in a_rows.chunks_exact(n).zip(out.chunks_exact_mut(n)) {
        for (j, cell) in out_row.iter_mut().enumerate() {
            let mut sum = 0.0;
            for (k, a_ik) in a_row.iter().enumerate() {
                sum += a_ik * b[k * n + j];
            }
            *cell = sum;
        }
    }
}
