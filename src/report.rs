use std::fmt;
use std::io::{self, Write};
use std::time::{Duration, Instant};

use crate::error::Result;
use crate::group::WorkerGroup;
use crate::matrix::Matrix;

/// Matrices are printed only up to this size.
pub const DISPLAY_LIMIT: usize = 8;

pub fn shows_matrices(n: usize) -> bool {
    n <= DISPLAY_LIMIT
}

/// Run `phase` between two group-wide barriers and time it.
///
/// Every rank starts its clock after the first barrier and stops it after the
/// second, so the elapsed time covers the slowest rank's phase and nothing
/// before or after it.
pub fn timed_phase<G, T, F>(group: &G, phase: F) -> Result<(T, Duration)>
where
    G: WorkerGroup,
    F: FnOnce() -> Result<T>,
{
    group.barrier()?;
    let start = Instant::now();
    let value = phase()?;
    group.barrier()?;
    Ok((value, start.elapsed()))
}

/// Summary of one multiplication run.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub mode: &'static str,
    pub n: usize,
    pub processes: Option<usize>,
    pub elapsed: Duration,
}

impl Report {
    /// Write the summary line and, for small n, A, B and C.
    pub fn write_to<W: Write>(&self, out: &mut W, a: &Matrix, b: &Matrix, c: &Matrix) -> io::Result<()> {
        writeln!(out, "{}", self)?;
        if shows_matrices(self.n) {
            write!(out, "Matrix A:\n{}", a)?;
            write!(out, "Matrix B:\n{}", b)?;
            write!(out, "Result C = A * B:\n{}", c)?;
        }
        Ok(())
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} matrix multiplication (n={}", self.mode, self.n)?;
        if let Some(processes) = self.processes {
            write!(f, ", processes={}", processes)?;
        }
        write!(f, ") took {:.6} seconds.", self.elapsed.as_secs_f64())
    }
}
