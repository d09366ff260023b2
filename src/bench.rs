//! Serial vs. distributed timing sweep.
//!
//! Produces the three CSV tables consumed by the plotting scripts:
//! per-run serial times, per-run distributed times, and a summary with
//! speedup and parallel efficiency.

use std::fs;
use std::path::Path;
use std::time::Instant;

use csv::Writer;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::Result;
use crate::job::run_local;
use crate::matrix::Matrix;

pub const SERIAL_CSV: &str = "serial_results.csv";
pub const PARALLEL_CSV: &str = "mpi_results.csv";
pub const SUMMARY_CSV: &str = "benchmark_summary.csv";

#[derive(Debug, Clone)]
pub struct BenchPlan {
    pub sizes: Vec<usize>,
    pub processes: Vec<usize>,
    pub repeats: usize,
    pub seed: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SerialRecord {
    pub matrix_size: usize,
    pub run: usize,
    pub execution_time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParallelRecord {
    pub matrix_size: usize,
    pub processes: usize,
    pub run: usize,
    pub execution_time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub matrix_size: usize,
    pub processes: usize,
    pub serial_time: f64,
    pub parallel_time: f64,
    pub speedup: f64,
    pub efficiency: f64,
}

impl SummaryRow {
    fn new(matrix_size: usize, processes: usize, serial_time: f64, parallel_time: f64) -> Self {
        let speedup = if parallel_time > 0.0 {
            serial_time / parallel_time
        } else {
            0.0
        };
        SummaryRow {
            matrix_size,
            processes,
            serial_time,
            parallel_time,
            speedup,
            efficiency: speedup / processes as f64,
        }
    }
}

#[derive(Debug, Default)]
pub struct BenchResults {
    pub serial: Vec<SerialRecord>,
    pub parallel: Vec<ParallelRecord>,
    pub summary: Vec<SummaryRow>,
}

fn mean(times: &[f64]) -> f64 {
    if times.is_empty() {
        return 0.0;
    }
    times.iter().sum::<f64>() / times.len() as f64
}

/// Run every size × process-count pair `plan.repeats` times.
///
/// Zero sizes, and pairs whose process count does not divide the size, are
/// skipped with a warning.
pub fn run(plan: &BenchPlan) -> Result<BenchResults> {
    let mut rng = StdRng::seed_from_u64(plan.seed);
    let mut results = BenchResults::default();

    for &n in &plan.sizes {
        if n == 0 {
            warn!("skipping: matrix size 0");
            continue;
        }
        let a = Matrix::random(n, &mut rng);
        let b = Matrix::random(n, &mut rng);

        let mut serial_times = Vec::with_capacity(plan.repeats);
        for run in 1..=plan.repeats {
            let start = Instant::now();
            let _c = a.multiply(&b)?;
            let execution_time = start.elapsed().as_secs_f64();
            serial_times.push(execution_time);
            results.serial.push(SerialRecord {
                matrix_size: n,
                run,
                execution_time,
            });
        }
        let serial_time = mean(&serial_times);
        info!(n, serial_time, "serial baseline");

        for &p in &plan.processes {
            if p == 0 || n % p != 0 {
                warn!(n, processes = p, "skipping: size not divisible by process count");
                continue;
            }
            let mut parallel_times = Vec::with_capacity(plan.repeats);
            for run in 1..=plan.repeats {
                let product = run_local(p, a.clone(), b.clone())?;
                let execution_time = product.elapsed.as_secs_f64();
                parallel_times.push(execution_time);
                results.parallel.push(ParallelRecord {
                    matrix_size: n,
                    processes: p,
                    run,
                    execution_time,
                });
            }
            let row = SummaryRow::new(n, p, serial_time, mean(&parallel_times));
            info!(n, processes = p, speedup = row.speedup, "distributed run");
            results.summary.push(row);
        }
    }
    Ok(results)
}

/// Write the three tables into `dir`, creating it if needed. Column headers
/// are the record field names.
pub fn write_csv(results: &BenchResults, dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;
    write_table(&dir.join(SERIAL_CSV), &results.serial)?;
    write_table(&dir.join(PARALLEL_CSV), &results.parallel)?;
    write_table(&dir.join(SUMMARY_CSV), &results.summary)?;
    Ok(())
}

fn write_table<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut writer = Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    info!(path = %path.display(), rows = rows.len(), "wrote csv table");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_derives_speedup_and_efficiency() {
        let row = SummaryRow::new(64, 4, 2.0, 0.5);
        assert_eq!(row.speedup, 4.0);
        assert_eq!(row.efficiency, 1.0);
    }

    #[test]
    fn zero_size_is_skipped_without_aborting_the_sweep() {
        let plan = BenchPlan {
            sizes: vec![0, 2],
            processes: vec![1, 2],
            repeats: 1,
            seed: 3,
        };
        let results = run(&plan).unwrap();
        assert!(results.serial.iter().all(|r| r.matrix_size == 2));
        let pairs: Vec<(usize, usize)> = results.summary.iter().map(|r| (r.matrix_size, r.processes)).collect();
        assert_eq!(pairs, vec![(2, 1), (2, 2)]);
    }

    #[test]
    fn mean_of_nothing_is_zero() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[1.0, 2.0, 3.0]), 2.0);
    }
}
