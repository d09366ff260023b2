use std::path::PathBuf;

use clap::Parser;
use row_matmul::bench::{self, BenchPlan};
use row_matmul::config::Config;
use row_matmul::{init_logging, MatmulError};

/// Time the serial baseline against the distributed multiply and write CSV tables.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Matrix sizes to sweep
    #[arg(long, value_delimiter = ',', default_values_t = [64, 128, 256])]
    sizes: Vec<usize>,

    /// Worker counts to sweep
    #[arg(long, value_delimiter = ',', default_values_t = [1, 2, 4])]
    processes: Vec<usize>,

    /// Runs per configuration
    #[arg(long, default_value_t = 3)]
    repeats: usize,

    /// Directory receiving the CSV files
    #[arg(long, default_value = "results")]
    output_dir: PathBuf,
}

fn run() -> Result<(), MatmulError> {
    let args = Args::try_parse()?;
    let config = Config::from_env()?;
    let plan = BenchPlan {
        sizes: args.sizes,
        processes: args.processes,
        repeats: args.repeats,
        seed: config.seed.unwrap_or_else(rand::random),
    };

    let results = bench::run(&plan)?;
    for row in &results.summary {
        println!(
            "n={:<6} processes={:<3} serial={:.6}s parallel={:.6}s speedup={:.3} efficiency={:.3}",
            row.matrix_size, row.processes, row.serial_time, row.parallel_time, row.speedup, row.efficiency
        );
    }
    bench::write_csv(&results, &args.output_dir)?;
    println!("Results written to {}", args.output_dir.display());
    Ok(())
}

fn main() {
    init_logging();
    match run() {
        Ok(()) => {}
        Err(e) if e.is_informational() => print!("{}", e),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
