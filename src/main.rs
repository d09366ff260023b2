use std::io;

use rand::rngs::StdRng;
use rand::SeedableRng;
use row_matmul::config::Config;
use row_matmul::report::Report;
use row_matmul::{cli, init_logging, run_distributed, Matrix, WorkerGroup};
use tracing::{debug, error};

/// One rank's share of the job. Returns the rank's exit status.
fn run_rank<G: WorkerGroup>(group: &G, n: usize, seed: u64) -> i32 {
    let outcome = run_distributed(group, n, || {
        let mut rng = StdRng::seed_from_u64(seed);
        let a = Matrix::random(n, &mut rng);
        let b = Matrix::random(n, &mut rng);
        (a, b)
    });

    match outcome {
        Ok(Some(product)) => {
            let report = Report {
                mode: group.mode(),
                n,
                processes: Some(group.size()),
                elapsed: product.elapsed,
            };
            let stdout = io::stdout();
            if let Err(e) = report.write_to(&mut stdout.lock(), &product.a, &product.b, &product.c) {
                error!("failed to write report: {}", e);
                return 1;
            }
            0
        }
        Ok(None) => 0,
        Err(e) => {
            // every rank fails the same way; only the coordinator speaks
            if group.is_coordinator() {
                eprintln!("{}", e);
            } else {
                debug!(rank = group.rank(), "{}", e);
            }
            1
        }
    }
}

#[cfg(not(feature = "mpi"))]
fn main() {
    use row_matmul::ChannelGroup;

    init_logging();

    let n = match cli::parse_size(std::env::args_os()) {
        Ok(n) => n,
        Err(e) if e.is_informational() => {
            print!("{}", e);
            std::process::exit(0);
        }
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    let seed = config.seed.unwrap_or_else(rand::random);

    match ChannelGroup::launch(config.processes, |group| run_rank(group, n, seed)) {
        Ok(codes) => std::process::exit(codes.into_iter().max().unwrap_or(1)),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(feature = "mpi")]
fn main() {
    use row_matmul::group::MpiGroup;

    init_logging();

    let group = match MpiGroup::initialize() {
        Some(group) => group,
        None => {
            eprintln!("Failed to initialize MPI");
            std::process::exit(1);
        }
    };

    let n = match cli::parse_size(std::env::args_os()) {
        Ok(n) => n,
        Err(e) => {
            if group.is_coordinator() {
                if e.is_informational() {
                    print!("{}", e);
                } else {
                    eprintln!("{}", e);
                }
            }
            let code = if e.is_informational() { 0 } else { 1 };
            drop(group);
            std::process::exit(code);
        }
    };

    let seed = match Config::from_env() {
        Ok(config) => config.seed.unwrap_or_else(rand::random),
        Err(e) => {
            if group.is_coordinator() {
                eprintln!("{}", e);
            }
            drop(group);
            std::process::exit(1);
        }
    };

    let code = run_rank(&group, n, seed);
    drop(group);
    std::process::exit(code);
}
