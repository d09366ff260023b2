use std::io;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use row_matmul::config::Config;
use row_matmul::report::Report;
use row_matmul::{cli, init_logging, Matrix, MatmulError};

fn run() -> Result<(), MatmulError> {
    let n = cli::parse_size(std::env::args_os())?;
    let config = Config::from_env()?;
    let mut rng = StdRng::seed_from_u64(config.seed.unwrap_or_else(rand::random));

    let a = Matrix::random(n, &mut rng);
    let b = Matrix::random(n, &mut rng);

    let start = Instant::now();
    let c = a.multiply(&b)?;
    let elapsed = start.elapsed();

    let report = Report {
        mode: "Serial",
        n,
        processes: None,
        elapsed,
    };
    report.write_to(&mut io::stdout().lock(), &a, &b, &c)?;
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
