use std::process::{Command, Output};

fn distributed(processes: &str, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_distributed-matmul"))
        .args(args)
        .env("MATMUL_PROCESSES", processes)
        .env("MATMUL_SEED", "7")
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn serial(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_serial-matmul"))
        .args(args)
        .env("MATMUL_SEED", "7")
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stderr_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stderr).lines().map(str::to_owned).collect()
}

#[test]
fn test_indivisible_size_exits_with_one_message() {
    let output = distributed("3", &["10"]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        stderr_lines(&output),
        vec!["Matrix size (10) must be divisible by number of processes (3).".to_string()]
    );
    assert!(output.stdout.is_empty());
}

#[test]
fn test_distributed_usage_errors_exit_one() {
    let missing = distributed("2", &[]);
    assert_eq!(missing.status.code(), Some(1));
    assert!(!missing.stderr.is_empty());

    let zero = distributed("2", &["0"]);
    assert_eq!(zero.status.code(), Some(1));
    assert_eq!(stderr_lines(&zero), vec!["Matrix size must be positive.".to_string()]);

    let huge = distributed("1", &["4294967296"]);
    assert_eq!(huge.status.code(), Some(1));
    assert!(huge.stdout.is_empty());
}

#[test]
fn test_distributed_success_reports_timing() {
    let output = distributed("2", &["4"]);
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Distributed matrix multiplication (n=4, processes=2) took "));
    assert!(stdout.contains("Result C = A * B:"));
    assert!(output.stderr.is_empty());
}

#[test]
fn test_serial_exit_codes() {
    let ok = serial(&["3"]);
    assert_eq!(ok.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&ok.stdout).starts_with("Serial matrix multiplication (n=3) took "));

    let missing = serial(&[]);
    assert_eq!(missing.status.code(), Some(1));

    let negative = serial(&["-2"]);
    assert_eq!(negative.status.code(), Some(1));
    assert_eq!(stderr_lines(&negative), vec!["Matrix size must be positive.".to_string()]);
}

#[test]
fn test_help_exits_zero() {
    let output = serial(&["--help"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(!output.stdout.is_empty());
}
