mod common;

use std::sync::atomic::{AtomicUsize, Ordering};

use common::{run_group, scrambled, sequential};
use row_matmul::report::Report;
use row_matmul::{run_distributed, run_local, ChannelGroup, Matrix, MatmulError};

#[test]
fn test_distributed_matches_serial_exactly() {
    let n = 12;
    let a = scrambled(n, 11);
    let b = scrambled(n, 29);
    let expected = a.multiply(&b).unwrap();

    for workers in [1, 2, 3, 4, 6, 12] {
        let product = run_local(workers, a.clone(), b.clone()).unwrap();
        assert_eq!(
            product.c.data, expected.data,
            "result differs from serial with {} workers",
            workers
        );
        assert_eq!(product.a, a);
        assert_eq!(product.b, b);
    }
}

#[test]
fn test_only_coordinator_returns_product() {
    let a = sequential(6);
    let b = Matrix::identity(6);
    let outcomes = run_group(3, 6, &a, &b);

    assert_eq!(outcomes.len(), 3);
    let mut outcomes = outcomes.into_iter();
    let product = outcomes.next().unwrap().unwrap().expect("coordinator result");
    assert_eq!(product.c, a);
    for outcome in outcomes {
        assert!(outcome.unwrap().is_none());
    }
}

#[test]
fn test_identity_property() {
    let a = scrambled(8, 3);
    for workers in [1, 2, 4, 8] {
        let right = run_local(workers, a.clone(), Matrix::identity(8)).unwrap();
        assert_eq!(right.c, a);
        let left = run_local(workers, Matrix::identity(8), a.clone()).unwrap();
        assert_eq!(left.c, a);
    }
}

#[test]
fn test_zero_property() {
    let a = scrambled(6, 5);
    let product = run_local(3, a.clone(), Matrix::zeroed(6)).unwrap();
    assert_eq!(product.c, Matrix::zeroed(6));
    let product = run_local(2, Matrix::zeroed(6), a).unwrap();
    assert_eq!(product.c, Matrix::zeroed(6));
}

#[test]
fn test_four_by_two_layout() {
    let a = sequential(4);
    let product = run_local(2, a.clone(), Matrix::identity(4)).unwrap();
    assert_eq!(
        product.c.data,
        vec![
            1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0, 13.0, 14.0, 15.0,
            16.0
        ]
    );
}

#[test]
fn test_indivisible_size_fails_on_every_rank_before_any_work() {
    let a = sequential(10);
    let b = sequential(10);
    let input_calls = AtomicUsize::new(0);
    let outcomes = ChannelGroup::launch(3, |group| {
        run_distributed(group, 10, || {
            input_calls.fetch_add(1, Ordering::SeqCst);
            (a.clone(), b.clone())
        })
    })
    .unwrap();

    assert_eq!(outcomes.len(), 3);
    for outcome in outcomes {
        match outcome {
            Err(MatmulError::Partition { size, workers }) => assert_eq!((size, workers), (10, 3)),
            other => panic!("expected partition error, got {:?}", other.map(|p| p.is_some())),
        }
    }
    // the coordinator never even generated its inputs
    assert_eq!(input_calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_partition_error_message() {
    let err = run_local(3, sequential(10), sequential(10)).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Matrix size (10) must be divisible by number of processes (3)."
    );
}

#[test]
fn test_mismatched_inputs_are_rejected() {
    let err = run_local(2, sequential(4), sequential(2)).unwrap_err();
    assert!(matches!(err, MatmulError::DimensionMismatch { left: 4, right: 2 }));
}

fn render(n: usize, workers: usize) -> String {
    let a = sequential(n);
    let b = Matrix::identity(n);
    let product = run_local(workers, a, b).unwrap();
    let report = Report {
        mode: "Distributed",
        n,
        processes: Some(workers),
        elapsed: product.elapsed,
    };
    let mut out = Vec::new();
    report
        .write_to(&mut out, &product.a, &product.b, &product.c)
        .unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_small_result_is_printed_in_full() {
    let output = render(8, 4);
    let lines: Vec<&str> = output.lines().collect();
    assert!(lines[0].starts_with("Distributed matrix multiplication (n=8, processes=4) took "));
    assert!(lines[0].ends_with(" seconds."));
    assert_eq!(lines[1], "Matrix A:");
    assert_eq!(lines[10], "Matrix B:");
    assert_eq!(lines[19], "Result C = A * B:");
    assert_eq!(lines.len(), 1 + 3 * 9);
    assert_eq!(lines[20], lines[2]);
}

#[test]
fn test_large_result_prints_summary_only() {
    let output = render(9, 3);
    assert_eq!(output.lines().count(), 1);
    assert!(output.starts_with("Distributed matrix multiplication (n=9, processes=3) took "));
}
