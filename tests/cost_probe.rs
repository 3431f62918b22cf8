//! Integration tests for the shared-ownership cost probe

use idiomlab::probe::{sample_copy_cost, LatencyStats};
use idiomlab::{copy_cost, copy_cost_with, SharedHandle};
use std::time::Duration;

#[test]
fn test_ref_count_unchanged_for_any_n() {
    let handle = SharedHandle::new(42i64);
    for n in [1u64, 2, 17, 10_000] {
        let before = handle.ref_count();
        let report = copy_cost_with(&handle, n);
        assert_eq!(handle.ref_count(), before, "n = {}", n);
        assert!(report.count_restored());
        assert!(report.shared_copy >= Duration::ZERO);
        assert!(report.ref_pass >= Duration::ZERO);
    }
}

#[test]
fn test_copy_cost_fresh_handle() {
    let report = copy_cost(1_000);
    assert_eq!(report.iterations, 1_000);
    assert_eq!(report.ref_count_before, 1);
    assert_eq!(report.ref_count_after, 1);
}

#[test]
fn test_probe_payload_survives() {
    let handle = SharedHandle::new(vec![1u8, 2, 3]);
    let copy = handle.duplicate();
    copy_cost_with(&copy, 500);

    assert_eq!(handle.payload(), &vec![1u8, 2, 3]);
    assert_eq!(handle.ref_count(), 2);
    drop(copy);
    assert_eq!(handle.ref_count(), 1);
}

#[test]
fn test_sampled_stats_are_ordered() {
    let handle = SharedHandle::new(0i64);
    let stats = sample_copy_cost(&handle, 1_000, 5).unwrap();

    for side in [stats.shared_copy, stats.ref_pass] {
        let LatencyStats { min, p50, p95, max, .. } = side;
        assert!(min <= p50);
        assert!(p50 <= p95);
        assert!(p95 <= max);
    }
    assert_eq!(handle.ref_count(), 1);
}
