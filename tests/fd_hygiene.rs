//! Descriptor leak check
//!
//! Kept in its own test binary so no concurrently running test can open or
//! close descriptors between the before and after snapshots.

use idiomlab::safety::lifecycle::LifecycleTracker;
use idiomlab::utils::fds::{get_open_fds, is_fd_open, leaked_fds};
use idiomlab::{read_until, FifoConfig, ScopedResource};
use std::sync::Arc;

#[test]
fn test_scoped_resources_leave_no_descriptors() {
    let dir = tempfile::tempdir().unwrap();
    let before = get_open_fds().unwrap();

    let mut handles = Vec::new();
    for i in 0..8 {
        let path = dir.path().join(format!("leak-{}.fifo", i));
        let resource = ScopedResource::acquire_with(
            &path,
            &FifoConfig::default(),
            Arc::new(LifecycleTracker::new()),
        )
        .unwrap();
        handles.push(resource.handle().unwrap());

        if i % 2 == 0 {
            read_until(resource, 16).unwrap();
        } else {
            drop(resource);
        }
    }

    let after = get_open_fds().unwrap();
    assert!(leaked_fds(&before, &after).is_empty(), "leaked: {:?}", leaked_fds(&before, &after));
    for fd in handles {
        assert!(!is_fd_open(fd), "fd {} still open", fd);
    }
}
