/// Per-resource lifecycle accounting
///
/// Every `ScopedResource` reports into a `LifecycleTracker` so callers can
/// check that one acquisition produced exactly one open and one close.
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct LifecycleTracker {
    opens: AtomicU64,
    closes: AtomicU64,
    reads: AtomicU64,
    release_failures: AtomicU64,
}

/// Point-in-time copy of a tracker's counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LifecycleSnapshot {
    pub opens: u64,
    pub closes: u64,
    pub reads: u64,
    pub release_failures: u64,
}

impl LifecycleSnapshot {
    /// Resources opened but not yet closed
    pub fn outstanding(&self) -> u64 {
        self.opens.saturating_sub(self.closes)
    }
}

impl LifecycleTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_open(&self) {
        self.opens.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_close(&self) {
        self.closes.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_read(&self) {
        self.reads.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_release_failure(&self) {
        self.release_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> LifecycleSnapshot {
        LifecycleSnapshot {
            opens: self.opens.load(Ordering::Relaxed),
            closes: self.closes.load(Ordering::Relaxed),
            reads: self.reads.load(Ordering::Relaxed),
            release_failures: self.release_failures.load(Ordering::Relaxed),
        }
    }
}
