//! Copy-versus-borrow cost measurement
//!
//! Times `n` handle duplications (each moved into a callee and dropped
//! there) against `n` plain reference passes of the same handle.

use crate::config::settings::ProbeConfig;
use crate::observability::metrics::get_metrics;
use crate::probe::shared::SharedHandle;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hint::black_box;
use std::time::{Duration, Instant};

/// Timings from one probe run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostReport {
    pub iterations: u64,
    pub shared_copy: Duration,
    pub ref_pass: Duration,
    pub ref_count_before: usize,
    pub ref_count_after: usize,
    pub measured_at: DateTime<Utc>,
}

impl CostReport {
    /// `(shared_copy, ref_pass)`
    pub fn durations(&self) -> (Duration, Duration) {
        (self.shared_copy, self.ref_pass)
    }

    /// How many times slower duplication was; None when the borrow loop
    /// measured as zero.
    pub fn ratio(&self) -> Option<f64> {
        let denom = self.ref_pass.as_secs_f64();
        if denom == 0.0 {
            return None;
        }
        Some(self.shared_copy.as_secs_f64() / denom)
    }

    pub fn count_restored(&self) -> bool {
        self.ref_count_before == self.ref_count_after
    }

    pub fn shared_copy_per_iteration(&self) -> Duration {
        per_iteration(self.shared_copy, self.iterations)
    }

    pub fn ref_pass_per_iteration(&self) -> Duration {
        per_iteration(self.ref_pass, self.iterations)
    }
}

impl fmt::Display for CostReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "iterations:   {}", self.iterations)?;
        writeln!(
            f,
            "shared copy:  {:?} ({:?}/iter)",
            self.shared_copy,
            self.shared_copy_per_iteration()
        )?;
        writeln!(
            f,
            "ref pass:     {:?} ({:?}/iter)",
            self.ref_pass,
            self.ref_pass_per_iteration()
        )?;
        match self.ratio() {
            Some(ratio) => writeln!(f, "ratio:        {:.2}x", ratio)?,
            None => writeln!(f, "ratio:        n/a")?,
        }
        write!(
            f,
            "ref count:    {} -> {}",
            self.ref_count_before, self.ref_count_after
        )
    }
}

fn per_iteration(total: Duration, iterations: u64) -> Duration {
    if iterations == 0 {
        return Duration::ZERO;
    }
    let nanos = total.as_nanos() / u128::from(iterations);
    Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
}

#[inline(never)]
fn pass_owned<T>(handle: SharedHandle<T>) -> usize {
    handle.ref_count()
}

#[inline(never)]
fn pass_borrowed<T>(handle: &SharedHandle<T>) -> usize {
    handle.ref_count()
}

/// Probe a fresh handle holding the default payload
pub fn copy_cost(n: u64) -> CostReport {
    let handle = SharedHandle::new(ProbeConfig::default().payload);
    copy_cost_with(&handle, n)
}

/// Probe an existing handle. Its count is the same before and after.
pub fn copy_cost_with<T>(handle: &SharedHandle<T>, n: u64) -> CostReport {
    let ref_count_before = handle.ref_count();

    let start = Instant::now();
    for _ in 0..n {
        let copy = black_box(handle.duplicate());
        black_box(pass_owned(copy));
    }
    let shared_copy = start.elapsed();

    let start = Instant::now();
    for _ in 0..n {
        black_box(pass_borrowed(black_box(handle)));
    }
    let ref_pass = start.elapsed();

    let ref_count_after = handle.ref_count();
    debug_assert_eq!(ref_count_before, ref_count_after);

    get_metrics().record_probe(shared_copy, ref_pass);
    log::debug!(
        "copy_cost n={} shared_copy={:?} ref_pass={:?}",
        n,
        shared_copy,
        ref_pass
    );

    CostReport {
        iterations: n,
        shared_copy,
        ref_pass,
        ref_count_before,
        ref_count_after,
        measured_at: Utc::now(),
    }
}
