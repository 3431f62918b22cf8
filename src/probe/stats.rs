// Repeated-sample summaries for the cost probe.
// A single probe run is noisy; these collect several and report percentiles.

use crate::probe::cost::copy_cost_with;
use crate::probe::shared::SharedHandle;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Latency percentiles over a set of samples
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatencyStats {
    pub p50: Duration,
    pub p95: Duration,
    pub p99: Duration,
    pub min: Duration,
    pub max: Duration,
    pub mean: Duration,
}

impl LatencyStats {
    /// None for an empty sample set
    pub fn from_samples(mut samples: Vec<Duration>) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        samples.sort();
        let len = samples.len();

        let index = |q: f64| ((len as f64 * q) as usize).min(len - 1);

        // u128 nanoseconds: no overflow for any sample count or duration
        let total: u128 = samples.iter().map(Duration::as_nanos).sum();
        let mean_nanos = total / len as u128;
        let mean = Duration::new(
            (mean_nanos / 1_000_000_000) as u64,
            (mean_nanos % 1_000_000_000) as u32,
        );

        Some(Self {
            p50: samples[index(0.50)],
            p95: samples[index(0.95)],
            p99: samples[index(0.99)],
            min: samples[0],
            max: samples[len - 1],
            mean,
        })
    }
}

impl fmt::Display for LatencyStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "p50 {:?}  p95 {:?}  p99 {:?}  min {:?}  max {:?}  mean {:?}",
            self.p50, self.p95, self.p99, self.min, self.max, self.mean
        )
    }
}

/// Percentiles for both sides of the probe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostStats {
    pub iterations: u64,
    pub samples: usize,
    pub shared_copy: LatencyStats,
    pub ref_pass: LatencyStats,
}

impl fmt::Display for CostStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} samples x {} iterations",
            self.samples, self.iterations
        )?;
        writeln!(f, "shared copy: {}", self.shared_copy)?;
        write!(f, "ref pass:    {}", self.ref_pass)
    }
}

/// Run the probe `samples` times against `handle`. None when `samples` is 0.
pub fn sample_copy_cost<T>(handle: &SharedHandle<T>, n: u64, samples: usize) -> Option<CostStats> {
    let mut shared = Vec::with_capacity(samples);
    let mut borrowed = Vec::with_capacity(samples);

    for _ in 0..samples {
        let (shared_copy, ref_pass) = copy_cost_with(handle, n).durations();
        shared.push(shared_copy);
        borrowed.push(ref_pass);
    }

    Some(CostStats {
        iterations: n,
        samples,
        shared_copy: LatencyStats::from_samples(shared)?,
        ref_pass: LatencyStats::from_samples(borrowed)?,
    })
}
