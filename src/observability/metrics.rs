// Process-wide metrics
//
// Counters and gauges for resource acquisition and release, printer output,
// and probe runs, exported in Prometheus text format.
// Invariant: acquired - released == open_resources at every quiescent point.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Counter metric (monotonically increasing)
#[derive(Debug)]
pub struct Counter {
    value: AtomicU64,
}

impl Counter {
    pub fn new() -> Self {
        Self {
            value: AtomicU64::new(0),
        }
    }

    pub fn inc(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add(&self, delta: u64) {
        self.value.fetch_add(delta, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.value.store(0, Ordering::Relaxed);
    }
}

impl Default for Counter {
    fn default() -> Self {
        Self::new()
    }
}

/// Gauge metric (can go up or down)
#[derive(Debug)]
pub struct Gauge {
    value: AtomicU64,
}

impl Gauge {
    pub fn new() -> Self {
        Self {
            value: AtomicU64::new(0),
        }
    }

    pub fn inc(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }

    pub fn dec(&self) {
        self.value.fetch_sub(1, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

impl Default for Gauge {
    fn default() -> Self {
        Self::new()
    }
}

/// Histogram bucket for duration tracking
#[derive(Debug)]
pub struct HistogramBucket {
    pub le: f64, // upper bound in seconds
    pub count: AtomicU64,
}

/// Histogram metric for probe durations
#[derive(Debug)]
pub struct Histogram {
    buckets: Vec<HistogramBucket>,
    sum: AtomicU64, // nanoseconds
    count: AtomicU64,
}

impl Histogram {
    /// Buckets from 1µs to 10s; probe loops span a wide range.
    pub fn new_duration() -> Self {
        let bucket_bounds = vec![
            0.000_001, 0.000_01, 0.000_1, 0.001, 0.01, 0.1, 1.0, 10.0,
        ];

        let buckets = bucket_bounds
            .into_iter()
            .map(|le| HistogramBucket {
                le,
                count: AtomicU64::new(0),
            })
            .collect();

        Self {
            buckets,
            sum: AtomicU64::new(0),
            count: AtomicU64::new(0),
        }
    }

    pub fn observe(&self, value: Duration) {
        let seconds = value.as_secs_f64();
        let nanos = u64::try_from(value.as_nanos()).unwrap_or(u64::MAX);

        self.sum.fetch_add(nanos, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);

        for bucket in &self.buckets {
            if seconds <= bucket.le {
                bucket.count.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    pub fn get_count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn get_sum_nanos(&self) -> u64 {
        self.sum.load(Ordering::Relaxed)
    }

    pub fn get_bucket_count(&self, le: f64) -> u64 {
        self.buckets
            .iter()
            .find(|b| (b.le - le).abs() < f64::EPSILON)
            .map(|b| b.count.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    fn render(&self, name: &str, label: &str, output: &mut String) {
        for bucket in &self.buckets {
            output.push_str(&format!(
                "{}_bucket{{side=\"{}\",le=\"{}\"}} {}\n",
                name,
                label,
                bucket.le,
                bucket.count.load(Ordering::Relaxed)
            ));
        }
        output.push_str(&format!(
            "{}_bucket{{side=\"{}\",le=\"+Inf\"}} {}\n",
            name,
            label,
            self.get_count()
        ));
        output.push_str(&format!(
            "{}_sum{{side=\"{}\"}} {}\n",
            name,
            label,
            self.get_sum_nanos() as f64 / 1_000_000_000.0
        ));
        output.push_str(&format!(
            "{}_count{{side=\"{}\"}} {}\n",
            name,
            label,
            self.get_count()
        ));
    }
}

/// Global metrics registry
#[derive(Debug)]
pub struct MetricsRegistry {
    // Scoped resources
    pub resources_acquired: Counter,
    pub resources_released: Counter,
    pub acquisition_failures: Counter,
    pub release_failures: Counter,
    pub open_resources: Gauge,

    // Reads
    pub read_errors: Counter,
    pub bytes_read: Counter,

    // Printer
    pub values_printed: Counter,
    pub print_calls: Counter,

    // Probe
    pub probe_runs: Counter,
    pub probe_shared_copy: Histogram,
    pub probe_ref_pass: Histogram,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self {
            resources_acquired: Counter::new(),
            resources_released: Counter::new(),
            acquisition_failures: Counter::new(),
            release_failures: Counter::new(),
            open_resources: Gauge::new(),
            read_errors: Counter::new(),
            bytes_read: Counter::new(),
            values_printed: Counter::new(),
            print_calls: Counter::new(),
            probe_runs: Counter::new(),
            probe_shared_copy: Histogram::new_duration(),
            probe_ref_pass: Histogram::new_duration(),
        }
    }

    pub fn record_acquired(&self) {
        self.resources_acquired.inc();
        self.open_resources.inc();
    }

    pub fn record_released(&self) {
        self.resources_released.inc();
        self.open_resources.dec();
    }

    pub fn record_probe(&self, shared_copy: Duration, ref_pass: Duration) {
        self.probe_runs.inc();
        self.probe_shared_copy.observe(shared_copy);
        self.probe_ref_pass.observe(ref_pass);
    }

    /// Export metrics in Prometheus text format
    pub fn export_prometheus(&self) -> String {
        let mut output = String::new();

        output.push_str("# HELP idiomlab_resources_total Scoped resource lifecycle events\n");
        output.push_str("# TYPE idiomlab_resources_total counter\n");
        output.push_str(&format!(
            "idiomlab_resources_total{{event=\"acquired\"}} {}\n",
            self.resources_acquired.get()
        ));
        output.push_str(&format!(
            "idiomlab_resources_total{{event=\"released\"}} {}\n",
            self.resources_released.get()
        ));
        output.push_str(&format!(
            "idiomlab_resources_total{{event=\"acquisition_failed\"}} {}\n",
            self.acquisition_failures.get()
        ));
        output.push_str(&format!(
            "idiomlab_resources_total{{event=\"release_failed\"}} {}\n",
            self.release_failures.get()
        ));

        output.push_str("# HELP idiomlab_open_resources Currently open scoped resources\n");
        output.push_str("# TYPE idiomlab_open_resources gauge\n");
        output.push_str(&format!(
            "idiomlab_open_resources {}\n",
            self.open_resources.get()
        ));

        output.push_str("# HELP idiomlab_read_bytes_total Bytes read from scoped resources\n");
        output.push_str("# TYPE idiomlab_read_bytes_total counter\n");
        output.push_str(&format!("idiomlab_read_bytes_total {}\n", self.bytes_read.get()));

        output.push_str("# HELP idiomlab_read_errors_total Failed reads\n");
        output.push_str("# TYPE idiomlab_read_errors_total counter\n");
        output.push_str(&format!("idiomlab_read_errors_total {}\n", self.read_errors.get()));

        output.push_str("# HELP idiomlab_printed_values_total Values rendered by the printer\n");
        output.push_str("# TYPE idiomlab_printed_values_total counter\n");
        output.push_str(&format!(
            "idiomlab_printed_values_total {}\n",
            self.values_printed.get()
        ));

        output.push_str("# HELP idiomlab_print_calls_total Printer invocations\n");
        output.push_str("# TYPE idiomlab_print_calls_total counter\n");
        output.push_str(&format!(
            "idiomlab_print_calls_total {}\n",
            self.print_calls.get()
        ));

        output.push_str("# HELP idiomlab_probe_runs_total Completed cost probe runs\n");
        output.push_str("# TYPE idiomlab_probe_runs_total counter\n");
        output.push_str(&format!("idiomlab_probe_runs_total {}\n", self.probe_runs.get()));

        output.push_str("# HELP idiomlab_probe_duration_seconds Cost probe loop durations\n");
        output.push_str("# TYPE idiomlab_probe_duration_seconds histogram\n");
        self.probe_shared_copy
            .render("idiomlab_probe_duration_seconds", "shared_copy", &mut output);
        self.probe_ref_pass
            .render("idiomlab_probe_duration_seconds", "ref_pass", &mut output);

        output
    }
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Global metrics instance
static METRICS: once_cell::sync::Lazy<Arc<MetricsRegistry>> =
    once_cell::sync::Lazy::new(|| Arc::new(MetricsRegistry::new()));

/// Get global metrics registry
pub fn get_metrics() -> Arc<MetricsRegistry> {
    Arc::clone(&METRICS)
}
