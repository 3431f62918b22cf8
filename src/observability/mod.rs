//! Observability
//!
//! Process-wide counters with Prometheus export.

pub mod metrics;
