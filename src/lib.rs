//! idiomlab: three small, self-contained resource-handling demos
//!
//! # Architecture
//!
//! ## Kernel Primitives ([`kernel`])
//! - [`kernel::fifo`]: mkfifo/open/fcntl/unlink wrappers
//!
//! ## Safety ([`safety`])
//! - [`safety::scoped_resource`]: FIFO ownership with exactly-once release on every exit path
//! - [`safety::lifecycle`]: per-resource open/close/read accounting
//!
//! ## Printer ([`printer`])
//! - [`printer::value`]: the `Printable` gate and `PrintableValue`
//! - [`print_values!`], [`write_values!`], [`format_values!`]: compile-time checked variadics
//!
//! ## Cost Probe ([`probe`])
//! - [`probe::shared`]: atomic-refcount handle
//! - [`probe::cost`]: duplicate-versus-borrow timing
//! - [`probe::stats`]: percentile summaries
//!
//! ## Observability ([`observability`])
//! - [`observability::metrics`]: Prometheus metrics export
//!
//! ## Configuration ([`config`])
//! - [`config::settings`]: JSON settings with defaults
//! - [`config::validator`]: startup validation
//! - [`config::types`]: error type and shared reports
//!
//! ## Utilities ([`utils`])
//! - [`utils::fds`]: open-descriptor inspection for leak checks
//!
//! # Design Principles
//!
//! 1. **Release is tied to scope** - no caller ever has to remember to clean up
//! 2. **Types reject bad arguments** - unsupported printer inputs fail to compile
//! 3. **Counts are observable** - every open has a matching, countable close

// Kernel Primitives
pub mod kernel;

// Safety
pub mod safety;

// Printer
pub mod printer;

// Cost Probe
pub mod probe;

// Observability
pub mod observability;

// Configuration
pub mod config;

// Utilities
pub mod utils;

// CLI entrypoint for the idiomlab binary
pub mod cli;

// Re-export commonly used types for convenience
pub use config::settings::{DemoConfig, FifoConfig, ProbeConfig};
pub use config::types::{DemoError, DrainReport, Result};
pub use printer::{Printable, PrintableValue};
pub use probe::{copy_cost, copy_cost_with, CostReport, SharedHandle};
pub use safety::scoped_resource::{drain_fifo, read_until, ScopedResource};
