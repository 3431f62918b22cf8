//! Shared-ownership cost probe
//!
//! - [`shared`]: atomic-refcount handle
//! - [`cost`]: duplicate-versus-borrow timing
//! - [`stats`]: percentile summaries over repeated runs

pub mod cost;
pub mod shared;
pub mod stats;

pub use cost::{copy_cost, copy_cost_with, CostReport};
pub use shared::SharedHandle;
pub use stats::{sample_copy_cost, CostStats, LatencyStats};
