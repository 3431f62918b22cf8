//! Safety and cleanup
//!
//! Scope-bound resource ownership with exactly-once release.

pub mod lifecycle;
pub mod scoped_resource;
