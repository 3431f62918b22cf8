//! Utilities
//!
//! Descriptor inspection used by leak checks.

pub mod fds;
