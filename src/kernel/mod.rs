//! Thin wrappers around Linux kernel primitives.
//!
//! Raw `libc`/`nix` calls are concentrated here; callers above this layer
//! deal only in `File`s and paths.

pub mod fifo;
