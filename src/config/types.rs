/// Core error and report types shared across the idiomlab demos
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by the demos
#[derive(Error, Debug)]
pub enum DemoError {
    /// The named resource could not be created or opened
    #[error("Acquisition error for {}: {}", .path.display(), .reason)]
    Acquisition { path: PathBuf, reason: String },

    /// A read (or write to an output sink) failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Closing or unlinking a resource failed during explicit release
    #[error("Release error: {0}")]
    Release(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl DemoError {
    pub(crate) fn acquisition(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        DemoError::Acquisition {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// True for errors raised before any resource existed
    pub fn is_acquisition(&self) -> bool {
        matches!(self, DemoError::Acquisition { .. })
    }
}

impl From<nix::errno::Errno> for DemoError {
    fn from(err: nix::errno::Errno) -> Self {
        DemoError::Io(std::io::Error::from(err))
    }
}

/// Result type for idiomlab operations
pub type Result<T> = std::result::Result<T, DemoError>;

/// How a scoped resource left its scope
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReleaseKind {
    /// Released through `ScopedResource::close`
    Explicit,
    /// Released by `Drop` (early return, `?`, or unwinding)
    Scope,
}

/// Summary of a completed FIFO drain, as printed by the CLI
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DrainReport {
    pub path: PathBuf,
    pub threshold: usize,
    pub chunk_size: usize,
    pub bytes_read: usize,
}
