/// Named pipe primitives
///
/// Thin wrappers over mkfifo/open/fcntl/unlink. Ownership and release
/// ordering live in `safety::scoped_resource`; nothing here closes or
/// removes anything on its own.
use crate::config::types::{DemoError, Result};
use nix::sys::stat::Mode;
use std::fs::{File, OpenOptions};
use std::os::fd::{AsRawFd, RawFd};
use std::os::unix::fs::{FileTypeExt, OpenOptionsExt};
use std::path::Path;

/// Create a FIFO at `path`. Fails if anything already exists there.
pub fn create_fifo(path: &Path, mode: u32) -> Result<()> {
    let mode = Mode::from_bits_truncate(mode as libc::mode_t);
    nix::unistd::mkfifo(path, mode).map_err(|errno| {
        let reason = match errno {
            nix::errno::Errno::EEXIST => "path already exists".to_string(),
            nix::errno::Errno::ENOENT => "parent directory does not exist".to_string(),
            nix::errno::Errno::EACCES => "permission denied".to_string(),
            other => format!("mkfifo failed: {}", other),
        };
        DemoError::acquisition(path, reason)
    })
}

/// Open `path` read-only without waiting for a writer.
///
/// A FIFO opened for reading normally blocks until a writer appears, so the
/// open uses O_NONBLOCK and the flag is cleared right after. Reads then block
/// for data while a writer is connected and report EOF when none is.
pub fn open_fifo_reader(path: &Path) -> Result<File> {
    let file = OpenOptions::new()
        .read(true)
        .custom_flags(libc::O_NONBLOCK | libc::O_CLOEXEC)
        .open(path)
        .map_err(|e| DemoError::acquisition(path, format!("open failed: {}", e)))?;

    clear_nonblocking(file.as_raw_fd())
        .map_err(|e| DemoError::acquisition(path, format!("fcntl failed: {}", e)))?;

    Ok(file)
}

/// Clear O_NONBLOCK on an open descriptor
pub fn clear_nonblocking(fd: RawFd) -> std::io::Result<()> {
    let flags = unsafe { libc::fcntl(fd, libc::F_GETFL) };
    if flags < 0 {
        return Err(std::io::Error::last_os_error());
    }

    let rc = unsafe { libc::fcntl(fd, libc::F_SETFL, flags & !libc::O_NONBLOCK) };
    if rc < 0 {
        return Err(std::io::Error::last_os_error());
    }
    Ok(())
}

/// Remove a FIFO created by `create_fifo`. The caller decides how to report failure.
pub fn remove_fifo(path: &Path) -> nix::Result<()> {
    nix::unistd::unlink(path)
}

/// True if `path` exists and is a FIFO
pub fn is_fifo(path: &Path) -> bool {
    std::fs::symlink_metadata(path)
        .map(|meta| meta.file_type().is_fifo())
        .unwrap_or(false)
}
