/// File descriptor inspection
///
/// Lists the process's open descriptors through /proc/self/fd so leak
/// checks can compare before/after sets.
use crate::config::types::Result;
use std::fs;
use std::os::fd::RawFd;

const FD_DIR: &str = "/proc/self/fd";

/// Get sorted list of open file descriptors
pub fn get_open_fds() -> Result<Vec<RawFd>> {
    let entries = fs::read_dir(FD_DIR)?;

    let mut fds = Vec::new();
    for entry in entries.flatten() {
        if let Ok(file_name) = entry.file_name().into_string() {
            if let Ok(fd) = file_name.parse::<RawFd>() {
                fds.push(fd);
            }
        }
    }

    fds.sort_unstable();
    Ok(fds)
}

/// True if `fd` refers to an open descriptor in this process
pub fn is_fd_open(fd: RawFd) -> bool {
    let rc = unsafe { libc::fcntl(fd, libc::F_GETFD) };
    rc != -1
}

/// Descriptors in `after` that were not in `before`
pub fn leaked_fds(before: &[RawFd], after: &[RawFd]) -> Vec<RawFd> {
    after
        .iter()
        .copied()
        .filter(|fd| before.binary_search(fd).is_err())
        .collect()
}
