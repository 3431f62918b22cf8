//! Scoped FIFO resources
//!
//! A `ScopedResource` owns one open descriptor and, when it created the
//! FIFO, the path as well. Release (close, then unlink) runs exactly once:
//! either through the consuming `close`, which reports failures, or through
//! `Drop` on any other exit from the owning scope.
//!
//! ```no_run
//! use idiomlab::safety::scoped_resource::{read_until, ScopedResource};
//!
//! let resource = ScopedResource::acquire("/tmp/demo.fifo")?;
//! let bytes = read_until(resource, 4096)?;
//! println!("read {} bytes", bytes);
//! # Ok::<(), idiomlab::DemoError>(())
//! ```
//!
//! A released resource is moved out of reach, so it cannot be read again:
//!
//! ```compile_fail
//! use idiomlab::safety::scoped_resource::ScopedResource;
//!
//! let mut resource = ScopedResource::acquire("/tmp/demo.fifo").unwrap();
//! resource.close().unwrap();
//! let mut buf = [0u8; 16];
//! resource.read_some(&mut buf).unwrap();
//! ```

use crate::config::settings::FifoConfig;
use crate::config::types::{DemoError, DrainReport, ReleaseKind, Result};
use crate::kernel::fifo;
use crate::observability::metrics::get_metrics;
use crate::safety::lifecycle::LifecycleTracker;
use log::{debug, info, warn};
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::os::fd::{AsRawFd, IntoRawFd, RawFd};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug)]
pub struct ScopedResource {
    path: PathBuf,
    file: Option<File>,
    owns_path: bool,
    chunk_size: usize,
    tracker: Arc<LifecycleTracker>,
}

impl ScopedResource {
    /// Create a FIFO at `path` and open it for reading
    pub fn acquire(path: impl AsRef<Path>) -> Result<Self> {
        Self::acquire_with(path, &FifoConfig::default(), Arc::new(LifecycleTracker::new()))
    }

    /// Create a FIFO at `path` with the given settings, reporting into `tracker`
    pub fn acquire_with(
        path: impl AsRef<Path>,
        config: &FifoConfig,
        tracker: Arc<LifecycleTracker>,
    ) -> Result<Self> {
        let path = path.as_ref();
        let metrics = get_metrics();

        if let Err(e) = fifo::create_fifo(path, config.mode) {
            metrics.acquisition_failures.inc();
            warn!("FIFO creation failed: {}", e);
            return Err(e);
        }

        let file = match fifo::open_fifo_reader(path) {
            Ok(file) => file,
            Err(e) => {
                metrics.acquisition_failures.inc();
                if let Err(errno) = fifo::remove_fifo(path) {
                    warn!(
                        "Failed to remove {} after open failure: {}",
                        path.display(),
                        errno
                    );
                }
                return Err(e);
            }
        };

        Ok(Self::adopt(path, file, true, config, tracker))
    }

    /// Open an existing path read-only. The path is left in place on release.
    pub fn open_existing(
        path: impl AsRef<Path>,
        config: &FifoConfig,
        tracker: Arc<LifecycleTracker>,
    ) -> Result<Self> {
        let path = path.as_ref();
        let file = fifo::open_fifo_reader(path).map_err(|e| {
            get_metrics().acquisition_failures.inc();
            e
        })?;

        Ok(Self::adopt(path, file, false, config, tracker))
    }

    fn adopt(
        path: &Path,
        file: File,
        owns_path: bool,
        config: &FifoConfig,
        tracker: Arc<LifecycleTracker>,
    ) -> Self {
        tracker.record_open();
        get_metrics().record_acquired();
        info!(
            "Acquired {} (fd {}, owns path: {})",
            path.display(),
            file.as_raw_fd(),
            owns_path
        );

        ScopedResource {
            path: path.to_path_buf(),
            file: Some(file),
            owns_path,
            chunk_size: config.chunk_size.max(1),
            tracker,
        }
    }

    /// Raw descriptor while the resource is open
    pub fn handle(&self) -> Option<RawFd> {
        self.file.as_ref().map(|f| f.as_raw_fd())
    }

    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn owns_path(&self) -> bool {
        self.owns_path
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// One read call, retried on EINTR. Returns 0 at EOF.
    pub fn read_some(&mut self, buf: &mut [u8]) -> Result<usize> {
        let file = self.file.as_mut().ok_or_else(|| {
            DemoError::Io(std::io::Error::new(
                ErrorKind::NotConnected,
                "resource already released",
            ))
        })?;

        loop {
            self.tracker.record_read();
            match file.read(buf) {
                Ok(n) => return Ok(n),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(DemoError::Io(e)),
            }
        }
    }

    /// Read chunks until at least `threshold` bytes arrived or EOF
    fn fill_until(&mut self, threshold: usize) -> Result<usize> {
        if threshold == 0 {
            return Ok(0);
        }

        let mut buf = vec![0u8; self.chunk_size];
        let mut total = 0usize;

        while total < threshold {
            let n = self.read_some(&mut buf)?;
            if n == 0 {
                debug!(
                    "EOF on {} after {} of {} bytes",
                    self.path.display(),
                    total,
                    threshold
                );
                break;
            }
            total += n;
        }

        Ok(total)
    }

    /// Release now and report close/unlink failures
    pub fn close(mut self) -> Result<()> {
        self.release(ReleaseKind::Explicit)
    }

    fn release(&mut self, kind: ReleaseKind) -> Result<()> {
        let Some(file) = self.file.take() else {
            return Ok(());
        };

        let fd = file.into_raw_fd();
        let rc = unsafe { libc::close(fd) };
        self.tracker.record_close();
        get_metrics().record_released();

        let mut failures = Vec::new();
        if rc != 0 {
            failures.push(format!(
                "close fd {} failed: {}",
                fd,
                std::io::Error::last_os_error()
            ));
        }
        if self.owns_path {
            if let Err(errno) = fifo::remove_fifo(&self.path) {
                failures.push(format!("unlink {} failed: {}", self.path.display(), errno));
            }
        }

        if !failures.is_empty() {
            self.tracker.record_release_failure();
            get_metrics().release_failures.inc();
            return Err(DemoError::Release(failures.join("; ")));
        }

        debug!("Released {} ({:?})", self.path.display(), kind);
        Ok(())
    }
}

impl Drop for ScopedResource {
    fn drop(&mut self) {
        if let Err(e) = self.release(ReleaseKind::Scope) {
            warn!("Scoped release of {} failed: {}", self.path.display(), e);
        }
    }
}

/// Read from `resource` until `threshold` bytes or EOF, then release it.
///
/// The resource is released before this returns on every path. A read error
/// wins over a release error.
pub fn read_until(mut resource: ScopedResource, threshold: usize) -> Result<usize> {
    let outcome = resource.fill_until(threshold);
    let released = resource.close();
    let metrics = get_metrics();

    match outcome {
        Ok(total) => {
            metrics.bytes_read.add(total as u64);
            released.map(|()| total)
        }
        Err(e) => {
            metrics.read_errors.inc();
            if let Err(release_err) = released {
                warn!("Release after read error also failed: {}", release_err);
            }
            Err(e)
        }
    }
}

/// Acquire a FIFO at `path` and drain it up to `threshold` bytes
pub fn drain_fifo(path: impl AsRef<Path>, threshold: usize, config: &FifoConfig) -> Result<DrainReport> {
    let path = path.as_ref();
    let resource = ScopedResource::acquire_with(path, config, Arc::new(LifecycleTracker::new()))?;
    let chunk_size = resource.chunk_size();
    let bytes_read = read_until(resource, threshold)?;

    info!("Drained {} bytes from {}", bytes_read, path.display());
    Ok(DrainReport {
        path: path.to_path_buf(),
        threshold,
        chunk_size,
        bytes_read,
    })
}

/// Fresh FIFO path under the configured directory
pub fn default_fifo_path(config: &FifoConfig) -> PathBuf {
    config
        .fifo_dir()
        .join(format!("idiomlab-{}.fifo", uuid::Uuid::new_v4()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn scratch() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scoped.fifo");
        (dir, path)
    }

    fn small_chunks() -> FifoConfig {
        FifoConfig {
            chunk_size: 16,
            ..FifoConfig::default()
        }
    }

    #[test]
    fn test_acquire_then_drop_releases_once() {
        let (_dir, path) = scratch();
        let tracker = Arc::new(LifecycleTracker::new());

        {
            let resource =
                ScopedResource::acquire_with(&path, &FifoConfig::default(), tracker.clone())
                    .unwrap();
            assert!(resource.is_open());
            assert!(resource.handle().is_some());
            assert!(fifo::is_fifo(&path));
        }

        let snap = tracker.snapshot();
        assert_eq!(snap.opens, 1);
        assert_eq!(snap.closes, 1);
        assert!(!path.exists());
    }

    #[test]
    fn test_explicit_close_is_not_repeated_by_drop() {
        let (_dir, path) = scratch();
        let tracker = Arc::new(LifecycleTracker::new());

        let resource =
            ScopedResource::acquire_with(&path, &FifoConfig::default(), tracker.clone()).unwrap();
        resource.close().unwrap();

        let snap = tracker.snapshot();
        assert_eq!(snap.closes, 1);
        assert_eq!(snap.release_failures, 0);
    }

    #[test]
    fn test_release_on_early_return() {
        fn bail_early(path: &Path, tracker: Arc<LifecycleTracker>) -> Result<usize> {
            let _resource = ScopedResource::acquire_with(path, &FifoConfig::default(), tracker)?;
            Err(DemoError::Config("early exit".to_string()))
        }

        let (_dir, path) = scratch();
        let tracker = Arc::new(LifecycleTracker::new());

        assert!(bail_early(&path, tracker.clone()).is_err());
        assert_eq!(tracker.snapshot().outstanding(), 0);
        assert_eq!(tracker.snapshot().closes, 1);
    }

    #[test]
    fn test_read_until_zero_threshold() {
        let (_dir, path) = scratch();
        let tracker = Arc::new(LifecycleTracker::new());
        let resource =
            ScopedResource::acquire_with(&path, &FifoConfig::default(), tracker.clone()).unwrap();

        assert_eq!(read_until(resource, 0).unwrap(), 0);

        let snap = tracker.snapshot();
        assert_eq!(snap.reads, 0);
        assert_eq!(snap.opens, 1);
        assert_eq!(snap.closes, 1);
    }

    #[test]
    fn test_read_until_reads_fixed_chunks() {
        let (_dir, path) = scratch();
        let tracker = Arc::new(LifecycleTracker::new());
        let resource = ScopedResource::acquire_with(&path, &small_chunks(), tracker.clone()).unwrap();

        let mut writer = std::fs::OpenOptions::new().write(true).open(&path).unwrap();
        writer.write_all(&[7u8; 100]).unwrap();
        drop(writer);

        // 16-byte chunks: 16, 32, 48 crosses the threshold of 40
        assert_eq!(read_until(resource, 40).unwrap(), 48);
        assert_eq!(tracker.snapshot().reads, 3);
        assert_eq!(tracker.snapshot().closes, 1);
    }

    #[test]
    fn test_read_until_stops_at_eof() {
        let (_dir, path) = scratch();
        let resource = ScopedResource::acquire_with(
            &path,
            &small_chunks(),
            Arc::new(LifecycleTracker::new()),
        )
        .unwrap();

        let mut writer = std::fs::OpenOptions::new().write(true).open(&path).unwrap();
        writer.write_all(b"short").unwrap();
        drop(writer);

        assert_eq!(read_until(resource, 1024).unwrap(), 5);
    }

    #[test]
    fn test_read_error_still_releases() {
        let dir = tempfile::tempdir().unwrap();
        let tracker = Arc::new(LifecycleTracker::new());

        // Directories open read-only but fail every read with EISDIR
        let resource =
            ScopedResource::open_existing(dir.path(), &FifoConfig::default(), tracker.clone())
                .unwrap();
        assert!(!resource.owns_path());

        match read_until(resource, 10) {
            Err(DemoError::Io(_)) => {}
            other => panic!("expected io error, got {:?}", other),
        }

        let snap = tracker.snapshot();
        assert_eq!(snap.opens, 1);
        assert_eq!(snap.closes, 1);
        assert!(dir.path().exists());
    }

    #[test]
    fn test_read_error_wins_over_release_error() {
        let dir = tempfile::tempdir().unwrap();
        let tracker = Arc::new(LifecycleTracker::new());

        // Reads fail with EISDIR, and unlinking a directory fails too
        let mut resource =
            ScopedResource::open_existing(dir.path(), &FifoConfig::default(), tracker.clone())
                .unwrap();
        resource.owns_path = true;

        match read_until(resource, 10) {
            Err(DemoError::Io(e)) => assert_eq!(e.raw_os_error(), Some(libc::EISDIR)),
            other => panic!("expected io error, got {:?}", other),
        }

        let snap = tracker.snapshot();
        assert_eq!(snap.opens, 1);
        assert_eq!(snap.closes, 1);
        assert_eq!(snap.release_failures, 1);
        assert!(dir.path().is_dir());
    }

    #[test]
    fn test_release_error_message_has_single_prefix() {
        let (_dir, path) = scratch();
        let resource = ScopedResource::acquire(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        let message = resource.close().unwrap_err().to_string();
        assert!(message.starts_with("Release error: unlink"));
        assert_eq!(message.matches("Release error").count(), 1);
    }

    #[test]
    fn test_acquire_collision_fails_without_open() {
        let (_dir, path) = scratch();
        let first = ScopedResource::acquire(&path).unwrap();

        let tracker = Arc::new(LifecycleTracker::new());
        let err = ScopedResource::acquire_with(&path, &FifoConfig::default(), tracker.clone())
            .unwrap_err();
        assert!(err.is_acquisition());
        assert_eq!(tracker.snapshot(), Default::default());

        // The first owner's FIFO must survive the failed attempt
        assert!(fifo::is_fifo(&path));
        drop(first);
    }

    #[test]
    fn test_drain_fifo_report() {
        let (_dir, path) = scratch();
        let report = drain_fifo(&path, 0, &small_chunks()).unwrap();
        assert_eq!(report.bytes_read, 0);
        assert_eq!(report.chunk_size, 16);
        assert!(!path.exists());
    }

    #[test]
    fn test_default_fifo_path_is_unique() {
        let config = FifoConfig::default();
        let a = default_fifo_path(&config);
        let b = default_fifo_path(&config);
        assert_ne!(a, b);
        assert!(a.starts_with(std::env::temp_dir()));
    }
}
