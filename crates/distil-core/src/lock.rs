//! Advisory file locking for the append cycle
//!
//! Two concurrent appends against the same ledger would race the
//! read-modify-write cycle and silently lose the first writer's update.
//! Every mutating ledger operation therefore holds an exclusive advisory
//! lock on a sibling lock file for its full duration. The guard releases
//! on drop, so early returns and error paths unlock too.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use fs2::FileExt;

use crate::error::{DistilError, Result};

const RETRY_INTERVAL: Duration = Duration::from_millis(10);

/// RAII guard for the exclusive ledger lock
#[derive(Debug)]
pub struct LedgerLock {
    file: File,
    path: PathBuf,
}

impl LedgerLock {
    /// Acquire the lock, retrying until `timeout` elapses
    pub fn acquire(path: &Path, timeout: Duration) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let start = Instant::now();
        loop {
            let file = OpenOptions::new()
                .create(true)
                .read(true)
                .write(true)
                .truncate(false)
                .open(path)?;

            if file.try_lock_exclusive().is_ok() {
                tracing::debug!(path = %path.display(), "acquired ledger lock");
                return Ok(LedgerLock {
                    file,
                    path: path.to_path_buf(),
                });
            }

            if start.elapsed() >= timeout {
                return Err(DistilError::LockTimeout {
                    path: path.to_path_buf(),
                    waited: start.elapsed(),
                });
            }

            thread::sleep(RETRY_INTERVAL);
        }
    }

    /// The lock file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn unlock(&self) -> io::Result<()> {
        FileExt::unlock(&self.file)
    }
}

impl Drop for LedgerLock {
    fn drop(&mut self) {
        if let Err(err) = self.unlock() {
            tracing::warn!(path = %self.path.display(), error = %err, "failed to release ledger lock");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_acquire_and_drop() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("ledger.lock");
        let lock = LedgerLock::acquire(&path, Duration::from_millis(50)).expect("lock");
        assert_eq!(lock.path(), path.as_path());
    }

    #[test]
    fn test_times_out_when_held() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("held.lock");
        let _held = LedgerLock::acquire(&path, Duration::from_millis(50)).expect("lock");

        let err = LedgerLock::acquire(&path, Duration::from_millis(20)).unwrap_err();
        assert!(matches!(err, DistilError::LockTimeout { path: p, .. } if p == path));
    }

    #[test]
    fn test_release_allows_follow_up() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("reuse.lock");
        {
            let _first = LedgerLock::acquire(&path, Duration::from_millis(50)).expect("lock");
        }
        let _second = LedgerLock::acquire(&path, Duration::from_millis(50)).expect("relock");
    }

    #[test]
    fn test_creates_missing_parent_dirs() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("deep").join("ledger.lock");
        let _lock = LedgerLock::acquire(&path, Duration::from_millis(50)).expect("lock");
        assert!(path.exists());
    }
}
