//! Single-instance enforcement through a pid lock file
//!
//! The lock file holds the decimal pid of the running daemon followed by a
//! newline. It is a convention, not an flock: a recorded pid counts as a
//! running instance only while a zero signal sent to it succeeds.

use nix::errno::Errno;
use nix::sys::signal::kill;
use nix::unistd::{getpid, Pid};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Fatal lock conditions
#[derive(Debug, Error)]
pub enum LockError {
    #[error("already running as pid {pid} (lock file {path})")]
    AlreadyRunning { pid: i32, path: PathBuf },

    #[error("failed to write lock file {path} ({source})")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Non-fatal outcome of [`PidLock::check`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockCheck {
    /// Locking disabled, lock file absent, recorded process gone, or the
    /// recorded pid is our own
    Clear,
    /// Lock file exists but holds no usable pid; startup proceeds
    Stale { path: PathBuf, reason: String },
}

/// Lock file manager; an empty configured path disables locking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PidLock {
    path: Option<PathBuf>,
}

impl PidLock {
    pub fn new(path: Option<PathBuf>) -> Self {
        let path = path.filter(|p| !p.as_os_str().is_empty());
        Self { path }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Verify that no other live instance holds the lock
    pub fn check(&self) -> Result<LockCheck, LockError> {
        let Some(path) = self.path.as_deref() else {
            return Ok(LockCheck::Clear);
        };

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(LockCheck::Clear),
            Err(e) => return Ok(stale(path, format!("unreadable ({})", e))),
        };

        let pid = match contents.trim().parse::<i32>() {
            Ok(pid) if pid > 0 => pid,
            Ok(pid) => return Ok(stale(path, format!("invalid pid {}", pid))),
            Err(_) => return Ok(stale(path, "contents are not a pid".to_string())),
        };

        // A pid reused by this very process cannot be a competing instance
        if pid == getpid().as_raw() {
            return Ok(LockCheck::Clear);
        }

        if is_alive(pid) {
            return Err(LockError::AlreadyRunning {
                pid,
                path: path.to_path_buf(),
            });
        }

        Ok(LockCheck::Clear)
    }

    /// Record the current pid, truncating previous contents.
    ///
    /// Callers decide whether a failure is fatal: the placeholder written
    /// before detaching is advisory, the one written after is mandatory.
    pub fn acquire(&self) -> Result<(), LockError> {
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };

        fs::write(path, format!("{}\n", getpid())).map_err(|source| LockError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Remove the lock file; a missing file is not an error
    pub fn release(&self) -> io::Result<()> {
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };

        match fs::remove_file(path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

fn stale(path: &Path, reason: String) -> LockCheck {
    LockCheck::Stale {
        path: path.to_path_buf(),
        reason,
    }
}

/// Zero-signal liveness check. EPERM still proves the process exists.
fn is_alive(pid: i32) -> bool {
    match kill(Pid::from_raw(pid), None) {
        Ok(()) => true,
        Err(Errno::EPERM) => true,
        Err(_) => false,
    }
}
