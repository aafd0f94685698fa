//! Daemon lifecycle: startup ordering, detaching, and shutdown
//!
//! Startup runs in a fixed order:
//! - load the target list and verify the lock while still attached,
//!   so errors reach the terminal
//! - write a placeholder lock and detach into the background
//! - install signal handlers and write the authoritative lock under the
//!   final pid
//! - poll until a termination signal, then release the lock

pub mod config;
pub mod lock;
pub mod logging;
pub mod poll;
pub mod rescan;
pub mod signals;

use crate::constants::{APP_NAME, EXIT_FAILURE, EXIT_OUT_OF_MEMORY};
use crate::daemon::config::{load_targets, ConfigError};
use crate::daemon::lock::{LockCheck, LockError, PidLock};
use crate::daemon::logging::DaemonLogger;
use crate::daemon::poll::PollLoop;
use crate::daemon::rescan::{PlatformRescan, Rescan};
use crate::daemon::signals::RuntimeFlags;
use crate::models::DaemonOptions;
use std::io;
use thiserror::Error;

/// Fatal daemon errors, each mapped to a process exit code
#[derive(Debug, Error)]
pub enum DaemonError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Lock(#[from] LockError),

    #[error("failed to determine working directory ({0})")]
    WorkingDirectory(#[source] io::Error),

    #[error("failed to detach from terminal ({0})")]
    Detach(#[source] nix::Error),

    #[error("failed to install signal handlers ({0})")]
    Signals(#[source] io::Error),
}

impl DaemonError {
    pub fn exit_code(&self) -> i32 {
        match self {
            DaemonError::Config(ConfigError::OutOfMemory) => EXIT_OUT_OF_MEMORY,
            _ => EXIT_FAILURE,
        }
    }
}

/// Run the daemon with the platform rescan capability
pub fn run(options: DaemonOptions) -> Result<(), DaemonError> {
    run_with(options, PlatformRescan)
}

/// Run the full daemon lifecycle; returns once shutdown completes
pub fn run_with<R: Rescan>(options: DaemonOptions, rescanner: R) -> Result<(), DaemonError> {
    let logger = DaemonLogger::default();

    let cwd = std::env::current_dir().map_err(DaemonError::WorkingDirectory)?;
    let options = options.resolved_against(&cwd);

    let targets = load_targets(&options.config_path)?;

    let lock = PidLock::new(options.pid_path.clone());
    if let LockCheck::Stale { path, reason } = lock.check()? {
        eprintln!(
            "{}: warning: ignoring lock file {}: {}",
            APP_NAME,
            path.display(),
            reason
        );
        logger.log_warning("Ignoring stale lock file", Some(path.display().to_string().as_str()));
    }

    logger.log_startup(&options, targets.len());

    // Best effort, only for visibility of the pid before the fork
    let _ = lock.acquire();

    if let Err(e) = detach(&logger) {
        let _ = lock.release();
        return Err(e);
    }

    // Handlers go in before the authoritative pid is published, so a
    // signal sent to that pid always reaches the flags
    let flags = RuntimeFlags::new();
    if let Err(e) = flags.register() {
        let _ = lock.release();
        return Err(DaemonError::Signals(e));
    }

    if let Err(e) = lock.acquire() {
        logger.log_error(&e.to_string(), None);
        let _ = lock.release();
        return Err(e.into());
    }

    logger.log_running(lock.path());

    let mut poll = PollLoop::new(
        options.config_path.clone(),
        options.interval(),
        targets,
        flags,
        rescanner,
        logger.clone(),
    );
    let result = poll.run();

    match &result {
        Ok(()) => logger.log_shutdown("Received termination signal"),
        Err(e) => logger.log_error(&e.to_string(), Some("configuration reload")),
    }

    if let Err(e) = lock.release() {
        logger.log_warning(
            &format!("Failed to remove lock file: {}", e),
            lock.path().map(|p| p.display().to_string()).as_deref(),
        );
    }

    result.map_err(DaemonError::from)
}

/// Fork into the background, start a new session, and drop the terminal.
/// The parent exits with status 0 inside this call.
#[cfg(not(target_os = "macos"))]
fn detach(logger: &DaemonLogger) -> Result<(), DaemonError> {
    nix::unistd::daemon(false, false).map_err(DaemonError::Detach)?;
    logger.log_detached();
    Ok(())
}

/// launchd owns the process lifecycle on macOS; stay in the foreground
#[cfg(target_os = "macos")]
fn detach(logger: &DaemonLogger) -> Result<(), DaemonError> {
    logger.log_warning("Not detaching, process is expected to run under launchd", None);
    Ok(())
}
