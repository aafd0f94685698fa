//! Steady-state polling loop
//!
//! Each cycle sleeps for the interval, consumes the runtime flags, and then
//! opens every target read-only, invoking the rescan capability on success.
//! Reloads only happen between cycles, never during a pass over the list.

use crate::constants::SLEEP_SLICE;
use crate::daemon::config::{load_targets, ConfigError};
use crate::daemon::logging::DaemonLogger;
use crate::daemon::rescan::Rescan;
use crate::daemon::signals::RuntimeFlags;
use crate::models::TargetList;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

/// What the caller should do after a cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cycle {
    Continue,
    Shutdown,
}

pub struct PollLoop<R: Rescan> {
    config_path: PathBuf,
    interval: Duration,
    targets: TargetList,
    flags: RuntimeFlags,
    rescanner: R,
    logger: DaemonLogger,
}

impl<R: Rescan> PollLoop<R> {
    pub fn new(
        config_path: PathBuf,
        interval: Duration,
        targets: TargetList,
        flags: RuntimeFlags,
        rescanner: R,
        logger: DaemonLogger,
    ) -> Self {
        Self {
            config_path,
            interval,
            targets,
            flags,
            rescanner,
            logger,
        }
    }

    #[cfg(test)]
    fn targets(&self) -> &TargetList {
        &self.targets
    }

    #[cfg(test)]
    fn rescanner(&self) -> &R {
        &self.rescanner
    }

    /// Poll until shutdown is requested or a reload fails
    pub fn run(&mut self) -> Result<(), ConfigError> {
        loop {
            self.sleep();
            if self.cycle()? == Cycle::Shutdown {
                return Ok(());
            }
        }
    }

    /// One wake-up: shutdown wins over reload, then targets are touched
    pub fn cycle(&mut self) -> Result<Cycle, ConfigError> {
        if self.flags.shutdown_requested() {
            return Ok(Cycle::Shutdown);
        }

        if self.flags.take_reload() {
            self.reload()?;
        }

        self.touch_all();
        Ok(Cycle::Continue)
    }

    /// Replace the whole target list from the configuration file.
    ///
    /// The old list is dropped before the new one is read. A failed read is
    /// fatal; there is no fallback to the previous list.
    pub fn reload(&mut self) -> Result<(), ConfigError> {
        let previous = std::mem::take(&mut self.targets);
        let previous_len = previous.len();
        drop(previous);

        self.targets = load_targets(&self.config_path)?;
        self.logger
            .log_reload(&self.config_path, previous_len, self.targets.len());
        Ok(())
    }

    /// Touch every target in order, ignoring all failures
    pub fn touch_all(&self) {
        for target in &self.targets {
            touch(target, &self.rescanner);
        }
    }

    /// Sleep for the interval, waking early once any flag is pending.
    /// An interval too large for `Instant` only ends on a flag.
    fn sleep(&self) {
        let deadline = Instant::now().checked_add(self.interval);

        while !self.flags.any_pending() {
            let slice = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        break;
                    }
                    (deadline - now).min(SLEEP_SLICE)
                }
                None => SLEEP_SLICE,
            };
            thread::sleep(slice);
        }
    }
}

/// Open `target` read-only and rescan it; the descriptor closes on drop
fn touch<R: Rescan>(target: &Path, rescanner: &R) {
    if let Ok(device) = File::open(target) {
        let _ = rescanner.rescan(target, &device);
    }
}
