//! Signal-driven runtime flags
//!
//! Handlers only store into atomics (via `signal_hook::flag`), all cleanup
//! happens on the control thread when it next polls the flags.

use signal_hook::consts::{SIGHUP, SIGINT, SIGQUIT, SIGTERM};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Signals that request a graceful shutdown
pub const TERMINATION_SIGNALS: &[i32] = &[SIGINT, SIGQUIT, SIGTERM];

/// Signal that requests a configuration reload
pub const RELOAD_SIGNAL: i32 = SIGHUP;

/// Shutdown and reload requests shared with signal handlers
#[derive(Debug, Clone, Default)]
pub struct RuntimeFlags {
    shutdown: Arc<AtomicBool>,
    reload: Arc<AtomicBool>,
}

impl RuntimeFlags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route termination signals and SIGHUP into the flags
    pub fn register(&self) -> io::Result<()> {
        for &signal in TERMINATION_SIGNALS {
            signal_hook::flag::register(signal, Arc::clone(&self.shutdown))?;
        }
        signal_hook::flag::register(RELOAD_SIGNAL, Arc::clone(&self.reload))?;
        Ok(())
    }

    pub fn request_shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    pub fn request_reload(&self) {
        self.reload.store(true, Ordering::SeqCst);
    }

    /// Shutdown is sticky, the process exits once it is observed
    pub fn shutdown_requested(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }

    pub fn reload_requested(&self) -> bool {
        self.reload.load(Ordering::SeqCst)
    }

    /// Consume a pending reload request
    pub fn take_reload(&self) -> bool {
        self.reload.swap(false, Ordering::SeqCst)
    }

    /// True when either flag is set; ends the interval sleep early
    pub fn any_pending(&self) -> bool {
        self.shutdown_requested() || self.reload_requested()
    }
}
