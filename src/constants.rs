//! Global constants for polld
//!
//! Centralized location for application-wide constants

use std::time::Duration;

/// Program name, used as the prefix of fatal error messages
pub const APP_NAME: &str = "polld";

/// Application subsystem identifier for structured logging
pub const APP_SUBSYSTEM: &str = "org.polld";

/// Configuration file read when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "/etc/polld";

/// Lock/pid file written when `--pid` is not given
pub const DEFAULT_PID_PATH: &str = "/var/run/polld.pid";

/// Polling interval in seconds when `--sleep` is not given
pub const DEFAULT_SLEEP_SECS: u64 = 10;

/// Longest uninterrupted slice of the interval sleep
pub const SLEEP_SLICE: Duration = Duration::from_millis(100);

/// Exit status for fatal startup, reload, and lock errors
pub const EXIT_FAILURE: i32 = 1;

/// Exit status when the target list cannot be allocated
pub const EXIT_OUT_OF_MEMORY: i32 = 2;
