//! Structured lifecycle logging for the daemon
//!
//! Events go through the `log` facade. The backend is the unified logging
//! system on macOS and `env_logger` (stderr) elsewhere. Stderr is
//! redirected to /dev/null once the daemon detaches.

use crate::models::DaemonOptions;
use anyhow::Result;
use log::{error, info, warn};
use serde::Serialize;
use serde_json::json;
use std::path::Path;

/// Daemon logger emitting one line plus a JSON payload per event
#[derive(Debug, Clone)]
pub struct DaemonLogger {
    /// Current logging level
    level: LogLevel,
}

/// Log levels for daemon operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
}

/// Startup options as they appear in log payloads.
///
/// Paths are rendered lossily; non-UTF-8 paths are valid options and must
/// not make the event unserializable.
#[derive(Debug, Serialize)]
struct OptionsSummary {
    config_path: String,
    pid_file: Option<String>,
    interval_secs: u64,
}

impl From<&DaemonOptions> for OptionsSummary {
    fn from(options: &DaemonOptions) -> Self {
        Self {
            config_path: options.config_path.display().to_string(),
            pid_file: options.pid_path.as_ref().map(|p| p.display().to_string()),
            interval_secs: options.interval_secs,
        }
    }
}

/// Install the platform log backend for `subsystem`
#[cfg(target_os = "macos")]
pub fn init_backend(subsystem: &str) -> Result<()> {
    let logger = oslog::OsLogger::new(subsystem);
    log::set_boxed_logger(Box::new(logger))
        .map_err(|e| anyhow::anyhow!("Failed to set logger: {}", e))?;
    log::set_max_level(log::LevelFilter::Info);
    Ok(())
}

/// Install the platform log backend for `subsystem`
#[cfg(not(target_os = "macos"))]
pub fn init_backend(subsystem: &str) -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to set logger for {}: {}", subsystem, e))
}

impl DaemonLogger {
    pub fn new(level: LogLevel) -> Self {
        Self { level }
    }

    /// Log daemon startup with the resolved options
    pub fn log_startup(&self, options: &DaemonOptions, target_count: usize) {
        let message = json!({
            "event": "daemon_startup",
            "pid": std::process::id(),
            "options": OptionsSummary::from(options),
            "targets": target_count,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });

        self.log_structured(LogLevel::Info, "Daemon starting", &message);
    }

    /// Log the new pid after detaching from the terminal
    pub fn log_detached(&self) {
        let message = json!({
            "event": "daemon_detached",
            "pid": std::process::id(),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });

        self.log_structured(LogLevel::Info, "Detached from terminal", &message);
    }

    /// Log that the authoritative lock is held and polling begins
    pub fn log_running(&self, pid_path: Option<&Path>) {
        let message = json!({
            "event": "daemon_running",
            "pid": std::process::id(),
            "pid_file": pid_path.map(|p| p.display().to_string()),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });

        self.log_structured(LogLevel::Info, "Daemon running", &message);
    }

    /// Log a completed configuration reload
    pub fn log_reload(&self, config_path: &Path, previous: usize, current: usize) {
        let message = json!({
            "event": "config_reload",
            "config_path": config_path.display().to_string(),
            "previous_targets": previous,
            "targets": current,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });

        self.log_structured(LogLevel::Info, "Configuration reloaded", &message);
    }

    /// Log daemon shutdown event
    pub fn log_shutdown(&self, reason: &str) {
        let message = json!({
            "event": "daemon_shutdown",
            "reason": reason,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });

        self.log_structured(LogLevel::Info, "Daemon shutting down", &message);
    }

    /// Log a condition that does not stop the daemon
    pub fn log_warning(&self, warning: &str, context: Option<&str>) {
        let message = json!({
            "event": "warning",
            "message": warning,
            "context": context,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });

        self.log_structured(LogLevel::Warn, warning, &message);
    }

    /// Log error events
    pub fn log_error(&self, error_message: &str, context: Option<&str>) {
        let message = json!({
            "event": "error",
            "message": error_message,
            "context": context,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });

        self.log_structured(LogLevel::Error, error_message, &message);
    }

    fn log_structured(&self, level: LogLevel, message: &str, data: &serde_json::Value) {
        if !self.should_log(level) {
            return;
        }

        let full_message = format!("{} | {}", message, data);

        match level {
            LogLevel::Error => error!("{}", full_message),
            LogLevel::Warn => warn!("{}", full_message),
            LogLevel::Info => info!("{}", full_message),
        }
    }

    /// Check if we should log at this level
    fn should_log(&self, level: LogLevel) -> bool {
        level <= self.level
    }
}

impl Default for DaemonLogger {
    fn default() -> Self {
        Self::new(LogLevel::Info)
    }
}
