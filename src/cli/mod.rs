//! CLI argument parsing and validation module
//!
//! Handles command-line interface using clap, including:
//! - Configuration file selection
//! - Lock/pid file selection (empty disables locking)
//! - Polling interval validation
//! - Help and version output

use crate::constants::{APP_NAME, DEFAULT_CONFIG_PATH, DEFAULT_PID_PATH, DEFAULT_SLEEP_SECS};
use crate::models::DaemonOptions;
use clap::{value_parser, Arg, ArgAction, Command};
use std::ffi::OsString;
use std::path::PathBuf;
use thiserror::Error;

/// Argument errors; help and version requests also travel this way
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Clap(#[from] clap::Error),

    #[error("invalid sleep value {0}, must be a positive number of seconds")]
    InvalidSleep(i64),
}

impl CliError {
    /// Help and version output exit 0, everything else exits 1
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Clap(e) if !e.use_stderr() => 0,
            _ => 1,
        }
    }
}

/// Build the clap command definition
pub fn build_command() -> Command {
    Command::new(APP_NAME)
        .version(env!("POLLD_VERSION"))
        .long_version(concat!(env!("POLLD_VERSION"), " (", env!("GIT_HASH"), ")"))
        .about("Periodically touch device nodes to force media change detection")
        .long_about(
            "A small daemon that periodically opens a fixed list of paths, usually block \
             devices, so the kernel re-examines device state such as media changes or \
             partition tables. Send SIGHUP to reload the configuration and SIGTERM to stop.",
        )
        .disable_version_flag(true)
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file listing one path per line")
                .value_parser(value_parser!(PathBuf))
                .default_value(DEFAULT_CONFIG_PATH),
        )
        .arg(
            Arg::new("pid")
                .short('p')
                .long("pid")
                .value_name("FILE")
                .help("Lock/pid file, an empty value disables locking")
                .value_parser(value_parser!(String))
                .default_value(DEFAULT_PID_PATH),
        )
        .arg(
            Arg::new("sleep")
                .short('s')
                .long("sleep")
                .value_name("SECONDS")
                .help("Seconds to sleep between polling cycles [default: 10]")
                .value_parser(value_parser!(i64))
                .allow_negative_numbers(true),
        )
        .arg(
            Arg::new("version")
                .short('v')
                .long("version")
                .help("Print version")
                .action(ArgAction::Version),
        )
}

/// Parse the process arguments
pub fn parse_args() -> Result<DaemonOptions, CliError> {
    parse_args_from(std::env::args_os())
}

/// Parse an explicit argument list, first item being the program name
pub fn parse_args_from<I, T>(args: I) -> Result<DaemonOptions, CliError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = build_command().try_get_matches_from(args)?;

    let config_path = matches
        .get_one::<PathBuf>("config")
        .cloned()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    let pid_path = matches
        .get_one::<String>("pid")
        .filter(|p| !p.is_empty())
        .map(PathBuf::from);

    let sleep = matches
        .get_one::<i64>("sleep")
        .copied()
        .unwrap_or(DEFAULT_SLEEP_SECS as i64);
    let interval_secs = u64::try_from(sleep)
        .ok()
        .filter(|secs| *secs > 0)
        .ok_or(CliError::InvalidSleep(sleep))?;

    Ok(DaemonOptions {
        config_path,
        pid_path,
        interval_secs,
    })
}
