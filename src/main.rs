#![forbid(unsafe_code)]

use polld::cli::{self, CliError};
use polld::constants::{APP_NAME, APP_SUBSYSTEM};
use polld::daemon::{self, logging};
use std::process::ExitCode;

fn main() -> ExitCode {
    let options = match cli::parse_args() {
        Ok(options) => options,
        Err(CliError::Clap(err)) => {
            // Help and version go to stdout, usage errors to stderr
            let _ = err.print();
            return exit_code(CliError::Clap(err).exit_code());
        }
        Err(err) => {
            eprintln!("{}: {}", APP_NAME, err);
            return exit_code(err.exit_code());
        }
    };

    if let Err(err) = logging::init_backend(APP_SUBSYSTEM) {
        eprintln!("{}: warning: {}", APP_NAME, err);
    }

    match daemon::run(options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}: {}", APP_NAME, err);
            exit_code(err.exit_code())
        }
    }
}

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
