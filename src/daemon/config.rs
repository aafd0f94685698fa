//! Target list configuration reader
//!
//! Plain text, one path per line. Lines starting with `#` are comments and
//! empty lines are skipped. There is no quoting, escaping, or trimming.

use crate::models::TargetList;
use std::ffi::OsString;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::os::unix::ffi::OsStringExt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while building a target list
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to open configuration {path} ({source})")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read configuration {path} ({source})")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("not enough memory")]
    OutOfMemory,
}

/// Load the target list from the configuration file at `path`
pub fn load_targets(path: &Path) -> Result<TargetList, ConfigError> {
    let file = File::open(path).map_err(|source| ConfigError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    parse_targets(BufReader::new(file)).map_err(|err| match err {
        ConfigError::Read { source, .. } => ConfigError::Read {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })
}

/// Parse targets from any buffered reader, in order of appearance
pub fn parse_targets<R: BufRead>(mut reader: R) -> Result<TargetList, ConfigError> {
    let mut targets = TargetList::new();
    let mut line = Vec::new();

    while read_line(&mut reader, &mut line)? {
        if line.first() == Some(&b'#') || line.is_empty() {
            continue;
        }

        let target = PathBuf::from(OsString::from_vec(std::mem::take(&mut line)));
        targets
            .try_push(target)
            .map_err(|_| ConfigError::OutOfMemory)?;
    }

    Ok(targets)
}

/// Read one line into `line` without its `\n`; false once input is exhausted.
///
/// Line storage is grown with `try_reserve` so an oversized line reports
/// `OutOfMemory` instead of aborting.
fn read_line<R: BufRead>(reader: &mut R, line: &mut Vec<u8>) -> Result<bool, ConfigError> {
    line.clear();
    let mut read_any = false;

    loop {
        let available = match reader.fill_buf() {
            Ok(available) => available,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(source) => {
                return Err(ConfigError::Read {
                    path: PathBuf::new(),
                    source,
                })
            }
        };

        if available.is_empty() {
            return Ok(read_any);
        }
        read_any = true;

        let newline = available.iter().position(|&b| b == b'\n');
        let chunk = &available[..newline.unwrap_or(available.len())];
        line.try_reserve(chunk.len())
            .map_err(|_| ConfigError::OutOfMemory)?;
        line.extend_from_slice(chunk);

        match newline {
            Some(end) => {
                reader.consume(end + 1);
                return Ok(true);
            }
            None => {
                let used = chunk.len();
                reader.consume(used);
            }
        }
    }
}
