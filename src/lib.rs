//! polld - device polling daemon library
//!
//! This library exposes the daemon lifecycle, the polling engine, and the
//! collaborators they rely on (configuration reader, lock file, signals).

pub mod cli;
pub mod constants;
pub mod daemon;
pub mod models;
