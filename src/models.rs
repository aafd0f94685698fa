//! Data models module
//!
//! Defines core data structures:
//! - Target: one polled filesystem path
//! - TargetList: ordered targets loaded from the configuration file
//! - DaemonOptions: resolved runtime settings for one daemon run

use std::collections::TryReserveError;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// A single polled filesystem path, usually a block device node
pub type Target = PathBuf;

/// Ordered sequence of targets in configuration file order.
///
/// Duplicates are kept and no path is validated; the list is replaced
/// wholesale on reload, never merged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetList {
    targets: Vec<Target>,
}

impl TargetList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a target, reporting allocation failure instead of aborting
    pub fn try_push(&mut self, target: Target) -> Result<(), TryReserveError> {
        self.targets.try_reserve(1)?;
        self.targets.push(target);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.targets.iter().map(PathBuf::as_path)
    }
}

impl<'a> IntoIterator for &'a TargetList {
    type Item = &'a Target;
    type IntoIter = std::slice::Iter<'a, Target>;

    fn into_iter(self) -> Self::IntoIter {
        self.targets.iter()
    }
}

/// Runtime settings for the daemon, produced by the CLI layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaemonOptions {
    /// Configuration file listing the targets
    pub config_path: PathBuf,
    /// Lock/pid file; `None` disables single-instance locking
    pub pid_path: Option<PathBuf>,
    /// Seconds between polling cycles, always positive
    pub interval_secs: u64,
}

impl DaemonOptions {
    /// Polling interval as a duration
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Resolve relative paths against `base`.
    ///
    /// Detaching moves the working directory to `/`, so both paths must be
    /// absolute before that happens for reloads and lock release to work.
    pub fn resolved_against(mut self, base: &Path) -> Self {
        if self.config_path.is_relative() {
            self.config_path = base.join(&self.config_path);
        }
        if let Some(pid_path) = self.pid_path.as_mut() {
            if pid_path.is_relative() {
                *pid_path = base.join(&*pid_path);
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_list_preserves_order_and_duplicates() {
        let mut list = TargetList::new();
        for path in ["/dev/sr1", "/dev/sr0", "/dev/sr1"] {
            list.try_push(PathBuf::from(path)).unwrap();
        }

        let paths: Vec<&Path> = list.iter().collect();
        assert_eq!(
            paths,
            vec![Path::new("/dev/sr1"), Path::new("/dev/sr0"), Path::new("/dev/sr1")]
        );
        assert_eq!(list.len(), 3);
        assert!(!list.is_empty());
    }

    #[test]
    fn test_empty_target_list() {
        let list = TargetList::new();
        assert!(list.is_empty());
        assert_eq!(list.iter().count(), 0);
    }

    #[test]
    fn test_options_resolve_relative_paths() {
        let options = DaemonOptions {
            config_path: PathBuf::from("etc/polld"),
            pid_path: Some(PathBuf::from("run/polld.pid")),
            interval_secs: 10,
        }
        .resolved_against(Path::new("/srv"));

        assert_eq!(options.config_path, PathBuf::from("/srv/etc/polld"));
        assert_eq!(options.pid_path, Some(PathBuf::from("/srv/run/polld.pid")));
        assert_eq!(options.interval(), Duration::from_secs(10));
    }

    #[test]
    fn test_options_keep_absolute_paths_and_disabled_lock() {
        let options = DaemonOptions {
            config_path: PathBuf::from("/etc/polld"),
            pid_path: None,
            interval_secs: 3,
        }
        .resolved_against(Path::new("/srv"));

        assert_eq!(options.config_path, PathBuf::from("/etc/polld"));
        assert!(options.pid_path.is_none());
    }
}
