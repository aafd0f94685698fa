#![allow(dead_code)]

use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;

/// Scratch directory with a config file and a pid file for one daemon run
pub struct DaemonFixture {
    pub dir: TempDir,
    pub config: PathBuf,
    pub pid_file: PathBuf,
}

impl DaemonFixture {
    pub fn new(config_contents: &str) -> anyhow::Result<Self> {
        let dir = tempfile::tempdir()?;
        let config = dir.path().join("polld.conf");
        let pid_file = dir.path().join("polld.pid");
        fs::write(&config, config_contents)?;

        Ok(Self {
            dir,
            config,
            pid_file,
        })
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_polld"));
        cmd.arg("--config")
            .arg(&self.config)
            .arg("--pid")
            .arg(&self.pid_file)
            .arg("--sleep")
            .arg("1");
        cmd
    }

    /// Start the daemon and return the pid of the detached process
    pub fn start(&self) -> anyhow::Result<Pid> {
        let launcher = self.command().output()?;
        if !launcher.status.success() {
            anyhow::bail!(
                "launcher failed with {}: {}",
                launcher.status,
                String::from_utf8_lossy(&launcher.stderr)
            );
        }
        self.wait_for_daemon()
    }

    /// The launcher leaves a placeholder pid; wait until the detached
    /// process has replaced it with its own
    pub fn wait_for_daemon(&self) -> anyhow::Result<Pid> {
        let deadline = Instant::now() + Duration::from_secs(10);

        while Instant::now() < deadline {
            if let Some(pid) = read_pid(&self.pid_file) {
                if kill(pid, None).is_ok() {
                    return Ok(pid);
                }
            }
            thread::sleep(Duration::from_millis(50));
        }

        anyhow::bail!("daemon never recorded a live pid in {}", self.pid_file.display())
    }

    pub fn wait_for_pid_file_removal(&self, timeout: Duration) -> bool {
        wait_until(timeout, || !self.pid_file.exists())
    }
}

impl Drop for DaemonFixture {
    fn drop(&mut self) {
        // Never leave a detached daemon behind a failed assertion
        if let Some(pid) = read_pid(&self.pid_file) {
            if pid.as_raw() as u32 != std::process::id() {
                let _ = kill(pid, Signal::SIGKILL);
            }
        }
    }
}

pub fn read_pid(path: &Path) -> Option<Pid> {
    let contents = fs::read_to_string(path).ok()?;
    let pid = contents.trim().parse::<i32>().ok()?;
    (pid > 0).then(|| Pid::from_raw(pid))
}

pub fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(50));
    }
    condition()
}

/// Locate a running polld by the config path on its command line.
/// Zombies are skipped since they no longer poll.
pub fn find_daemon_by_config(config: &Path) -> Option<Pid> {
    let needle = config.as_os_str().as_encoded_bytes();

    for entry in fs::read_dir("/proc").ok()?.flatten() {
        let Some(pid) = entry.file_name().to_str().and_then(|n| n.parse::<i32>().ok()) else {
            continue;
        };

        let Ok(cmdline) = fs::read(entry.path().join("cmdline")) else {
            continue;
        };
        let mut args = cmdline.split(|b| *b == 0);
        let is_polld = args
            .next()
            .map(|exe| exe.ends_with(b"polld"))
            .unwrap_or(false);

        if is_polld && args.any(|arg| arg == needle) {
            return Some(Pid::from_raw(pid));
        }
    }

    None
}
