use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn polld() -> Command {
    assert_cmd::cargo_bin_cmd!("polld")
}

/// Config and pid paths inside a scratch directory
fn scratch() -> (TempDir, String, String) {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("polld.conf");
    fs::write(&config, "/dev/null\n").unwrap();
    let pid = temp.path().join("polld.pid");
    (
        temp,
        config.to_str().unwrap().to_string(),
        pid.to_str().unwrap().to_string(),
    )
}

#[test]
fn test_zero_sleep_rejected() {
    let (_temp, config, pid) = scratch();

    polld()
        .args(["--config", &config, "--pid", &pid, "--sleep", "0"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("polld: invalid sleep value 0"));

    assert!(!std::path::Path::new(&pid).exists());
}

#[test]
fn test_negative_sleep_rejected() {
    let (_temp, config, pid) = scratch();

    polld()
        .args(["-c", &config, "-p", &pid, "-s", "-5"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid sleep value -5"));

    assert!(!std::path::Path::new(&pid).exists());
}

#[test]
fn test_non_numeric_sleep_rejected() {
    polld()
        .args(["--sleep", "soon"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("soon"));
}

#[test]
fn test_unknown_argument_rejected() {
    polld()
        .arg("--frobnicate")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--frobnicate"));
}

#[test]
fn test_missing_config_is_fatal() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("absent.conf");
    let pid = temp.path().join("polld.pid");

    polld()
        .arg("--config")
        .arg(&config)
        .arg("--pid")
        .arg(&pid)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("polld: failed to open configuration"))
        .stderr(predicate::str::contains("absent.conf"));

    assert!(!pid.exists());
}

#[test]
fn test_live_lock_holder_blocks_startup() {
    let (_temp, config, pid) = scratch();
    let holder = format!("{}\n", std::process::id());
    fs::write(&pid, &holder).unwrap();

    polld()
        .args(["--config", &config, "--pid", &pid])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("already running"));

    assert_eq!(fs::read_to_string(&pid).unwrap(), holder);
}
