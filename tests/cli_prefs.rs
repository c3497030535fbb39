//! Integration tests for `learngen prefs`.
//!
//! Each test points `LEARNGEN_CONFIG_DIR` at its own temporary directory.

#![allow(deprecated)] // cargo_bin deprecation: replacement not yet stable

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

fn learngen(config_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("learngen").expect("binary 'learngen' should be built");
    cmd.env("LEARNGEN_CONFIG_DIR", config_dir)
        .env_remove("LEARNGEN_HOST")
        .env_remove("LEARNGEN_PORT");
    cmd
}

#[test]
fn show_empty_prefs() {
    let dir = tempfile::tempdir().unwrap();
    learngen(dir.path())
        .args(["prefs", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("host: (unset)"))
        .stdout(predicate::str::contains("port: (unset)"));
}

#[test]
fn set_then_get() {
    let dir = tempfile::tempdir().unwrap();
    learngen(dir.path())
        .args(["prefs", "set", "host", "gpu-box.local"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved host = gpu-box.local"));

    learngen(dir.path())
        .args(["prefs", "get", "host"])
        .assert()
        .success()
        .stdout(predicate::str::diff("gpu-box.local\n"));

    assert!(dir.path().join("prefs.toml").exists());
}

#[test]
fn last_write_wins() {
    let dir = tempfile::tempdir().unwrap();
    for port in ["8000", "9000"] {
        learngen(dir.path())
            .args(["prefs", "set", "port", port])
            .assert()
            .success();
    }
    learngen(dir.path())
        .args(["prefs", "get", "port"])
        .assert()
        .success()
        .stdout(predicate::str::diff("9000\n"));
}

#[test]
fn show_json() {
    let dir = tempfile::tempdir().unwrap();
    learngen(dir.path())
        .args(["prefs", "set", "port", "8123"])
        .assert()
        .success();

    let output = learngen(dir.path())
        .args(["--format", "json", "prefs", "show"])
        .output()
        .unwrap();
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["port"], "8123");
    assert!(value["host"].is_null());
}

#[test]
fn clear_then_get_fails() {
    let dir = tempfile::tempdir().unwrap();
    learngen(dir.path())
        .args(["prefs", "set", "host", "render-01"])
        .assert()
        .success();
    learngen(dir.path())
        .args(["prefs", "clear", "host"])
        .assert()
        .success();
    learngen(dir.path())
        .args(["prefs", "get", "host"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("host is not set"));
}

#[test]
fn invalid_port_rejected() {
    let dir = tempfile::tempdir().unwrap();
    learngen(dir.path())
        .args(["prefs", "set", "port", "http"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid port"));
    assert!(!dir.path().join("prefs.toml").exists());
}

#[test]
fn unknown_key_rejected() {
    let dir = tempfile::tempdir().unwrap();
    learngen(dir.path())
        .args(["prefs", "set", "proxy", "socks5://x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown preference"));
}

#[test]
fn zero_port_rejected() {
    let dir = tempfile::tempdir().unwrap();
    learngen(dir.path())
        .args(["prefs", "set", "port", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid port '0'"));
    assert!(!dir.path().join("prefs.toml").exists());
}
