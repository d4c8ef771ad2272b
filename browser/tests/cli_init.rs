//! CLI tests for `browser init` and argument validation.
//!
//! Spawns the browser binary against a temporary config path; none of these
//! commands reach the network.

use std::fs;
use std::process::Command;

use browser::exit_codes;
use browser::io::config::{BrowserConfig, load_config};

#[test]
fn init_writes_default_config() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("browser.toml");

    let status = Command::new(env!("CARGO_BIN_EXE_browser"))
        .arg("init")
        .arg("--config")
        .arg(&path)
        .status()
        .expect("browser init");

    assert_eq!(status.code(), Some(exit_codes::OK));
    assert_eq!(load_config(&path).expect("load"), BrowserConfig::default());
}

#[test]
fn init_without_force_keeps_existing_file() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("browser.toml");
    fs::write(&path, "rows_per_page = 48\n").expect("write");

    let status = Command::new(env!("CARGO_BIN_EXE_browser"))
        .args(["init", "--config"])
        .arg(&path)
        .status()
        .expect("browser init");

    assert_eq!(status.code(), Some(exit_codes::OK));
    assert_eq!(
        fs::read_to_string(&path).expect("read"),
        "rows_per_page = 48\n"
    );
}

#[test]
fn page_rejects_size_outside_options() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("browser.toml");

    let output = Command::new(env!("CARGO_BIN_EXE_browser"))
        .args(["page", "--rows", "13", "--config"])
        .arg(&path)
        .output()
        .expect("browser page");

    assert_eq!(output.status.code(), Some(exit_codes::INVALID));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("rows per page must be one of [12, 24, 48]"));
}

#[test]
fn invalid_config_is_reported() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("browser.toml");
    fs::write(&path, "request_timeout_secs = 0\n").expect("write");

    let output = Command::new(env!("CARGO_BIN_EXE_browser"))
        .args(["page", "--config"])
        .arg(&path)
        .output()
        .expect("browser page");

    assert_eq!(output.status.code(), Some(exit_codes::INVALID));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("request_timeout_secs must be > 0"));
}
