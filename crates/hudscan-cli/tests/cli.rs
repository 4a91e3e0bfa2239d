//! Integration tests for the hudscan binary.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn scan_missing_input_fails() {
    let mut cmd = Command::cargo_bin("hudscan").unwrap();
    cmd.arg("scan")
        .arg("/nonexistent/screenshot.png")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Image not found"));
}

#[test]
fn scan_default_input_missing_fails() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("hudscan").unwrap();
    cmd.current_dir(dir.path())
        .arg("scan")
        .assert()
        .failure()
        .stderr(predicate::str::contains("testimage.png"));
}

#[test]
fn calibrate_missing_input_fails() {
    let mut cmd = Command::cargo_bin("hudscan").unwrap();
    cmd.arg("calibrate")
        .arg("/nonexistent/screenshot.png")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Image not found"));
}

#[test]
fn config_show_prints_defaults() {
    let mut cmd = Command::cargo_bin("hudscan").unwrap();
    cmd.arg("config")
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("recognition_threshold"))
        .stdout(predicate::str::contains("现金"));
}

#[test]
fn config_init_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");

    let mut cmd = Command::cargo_bin("hudscan").unwrap();
    cmd.arg("config")
        .arg("init")
        .arg("--output")
        .arg(&path)
        .assert()
        .success();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("row_tolerance"));
}
