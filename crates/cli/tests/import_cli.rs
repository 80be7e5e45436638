//! Exit behaviour of the `n8n-import` binary when the workflow file is unusable.

use std::fs;
use std::process::{Command, Output};

use tempfile::tempdir;

fn run_importer(file: &std::path::Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_n8n-import"))
        .arg("--file")
        .arg(file)
        .env("N8N_BASE_URL", "http://127.0.0.1:9")
        .output()
        .expect("run n8n-import")
}

#[test]
fn missing_file_exits_with_not_found_message() {
    let dir = tempdir().unwrap();
    let output = run_importer(&dir.path().join("absent.json"));

    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("File not found"), "stdout: {stdout}");
    assert!(!stdout.contains("JSON parse error"));
}

#[test]
fn malformed_file_exits_with_parse_message() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("broken.json");
    fs::write(&file, "{ \"name\": \"Booking\", ").unwrap();

    let output = run_importer(&file);

    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("JSON parse error"), "stdout: {stdout}");
    assert!(!stdout.contains("File not found"));
}

#[test]
fn base_url_is_read_from_environment() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("booking.json");
    fs::write(&file, r#"{ "name": "Booking", "nodes": [] }"#).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_n8n-import"))
        .arg("--file")
        .arg(&file)
        .env("N8N_BASE_URL", "not a url")
        .output()
        .expect("run n8n-import");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid base URL 'not a url'"), "stderr: {stderr}");
}

#[test]
fn base_url_flag_overrides_environment() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("booking.json");
    fs::write(&file, r#"{ "name": "Booking", "nodes": [] }"#).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_n8n-import"))
        .arg("--file")
        .arg(&file)
        .arg("--base-url")
        .arg("http://127.0.0.1:9")
        .env("N8N_BASE_URL", "not a url")
        .output()
        .expect("run n8n-import");

    // An unreachable instance is a failed import, which still exits 0.
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Workflow import FAILED"), "stdout: {stdout}");
}
