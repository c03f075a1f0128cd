//! End-to-end tests driving the `medlog` binary.
//!
//! Each test runs against its own temporary home and database so the
//! developer's configuration never leaks in.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn medlog_binary() -> String {
    env!("CARGO_BIN_EXE_medlog").to_string()
}

fn medlog(temp: &Path, args: &[&str]) -> Output {
    Command::new(medlog_binary())
        .env("HOME", temp)
        .env("XDG_CONFIG_HOME", temp.join(".config"))
        .env("XDG_DATA_HOME", temp.join(".local/share"))
        .env("MEDLOG_DATABASE_PATH", temp.join("medlog.db"))
        .env("MEDLOG_TIMEZONE", "UTC")
        .env_remove("MEDLOG_API_URL")
        .env_remove("MEDLOG_CLOCK")
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("failed to run medlog")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "medlog should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn test_log_then_history() {
    let temp = TempDir::new().unwrap();

    let output = medlog(
        temp.path(),
        &["log", "Aspirin", "--at", "2024-03-15T09:00", "--notes", "with food"],
    );
    assert_success(&output);
    assert_eq!(stdout(&output), "Medication logged successfully!\n");

    let output = medlog(temp.path(), &["log", "Ibuprofen", "--at", "2024-03-10T21:30", "--source", "nfc"]);
    assert_success(&output);

    let output = medlog(temp.path(), &["history", "--json"]);
    assert_success(&output);
    let items: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let items = items.as_array().unwrap();
    assert_eq!(items.len(), 2);

    assert_eq!(items[0]["medication"], "Aspirin");
    assert_eq!(items[0]["timestamp"], "2024-03-15T09:00");
    assert_eq!(items[0]["notes"], "with food");
    assert_eq!(items[0]["display"]["label"], "Mar 15, 2024");
    assert_eq!(items[0]["display"]["fine"], "09:00");
    assert_eq!(items[0]["icon"]["icon"], "clock");

    assert_eq!(items[1]["medication"], "Ibuprofen");
    assert_eq!(items[1]["source"], "nfc");
    assert_eq!(items[1]["display"]["label"], "Mar 10, 2024");
}

#[test]
fn test_history_on_fresh_database() {
    let temp = TempDir::new().unwrap();

    let output = medlog(temp.path(), &["history"]);
    assert_success(&output);
    assert_eq!(stdout(&output), "No medication logs yet.\n");
}

#[test]
fn test_label_relative_to_explicit_now() {
    let temp = TempDir::new().unwrap();

    let output = medlog(
        temp.path(),
        &["label", "2024-03-12T08:00", "--now", "2024-03-15T14:30"],
    );
    assert_success(&output);
    assert_eq!(stdout(&output), "Tuesday 08:00 (calendar)\n");

    let output = medlog(
        temp.path(),
        &["label", "2024-03-15T23:15", "--now", "2024-03-15T23:45"],
    );
    assert_success(&output);
    assert_eq!(stdout(&output), "This night 23:15 (night_sky)\n");
}

#[test]
fn test_label_rejects_invalid_timestamp() {
    let temp = TempDir::new().unwrap();

    let output = medlog(temp.path(), &["label", "not-a-time"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid timestamp"), "stderr: {stderr}");
}

#[test]
fn test_log_rejects_blank_medication() {
    let temp = TempDir::new().unwrap();

    let output = medlog(temp.path(), &["log", "   "]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("medication cannot be empty"), "stderr: {stderr}");

    let output = medlog(temp.path(), &["history"]);
    assert_success(&output);
    assert_eq!(stdout(&output), "No medication logs yet.\n");
}

#[test]
fn test_status_counts_entries() {
    let temp = TempDir::new().unwrap();

    assert_success(&medlog(temp.path(), &["log", "Aspirin", "--at", "2024-03-15T09:00"]));

    let output = medlog(temp.path(), &["status"]);
    assert_success(&output);
    let text = stdout(&output);
    assert!(text.contains("Entries: 1"));
    assert!(text.contains("Latest: Aspirin (Mar 15, 2024 09:00)"));
}
