//! Integration tests for the entsearch CLI

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/orders.json");

/// Run the binary with config and data directories pointed at `home`
fn entsearch(home: &Path, args: &[&str], stdin: Option<&str>) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_entsearch"))
        .args(args)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_DATA_HOME", home.join("data"))
        .env("HOME", home)
        .env_remove("ENTSEARCH_USER")
        .env_remove("ENTSEARCH_ORG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to run command");

    if let Some(input) = stdin {
        child
            .stdin
            .take()
            .expect("stdin")
            .write_all(input.as_bytes())
            .expect("Failed to write stdin");
    } else {
        drop(child.stdin.take());
    }

    child.wait_with_output().expect("Failed to wait for command")
}

fn references(output: &Output) -> Vec<String> {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let matches: serde_json::Value = serde_json::from_str(&stdout).expect("JSON output");
    matches
        .as_array()
        .expect("array output")
        .iter()
        .map(|m| m["reference"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[test]
fn test_cli_help() {
    let home = tempfile::tempdir().unwrap();
    let output = entsearch(home.path(), &["--help"], None);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("filter"));
    assert!(stdout.contains("state"));
    assert!(stdout.contains("config"));
}

#[test]
fn test_cli_version() {
    let home = tempfile::tempdir().unwrap();
    let output = entsearch(home.path(), &["--version"], None);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("entsearch"));
}

#[test]
fn test_filter_help() {
    let home = tempfile::tempdir().unwrap();
    let output = entsearch(home.path(), &["filter", "--help"], None);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--interactive"));
    assert!(stdout.contains("--format"));
    assert!(stdout.contains("--limit"));
}

#[test]
fn test_filter_terms() {
    let home = tempfile::tempdir().unwrap();

    let output = entsearch(home.path(), &["filter", FIXTURE, "rotterdam", "--format", "json"], None);
    assert!(output.status.success());
    assert_eq!(references(&output), vec!["ORD-1001", "ORD-1002", "ORD-1003"]);

    let output = entsearch(home.path(), &["filter", FIXTURE, "ROTTERDAM, -delivered", "--format", "json"], None);
    assert_eq!(references(&output), vec!["ORD-1001", "ORD-1003"]);

    let output = entsearch(home.path(), &["filter", FIXTURE, "rotterdam,cooled", "--format", "json"], None);
    assert_eq!(references(&output), vec!["ORD-1001"]);

    let output = entsearch(home.path(), &["filter", FIXTURE, "a.b", "--format", "json"], None);
    assert_eq!(references(&output), vec!["ORD-1003"]);
}

#[test]
fn test_filter_empty_query_and_limit() {
    let home = tempfile::tempdir().unwrap();

    let output = entsearch(home.path(), &["filter", FIXTURE, "--format", "json"], None);
    assert_eq!(references(&output).len(), 4);

    let output = entsearch(home.path(), &["filter", FIXTURE, "--format", "json", "--limit", "1"], None);
    assert_eq!(references(&output), vec!["ORD-1001"]);
}

#[test]
fn test_filter_stdin_text_output() {
    let home = tempfile::tempdir().unwrap();
    let input = std::fs::read_to_string(FIXTURE).unwrap();

    let output = entsearch(home.path(), &["filter", "-", "cancelled"], Some(&input));
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("1 match(es)"));
    assert!(stdout.contains("ORD-1004"));
}

#[test]
fn test_filter_missing_file() {
    let home = tempfile::tempdir().unwrap();
    let output = entsearch(home.path(), &["filter", "/nonexistent/orders.json"], None);
    assert!(!output.status.success());
}

#[test]
fn test_interactive_remembers_query() {
    let home = tempfile::tempdir().unwrap();

    let output = entsearch(
        home.path(),
        &["filter", FIXTURE, "--interactive", "--user", "alice"],
        Some("eindhoven\n:quit\n"),
    );
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("ORD-1003"));

    let output = entsearch(home.path(), &["state", "get", "filter.last_query", "--user", "alice"], None);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("eindhoven"));

    let output = entsearch(home.path(), &["state", "get", "filter.last_query", "--user", "bob"], None);
    assert!(!output.status.success());
}

#[test]
fn test_state_commands() {
    let home = tempfile::tempdir().unwrap();

    let output = entsearch(home.path(), &["state", "set", "orders.page", "3", "--org", "acme"], None);
    assert!(output.status.success());

    let output = entsearch(home.path(), &["state", "list", "--org", "acme"], None);
    assert!(String::from_utf8_lossy(&output.stdout).contains("orders.page"));

    let output = entsearch(home.path(), &["state", "clear", "--org", "acme"], None);
    assert!(String::from_utf8_lossy(&output.stdout).contains("Removed 1 value(s)"));

    let output = entsearch(home.path(), &["state", "get", "orders.page", "--org", "acme"], None);
    assert!(!output.status.success());
}
