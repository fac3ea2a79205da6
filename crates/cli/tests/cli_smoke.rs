//! CLI smoke tests for agent-state.
//!
//! Each test runs the binary against its own temporary scope directory with
//! `AGENT_STATE_DIR` cleared, so nothing leaks between tests.

use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

/// Get a Command for the agent-state binary with a clean environment.
fn agent_cmd() -> Command {
  let mut cmd = cargo_bin_cmd!("agent-state");
  cmd.env_remove("AGENT_STATE_DIR");
  cmd.env_remove("RUST_LOG");
  cmd
}

/// A temp scope directory, canonicalized so paths compare cleanly on macOS.
fn temp_scope() -> (TempDir, PathBuf) {
  let temp = TempDir::new().unwrap();
  let dir = dunce::canonicalize(temp.path()).unwrap();
  (temp, dir)
}

// =============================================================================
// Help & Version
// =============================================================================

#[test]
fn help_flag_works() {
  agent_cmd()
    .arg("--help")
    .assert()
    .success()
    .stdout(predicate::str::contains("Usage"));
}

#[test]
fn version_flag_works() {
  agent_cmd()
    .arg("--version")
    .assert()
    .success()
    .stdout(predicate::str::contains("agent-state"));
}

#[test]
fn subcommand_help_works() {
  for cmd in &["update-state", "load-state", "log-event", "load-log", "serve"] {
    agent_cmd()
      .arg(cmd)
      .arg("--help")
      .assert()
      .success()
      .stdout(predicate::str::contains("Usage"));
  }
}

// =============================================================================
// State
// =============================================================================

#[test]
fn update_then_load_state() {
  let (_temp, dir) = temp_scope();

  agent_cmd()
    .arg("-C")
    .arg(&dir)
    .args(["update-state", "step 1"])
    .assert()
    .success();

  agent_cmd()
    .arg("-C")
    .arg(&dir)
    .arg("load-state")
    .assert()
    .success()
    .stdout("step 1");

  assert_eq!(std::fs::read_to_string(dir.join(".agent-state.txt")).unwrap(), "step 1");
}

#[test]
fn load_state_without_writes_is_empty() {
  let (_temp, dir) = temp_scope();

  agent_cmd()
    .arg("-C")
    .arg(&dir)
    .arg("load-state")
    .assert()
    .success()
    .stdout("");
}

#[test]
fn directory_from_environment() {
  let (_temp, dir) = temp_scope();

  agent_cmd()
    .env("AGENT_STATE_DIR", &dir)
    .args(["update-state", "from env"])
    .assert()
    .success();

  assert_eq!(std::fs::read_to_string(dir.join(".agent-state.txt")).unwrap(), "from env");
}

#[test]
fn directory_defaults_to_working_directory() {
  let (_temp, dir) = temp_scope();

  agent_cmd()
    .current_dir(&dir)
    .args(["log-event", "here"])
    .assert()
    .success();

  assert_eq!(std::fs::read_to_string(dir.join(".agent-log.txt")).unwrap(), "here\n");
}

#[test]
fn json_output_for_load_state() {
  let (_temp, dir) = temp_scope();
  std::fs::write(dir.join(".agent-state.txt"), "working").unwrap();

  let output = agent_cmd()
    .arg("-C")
    .arg(&dir)
    .args(["--output", "json", "load-state"])
    .output()
    .unwrap();
  assert!(output.status.success());

  let json: Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(json["state"], "working");
}

// =============================================================================
// Log
// =============================================================================

#[test]
fn log_events_and_tail() {
  let (_temp, dir) = temp_scope();

  for message in ["started", "finished"] {
    agent_cmd()
      .arg("-C")
      .arg(&dir)
      .args(["log-event", message])
      .assert()
      .success();
  }

  agent_cmd()
    .arg("-C")
    .arg(&dir)
    .args(["load-log", "1000"])
    .assert()
    .success()
    .stdout("started\nfinished\n");

  agent_cmd()
    .arg("-C")
    .arg(&dir)
    .args(["load-log", "5"])
    .assert()
    .success()
    .stdout("shed\n");
}

#[test]
fn num_chars_beyond_i64_returns_whole_log() {
  let (_temp, dir) = temp_scope();
  std::fs::write(dir.join(".agent-log.txt"), "started\n").unwrap();

  agent_cmd()
    .arg("-C")
    .arg(&dir)
    .args(["load-log", "18446744073709551615"])
    .assert()
    .success()
    .stdout("started\n");
}

#[test]
fn negative_num_chars_fails() {
  let (_temp, dir) = temp_scope();

  agent_cmd()
    .arg("-C")
    .arg(&dir)
    .args(["load-log", "-1"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("non-negative"));
}

// =============================================================================
// Scope validation
// =============================================================================

#[test]
fn relative_directory_fails() {
  agent_cmd()
    .args(["-C", "relative/path", "update-state", "x"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("absolute path"));
}

#[test]
fn missing_directory_fails() {
  let (_temp, dir) = temp_scope();

  agent_cmd()
    .arg("-C")
    .arg(dir.join("missing"))
    .arg("load-state")
    .assert()
    .failure()
    .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn file_directory_fails() {
  let (_temp, dir) = temp_scope();
  let file = dir.join("file.txt");
  std::fs::write(&file, "x").unwrap();

  agent_cmd()
    .arg("-C")
    .arg(&file)
    .args(["log-event", "x"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("not a directory"));
}

// =============================================================================
// serve
// =============================================================================

#[test]
fn serve_answers_piped_requests() {
  let (_temp, dir) = temp_scope();
  let dir_str = dir.to_str().unwrap();

  let requests = [
    serde_json::json!({ "jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {} }),
    serde_json::json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }),
    serde_json::json!({
      "jsonrpc": "2.0", "id": 2, "method": "tools/call",
      "params": { "name": "log_event", "arguments": { "directory": dir_str, "message": "started" } }
    }),
    serde_json::json!({
      "jsonrpc": "2.0", "id": 3, "method": "tools/call",
      "params": { "name": "load_log", "arguments": { "directory": dir_str, "num_chars": 1000 } }
    }),
  ];
  let stdin: String = requests.iter().map(|r| format!("{}\n", r)).collect();

  let output = agent_cmd().arg("serve").write_stdin(stdin).output().unwrap();
  assert!(output.status.success());

  let responses: Vec<Value> = String::from_utf8(output.stdout)
    .unwrap()
    .lines()
    .map(|line| serde_json::from_str(line).unwrap())
    .collect();

  assert_eq!(responses.len(), 3);
  assert_eq!(responses[0]["result"]["serverInfo"]["name"], "agent-state");
  assert_eq!(responses[1]["result"]["isError"], false);
  assert_eq!(responses[2]["id"], 3);
  assert_eq!(responses[2]["result"]["content"][0]["text"], "started\n");
}
