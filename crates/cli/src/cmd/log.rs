//! `agent-state log-event` and `agent-state load-log`.

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::json;

use agent_state_lib::{DirStore, StateStore, saturating_num_chars};

use crate::output::{OutputFormat, print_json, print_raw, print_success};

pub fn cmd_log_event(scope: &Path, message: &str, output: OutputFormat) -> Result<()> {
  DirStore::new()
    .log_event(scope, message)
    .with_context(|| format!("Failed to append to log in {}", scope.display()))?;

  if output.is_json() {
    print_json(&json!({ "directory": scope, "appended": true }))?;
  } else {
    print_success("Event logged");
  }

  Ok(())
}

/// Counts beyond `i64::MAX` saturate and return the whole log.
pub fn cmd_load_log(scope: &Path, num_chars: i128, output: OutputFormat) -> Result<()> {
  let log = DirStore::new()
    .load_log(scope, saturating_num_chars(num_chars))
    .with_context(|| format!("Failed to load log from {}", scope.display()))?;

  if output.is_json() {
    print_json(&json!({ "directory": scope, "num_chars": num_chars, "log": log }))?;
  } else {
    print_raw(&log)?;
  }

  Ok(())
}
