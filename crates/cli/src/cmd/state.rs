//! `agent-state update-state` and `agent-state load-state`.

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::json;

use agent_state_lib::{DirStore, StateStore};

use crate::output::{OutputFormat, print_json, print_raw, print_success};

pub fn cmd_update_state(scope: &Path, state: &str, output: OutputFormat) -> Result<()> {
  DirStore::new()
    .update_state(scope, state)
    .with_context(|| format!("Failed to update state in {}", scope.display()))?;

  if output.is_json() {
    print_json(&json!({ "directory": scope, "updated": true }))?;
  } else {
    print_success(&format!("State saved in {}", scope.display()));
  }

  Ok(())
}

/// Prints the state exactly as stored, without a trailing newline.
pub fn cmd_load_state(scope: &Path, output: OutputFormat) -> Result<()> {
  let state = DirStore::new()
    .load_state(scope)
    .with_context(|| format!("Failed to load state from {}", scope.display()))?;

  if output.is_json() {
    print_json(&json!({ "directory": scope, "state": state }))?;
  } else {
    print_raw(&state)?;
  }

  Ok(())
}
