//! Directory-scoped state and log storage.
//!
//! # Storage Layout
//!
//! ```text
//! {scope}/
//! ├── .agent-state.txt    # current state, replaced on every update
//! └── .agent-log.txt      # append-only, one event per line
//! ```
//!
//! Every operation validates the scope, then issues a single filesystem
//! call. There is no locking: a reader racing `update_state` may observe a
//! partially written file, and appends from separate processes may
//! interleave.

mod tail;
mod types;

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use tracing::debug;

use crate::scope::Scope;

pub use tail::tail_chars;
pub use types::{ErrorKind, Result, StoreError};

/// The four operations an agent uses to persist and recover its progress.
pub trait StateStore {
  /// Replace the state with `state`.
  fn update_state(&self, scope: &Path, state: &str) -> Result<()>;

  /// Current state, or `""` if none has been saved.
  fn load_state(&self, scope: &Path) -> Result<String>;

  /// Append `message` and a newline to the log.
  fn log_event(&self, scope: &Path, message: &str) -> Result<()>;

  /// Last `num_chars` characters of the log, or `""` if there is no log.
  ///
  /// Negative counts are rejected with [`StoreError::InvalidArgument`].
  fn load_log(&self, scope: &Path, num_chars: i64) -> Result<String>;
}

/// [`StateStore`] backed by plain files in the scope directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirStore;

impl DirStore {
  pub fn new() -> Self {
    Self
  }
}

impl StateStore for DirStore {
  fn update_state(&self, scope: &Path, state: &str) -> Result<()> {
    let path = Scope::resolve(scope)?.state_path();
    debug!(path = ?path, len = state.len(), "writing state");

    fs::write(&path, state).map_err(|source| StoreError::Write { path, source })
  }

  fn load_state(&self, scope: &Path) -> Result<String> {
    let path = Scope::resolve(scope)?.state_path();
    debug!(path = ?path, "loading state");

    Ok(read_optional(&path)?.unwrap_or_default())
  }

  fn log_event(&self, scope: &Path, message: &str) -> Result<()> {
    let path = Scope::resolve(scope)?.log_path();
    debug!(path = ?path, "appending log event");

    let line = format!("{}\n", message);
    OpenOptions::new()
      .create(true)
      .append(true)
      .open(&path)
      .and_then(|mut file| file.write_all(line.as_bytes()))
      .map_err(|source| StoreError::Write { path, source })
  }

  fn load_log(&self, scope: &Path, num_chars: i64) -> Result<String> {
    let path = Scope::resolve(scope)?.log_path();

    let num_chars = usize::try_from(num_chars)
      .map_err(|_| StoreError::InvalidArgument(format!("num_chars must be non-negative, got {}", num_chars)))?;
    debug!(path = ?path, num_chars, "loading log tail");

    let content = match read_optional(&path)? {
      Some(content) => content,
      None => return Ok(String::new()),
    };

    Ok(tail_chars(&content, num_chars).to_string())
  }
}

/// Narrow a character count to the range [`StateStore::load_log`] takes.
///
/// Counts past `i64::MAX` already exceed any log, so they saturate; negative
/// counts stay negative and are rejected by the store.
pub fn saturating_num_chars(num_chars: i128) -> i64 {
  num_chars.clamp(i64::MIN.into(), i64::MAX.into()) as i64
}

/// Read a file as UTF-8, treating a missing file as `None`.
fn read_optional(path: &Path) -> Result<Option<String>> {
  match fs::read_to_string(path) {
    Ok(content) => Ok(Some(content)),
    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
    Err(source) => Err(StoreError::Read {
      path: path.to_path_buf(),
      source,
    }),
  }
}
