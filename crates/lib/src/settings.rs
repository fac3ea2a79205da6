//! Default scope selection.
//!
//! Callers that omit a directory fall back to `AGENT_STATE_DIR`, then to the
//! process's working directory. The result is still validated by
//! [`Scope::resolve`](crate::scope::Scope::resolve) on use.

use std::io;
use std::path::PathBuf;

use crate::consts::SCOPE_ENV;
use crate::store::{Result, StoreError};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
  /// Explicit default scope. `None` means the working directory.
  pub directory: Option<PathBuf>,
  /// Working directory captured at construction, absolute.
  working_dir: Option<PathBuf>,
}

impl Settings {
  pub fn new(directory: Option<PathBuf>) -> Self {
    Self {
      directory,
      working_dir: std::env::current_dir().ok(),
    }
  }

  /// Read settings from the environment.
  pub fn from_env() -> Self {
    let directory = std::env::var_os(SCOPE_ENV)
      .filter(|value| !value.is_empty())
      .map(PathBuf::from);
    Self::new(directory)
  }

  /// The directory to use when a caller does not name one.
  ///
  /// Prefers the working directory captured at construction, so removing it
  /// later surfaces as [`StoreError::ScopeNotFound`] from scope resolution.
  /// If none was captured, the working directory is queried now and its
  /// failure is reported rather than replaced.
  pub fn default_scope(&self) -> Result<PathBuf> {
    if let Some(dir) = self.directory.as_ref().or(self.working_dir.as_ref()) {
      return Ok(dir.clone());
    }

    std::env::current_dir().map_err(|source| {
      let path = PathBuf::from(".");
      if source.kind() == io::ErrorKind::NotFound {
        StoreError::ScopeNotFound(path)
      } else {
        StoreError::Metadata { path, source }
      }
    })
  }
}
