use std::fmt;
use std::io;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Stable, machine-readable classification of a [`StoreError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
  InvalidScope,
  ScopeNotFound,
  ScopeNotADirectory,
  InvalidArgument,
  Storage,
}

impl ErrorKind {
  pub fn as_str(self) -> &'static str {
    match self {
      ErrorKind::InvalidScope => "invalid_scope",
      ErrorKind::ScopeNotFound => "scope_not_found",
      ErrorKind::ScopeNotADirectory => "scope_not_a_directory",
      ErrorKind::InvalidArgument => "invalid_argument",
      ErrorKind::Storage => "storage",
    }
  }
}

impl fmt::Display for ErrorKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Error)]
pub enum StoreError {
  #[error("directory must be an absolute path: {}", .0.display())]
  InvalidScope(PathBuf),

  #[error("directory does not exist: {}", .0.display())]
  ScopeNotFound(PathBuf),

  #[error("path is not a directory: {}", .0.display())]
  ScopeNotADirectory(PathBuf),

  #[error("invalid argument: {0}")]
  InvalidArgument(String),

  #[error("failed to inspect {}: {source}", path.display())]
  Metadata {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to read {}: {source}", path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to write {}: {source}", path.display())]
  Write {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

impl StoreError {
  pub fn kind(&self) -> ErrorKind {
    match self {
      StoreError::InvalidScope(_) => ErrorKind::InvalidScope,
      StoreError::ScopeNotFound(_) => ErrorKind::ScopeNotFound,
      StoreError::ScopeNotADirectory(_) => ErrorKind::ScopeNotADirectory,
      StoreError::InvalidArgument(_) => ErrorKind::InvalidArgument,
      StoreError::Metadata { .. } | StoreError::Read { .. } | StoreError::Write { .. } => ErrorKind::Storage,
    }
  }
}

pub type Result<T> = std::result::Result<T, StoreError>;
