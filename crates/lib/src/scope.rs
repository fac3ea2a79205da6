//! Scope resolution.
//!
//! A scope is the directory owning one state file and one log file. It is
//! validated on every operation, never cached: the directory can be created,
//! removed, or replaced by other processes between calls.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::consts::{LOG_FILENAME, STATE_FILENAME};
use crate::store::{Result, StoreError};

/// A directory that passed validation at the moment it was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
  dir: PathBuf,
}

impl Scope {
  /// Validate `path` as a scope directory.
  ///
  /// Checks run in order: absolute, exists, is a directory. Symlinks are
  /// followed, so a dangling link reports [`StoreError::ScopeNotFound`].
  pub fn resolve(path: &Path) -> Result<Self> {
    if !path.is_absolute() {
      return Err(StoreError::InvalidScope(path.to_path_buf()));
    }

    let metadata = match fs::metadata(path) {
      Ok(metadata) => metadata,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        return Err(StoreError::ScopeNotFound(path.to_path_buf()));
      }
      Err(source) => {
        return Err(StoreError::Metadata {
          path: path.to_path_buf(),
          source,
        });
      }
    };

    if !metadata.is_dir() {
      return Err(StoreError::ScopeNotADirectory(path.to_path_buf()));
    }

    Ok(Self {
      dir: path.to_path_buf(),
    })
  }

  pub fn dir(&self) -> &Path {
    &self.dir
  }

  pub fn state_path(&self) -> PathBuf {
    self.dir.join(STATE_FILENAME)
  }

  pub fn log_path(&self) -> PathBuf {
    self.dir.join(LOG_FILENAME)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::store::ErrorKind;
  use tempfile::TempDir;

  #[test]
  fn accepts_existing_directory() {
    let temp = TempDir::new().unwrap();
    let scope = Scope::resolve(temp.path()).unwrap();
    assert_eq!(scope.dir(), temp.path());
    assert_eq!(scope.state_path(), temp.path().join(".agent-state.txt"));
    assert_eq!(scope.log_path(), temp.path().join(".agent-log.txt"));
  }

  #[test]
  fn rejects_relative_path_even_if_it_exists() {
    let err = Scope::resolve(Path::new(".")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidScope);

    let err = Scope::resolve(Path::new("relative/path")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidScope);
  }

  #[test]
  fn rejects_empty_path() {
    let err = Scope::resolve(Path::new("")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidScope);
  }

  #[test]
  fn rejects_missing_directory() {
    let temp = TempDir::new().unwrap();
    let err = Scope::resolve(&temp.path().join("missing")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ScopeNotFound);
  }

  #[test]
  fn rejects_regular_file() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("file.txt");
    fs::write(&file, "x").unwrap();

    let err = Scope::resolve(&file).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ScopeNotADirectory);
  }

  #[test]
  fn revalidates_after_directory_removed() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("ws");
    fs::create_dir(&dir).unwrap();

    assert!(Scope::resolve(&dir).is_ok());
    fs::remove_dir(&dir).unwrap();

    let err = Scope::resolve(&dir).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ScopeNotFound);
  }

  #[cfg(unix)]
  #[test]
  fn follows_symlinks() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("target");
    fs::create_dir(&target).unwrap();

    let good = temp.path().join("good");
    std::os::unix::fs::symlink(&target, &good).unwrap();
    assert!(Scope::resolve(&good).is_ok());

    let dangling = temp.path().join("dangling");
    std::os::unix::fs::symlink(temp.path().join("nowhere"), &dangling).unwrap();
    let err = Scope::resolve(&dangling).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ScopeNotFound);
  }
}
