//! Shared helpers for resolution tests.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A descriptor tree in a temporary directory.
pub struct Workspace {
  pub temp: TempDir,
}

impl Workspace {
  pub fn new() -> Self {
    Self {
      temp: TempDir::new().unwrap(),
    }
  }

  /// A workspace below the current directory, addressable by relative path.
  pub fn in_current_dir() -> Self {
    Self {
      temp: TempDir::new_in(std::env::current_dir().unwrap()).unwrap(),
    }
  }

  /// The workspace root relative to the current directory.
  pub fn relative_root(&self) -> PathBuf {
    let cwd = std::env::current_dir().unwrap();
    self.temp.path().strip_prefix(&cwd).unwrap().to_path_buf()
  }

  pub fn root(&self) -> &Path {
    self.temp.path()
  }

  /// Write a file relative to the workspace root, creating directories.
  pub fn write(&self, relative_path: &str, content: &str) -> PathBuf {
    let path = self.temp.path().join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
  }
}
