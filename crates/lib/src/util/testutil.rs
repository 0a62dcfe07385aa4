//! Test utilities for trellis-lib.
//!
//! Helpers for laying out descriptor trees in temporary directories.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temporary directory holding descriptor files.
pub struct DescriptorDir {
  pub temp: TempDir,
}

impl DescriptorDir {
  pub fn new() -> Self {
    Self {
      temp: TempDir::new().unwrap(),
    }
  }

  pub fn root(&self) -> &Path {
    self.temp.path()
  }

  /// Write `project.json` into `dir` (relative, `""` for the root).
  pub fn json(&self, dir: &str, content: &str) -> PathBuf {
    self.write(dir, "project.json", content)
  }

  /// Write an arbitrary file into `dir`.
  pub fn write(&self, dir: &str, file: &str, content: &str) -> PathBuf {
    let dir = self.temp.path().join(dir);
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(file);
    std::fs::write(&path, content).unwrap();
    path
  }
}
