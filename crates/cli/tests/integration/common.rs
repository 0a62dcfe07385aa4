//! Shared test helpers for CLI integration tests.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// An isolated descriptor tree in a temporary directory.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  pub fn new() -> Self {
    Self {
      temp: TempDir::new().unwrap(),
    }
  }

  /// The jruby-style layout: a `pom` parent with an `ext` module that
  /// disables deployment and a `core` module using parent properties.
  pub fn parent_with_modules() -> Self {
    let env = Self::new();
    env.write_file(
      "project.json",
      r#"{
        "modelVersion": "4.0.0",
        "groupId": "org.jruby",
        "artifactId": "jruby-parent",
        "version": "${version}",
        "packaging": "pom",
        "properties": {"jar.name": "${project.artifactId}-${project.version}.jar"},
        "modules": ["core", "ext"]
      }"#,
    );
    env.write_file(
      "core/project.yaml",
      "artifactId: jruby-core\nparent: org.jruby:jruby-parent\nproperties:\n  encoding: UTF-8\n",
    );
    env.write_file(
      "ext/project.lua",
      r#"return {
        artifactId = "ext",
        parent = { artifactId = "jruby-parent" },
        plugins = { { id = "deploy", skip = true } },
      }"#,
    );
    env
  }

  /// Write a file relative to the temp directory.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.temp.path().join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }

  pub fn root(&self) -> &Path {
    self.temp.path()
  }

  pub fn path(&self, relative_path: &str) -> PathBuf {
    self.temp.path().join(relative_path)
  }

  /// Get a Command for the trellis binary with logging silenced.
  pub fn trellis_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("trellis");
    cmd.env("RUST_LOG", "off");
    cmd
  }
}
