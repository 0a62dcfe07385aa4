//! Implementation of the `trellis resolve` command.
//!
//! Resolves a descriptor tree and prints each module's effective properties
//! and plugins, or the whole tree as JSON.

use std::path::Path;
use std::time::Instant;

use anyhow::Result;

use trellis_lib::{ModuleEntry, ProjectTree, ResolveConfig};

use super::{check_failures, load_tree};
use crate::output::{
  OutputFormat, format_elapsed, print_failed_module, print_json, print_project, print_stat, print_success,
};

pub fn cmd_resolve(path: &Path, config: &ResolveConfig, format: OutputFormat) -> Result<()> {
  let started = Instant::now();
  let tree = load_tree(path, config)?;

  if format.is_json() {
    print_json(&tree)?;
  } else {
    print_tree(&tree);
    println!();
    print_success(&format!("Resolved {}", tree.project.id()));
    print_stat("Projects", &tree.walk().count().to_string());
    print_stat("Failed", &tree.failures().len().to_string());
    print_stat("Elapsed", &format_elapsed(started.elapsed()));
  }

  check_failures(&tree)
}

fn print_tree(tree: &ProjectTree) {
  let depth = tree.path.depth();
  print_project(depth, &tree.project, &tree.fingerprint);

  for entry in &tree.modules {
    match entry {
      ModuleEntry::Resolved(child) => print_tree(child),
      ModuleEntry::Failed { name, error, .. } => print_failed_module(depth + 1, name, error),
    }
  }
}
