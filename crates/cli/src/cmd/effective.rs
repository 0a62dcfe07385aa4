//! Implementation of the `trellis effective` command.

use std::path::Path;

use anyhow::{Result, bail};

use trellis_lib::ResolveConfig;

use super::load_tree;
use crate::output::print_json;

pub fn cmd_effective(path: &Path, config: &ResolveConfig, module: &str) -> Result<()> {
  let tree = load_tree(path, config)?;

  let Some(subtree) = tree.find(module) else {
    let wanted: Vec<&str> = module.split('/').filter(|s| !s.is_empty()).collect();
    let report = tree.failures();
    if let Some(failure) = report
      .failures
      .iter()
      .find(|f| f.path.segments().iter().skip(1).eq(wanted.iter()))
    {
      bail!("Module '{}' failed to resolve: {}", module, failure.error.root_cause());
    }
    bail!("Module '{}' not found below {}", module, tree.project.id());
  };

  print_json(&serde_json::json!({
    "path": subtree.path.to_string(),
    "fingerprint": subtree.fingerprint,
    "project": subtree.project,
  }))
}
