//! Implementation of the `trellis order` command.

use std::path::Path;

use anyhow::Result;

use trellis_lib::ResolveConfig;

use super::{check_failures, load_tree};
use crate::output::{OutputFormat, print_json, symbols};

pub fn cmd_order(path: &Path, config: &ResolveConfig, format: OutputFormat) -> Result<()> {
  let tree = load_tree(path, config)?;

  if format.is_json() {
    let items: Vec<_> = tree
      .walk()
      .map(|t| {
        serde_json::json!({
          "path": t.path.to_string(),
          "id": t.project.id(),
          "fingerprint": t.fingerprint,
        })
      })
      .collect();
    print_json(&items)?;
  } else {
    for (index, t) in tree.walk().enumerate() {
      println!(
        "{:>3}. {} {} {}",
        index + 1,
        t.project.id(),
        symbols::ARROW,
        t.project.base_dir().display()
      );
    }
  }

  check_failures(&tree)
}
