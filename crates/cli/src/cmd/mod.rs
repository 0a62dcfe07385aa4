mod effective;
mod order;
mod resolve;

pub use effective::cmd_effective;
pub use order::cmd_order;
pub use resolve::cmd_resolve;

use std::path::Path;

use anyhow::{Context, Result, bail};
use trellis_lib::{ProjectTree, ResolveConfig};

use crate::output::print_warning;

fn load_tree(path: &Path, config: &ResolveConfig) -> Result<ProjectTree> {
  trellis_lib::resolve_tree(path, config).with_context(|| format!("Failed to resolve {}", path.display()))
}

/// Report every failed module on stderr and fail if there was any.
fn check_failures(tree: &ProjectTree) -> Result<()> {
  let report = tree.failures();
  if report.is_empty() {
    return Ok(());
  }

  for failure in &report.failures {
    print_warning(&format!("{}: {}", failure.path, failure.error.root_cause()));
  }
  bail!("{} module(s) failed to resolve", report.len())
}
