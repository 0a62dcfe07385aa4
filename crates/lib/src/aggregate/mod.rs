//! Module aggregation.
//!
//! Starting from a resolved aggregator project, each declared module is
//! located below the project's directory, loaded, resolved with the
//! aggregator as parent and aggregated in turn. The result is a
//! [`ProjectTree`].
//!
//! Failure handling follows [`ErrorMode`]:
//! - `CollectAll` records the failure at the module's position and continues
//!   with its siblings
//! - `FailFast` returns the first failure as a [`ResolveError::ModuleLoadError`]
//!
//! Module cycles and an elapsed deadline abort aggregation in either mode.

mod tree;

pub use tree::{ModuleEntry, ProjectTree, Walk};

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::config::{ErrorMode, ResolveConfig};
use crate::descriptor::DescriptorLoader;
use crate::error::{MODULE_PATH_SEPARATOR, ModulePath, ResolveError};
use crate::resolve::{ResolvedProject, resolve_project};

/// A descriptor on the current branch of the aggregation.
#[derive(Debug, Clone)]
struct BranchEntry {
  location: PathBuf,
  artifact_id: String,
}

/// Aggregates `resolved` and everything below it.
///
/// # Errors
///
/// - [`ResolveError::CyclicInheritance`] if a module leads back to a descriptor on its own branch
/// - [`ResolveError::Timeout`] if the configured deadline elapses
/// - [`ResolveError::ModuleLoadError`] for the first failing module under [`ErrorMode::FailFast`]
pub fn aggregate(
  resolved: ResolvedProject,
  loader: &DescriptorLoader,
  config: &ResolveConfig,
) -> Result<ProjectTree, ResolveError> {
  let aggregator = Aggregator {
    loader,
    config,
    started: Instant::now(),
  };

  let path = ModulePath::root(resolved.artifact_id.clone());
  let branch = vec![BranchEntry {
    location: canonical(&resolved.location),
    artifact_id: resolved.artifact_id.clone(),
  }];
  let tree = aggregator.subtree(resolved, path, branch)?;

  info!(
    root = %tree.project.id(),
    resolved = tree.walk().count(),
    failed = tree.failures().len(),
    elapsed = ?aggregator.started.elapsed(),
    "aggregated project tree"
  );
  Ok(tree)
}

struct Aggregator<'a> {
  loader: &'a DescriptorLoader,
  config: &'a ResolveConfig,
  started: Instant,
}

impl Aggregator<'_> {
  fn subtree(
    &self,
    project: ResolvedProject,
    path: ModulePath,
    branch: Vec<BranchEntry>,
  ) -> Result<ProjectTree, ResolveError> {
    let mut modules = Vec::with_capacity(project.modules.len());
    let mut sibling_ids = HashSet::new();

    for name in &project.modules {
      self.check_deadline(&path)?;
      let child_path = path.child(name.as_str());
      let dir = project.base_dir().join(name);

      let Some(file) = self.loader.locate(&dir) else {
        self.fail(&mut modules, name, child_path, ResolveError::NotFound { path: dir })?;
        continue;
      };

      let location = canonical(&file);
      if let Some(pos) = branch.iter().position(|entry| entry.location == location) {
        let mut names: Vec<&str> = branch.iter().map(|entry| entry.artifact_id.as_str()).collect();
        names.push(&branch[pos].artifact_id);
        let err = ResolveError::CyclicInheritance {
          chain: names.join(MODULE_PATH_SEPARATOR),
        };
        warn!(module = %child_path, error = %err, "module cycle");
        return Err(err);
      }

      let child = match self
        .loader
        .load(&file)
        .and_then(|node| resolve_project(node, Some(&project), self.config))
      {
        Ok(child) => child,
        Err(e) => {
          self.fail(&mut modules, name, child_path, e)?;
          continue;
        }
      };

      if !sibling_ids.insert(child.artifact_id.clone()) {
        let err = ResolveError::malformed(
          &child.location,
          format!("artifactId '{}' is already used by a sibling module", child.artifact_id),
        );
        self.fail(&mut modules, name, child_path, err)?;
        continue;
      }

      debug!(module = %child_path, project = %child.id(), "resolved module");

      let mut child_branch = branch.clone();
      child_branch.push(BranchEntry {
        location,
        artifact_id: child.artifact_id.clone(),
      });
      modules.push(ModuleEntry::Resolved(self.subtree(child, child_path, child_branch)?));
    }

    ProjectTree::new(path, project, modules)
  }

  /// Record or return a module failure according to the error mode.
  fn fail(
    &self,
    modules: &mut Vec<ModuleEntry>,
    name: &str,
    path: ModulePath,
    source: ResolveError,
  ) -> Result<(), ResolveError> {
    let error = ResolveError::module(path.clone(), source);
    match self.config.error_mode {
      ErrorMode::FailFast => Err(error),
      ErrorMode::CollectAll => {
        warn!(module = %path, error = %error.root_cause(), "module failed to resolve");
        modules.push(ModuleEntry::Failed {
          name: name.to_string(),
          path,
          error,
        });
        Ok(())
      }
    }
  }

  fn check_deadline(&self, path: &ModulePath) -> Result<(), ResolveError> {
    let Some(deadline) = self.config.deadline else {
      return Ok(());
    };
    let elapsed = self.started.elapsed();
    if elapsed >= deadline {
      warn!(subtree = %path, ?elapsed, "resolution deadline exceeded");
      return Err(ResolveError::Timeout {
        path: path.clone(),
        elapsed,
      });
    }
    Ok(())
  }
}

fn canonical(path: &Path) -> PathBuf {
  dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
