//! The aggregated project tree.

use serde::Serialize;

use crate::error::{ErrorReport, ModuleFailure, ModulePath, ResolveError};
use crate::resolve::ResolvedProject;
use crate::util::hash::{Fingerprint, Hashable};

/// A resolved project and, per listed module, either its subtree or the
/// error that prevented resolving it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectTree {
  pub path: ModulePath,
  pub fingerprint: Fingerprint,
  pub project: ResolvedProject,
  /// One entry per declared module, in declared order.
  pub modules: Vec<ModuleEntry>,
}

/// Outcome of aggregating one module.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ModuleEntry {
  Resolved(ProjectTree),
  Failed {
    name: String,
    path: ModulePath,
    error: ResolveError,
  },
}

impl ModuleEntry {
  /// The module name as listed by the aggregating project.
  pub fn name(&self) -> &str {
    match self {
      ModuleEntry::Resolved(tree) => tree.path.last().unwrap_or_default(),
      ModuleEntry::Failed { name, .. } => name,
    }
  }

  pub fn as_tree(&self) -> Option<&ProjectTree> {
    match self {
      ModuleEntry::Resolved(tree) => Some(tree),
      ModuleEntry::Failed { .. } => None,
    }
  }

  pub fn error(&self) -> Option<&ResolveError> {
    match self {
      ModuleEntry::Resolved(_) => None,
      ModuleEntry::Failed { error, .. } => Some(error),
    }
  }
}

impl ProjectTree {
  /// Wrap a resolved project, fingerprinting its effective configuration.
  pub fn new(path: ModulePath, project: ResolvedProject, modules: Vec<ModuleEntry>) -> Result<Self, ResolveError> {
    let fingerprint = project
      .fingerprint()
      .map_err(|e| ResolveError::malformed(&project.location, format!("cannot fingerprint: {e}")))?;
    Ok(Self {
      path,
      fingerprint,
      project,
      modules,
    })
  }

  /// Directly nested subtrees that resolved, in declared order.
  pub fn children(&self) -> impl DoubleEndedIterator<Item = &ProjectTree> {
    self.modules.iter().filter_map(ModuleEntry::as_tree)
  }

  /// Every resolved subtree, depth-first, parents before their modules.
  pub fn walk(&self) -> Walk<'_> {
    Walk { stack: vec![self] }
  }

  /// Resolved projects in the order they are built.
  pub fn build_order(&self) -> Vec<&ResolvedProject> {
    self.walk().map(|tree| &tree.project).collect()
  }

  /// Every failed module below this tree, depth-first in declared order.
  pub fn failures(&self) -> ErrorReport {
    fn collect(tree: &ProjectTree, out: &mut Vec<ModuleFailure>) {
      for entry in &tree.modules {
        match entry {
          ModuleEntry::Resolved(child) => collect(child, out),
          ModuleEntry::Failed { path, error, .. } => out.push(ModuleFailure {
            path: path.clone(),
            error: error.clone(),
          }),
        }
      }
    }

    let mut failures = Vec::new();
    collect(self, &mut failures);
    ErrorReport { failures }
  }

  /// The subtree at a `/`-separated module path relative to this tree.
  ///
  /// An empty path is this tree.
  pub fn find(&self, module: &str) -> Option<&ProjectTree> {
    module
      .split('/')
      .filter(|segment| !segment.is_empty())
      .try_fold(self, |tree, segment| tree.children().find(|child| child.path.last() == Some(segment)))
  }
}

/// Depth-first iterator over a [`ProjectTree`].
pub struct Walk<'a> {
  stack: Vec<&'a ProjectTree>,
}

impl<'a> Iterator for Walk<'a> {
  type Item = &'a ProjectTree;

  fn next(&mut self) -> Option<Self::Item> {
    let tree = self.stack.pop()?;
    self.stack.extend(tree.children().rev());
    Some(tree)
  }
}
