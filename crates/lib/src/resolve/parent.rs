//! Lookup of a root project's parent outside the aggregation tree.

use std::path::PathBuf;

use tracing::debug;

use super::{ResolvedProject, resolve_project};
use crate::config::ResolveConfig;
use crate::descriptor::{DescriptorLoader, ProjectNode};
use crate::error::{MODULE_PATH_SEPARATOR, ResolveError};

/// Supplies the resolved parent of a project that is not aggregated by it.
///
/// Returning `Ok(None)` means "not found here"; the inheritance step then
/// reports [`ResolveError::UnresolvedParent`].
pub trait ParentLocator {
  fn locate(
    &self,
    child: &ProjectNode,
    loader: &DescriptorLoader,
    config: &ResolveConfig,
  ) -> Result<Option<ResolvedProject>, ResolveError>;
}

/// Never finds a parent.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoParentLocator;

impl ParentLocator for NoParentLocator {
  fn locate(
    &self,
    _child: &ProjectNode,
    _loader: &DescriptorLoader,
    _config: &ResolveConfig,
  ) -> Result<Option<ResolvedProject>, ResolveError> {
    Ok(None)
  }
}

/// Follows `parent.relativePath` (default `..`) on the filesystem.
///
/// Parents found this way are resolved recursively, so a chain of
/// directories each pointing one level up resolves to its full ancestry. A
/// descriptor that reappears on its own chain is a
/// [`ResolveError::CyclicInheritance`].
#[derive(Debug, Default, Clone, Copy)]
pub struct RelativePathLocator;

impl ParentLocator for RelativePathLocator {
  fn locate(
    &self,
    child: &ProjectNode,
    loader: &DescriptorLoader,
    config: &ResolveConfig,
  ) -> Result<Option<ResolvedProject>, ResolveError> {
    let mut visited = vec![(canonical(&child.location), child.artifact_id.clone())];
    self.locate_from(child, loader, config, &mut visited)
  }
}

impl RelativePathLocator {
  fn locate_from(
    &self,
    child: &ProjectNode,
    loader: &DescriptorLoader,
    config: &ResolveConfig,
    visited: &mut Vec<(PathBuf, String)>,
  ) -> Result<Option<ResolvedProject>, ResolveError> {
    let Some(reference) = &child.parent_ref else {
      return Ok(None);
    };

    let candidate = child.base_dir().join(reference.relative_path());
    let node = match loader.load(&candidate) {
      Ok(node) => node,
      Err(ResolveError::NotFound { .. }) => {
        debug!(child = %child.artifact_id, candidate = %candidate.display(), "no parent descriptor at relative path");
        return Ok(None);
      }
      Err(e) => return Err(e),
    };

    let location = canonical(&node.location);
    if let Some(pos) = visited.iter().position(|(path, _)| *path == location) {
      let mut names: Vec<&str> = visited[pos..].iter().rev().map(|(_, name)| name.as_str()).collect();
      names.insert(0, &node.artifact_id);
      return Err(ResolveError::CyclicInheritance {
        chain: names.join(MODULE_PATH_SEPARATOR),
      });
    }
    visited.push((location, node.artifact_id.clone()));

    let grandparent = self.locate_from(&node, loader, config, visited)?;
    let parent = resolve_project(node, grandparent.as_ref(), config)?;

    if !parent.is_referenced_by(reference) {
      debug!(
        child = %child.artifact_id,
        found = %parent.id(),
        wanted = %reference,
        "descriptor at relative path is not the declared parent"
      );
      return Ok(None);
    }

    debug!(child = %child.artifact_id, parent = %parent.id(), "located parent by relative path");
    Ok(Some(parent))
  }
}

fn canonical(path: &std::path::Path) -> PathBuf {
  dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
