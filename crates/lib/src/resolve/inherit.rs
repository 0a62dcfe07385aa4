//! Inheritance of scalars and properties from the ancestor chain.

use std::sync::Arc;

use tracing::{debug, trace};

use super::ResolvedProject;
use crate::descriptor::ProjectNode;
use crate::error::{MODULE_PATH_SEPARATOR, ResolveError};

/// Merge `node` with its already-resolved ancestors.
///
/// The parent reference is matched against `parent` and then `parent`'s own
/// ancestors, nearest first. The matching project becomes the effective
/// parent. A node without a parent reference inherits nothing.
///
/// Scalars (`modelVersion`, `groupId`, `version`) fall back to the parent's
/// values. Properties are the parent's effective properties overlaid with the
/// node's own. Plugins are passed through unmerged.
///
/// # Errors
///
/// - [`ResolveError::UnresolvedParent`] if the reference matches no supplied ancestor
/// - [`ResolveError::CyclicInheritance`] if the node itself appears in its chain
pub fn resolve(node: ProjectNode, parent: Option<&ResolvedProject>) -> Result<ResolvedProject, ResolveError> {
  let chain = match &node.parent_ref {
    None => Vec::new(),
    Some(reference) => {
      let unresolved = || ResolveError::UnresolvedParent {
        project: node.artifact_id.clone(),
        parent: reference.to_string(),
      };
      let parent = parent.ok_or_else(unresolved)?;

      let chain = if parent.is_referenced_by(reference) {
        let mut chain = parent.ancestor_chain.clone();
        chain.push(Arc::new(parent.clone()));
        chain
      } else {
        let pos = parent
          .ancestor_chain
          .iter()
          .rposition(|a| a.is_referenced_by(reference))
          .ok_or_else(unresolved)?;
        parent.ancestor_chain[..=pos].to_vec()
      };

      if let Some(matched) = chain.last() {
        trace!(project = %node.artifact_id, parent = %matched.id(), "matched parent reference");
      }
      chain
    }
  };

  let nearest = chain.last();
  let group_id = node.group_id.clone().or_else(|| nearest.and_then(|p| p.group_id.clone()));

  if let Some(pos) = chain
    .iter()
    .position(|a| a.artifact_id == node.artifact_id && a.group_id == group_id)
  {
    let mut names: Vec<&str> = chain[pos..].iter().map(|a| a.artifact_id.as_str()).collect();
    names.push(&node.artifact_id);
    return Err(ResolveError::CyclicInheritance {
      chain: names.join(MODULE_PATH_SEPARATOR),
    });
  }

  let mut effective_properties = nearest
    .map(|p| p.effective_properties.clone())
    .unwrap_or_default();
  effective_properties.extend(node.properties.iter().map(|(k, v)| (k.clone(), v.clone())));

  let resolved = ResolvedProject {
    model_version: node
      .model_version
      .clone()
      .or_else(|| nearest.and_then(|p| p.model_version.clone())),
    group_id,
    artifact_id: node.artifact_id.clone(),
    version: node.version.clone().or_else(|| nearest.and_then(|p| p.version.clone())),
    packaging: node.packaging,
    modules: node.modules.clone(),
    plugins: node.plugins.clone(),
    effective_properties,
    effective_plugins: Vec::new(),
    ancestor_chain: chain,
    location: node.location.clone(),
    declared: node,
  };

  debug!(
    project = %resolved.id(),
    depth = resolved.ancestor_chain.len(),
    "resolved inheritance"
  );
  Ok(resolved)
}
