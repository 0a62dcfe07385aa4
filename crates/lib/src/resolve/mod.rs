//! Resolution of a single descriptor into its effective configuration.
//!
//! A [`ProjectNode`] becomes a [`ResolvedProject`] in three steps:
//!
//! 1. [`inherit::resolve`] merges scalars and properties from the ancestor chain
//! 2. [`properties::substitute`] expands `${name}` placeholders
//! 3. [`plugins::apply`] merges plugin configuration root to leaf and expands
//!    the merged options in the project's own scope
//!
//! [`resolve_project`] runs all three. Out-of-tree parents are supplied by a
//! [`ParentLocator`].

pub mod inherit;
pub mod parent;
pub mod plugins;
pub mod properties;
mod types;

pub use parent::{NoParentLocator, ParentLocator, RelativePathLocator};
pub use plugins::merge_plugins;
pub use types::*;

use crate::config::ResolveConfig;
use crate::descriptor::ProjectNode;
use crate::error::ResolveError;

/// Inherit, substitute and merge plugins for `node`.
///
/// `parent` is the aggregating project (or a located out-of-tree parent);
/// the node's parent reference is matched against it and its ancestors.
pub fn resolve_project(
  node: ProjectNode,
  parent: Option<&ResolvedProject>,
  config: &ResolveConfig,
) -> Result<ResolvedProject, ResolveError> {
  let inherited = inherit::resolve(node, parent)?;
  let substituted = properties::substitute(&inherited, config.missing_property)?;
  plugins::apply(substituted, config.missing_property)
}
