//! The `load / resolve / aggregate` entry points.

use std::path::Path;

use tracing::{debug, info};

use crate::aggregate::{self, ProjectTree};
use crate::config::ResolveConfig;
use crate::descriptor::{DescriptorLoader, Frontends, ProjectNode};
use crate::error::ResolveError;
use crate::resolve::{ParentLocator, RelativePathLocator, ResolvedProject, resolve_project};

/// A configured resolution engine.
///
/// Holds the descriptor loader (front-ends plus global properties), the
/// locator used for a root's out-of-tree parent, and the resolution settings.
#[derive(Debug)]
pub struct Engine<L = RelativePathLocator> {
  loader: DescriptorLoader,
  locator: L,
  config: ResolveConfig,
}

impl Engine {
  /// An engine with the default front-ends and parent lookup by relative path.
  pub fn new(config: ResolveConfig) -> Self {
    Self {
      loader: DescriptorLoader::new(Frontends::default(), config.global_properties.clone()),
      locator: RelativePathLocator,
      config,
    }
  }
}

impl<L: ParentLocator> Engine<L> {
  pub fn with_locator<M: ParentLocator>(self, locator: M) -> Engine<M> {
    Engine {
      loader: self.loader,
      locator,
      config: self.config,
    }
  }

  pub fn with_frontends(mut self, frontends: Frontends) -> Self {
    self.loader = DescriptorLoader::new(frontends, self.config.global_properties.clone());
    self
  }

  /// Load one descriptor without resolving it.
  pub fn load(&self, path: &Path) -> Result<ProjectNode, ResolveError> {
    self.loader.load(path)
  }

  /// Resolve one node against an already resolved parent.
  pub fn resolve(&self, node: ProjectNode, parent: Option<&ResolvedProject>) -> Result<ResolvedProject, ResolveError> {
    resolve_project(node, parent, &self.config)
  }

  /// Aggregate the modules below a resolved project.
  pub fn aggregate(&self, resolved: ResolvedProject) -> Result<ProjectTree, ResolveError> {
    aggregate::aggregate(resolved, &self.loader, &self.config)
  }

  /// Load, resolve and aggregate the project at `path`.
  ///
  /// Errors of the root descriptor, including its out-of-tree parent, are
  /// returned as is. Module failures are handled per the configured error mode.
  pub fn resolve_tree(&self, path: &Path) -> Result<ProjectTree, ResolveError> {
    info!(path = %path.display(), error_mode = ?self.config.error_mode, "resolving project tree");

    let root = self.load(path)?;
    let parent = match root.parent_ref {
      Some(_) => self.locator.locate(&root, &self.loader, &self.config)?,
      None => None,
    };
    if let Some(parent) = &parent {
      debug!(root = %root.artifact_id, parent = %parent.id(), "root inherits from out-of-tree parent");
    }

    let resolved = self.resolve(root, parent.as_ref())?;
    self.aggregate(resolved)
  }
}

/// Resolve the tree at `path` with the default engine for `config`.
pub fn resolve_tree(path: &Path, config: &ResolveConfig) -> Result<ProjectTree, ResolveError> {
  Engine::new(config.clone()).resolve_tree(path)
}
