//! Resolved project types.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::descriptor::{Packaging, ParentRef, PluginConfig, ProjectNode};
use crate::util::hash::Hashable;

/// A project after inheritance, property substitution and plugin merging.
///
/// Every `ResolvedProject` holds its ancestor chain (root first). Ancestors
/// are immutable shared snapshots: a child's chain reuses its parent's
/// entries and never points back down, so the structure stays acyclic.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedProject {
  /// The descriptor exactly as loaded.
  #[serde(skip)]
  pub declared: ProjectNode,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub model_version: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub group_id: Option<String>,
  pub artifact_id: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub version: Option<String>,
  pub packaging: Packaging,

  /// Module names in declared build order.
  pub modules: Vec<String>,

  /// Plugins declared at this level, after substitution.
  #[serde(skip)]
  pub plugins: Vec<PluginConfig>,

  pub effective_properties: BTreeMap<String, String>,
  pub effective_plugins: Vec<PluginConfig>,

  /// Ancestors this project inherits from, root first.
  #[serde(rename = "ancestors", serialize_with = "serialize_ancestor_ids")]
  pub ancestor_chain: Vec<Arc<ResolvedProject>>,

  pub location: PathBuf,
}

fn serialize_ancestor_ids<S: Serializer>(chain: &[Arc<ResolvedProject>], serializer: S) -> Result<S::Ok, S::Error> {
  serializer.collect_seq(chain.iter().map(|a| a.id()))
}

impl Hashable for ResolvedProject {}

impl ResolvedProject {
  /// `groupId:artifactId:version`, omitting unknown parts.
  pub fn id(&self) -> String {
    let mut id = String::new();
    if let Some(group) = &self.group_id {
      id.push_str(group);
      id.push(':');
    }
    id.push_str(&self.artifact_id);
    if let Some(version) = &self.version {
      id.push(':');
      id.push_str(version);
    }
    id
  }

  /// The nearest ancestor, if this project inherits from one.
  pub fn parent(&self) -> Option<&ResolvedProject> {
    self.ancestor_chain.last().map(Arc::as_ref)
  }

  /// Whether `reference` designates this project.
  pub fn is_referenced_by(&self, reference: &ParentRef) -> bool {
    reference.matches(self.group_id.as_deref(), &self.artifact_id, self.version.as_deref())
  }

  pub fn base_dir(&self) -> &Path {
    self.declared.base_dir()
  }

  pub fn effective_plugin(&self, id: &str) -> Option<&PluginConfig> {
    self.effective_plugins.iter().find(|p| p.id == id)
  }

  /// This project followed by its ancestors, nearest first.
  pub(crate) fn self_and_ancestors(&self) -> impl Iterator<Item = &ResolvedProject> {
    std::iter::once(self).chain(self.ancestor_chain.iter().rev().map(Arc::as_ref))
  }
}
