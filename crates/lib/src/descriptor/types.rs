//! Descriptor types as loaded, before any inheritance is applied.
//!
//! - [`ProjectNode`] - one project's descriptor
//! - [`ParentRef`] - reference to the project a descriptor inherits from
//! - [`Packaging`] - packaging kind, decides whether modules are allowed
//! - [`PluginConfig`] - plugin identity, options and skip override

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::value::ValueMap;

/// Default relative location of a parent descriptor.
pub const DEFAULT_PARENT_RELATIVE_PATH: &str = "..";

/// Packaging kind of a project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Packaging {
  #[default]
  Jar,
  Pom,
  War,
  Ear,
  MavenPlugin,
  Bundle,
}

impl Packaging {
  pub fn as_str(&self) -> &'static str {
    match self {
      Packaging::Jar => "jar",
      Packaging::Pom => "pom",
      Packaging::War => "war",
      Packaging::Ear => "ear",
      Packaging::MavenPlugin => "maven-plugin",
      Packaging::Bundle => "bundle",
    }
  }

  /// Only aggregator (`pom`) projects may list modules.
  pub fn allows_modules(&self) -> bool {
    matches!(self, Packaging::Pom)
  }
}

impl fmt::Display for Packaging {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Packaging {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "jar" => Ok(Packaging::Jar),
      "pom" => Ok(Packaging::Pom),
      "war" => Ok(Packaging::War),
      "ear" => Ok(Packaging::Ear),
      "maven-plugin" => Ok(Packaging::MavenPlugin),
      "bundle" => Ok(Packaging::Bundle),
      other => Err(format!("unknown packaging '{other}'")),
    }
  }
}

/// Reference from a descriptor to the project it inherits from.
///
/// Accepted input forms:
/// - `"artifactId"`
/// - `"groupId:artifactId"`
/// - `"groupId:artifactId:version"`
/// - `{ groupId?, artifactId, version?, relativePath? }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentRef {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub group_id: Option<String>,
  pub artifact_id: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub version: Option<String>,
  /// Where to look for the parent descriptor when it is not an aggregating
  /// ancestor. Relative to the child's directory.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub relative_path: Option<String>,
}

impl ParentRef {
  pub fn new(artifact_id: impl Into<String>) -> Self {
    Self {
      group_id: None,
      artifact_id: artifact_id.into(),
      version: None,
      relative_path: None,
    }
  }

  pub fn with_group(mut self, group_id: impl Into<String>) -> Self {
    self.group_id = Some(group_id.into());
    self
  }

  pub fn with_version(mut self, version: impl Into<String>) -> Self {
    self.version = Some(version.into());
    self
  }

  /// Parse the `g:a:v` shorthand.
  pub fn parse_coordinates(s: &str) -> Option<Self> {
    let parts: Vec<&str> = s.split(':').map(str::trim).collect();
    if parts.iter().any(|p| p.is_empty()) {
      return None;
    }
    match parts.as_slice() {
      [artifact] => Some(Self::new(*artifact)),
      [group, artifact] => Some(Self::new(*artifact).with_group(*group)),
      [group, artifact, version] => Some(Self::new(*artifact).with_group(*group).with_version(*version)),
      _ => None,
    }
  }

  /// Whether this reference designates a project with the given coordinates.
  ///
  /// `artifactId` must be equal; `groupId` and `version` are compared only
  /// when both sides state them.
  pub fn matches(&self, group_id: Option<&str>, artifact_id: &str, version: Option<&str>) -> bool {
    fn agree(a: Option<&str>, b: Option<&str>) -> bool {
      match (a, b) {
        (Some(a), Some(b)) => a == b,
        _ => true,
      }
    }

    self.artifact_id == artifact_id
      && agree(self.group_id.as_deref(), group_id)
      && agree(self.version.as_deref(), version)
  }

  pub fn relative_path(&self) -> &str {
    self.relative_path.as_deref().unwrap_or(DEFAULT_PARENT_RELATIVE_PATH)
  }
}

impl fmt::Display for ParentRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if let Some(group) = &self.group_id {
      write!(f, "{}:", group)?;
    }
    f.write_str(&self.artifact_id)?;
    if let Some(version) = &self.version {
      write!(f, ":{}", version)?;
    }
    Ok(())
  }
}

/// Configuration block for one plugin at one descriptor level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginConfig {
  /// Plugin identity, e.g. `org.apache.maven.plugins:maven-deploy-plugin` or `deploy`.
  pub id: String,

  /// Plugin-specific options, shape unknown to the resolver.
  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub options: ValueMap,

  /// Explicit skip override. `None` means this level has no opinion.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub skip: Option<bool>,
}

impl PluginConfig {
  pub fn new(id: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      options: ValueMap::new(),
      skip: None,
    }
  }

  pub fn with_option(mut self, key: impl Into<String>, value: impl Into<crate::value::Value>) -> Self {
    self.options.insert(key.into(), value.into());
    self
  }

  pub fn with_skip(mut self, skip: bool) -> Self {
    self.skip = Some(skip);
    self
  }

  /// Effective skip state. A flag never set at any level reads as `false`.
  pub fn is_skipped(&self) -> bool {
    self.skip.unwrap_or(false)
  }
}

/// A raw, unresolved project descriptor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectNode {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub model_version: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub group_id: Option<String>,
  pub artifact_id: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub version: Option<String>,
  pub packaging: Packaging,
  #[serde(rename = "parent", skip_serializing_if = "Option::is_none")]
  pub parent_ref: Option<ParentRef>,
  pub properties: BTreeMap<String, String>,
  pub modules: Vec<String>,
  pub plugins: Vec<PluginConfig>,
  /// Descriptor file this node was loaded from.
  pub location: PathBuf,
}

impl ProjectNode {
  pub fn new(artifact_id: impl Into<String>, location: impl Into<PathBuf>) -> Self {
    Self {
      model_version: None,
      group_id: None,
      artifact_id: artifact_id.into(),
      version: None,
      packaging: Packaging::default(),
      parent_ref: None,
      properties: BTreeMap::new(),
      modules: Vec::new(),
      plugins: Vec::new(),
      location: location.into(),
    }
  }

  /// Directory containing the descriptor; module paths are relative to it.
  pub fn base_dir(&self) -> &Path {
    self.location.parent().unwrap_or(Path::new("."))
  }
}
