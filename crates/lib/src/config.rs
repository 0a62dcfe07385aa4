//! Resolution settings.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use crate::error::ResolveError;

/// Name of the global property filled from a version file.
pub const VERSION_PROPERTY: &str = "version";

/// How child module failures affect aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorMode {
  /// Abort aggregation at the first failing module.
  FailFast,
  /// Record failures in the tree and keep resolving siblings.
  CollectAll,
}

/// What to do with a placeholder no scope defines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingProperty {
  /// Fail with `PropertyNotFound`.
  Error,
  /// Leave the literal `${name}` token in place.
  KeepLiteral,
}

/// Settings for one resolution pass.
#[derive(Debug, Clone)]
pub struct ResolveConfig {
  pub error_mode: ErrorMode,

  pub missing_property: MissingProperty,

  /// Abort aggregation once this much time has elapsed.
  pub deadline: Option<Duration>,

  /// Ambient properties injected into every descriptor without a parent.
  pub global_properties: BTreeMap<String, String>,
}

impl ResolveConfig {
  /// Settings with the given error mode, strict properties and no deadline.
  ///
  /// The error mode has no default: callers pick between fail-fast and
  /// collecting every module failure.
  pub fn new(error_mode: ErrorMode) -> Self {
    Self {
      error_mode,
      missing_property: MissingProperty::Error,
      deadline: None,
      global_properties: BTreeMap::new(),
    }
  }

  pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
    self.error_mode = mode;
    self
  }

  pub fn with_missing_property(mut self, policy: MissingProperty) -> Self {
    self.missing_property = policy;
    self
  }

  pub fn with_deadline(mut self, deadline: Duration) -> Self {
    self.deadline = Some(deadline);
    self
  }

  pub fn with_global(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
    self.global_properties.insert(name.into(), value.into());
    self
  }

  /// Inject the trimmed first line of a version file as the `version` global.
  pub fn with_version_file(self, path: &Path) -> Result<Self, ResolveError> {
    let content = std::fs::read_to_string(path).map_err(|_| ResolveError::NotFound {
      path: path.to_path_buf(),
    })?;
    let version = content.lines().next().map(str::trim).unwrap_or_default();
    if version.is_empty() {
      return Err(ResolveError::malformed(path, "version file is empty"));
    }
    Ok(self.with_global(VERSION_PROPERTY, version))
  }
}
