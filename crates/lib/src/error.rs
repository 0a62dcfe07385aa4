//! Errors surfaced by descriptor resolution.
//!
//! Every failure crossing the library boundary is a [`ResolveError`]. Failures
//! of child modules are wrapped in [`ResolveError::ModuleLoadError`] together
//! with the [`ModulePath`] of the module, and an [`ErrorReport`] lists all of
//! them at once.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

/// Separator between module names in a rendered [`ModulePath`].
pub const MODULE_PATH_SEPARATOR: &str = " > ";

/// Position of a module in the tree, starting with the root's artifact id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ModulePath(Vec<String>);

impl ModulePath {
  pub fn root(name: impl Into<String>) -> Self {
    Self(vec![name.into()])
  }

  /// A new path one level below this one.
  pub fn child(&self, name: impl Into<String>) -> Self {
    let mut segments = self.0.clone();
    segments.push(name.into());
    Self(segments)
  }

  pub fn segments(&self) -> &[String] {
    &self.0
  }

  pub fn depth(&self) -> usize {
    self.0.len().saturating_sub(1)
  }

  pub fn last(&self) -> Option<&str> {
    self.0.last().map(String::as_str)
  }
}

impl fmt::Display for ModulePath {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0.join(MODULE_PATH_SEPARATOR))
  }
}

impl<S: Into<String>> FromIterator<S> for ModulePath {
  fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
    Self(iter.into_iter().map(Into::into).collect())
  }
}

/// Errors that can occur while loading and resolving descriptors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
  /// The path does not lead to a readable descriptor.
  #[error("descriptor not found: {}", path.display())]
  NotFound { path: PathBuf },

  /// Required fields are missing or structurally invalid.
  #[error("malformed descriptor {}: {reason}", path.display())]
  MalformedDescriptor { path: PathBuf, reason: String },

  /// Following parent references or module references leads back to a project
  /// already on the chain.
  #[error("cyclic inheritance: {chain}")]
  CyclicInheritance { chain: String },

  /// A declared parent is not among the ancestors supplied by the caller.
  #[error("parent '{parent}' of '{project}' is not among the resolved ancestors")]
  UnresolvedParent { project: String, parent: String },

  /// A placeholder names a property no scope defines.
  #[error("property '{name}' referenced by '{project}' is not defined")]
  PropertyNotFound { project: String, name: String },

  /// Any of the above, scoped to one child module.
  #[error("module '{path}' failed: {source}")]
  ModuleLoadError {
    path: ModulePath,
    #[source]
    source: Box<ResolveError>,
  },

  /// The configured deadline elapsed before aggregation finished.
  #[error("resolution timed out after {elapsed:?} while resolving '{path}'")]
  Timeout { path: ModulePath, elapsed: Duration },
}

impl ResolveError {
  pub fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
    ResolveError::MalformedDescriptor {
      path: path.into(),
      reason: reason.into(),
    }
  }

  pub fn module(path: ModulePath, source: ResolveError) -> Self {
    ResolveError::ModuleLoadError {
      path,
      source: Box::new(source),
    }
  }

  /// The innermost error, unwrapping module scoping.
  pub fn root_cause(&self) -> &ResolveError {
    match self {
      ResolveError::ModuleLoadError { source, .. } => source.root_cause(),
      other => other,
    }
  }

  /// Stable kind name, used in reports and JSON output.
  pub fn kind(&self) -> &'static str {
    match self {
      ResolveError::NotFound { .. } => "NotFound",
      ResolveError::MalformedDescriptor { .. } => "MalformedDescriptor",
      ResolveError::CyclicInheritance { .. } => "CyclicInheritance",
      ResolveError::UnresolvedParent { .. } => "UnresolvedParent",
      ResolveError::PropertyNotFound { .. } => "PropertyNotFound",
      ResolveError::ModuleLoadError { .. } => "ModuleLoadError",
      ResolveError::Timeout { .. } => "Timeout",
    }
  }
}

impl Serialize for ResolveError {
  fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    use serde::ser::SerializeStruct;

    let cause = self.root_cause();
    let mut state = serializer.serialize_struct("ResolveError", 2)?;
    state.serialize_field("kind", cause.kind())?;
    state.serialize_field("message", &cause.to_string())?;
    state.end()
  }
}

/// One failed module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleFailure {
  pub path: ModulePath,
  pub error: ResolveError,
}

/// Every module failure of one resolution pass, in depth-first order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
  pub failures: Vec<ModuleFailure>,
}

impl ErrorReport {
  pub fn is_empty(&self) -> bool {
    self.failures.is_empty()
  }

  pub fn len(&self) -> usize {
    self.failures.len()
  }
}

impl fmt::Display for ErrorReport {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "{} module(s) failed to resolve:", self.failures.len())?;
    for failure in &self.failures {
      writeln!(f, "  {}: {}", failure.path, failure.error.root_cause())?;
    }
    Ok(())
  }
}

impl std::error::Error for ErrorReport {}
