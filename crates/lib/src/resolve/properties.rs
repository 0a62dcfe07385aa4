//! Property placeholder substitution.
//!
//! A `${name}` reference is looked up in this order:
//! 1. properties declared by the project itself
//! 2. properties declared by each ancestor, nearest first
//! 3. built-in `project.*` values
//!
//! Substitution is a single pass. Property values are taken as declared, so a
//! value that itself contains a placeholder is inserted verbatim and never
//! expanded again.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::trace;

use super::ResolvedProject;
use crate::config::MissingProperty;
use crate::descriptor::PluginConfig;
use crate::error::ResolveError;
use crate::placeholder::{self, PlaceholderError, Resolver};
use crate::value::Value;

/// Lookup scope for one project.
struct PropertyScope<'a> {
  project: &'a ResolvedProject,
  builtins: BTreeMap<String, String>,
}

impl<'a> PropertyScope<'a> {
  fn new(project: &'a ResolvedProject) -> Self {
    let mut builtins = BTreeMap::new();
    builtins.insert("project.artifactId".to_string(), project.artifact_id.clone());
    builtins.insert("project.packaging".to_string(), project.packaging.to_string());
    builtins.insert(
      "project.basedir".to_string(),
      project.base_dir().to_string_lossy().to_string(),
    );
    if let Some(group) = &project.group_id {
      builtins.insert("project.groupId".to_string(), group.clone());
    }
    if let Some(version) = &project.version {
      builtins.insert("project.version".to_string(), version.clone());
    }
    if let Some(parent) = project.parent() {
      builtins.insert("project.parent.artifactId".to_string(), parent.artifact_id.clone());
      if let Some(version) = &parent.version {
        builtins.insert("project.parent.version".to_string(), version.clone());
      }
    }
    Self { project, builtins }
  }
}

impl Resolver for PropertyScope<'_> {
  fn resolve_property(&self, name: &str) -> Option<&str> {
    let found = self
      .project
      .self_and_ancestors()
      .find_map(|p| p.declared.properties.get(name))
      .or_else(|| self.builtins.get(name))
      .map(String::as_str);
    trace!(project = %self.project.artifact_id, name, found = found.is_some(), "property lookup");
    found
  }
}

/// Replace placeholders in every string-valued field of `project`.
///
/// Substituted fields: `groupId` and `version` when declared by the project
/// (inherited values come from an already substituted parent), module names,
/// effective property values and strings nested in this level's plugin
/// options. Effective properties are rebuilt from the declared layers, so
/// calling this twice gives the same result.
///
/// # Errors
///
/// - [`ResolveError::PropertyNotFound`] for an unknown name under [`MissingProperty::Error`]
/// - [`ResolveError::MalformedDescriptor`] for an unclosed or empty placeholder
pub fn substitute(project: &ResolvedProject, policy: MissingProperty) -> Result<ResolvedProject, ResolveError> {
  let mut out = project.clone();

  // Coordinates first: `project.version` must see the substituted value.
  {
    let scope = PropertyScope::new(project);
    let sub = |s: &str| expand(s, &scope, policy, project);
    if let Some(group) = &project.declared.group_id {
      out.group_id = Some(sub(group.as_str())?);
    }
    if let Some(version) = &project.declared.version {
      out.version = Some(sub(version.as_str())?);
    }
  }

  let (effective_properties, modules) = {
    let scope = PropertyScope::new(&out);
    let sub = |s: &str| expand(s, &scope, policy, project);

    let mut raw = BTreeMap::new();
    for layer in project.ancestor_chain.iter().map(Arc::as_ref).chain(std::iter::once(project)) {
      raw.extend(layer.declared.properties.iter());
    }
    let effective_properties = raw
      .into_iter()
      .map(|(k, v)| Ok((k.clone(), sub(v.as_str())?)))
      .collect::<Result<BTreeMap<_, _>, ResolveError>>()?;

    let modules = project
      .declared
      .modules
      .iter()
      .map(|m| sub(m.as_str()))
      .collect::<Result<Vec<_>, _>>()?;

    (effective_properties, modules)
  };

  out.effective_properties = effective_properties;
  out.modules = modules;
  out.plugins = substitute_plugins(&out, project.declared.plugins.clone(), policy)?;
  Ok(out)
}

/// Expand placeholders in the options of `plugins` within `project`'s scope.
///
/// Used for the project's own declarations and for the merged chain, so an
/// inherited option sees the same names as an inherited property.
pub(super) fn substitute_plugins(
  project: &ResolvedProject,
  mut plugins: Vec<PluginConfig>,
  policy: MissingProperty,
) -> Result<Vec<PluginConfig>, ResolveError> {
  let scope = PropertyScope::new(project);
  let mut sub = |s: &str| expand(s, &scope, policy, project);
  for plugin in &mut plugins {
    let options = Value::Map(std::mem::take(&mut plugin.options));
    if let Value::Map(options) = options.try_map_strings(&mut sub)? {
      plugin.options = options;
    }
  }
  Ok(plugins)
}

fn expand(
  input: &str,
  scope: &PropertyScope<'_>,
  policy: MissingProperty,
  project: &ResolvedProject,
) -> Result<String, ResolveError> {
  let result = match policy {
    MissingProperty::Error => placeholder::substitute(input, scope),
    MissingProperty::KeepLiteral => placeholder::substitute_lenient(input, scope),
  };

  result.map_err(|e| match e {
    PlaceholderError::Unresolved(name) => ResolveError::PropertyNotFound {
      project: project.artifact_id.clone(),
      name,
    },
    other => ResolveError::malformed(&project.location, format!("in '{input}': {other}")),
  })
}
