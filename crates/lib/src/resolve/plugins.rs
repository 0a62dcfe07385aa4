//! Plugin configuration merging across the inheritance chain.

use super::{ResolvedProject, properties};
use crate::config::MissingProperty;
use crate::descriptor::PluginConfig;
use crate::error::ResolveError;

/// Merge plugin declarations from root to leaf.
///
/// For each declared plugin, an identity already seen gets its options
/// shallow-merged (later levels override same-named keys, other keys from
/// both are kept) and its `skip` flag overwritten only when the later level
/// sets one. New identities are appended, so the result is in
/// first-declared-identity order across the whole chain.
pub fn merge_plugins<'a>(levels: impl IntoIterator<Item = &'a [PluginConfig]>) -> Vec<PluginConfig> {
  let mut merged: Vec<PluginConfig> = Vec::new();

  for level in levels {
    for plugin in level {
      match merged.iter_mut().find(|p| p.id == plugin.id) {
        Some(existing) => {
          existing
            .options
            .extend(plugin.options.iter().map(|(k, v)| (k.clone(), v.clone())));
          if plugin.skip.is_some() {
            existing.skip = plugin.skip;
          }
        }
        None => merged.push(plugin.clone()),
      }
    }
  }

  merged
}

/// Fill `effective_plugins` from the declared plugins of the project's
/// ancestors and its own, with merged options expanded in the project's scope.
///
/// # Errors
///
/// Placeholder failures as for [`properties::substitute`].
pub fn apply(mut project: ResolvedProject, policy: MissingProperty) -> Result<ResolvedProject, ResolveError> {
  let levels = project
    .ancestor_chain
    .iter()
    .map(|a| a.declared.plugins.as_slice())
    .chain(std::iter::once(project.declared.plugins.as_slice()));
  let merged = merge_plugins(levels);
  project.effective_plugins = properties::substitute_plugins(&project, merged, policy)?;
  Ok(project)
}
