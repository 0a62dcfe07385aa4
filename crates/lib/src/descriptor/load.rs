//! Descriptor loading and validation.
//!
//! [`DescriptorLoader::load`] locates a descriptor, hands its text to the
//! matching front-end and validates the resulting [`Value`] into a
//! [`ProjectNode`].

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::frontend::Frontends;
use super::types::{Packaging, ParentRef, PluginConfig, ProjectNode};
use crate::error::ResolveError;
use crate::value::{Value, ValueMap};

const KNOWN_KEYS: &[&str] = &[
  "modelVersion",
  "groupId",
  "artifactId",
  "version",
  "packaging",
  "parent",
  "properties",
  "modules",
  "plugins",
];

/// Loads single descriptors into [`ProjectNode`]s.
#[derive(Debug)]
pub struct DescriptorLoader {
  frontends: Frontends,
  global_properties: BTreeMap<String, String>,
}

impl Default for DescriptorLoader {
  fn default() -> Self {
    Self::new(Frontends::default(), BTreeMap::new())
  }
}

impl DescriptorLoader {
  /// Create a loader.
  ///
  /// `global_properties` become the lowest layer of the properties of every
  /// descriptor that declares no parent.
  pub fn new(frontends: Frontends, global_properties: BTreeMap<String, String>) -> Self {
    Self {
      frontends,
      global_properties,
    }
  }

  /// The descriptor file `path` designates, without reading it.
  pub fn locate(&self, path: &Path) -> Option<PathBuf> {
    self.frontends.locate(path)
  }

  /// Load the descriptor at `path` (a descriptor file or a directory containing one).
  ///
  /// # Errors
  ///
  /// - [`ResolveError::NotFound`] if no readable descriptor exists at `path`
  /// - [`ResolveError::MalformedDescriptor`] if parsing or validation fails
  pub fn load(&self, path: &Path) -> Result<ProjectNode, ResolveError> {
    let not_found = || ResolveError::NotFound {
      path: path.to_path_buf(),
    };

    let located = self.frontends.locate(path).ok_or_else(not_found)?;
    // Locations are absolute whatever the working directory.
    let file = dunce::canonicalize(&located).map_err(|_| not_found())?;
    let source = std::fs::read_to_string(&file).map_err(|_| not_found())?;

    let frontend = self
      .frontends
      .for_file(&file)
      .ok_or_else(|| ResolveError::malformed(&file, "no front-end handles this file type"))?;

    let value = frontend
      .parse(&file, &source)
      .map_err(|e| ResolveError::malformed(&file, e.to_string()))?;

    let node = self.from_value(&value, &file)?;
    debug!(
      artifact = %node.artifact_id,
      frontend = frontend.name(),
      path = %file.display(),
      "loaded descriptor"
    );
    Ok(node)
  }

  /// Validate a parsed value into a [`ProjectNode`] located at `location`.
  pub fn from_value(&self, value: &Value, location: &Path) -> Result<ProjectNode, ResolveError> {
    let fields = Fields::new(value, location)?;

    for key in fields.map.keys() {
      if !KNOWN_KEYS.contains(&key.as_str()) {
        warn!(key = %key, path = %location.display(), "ignoring unknown descriptor key");
      }
    }

    let artifact_id = fields
      .optional_str("artifactId")?
      .map(str::trim)
      .filter(|s| !s.is_empty())
      .ok_or_else(|| fields.malformed("'artifactId' is required and must be non-empty"))?
      .to_string();

    let packaging = match fields.optional_str("packaging")? {
      Some(p) => p.parse::<Packaging>().map_err(|e| fields.malformed(e))?,
      None => Packaging::default(),
    };

    let parent_ref = fields.map.get("parent").map(|v| fields.parent(v)).transpose()?;

    let mut properties = if parent_ref.is_none() {
      self.global_properties.clone()
    } else {
      BTreeMap::new()
    };
    properties.extend(fields.properties()?);

    let modules = fields.modules()?;
    if !modules.is_empty() && !packaging.allows_modules() {
      return Err(fields.malformed(format!(
        "packaging '{packaging}' cannot declare modules (only 'pom' aggregates)"
      )));
    }

    Ok(ProjectNode {
      model_version: fields.optional_str("modelVersion")?.map(str::to_string),
      group_id: fields.optional_str("groupId")?.map(str::to_string),
      artifact_id,
      version: fields.optional_str("version")?.map(str::to_string),
      packaging,
      parent_ref,
      properties,
      modules,
      plugins: fields.plugins()?,
      location: location.to_path_buf(),
    })
  }
}

/// Typed access to the top-level descriptor mapping.
struct Fields<'a> {
  map: &'a ValueMap,
  location: &'a Path,
}

impl<'a> Fields<'a> {
  fn new(value: &'a Value, location: &'a Path) -> Result<Self, ResolveError> {
    let map = value.as_map().ok_or_else(|| {
      ResolveError::malformed(location, format!("descriptor must be a mapping, got {}", value.type_name()))
    })?;
    Ok(Self { map, location })
  }

  fn malformed(&self, reason: impl Into<String>) -> ResolveError {
    ResolveError::malformed(PathBuf::from(self.location), reason)
  }

  fn optional_str(&self, key: &str) -> Result<Option<&'a str>, ResolveError> {
    match self.map.get(key) {
      None => Ok(None),
      Some(Value::String(s)) => Ok(Some(s)),
      Some(other) => Err(self.malformed(format!("'{key}' must be a string, got {}", other.type_name()))),
    }
  }

  fn parent(&self, value: &Value) -> Result<ParentRef, ResolveError> {
    match value {
      Value::String(s) => ParentRef::parse_coordinates(s)
        .ok_or_else(|| self.malformed(format!("invalid parent reference '{s}'"))),
      Value::Map(map) => {
        let text = |key: &str| -> Result<Option<String>, ResolveError> {
          match map.get(key) {
            None => Ok(None),
            Some(Value::String(s)) if !s.trim().is_empty() => Ok(Some(s.trim().to_string())),
            Some(_) => Err(self.malformed(format!("'parent.{key}' must be a non-empty string"))),
          }
        };
        let artifact_id = text("artifactId")?.ok_or_else(|| self.malformed("'parent.artifactId' is required"))?;
        Ok(ParentRef {
          group_id: text("groupId")?,
          artifact_id,
          version: text("version")?,
          relative_path: text("relativePath")?,
        })
      }
      other => Err(self.malformed(format!(
        "'parent' must be a string or mapping, got {}",
        other.type_name()
      ))),
    }
  }

  fn properties(&self) -> Result<BTreeMap<String, String>, ResolveError> {
    let Some(value) = self.map.get("properties") else {
      return Ok(BTreeMap::new());
    };
    let map = value
      .as_map()
      .ok_or_else(|| self.malformed(format!("'properties' must be a mapping, got {}", value.type_name())))?;

    map
      .iter()
      .map(|(k, v)| {
        v.scalar_to_string()
          .map(|s| (k.clone(), s))
          .ok_or_else(|| self.malformed(format!("property '{k}' must be a scalar, got {}", v.type_name())))
      })
      .collect()
  }

  fn modules(&self) -> Result<Vec<String>, ResolveError> {
    let Some(value) = self.map.get("modules") else {
      return Ok(Vec::new());
    };
    let items = value
      .as_seq()
      .ok_or_else(|| self.malformed(format!("'modules' must be a sequence, got {}", value.type_name())))?;

    let mut seen = HashSet::new();
    let mut modules = Vec::with_capacity(items.len());
    for item in items {
      let name = item
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| self.malformed("module names must be non-empty strings"))?;
      if !seen.insert(name) {
        return Err(self.malformed(format!("module '{name}' is listed more than once")));
      }
      modules.push(name.to_string());
    }
    Ok(modules)
  }

  fn plugins(&self) -> Result<Vec<PluginConfig>, ResolveError> {
    let Some(value) = self.map.get("plugins") else {
      return Ok(Vec::new());
    };
    let items = value
      .as_seq()
      .ok_or_else(|| self.malformed(format!("'plugins' must be a sequence, got {}", value.type_name())))?;

    let mut seen = HashSet::new();
    let mut plugins = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
      let plugin = self.plugin(index, item)?;
      if !seen.insert(plugin.id.clone()) {
        return Err(self.malformed(format!("plugin '{}' is declared more than once", plugin.id)));
      }
      plugins.push(plugin);
    }
    Ok(plugins)
  }

  fn plugin(&self, index: usize, value: &Value) -> Result<PluginConfig, ResolveError> {
    let map = value
      .as_map()
      .ok_or_else(|| self.malformed(format!("plugins[{index}] must be a mapping, got {}", value.type_name())))?;

    let id = map
      .get("id")
      .and_then(Value::as_str)
      .map(str::trim)
      .filter(|s| !s.is_empty())
      .ok_or_else(|| self.malformed(format!("plugins[{index}] requires a non-empty 'id'")))?;

    let mut options = match map.get("options") {
      None => ValueMap::new(),
      Some(Value::Map(options)) => options.clone(),
      Some(other) => {
        return Err(self.malformed(format!(
          "plugin '{id}' options must be a mapping, got {}",
          other.type_name()
        )));
      }
    };

    // A `skip` entry among the options is the same override as a top-level flag.
    let skip = match (map.get("skip"), options.remove("skip")) {
      (Some(flag), _) => Some(self.skip_flag(id, flag)?),
      (None, Some(flag)) => Some(self.skip_flag(id, &flag)?),
      (None, None) => None,
    };

    for key in map.keys() {
      if !matches!(key.as_str(), "id" | "options" | "skip") {
        warn!(plugin = %id, key = %key, "ignoring unknown plugin key");
      }
    }

    Ok(PluginConfig {
      id: id.to_string(),
      options,
      skip,
    })
  }

  fn skip_flag(&self, id: &str, value: &Value) -> Result<bool, ResolveError> {
    match value {
      Value::Bool(b) => Ok(*b),
      Value::String(s) if s == "true" => Ok(true),
      Value::String(s) if s == "false" => Ok(false),
      other => Err(self.malformed(format!("plugin '{id}' skip must be a boolean, got {other}"))),
    }
  }
}
