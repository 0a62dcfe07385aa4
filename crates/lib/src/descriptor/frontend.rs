//! Front-ends turning descriptor syntax into the generic [`Value`] model.
//!
//! The resolver never looks at syntax. A [`Frontend`] parses one file into a
//! [`Value`]; [`Frontends`] picks the right one for a path and finds the
//! descriptor file inside a module directory.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::trace;

use super::lua::LuaFrontend;
use crate::value::{Value, ValueMap};

/// Errors produced while parsing descriptor syntax.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrontendError {
  #[error("invalid JSON: {0}")]
  Json(String),

  #[error("invalid YAML: {0}")]
  Yaml(String),

  #[error("lua error: {0}")]
  Lua(String),

  /// Syntax parsed but produced something the model cannot represent.
  #[error("unsupported value at '{path}': {reason}")]
  Unsupported { path: String, reason: String },
}

/// A descriptor syntax.
pub trait Frontend: Send + Sync {
  /// Short name used in logs.
  fn name(&self) -> &'static str;

  /// File extensions (without dot) handled by this front-end.
  fn extensions(&self) -> &'static [&'static str];

  /// Parse the contents of `path` into a value tree.
  fn parse(&self, path: &Path, source: &str) -> Result<Value, FrontendError>;
}

/// JSON descriptors (`project.json`).
#[derive(Debug, Default)]
pub struct JsonFrontend;

impl Frontend for JsonFrontend {
  fn name(&self) -> &'static str {
    "json"
  }

  fn extensions(&self) -> &'static [&'static str] {
    &["json"]
  }

  fn parse(&self, _path: &Path, source: &str) -> Result<Value, FrontendError> {
    let json: serde_json::Value = serde_json::from_str(source).map_err(|e| FrontendError::Json(e.to_string()))?;
    from_json(json, "")
  }
}

/// YAML descriptors (`project.yaml`, `project.yml`).
#[derive(Debug, Default)]
pub struct YamlFrontend;

impl Frontend for YamlFrontend {
  fn name(&self) -> &'static str {
    "yaml"
  }

  fn extensions(&self) -> &'static [&'static str] {
    &["yaml", "yml"]
  }

  fn parse(&self, _path: &Path, source: &str) -> Result<Value, FrontendError> {
    let json: serde_json::Value = serde_yaml::from_str(source).map_err(|e| FrontendError::Yaml(e.to_string()))?;
    from_json(json, "")
  }
}

/// Convert a JSON value to the generic model, rejecting nulls.
pub(crate) fn from_json(value: serde_json::Value, path: &str) -> Result<Value, FrontendError> {
  match value {
    serde_json::Value::Null => Err(FrontendError::Unsupported {
      path: display_path(path),
      reason: "null values are not allowed".to_string(),
    }),
    serde_json::Value::Bool(b) => Ok(Value::Bool(b)),
    serde_json::Value::Number(n) => match (n.as_i64(), n.as_f64()) {
      (Some(i), _) => Ok(Value::Integer(i)),
      (None, Some(f)) if n.is_f64() => Ok(Value::Float(f)),
      _ => Err(FrontendError::Unsupported {
        path: display_path(path),
        reason: format!("number {n} is out of range"),
      }),
    },
    serde_json::Value::String(s) => Ok(Value::String(s)),
    serde_json::Value::Array(items) => items
      .into_iter()
      .enumerate()
      .map(|(i, v)| from_json(v, &format!("{path}[{i}]")))
      .collect::<Result<Vec<_>, _>>()
      .map(Value::Seq),
    serde_json::Value::Object(map) => {
      let mut out = ValueMap::new();
      for (k, v) in map {
        let child_path = if path.is_empty() { k.clone() } else { format!("{path}.{k}") };
        out.insert(k, from_json(v, &child_path)?);
      }
      Ok(Value::Map(out))
    }
  }
}

pub(crate) fn display_path(path: &str) -> String {
  if path.is_empty() {
    "<root>".to_string()
  } else {
    path.to_string()
  }
}

/// Base name probed inside module directories.
pub const DESCRIPTOR_STEM: &str = "project";

/// The set of front-ends available to the loader.
pub struct Frontends {
  frontends: Vec<Box<dyn Frontend>>,
}

impl Default for Frontends {
  /// Lua, YAML and JSON, probed in that order.
  fn default() -> Self {
    Self {
      frontends: vec![
        Box::new(LuaFrontend),
        Box::new(YamlFrontend),
        Box::new(JsonFrontend),
      ],
    }
  }
}

impl std::fmt::Debug for Frontends {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_list().entries(self.frontends.iter().map(|fe| fe.name())).finish()
  }
}

impl Frontends {
  pub fn empty() -> Self {
    Self { frontends: Vec::new() }
  }

  pub fn with(mut self, frontend: impl Frontend + 'static) -> Self {
    self.frontends.push(Box::new(frontend));
    self
  }

  /// Front-end responsible for a file, chosen by extension.
  pub fn for_file(&self, path: &Path) -> Option<&dyn Frontend> {
    let ext = path.extension()?.to_str()?;
    self
      .frontends
      .iter()
      .find(|fe| fe.extensions().contains(&ext))
      .map(|fe| fe.as_ref())
  }

  /// Resolve `path` to a descriptor file.
  ///
  /// A file path is used as is. For a directory, `project.<ext>` is probed for
  /// each front-end's extensions in registration order.
  pub fn locate(&self, path: &Path) -> Option<PathBuf> {
    if path.is_file() {
      return Some(path.to_path_buf());
    }
    if !path.is_dir() {
      return None;
    }

    for frontend in &self.frontends {
      for ext in frontend.extensions() {
        let candidate = path.join(format!("{DESCRIPTOR_STEM}.{ext}"));
        trace!(candidate = %candidate.display(), "probing descriptor");
        if candidate.is_file() {
          return Some(candidate);
        }
      }
    }

    None
  }
}
