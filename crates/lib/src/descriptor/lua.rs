//! Lua descriptors (`project.lua`).
//!
//! A Lua descriptor is a script returning a table:
//!
//! ```lua
//! local version = io.open(basedir .. "/../VERSION"):read("*l")
//!
//! return {
//!   modelVersion = "4.0.0",
//!   artifactId = "jruby-ext",
//!   parent = "org.jruby:jruby-parent:" .. version,
//!   packaging = "pom",
//!   properties = { ["tesla.dump.pom"] = "pom.xml" },
//!   modules = { "openssl", "readline", "ripper" },
//!   plugins = { { id = "deploy", skip = true } },
//! }
//! ```
//!
//! The global `basedir` holds the directory containing the script.

use std::path::Path;

use mlua::prelude::*;

use super::frontend::{Frontend, FrontendError, display_path};
use crate::value::{Value, ValueMap};

#[derive(Debug, Default)]
pub struct LuaFrontend;

impl Frontend for LuaFrontend {
  fn name(&self) -> &'static str {
    "lua"
  }

  fn extensions(&self) -> &'static [&'static str] {
    &["lua"]
  }

  fn parse(&self, path: &Path, source: &str) -> Result<Value, FrontendError> {
    let lua = Lua::new();
    let basedir = path.parent().unwrap_or(Path::new("")).to_string_lossy().to_string();

    let result = lua
      .globals()
      .set("basedir", basedir)
      .and_then(|_| {
        lua
          .load(source)
          .set_name(format!("@{}", path.display()))
          .eval::<LuaValue>()
      })
      .map_err(|e| FrontendError::Lua(e.to_string()))?;

    if !matches!(result, LuaValue::Table(_)) {
      return Err(FrontendError::Lua(format!(
        "descriptor must return a table, got {}",
        result.type_name()
      )));
    }

    lua_to_value(result, "")
  }
}

/// Convert a Lua value to the generic model.
///
/// Tables whose keys are exactly `1..n` become sequences; every other table
/// must have string keys and becomes a mapping.
fn lua_to_value(value: LuaValue, path: &str) -> Result<Value, FrontendError> {
  let unsupported = |reason: String| FrontendError::Unsupported {
    path: display_path(path),
    reason,
  };

  match value {
    LuaValue::Boolean(b) => Ok(Value::Bool(b)),
    LuaValue::Integer(i) => Ok(Value::Integer(i)),
    LuaValue::Number(n) => Ok(Value::Float(n)),
    LuaValue::String(s) => Ok(Value::String(
      s.to_str().map_err(|e| unsupported(e.to_string()))?.to_string(),
    )),
    LuaValue::Table(t) => {
      let len = t.raw_len();
      let pairs = t
        .pairs::<LuaValue, LuaValue>()
        .collect::<LuaResult<Vec<_>>>()
        .map_err(|e| unsupported(e.to_string()))?;

      if len > 0 && pairs.len() == len {
        let mut items = Vec::with_capacity(len);
        for i in 1..=len {
          let item: LuaValue = t.raw_get(i).map_err(|e| unsupported(e.to_string()))?;
          items.push(lua_to_value(item, &format!("{path}[{i}]"))?);
        }
        return Ok(Value::Seq(items));
      }

      let mut map = ValueMap::new();
      for (key, item) in pairs {
        let LuaValue::String(key) = key else {
          return Err(unsupported(format!("table keys must be strings, got {}", key.type_name())));
        };
        let key = key.to_str().map_err(|e| unsupported(e.to_string()))?.to_string();
        let child_path = if path.is_empty() { key.clone() } else { format!("{path}.{key}") };
        map.insert(key, lua_to_value(item, &child_path)?);
      }
      Ok(Value::Map(map))
    }
    LuaValue::Nil => Err(unsupported("nil values are not allowed".to_string())),
    other => Err(unsupported(format!("unsupported type {}", other.type_name()))),
  }
}
