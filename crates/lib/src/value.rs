//! Generic structural values produced by descriptor front-ends.
//!
//! Front-ends (JSON, YAML, Lua) parse descriptor syntax into a [`Value`] tree.
//! The loader only ever sees this model, never the original syntax. Plugin
//! options keep their [`Value`] shape through resolution since their schema
//! belongs to the plugin, not to this crate.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Ordered mapping of string keys to values.
pub type ValueMap = BTreeMap<String, Value>;

/// A dynamically typed descriptor value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
  Bool(bool),
  Integer(i64),
  Float(f64),
  String(String),
  Seq(Vec<Value>),
  Map(ValueMap),
}

impl Value {
  pub fn as_str(&self) -> Option<&str> {
    match self {
      Value::String(s) => Some(s),
      _ => None,
    }
  }

  pub fn as_map(&self) -> Option<&ValueMap> {
    match self {
      Value::Map(map) => Some(map),
      _ => None,
    }
  }

  pub fn as_seq(&self) -> Option<&[Value]> {
    match self {
      Value::Seq(items) => Some(items),
      _ => None,
    }
  }

  /// Human-readable type name used in validation messages.
  pub fn type_name(&self) -> &'static str {
    match self {
      Value::Bool(_) => "boolean",
      Value::Integer(_) | Value::Float(_) => "number",
      Value::String(_) => "string",
      Value::Seq(_) => "sequence",
      Value::Map(_) => "mapping",
    }
  }

  /// Render a scalar as the string a property would hold.
  pub fn scalar_to_string(&self) -> Option<String> {
    match self {
      Value::String(s) => Some(s.clone()),
      Value::Bool(b) => Some(b.to_string()),
      Value::Integer(n) => Some(n.to_string()),
      Value::Float(n) => Some(n.to_string()),
      Value::Seq(_) | Value::Map(_) => None,
    }
  }

  /// Apply `f` to every string contained in this value, depth-first.
  pub fn try_map_strings<E>(&self, f: &mut impl FnMut(&str) -> Result<String, E>) -> Result<Value, E> {
    Ok(match self {
      Value::String(s) => Value::String(f(s)?),
      Value::Seq(items) => Value::Seq(items.iter().map(|v| v.try_map_strings(f)).collect::<Result<_, _>>()?),
      Value::Map(map) => Value::Map(
        map
          .iter()
          .map(|(k, v)| Ok((k.clone(), v.try_map_strings(f)?)))
          .collect::<Result<_, E>>()?,
      ),
      other => other.clone(),
    })
  }
}

impl fmt::Display for Value {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Value::Seq(_) | Value::Map(_) => {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
      }
      scalar => f.write_str(&scalar.scalar_to_string().unwrap_or_default()),
    }
  }
}

impl From<&str> for Value {
  fn from(s: &str) -> Self {
    Value::String(s.to_string())
  }
}

impl From<String> for Value {
  fn from(s: String) -> Self {
    Value::String(s)
  }
}

impl From<bool> for Value {
  fn from(b: bool) -> Self {
    Value::Bool(b)
  }
}

impl From<f64> for Value {
  fn from(n: f64) -> Self {
    Value::Float(n)
  }
}

impl From<i64> for Value {
  fn from(n: i64) -> Self {
    Value::Integer(n)
  }
}

impl From<ValueMap> for Value {
  fn from(map: ValueMap) -> Self {
    Value::Map(map)
  }
}

impl From<Vec<Value>> for Value {
  fn from(items: Vec<Value>) -> Self {
    Value::Seq(items)
  }
}
