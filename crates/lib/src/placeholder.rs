//! Placeholder parsing and substitution for property references.
//!
//! Descriptor strings may reference properties that are only known once the
//! inheritance chain is resolved. This module parses such strings into
//! segments and substitutes values from a [`Resolver`].
//!
//! # Placeholder Format
//!
//! - `${name}` - value of the property `name`
//!
//! A lone `$` passes through unchanged, so `$HOME` or `cost: $5` need no
//! escaping.
//!
//! # Escaping
//!
//! Use `$${` to produce a literal `${`.
//!
//! # Example
//!
//! ```
//! use trellis_lib::placeholder::{parse, Segment};
//!
//! let segments = parse("${jruby.version}/lib:$HOME").unwrap();
//! assert_eq!(segments, vec![
//!     Segment::Property("jruby.version".to_string()),
//!     Segment::Literal("/lib:$HOME".to_string()),
//! ]);
//! ```

use thiserror::Error;

/// A segment of parsed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
  /// Literal text (no placeholders)
  Literal(String),

  /// A property reference to be resolved
  Property(String),
}

/// Errors that can occur during placeholder parsing or resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaceholderError {
  #[error("unclosed placeholder at position {0}")]
  Unclosed(usize),

  #[error("empty placeholder at position {0}")]
  Empty(usize),

  #[error("property '{0}' is not defined")]
  Unresolved(String),
}

/// Lookup of property values during substitution.
pub trait Resolver {
  /// Resolve a property by name, or `None` when no scope defines it.
  fn resolve_property(&self, name: &str) -> Option<&str>;
}

/// Parse a string containing placeholders into segments.
///
/// # Errors
///
/// Returns an error if a placeholder is unclosed or empty.
pub fn parse(input: &str) -> Result<Vec<Segment>, PlaceholderError> {
  let mut segments = Vec::new();
  let mut literal = String::new();
  let mut chars = input.char_indices().peekable();

  while let Some((pos, ch)) = chars.next() {
    if ch != '$' {
      literal.push(ch);
      continue;
    }

    match chars.peek() {
      Some((_, '$')) => {
        chars.next(); // consume the second $

        match chars.peek() {
          Some((_, '{')) => {
            // Escaped: $${ -> ${ (literal)
            chars.next();
            literal.push_str("${");
          }
          _ => literal.push_str("$$"),
        }
      }
      Some((_, '{')) => {
        chars.next(); // consume the {

        if !literal.is_empty() {
          segments.push(Segment::Literal(std::mem::take(&mut literal)));
        }

        let mut name = String::new();
        let mut found_close = false;

        for (_, c) in chars.by_ref() {
          if c == '}' {
            found_close = true;
            break;
          }
          name.push(c);
        }

        if !found_close {
          return Err(PlaceholderError::Unclosed(pos));
        }

        let name = name.trim();
        if name.is_empty() {
          return Err(PlaceholderError::Empty(pos));
        }
        segments.push(Segment::Property(name.to_string()));
      }
      // A lone $, treat as literal
      _ => literal.push('$'),
    }
  }

  if !literal.is_empty() {
    segments.push(Segment::Literal(literal));
  }

  Ok(segments)
}

/// Substitute all placeholders in a string using the provided resolver.
///
/// # Errors
///
/// Returns an error if parsing fails or if any property cannot be resolved.
pub fn substitute(input: &str, resolver: &impl Resolver) -> Result<String, PlaceholderError> {
  let segments = parse(input)?;
  substitute_segments(&segments, resolver)
}

/// Substitute placeholders, leaving unresolvable references as literal `${name}`.
///
/// # Errors
///
/// Returns an error only if parsing fails.
pub fn substitute_lenient(input: &str, resolver: &impl Resolver) -> Result<String, PlaceholderError> {
  let segments = parse(input)?;
  let mut result = String::new();

  for segment in &segments {
    match segment {
      Segment::Literal(s) => result.push_str(s),
      Segment::Property(name) => match resolver.resolve_property(name) {
        Some(value) => result.push_str(value),
        None => {
          result.push_str("${");
          result.push_str(name);
          result.push('}');
        }
      },
    }
  }

  Ok(result)
}

/// Substitute placeholders in pre-parsed segments.
///
/// Resolved values are inserted verbatim and never parsed again.
pub fn substitute_segments(segments: &[Segment], resolver: &impl Resolver) -> Result<String, PlaceholderError> {
  let mut result = String::new();

  for segment in segments {
    match segment {
      Segment::Literal(s) => result.push_str(s),
      Segment::Property(name) => {
        let value = resolver
          .resolve_property(name)
          .ok_or_else(|| PlaceholderError::Unresolved(name.clone()))?;
        result.push_str(value);
      }
    }
  }

  Ok(result)
}
