//! Fingerprints of effective configurations.
//!
//! A [`Fingerprint`] is a truncated SHA-256 of a value's JSON serialization.
//! Downstream build steps compare fingerprints to decide whether a module's
//! effective configuration changed between runs.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Length of a [`Fingerprint`] in hex characters.
pub const FINGERPRINT_LEN: usize = 20;

pub type HashError = serde_json::Error;

/// A 20-character truncated SHA-256 of the JSON-serialized value.
///
/// # Format
///
/// Lowercase hexadecimal, e.g. `"a1b2c3d4e5f6789012ab"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Fingerprint(pub String);

impl std::fmt::Display for Fingerprint {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

pub trait Hashable: Serialize {
  fn fingerprint(&self) -> Result<Fingerprint, HashError> {
    let serialized = serde_json::to_string(self)?;
    let mut hasher = Sha256::new();
    hasher.update(serialized.as_bytes());
    let full = format!("{:x}", hasher.finalize());
    Ok(Fingerprint(full[..FINGERPRINT_LEN].to_string()))
  }
}
