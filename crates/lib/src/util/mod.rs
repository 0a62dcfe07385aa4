//! Shared utilities.
//!
//! Fingerprinting of effective configurations and test helpers.

pub mod hash;

#[cfg(test)]
pub mod testutil;
