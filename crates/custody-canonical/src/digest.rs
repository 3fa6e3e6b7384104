use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::validation::ValidationError;

/// Lowercase hex SHA-256 digest as it appears on the wire.
///
/// Deserialization is unchecked on purpose: a tampered journal must still
/// load so that chain verification can report where it breaks. Use
/// [`Digest::parse`] for values arriving from users.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Digest(String);

impl Digest {
    /// Sentinel stored as `previousHash` by the first block of a ledger.
    pub const GENESIS: &'static str = "0";

    /// Wraps a string without validation.
    pub fn new(value: String) -> Self {
        Self(value)
    }

    /// The genesis sentinel.
    pub fn genesis() -> Self {
        Self(Self::GENESIS.to_string())
    }

    /// Encodes raw SHA-256 output.
    pub fn from_bytes(bytes: &[u8; 32]) -> Self {
        Self(hex::encode(bytes))
    }

    /// Parses a 64-character lowercase hex digest.
    pub fn parse(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        let re = Regex::new(r"^[0-9a-f]{64}$").expect("invalid regex");
        if !re.is_match(&s) {
            return Err(ValidationError::PatternMismatch {
                field: "digest",
                value: s,
            });
        }
        Ok(Self(s))
    }

    /// True for the `"0"` sentinel.
    pub fn is_genesis(&self) -> bool {
        self.0 == Self::GENESIS
    }

    /// Borrowed hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First `n` characters, for table output.
    pub fn short(&self, n: usize) -> &str {
        let end = self
            .0
            .char_indices()
            .nth(n)
            .map(|(i, _)| i)
            .unwrap_or(self.0.len());
        &self.0[..end]
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Digest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
