//! Domain-separated hashing over canonical bytes.
//!
//! Digests are computed as `sha256(domain_separator || canonical_bytes(value))`.
//! JSON types are preserved: `1` and `"1"` produce different digests. Number
//! formatting follows RFC 8785 via the canonicalizer.

use crate::{CanonicalizationError, Canonicalizer, Digest};
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest as Sha2Digest, Sha256};

/// Error during digest computation.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The value could not be turned into JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
    /// Canonicalization failed.
    #[error("canonicalization failed: {0}")]
    Canonicalization(#[from] CanonicalizationError),
}

/// Returns the exact bytes that [`compute_digest`] feeds to SHA-256 after
/// the domain separator.
pub fn canonical_bytes<T: Serialize>(
    value: &T,
    canonicalizer: &Canonicalizer,
) -> Result<Vec<u8>, HashError> {
    let value: Value =
        serde_json::to_value(value).map_err(|e| HashError::Serialization(e.to_string()))?;
    Ok(canonicalizer.canonicalize(&value)?.bytes)
}

/// Computes `sha256(domain || canonical_bytes(value))` as a hex [`Digest`].
///
/// # Example
///
/// ```rust
/// use custody_canonical::{compute_digest, Canonicalizer};
/// use serde_json::json;
///
/// let canonicalizer = Canonicalizer::default_profile();
/// let a = compute_digest(b"demo\0", &json!({"b": 1, "a": 2}), &canonicalizer)?;
/// let b = compute_digest(b"demo\0", &json!({"a": 2, "b": 1}), &canonicalizer)?;
/// assert_eq!(a, b);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn compute_digest<T: Serialize>(
    domain: &[u8],
    value: &T,
    canonicalizer: &Canonicalizer,
) -> Result<Digest, HashError> {
    let bytes = canonical_bytes(value, canonicalizer)?;

    let mut hasher = Sha256::new();
    hasher.update(domain);
    hasher.update(&bytes);
    Ok(Digest::new(hex::encode(hasher.finalize())))
}
