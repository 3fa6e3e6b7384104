//! Canonical serialization and digest primitives for the custody ledger.
//!
//! Everything that participates in a block hash lives in this crate: the
//! RFC 8785 canonicalizer, the hex SHA-256 [`Digest`], and the validated
//! identifiers stored alongside each block.
//!
#![deny(missing_docs)]

/// Canonicalization helpers for deterministic hashing.
pub mod canonicalizer;
/// Hex digest type and genesis sentinel.
pub mod digest;
/// Domain-separated hashing over canonical bytes.
pub mod hash;
/// Hygiene report types emitted during canonicalization.
pub mod hygiene;
/// Validated identifier newtypes.
pub mod identifiers;
/// Validation helpers used by canonical types.
pub mod validation;

pub use canonicalizer::{
    CanonicalizationError, CanonicalizationResult, Canonicalizer, DEFAULT_PROFILE,
};
pub use digest::Digest;
pub use hash::{canonical_bytes, compute_digest, HashError};
pub use hygiene::{HygieneReport, HygieneStatus, HygieneWarning};
pub use identifiers::{BatchId, ProfileId, Timestamp};
pub use validation::ValidationError;
