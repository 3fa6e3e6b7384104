//! Block model, chain verification and scoring for the custody ledger.
//!
//! This crate provides:
//! - Custody event types with a typed, lenient payload view
//! - Block hashing via domain-separated canonical digests
//! - Offline verification of the global hash chain
//! - Information-gain scoring and certificate tiers
//!
//! Core invariants:
//! - Blocks are immutable, append-only records
//! - Block hashes are content-derived: `H(domain_separator || canonical_bytes(fields))`
//! - Each block's `previousHash` is its predecessor's hash; the first block uses `"0"`
//! - Scoring is a pure function of the event history
//!
#![deny(missing_docs)]

/// Blocks and their construction.
pub mod block;
/// Block hash computation with domain-separated hashing.
pub mod block_hash;
/// Certificate tiers and classification.
pub mod certificate;
/// Timestamp sources.
pub mod clock;
/// Error types for core operations.
pub mod errors;
/// Event types and payloads.
pub mod events;
/// Information-gain scoring.
pub mod scoring;
/// Shared payload fields (coordinates, lenient number parsing).
pub mod shared;
/// Chain verification.
pub mod verification;

pub use block::{Block, UnsealedBlock};
pub use block_hash::{compute_block_hash, HashInput, BLOCK_DOMAIN_SEPARATOR};
pub use certificate::{classify, Certificate, CertificateTier};
pub use clock::{Clock, SteppingClock, SystemClock};
pub use errors::CoreError;
pub use events::{
    BatchEvent, EventPayload, EventType, Finalization, Handoff, Inspection, IotReading, RatingData,
};
pub use scoring::{
    compute_information_gain, compute_information_gain_with, InformationGain, ScoringMode,
};
pub use shared::GeoPoint;
pub use verification::{verify_chain, ChainIntegrityError, IntegrityFault};
