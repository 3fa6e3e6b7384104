//! Offline chain verification.
//!
//! Verification is read-only and deterministic: it recomputes every hash
//! from the stored fields and reports the first block where the chain
//! breaks. Nothing is repaired.

use custody_canonical::Canonicalizer;
use std::fmt;

use crate::block::Block;

/// What kind of inconsistency was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityFault {
    /// `indexNumber` does not equal the block's chain position.
    IndexGap {
        /// Position the block occupies.
        expected: u64,
        /// Stored `indexNumber`.
        found: u64,
    },
    /// The first block does not carry the `"0"` sentinel.
    GenesisLink,
    /// The stored hash differs from the recomputed one.
    HashMismatch,
    /// The successor's `previousHash` differs from this block's hash.
    BrokenLink,
    /// The stored fields could not be canonicalized.
    Unhashable(String),
}

impl fmt::Display for IntegrityFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityFault::IndexGap { expected, found } => {
                write!(f, "index number {found}, expected {expected}")
            }
            IntegrityFault::GenesisLink => f.write_str("first block does not link to genesis"),
            IntegrityFault::HashMismatch => f.write_str("stored hash differs from recomputed hash"),
            IntegrityFault::BrokenLink => {
                f.write_str("successor's previous hash does not match this block")
            }
            IntegrityFault::Unhashable(reason) => write!(f, "block cannot be hashed: {reason}"),
        }
    }
}

/// First position where the chain fails verification.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("chain integrity violated at sequence {sequence_id}: {fault}")]
pub struct ChainIntegrityError {
    /// Sequence id of the offending block.
    pub sequence_id: u64,
    /// What was wrong with it.
    pub fault: IntegrityFault,
}

/// Verifies a whole ledger given in global (sequence) order.
///
/// For each block, in order: the index matches its position, the first
/// block links to the genesis sentinel, the recomputed hash equals the
/// stored hash, and the recomputed hash equals the successor's
/// `previousHash`. An empty ledger is valid.
pub fn verify_chain(blocks: &[Block], canonicalizer: &Canonicalizer) -> Result<(), ChainIntegrityError> {
    for (position, block) in blocks.iter().enumerate() {
        let fail = |fault| ChainIntegrityError {
            sequence_id: block.sequence_id,
            fault,
        };

        if block.index_number != position as u64 {
            return Err(fail(IntegrityFault::IndexGap {
                expected: position as u64,
                found: block.index_number,
            }));
        }

        if position == 0 && !block.previous_hash.is_genesis() {
            return Err(fail(IntegrityFault::GenesisLink));
        }

        let recomputed = block
            .recompute_hash(canonicalizer)
            .map_err(|e| fail(IntegrityFault::Unhashable(e.to_string())))?;
        if recomputed != block.hash {
            return Err(fail(IntegrityFault::HashMismatch));
        }

        if let Some(next) = blocks.get(position + 1) {
            if next.previous_hash != recomputed {
                return Err(fail(IntegrityFault::BrokenLink));
            }
        }
    }
    Ok(())
}
