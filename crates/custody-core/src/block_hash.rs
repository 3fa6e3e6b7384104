//! Block hash computation with domain-separated hashing.
//!
//! Block hashes are computed as `sha256(domain_separator || canonical_bytes(fields))`
//! where `fields` is the JSON array
//! `[indexNumber, timestamp, batchId, eventType, eventData, previousHash]`.
//! The array fixes the field order; the canonicalizer fixes key order inside
//! `eventData`.

use custody_canonical::{compute_digest, BatchId, Canonicalizer, Digest, Timestamp};
use serde::Serialize;
use serde_json::Value;

use crate::errors::CoreError;
use crate::events::EventType;

/// Domain separator for block hashes: `b"custody:block:v1\0"`.
pub const BLOCK_DOMAIN_SEPARATOR: &[u8] = b"custody:block:v1\0";

/// The hashed fields of a block, in hashing order.
///
/// Serializes as a JSON array, so field order is part of the format.
#[derive(Debug, Serialize)]
pub struct HashInput<'a>(
    pub u64,
    pub &'a Timestamp,
    pub &'a BatchId,
    pub &'a EventType,
    pub &'a Value,
    pub &'a Digest,
);

/// Computes the hash of a block from its content fields.
///
/// # Errors
///
/// Returns [`CoreError::Hash`] when `eventData` cannot be canonicalized.
pub fn compute_block_hash(
    input: &HashInput<'_>,
    canonicalizer: &Canonicalizer,
) -> Result<Digest, CoreError> {
    Ok(compute_digest(BLOCK_DOMAIN_SEPARATOR, input, canonicalizer)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input_parts() -> (Timestamp, BatchId, EventType, Value, Digest) {
        (
            Timestamp::new("2024-06-10T12:00:00.000Z".into()),
            BatchId::new("B1".into()),
            EventType::IotUpdate,
            json!({"temperature": 20, "humidity": 50}),
            Digest::genesis(),
        )
    }

    #[test]
    fn hash_is_deterministic() {
        let c = Canonicalizer::default_profile();
        let (ts, batch, ty, data, prev) = input_parts();
        let a = compute_block_hash(&HashInput(0, &ts, &batch, &ty, &data, &prev), &c).unwrap();
        let b = compute_block_hash(&HashInput(0, &ts, &batch, &ty, &data, &prev), &c).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn every_field_is_covered() {
        let c = Canonicalizer::default_profile();
        let (ts, batch, ty, data, prev) = input_parts();
        let base = compute_block_hash(&HashInput(0, &ts, &batch, &ty, &data, &prev), &c).unwrap();

        let other_ts = Timestamp::new("2024-06-10T12:00:00.001Z".into());
        let other_batch = BatchId::new("B2".into());
        let other_ty = EventType::Rating;
        let other_data = json!({"temperature": 21, "humidity": 50});
        let other_prev = Digest::from_bytes(&[1; 32]);

        let variants = [
            HashInput(1, &ts, &batch, &ty, &data, &prev),
            HashInput(0, &other_ts, &batch, &ty, &data, &prev),
            HashInput(0, &ts, &other_batch, &ty, &data, &prev),
            HashInput(0, &ts, &batch, &other_ty, &data, &prev),
            HashInput(0, &ts, &batch, &ty, &other_data, &prev),
            HashInput(0, &ts, &batch, &ty, &data, &other_prev),
        ];
        for input in &variants {
            assert_ne!(compute_block_hash(input, &c).unwrap(), base, "{input:?}");
        }
    }
}
