use custody_canonical::{BatchId, Canonicalizer, Digest, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::block_hash::{compute_block_hash, HashInput};
use crate::errors::CoreError;
use crate::events::{BatchEvent, EventPayload, EventType};

/// One immutable ledger entry: a custody event plus its chain linkage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// Storage-assigned position in the journal, starting at 1.
    pub sequence_id: u64,
    /// Chain position, starting at 0.
    pub index_number: u64,
    /// Time of append.
    pub timestamp: Timestamp,
    /// Batch this event belongs to.
    pub batch_id: BatchId,
    /// Event type.
    pub event_type: EventType,
    /// Event data, opaque to the ledger.
    pub event_data: Value,
    /// Hash of the previous block, or `"0"` for the first block.
    pub previous_hash: Digest,
    /// Hash over this block's content fields.
    pub hash: Digest,
}

/// Content of a block that has not been hashed yet.
#[derive(Debug, Clone, PartialEq)]
pub struct UnsealedBlock {
    /// Chain position.
    pub index_number: u64,
    /// Time of append.
    pub timestamp: Timestamp,
    /// Batch tag.
    pub batch_id: BatchId,
    /// Event type.
    pub event_type: EventType,
    /// Event data.
    pub event_data: Value,
    /// Predecessor hash or genesis sentinel.
    pub previous_hash: Digest,
}

impl UnsealedBlock {
    /// Content for the block that follows `tip`, or the first block when
    /// `tip` is `None`.
    pub fn after(
        tip: Option<&Block>,
        timestamp: Timestamp,
        batch_id: BatchId,
        event_type: EventType,
        event_data: Value,
    ) -> Self {
        let (index_number, previous_hash) = match tip {
            Some(prev) => (prev.index_number + 1, prev.hash.clone()),
            None => (0, Digest::genesis()),
        };
        Self {
            index_number,
            timestamp,
            batch_id,
            event_type,
            event_data,
            previous_hash,
        }
    }

    fn hash_input(&self) -> HashInput<'_> {
        HashInput(
            self.index_number,
            &self.timestamp,
            &self.batch_id,
            &self.event_type,
            &self.event_data,
            &self.previous_hash,
        )
    }

    /// Computes the hash and produces the final block.
    ///
    /// # Errors
    ///
    /// Fails before producing anything if `event_data` cannot be canonicalized.
    pub fn seal(self, sequence_id: u64, canonicalizer: &Canonicalizer) -> Result<Block, CoreError> {
        let hash = compute_block_hash(&self.hash_input(), canonicalizer)?;
        Ok(Block {
            sequence_id,
            index_number: self.index_number,
            timestamp: self.timestamp,
            batch_id: self.batch_id,
            event_type: self.event_type,
            event_data: self.event_data,
            previous_hash: self.previous_hash,
            hash,
        })
    }
}

impl Block {
    /// Recomputes the hash from the block's own fields.
    pub fn recompute_hash(&self, canonicalizer: &Canonicalizer) -> Result<Digest, CoreError> {
        compute_block_hash(
            &HashInput(
                self.index_number,
                &self.timestamp,
                &self.batch_id,
                &self.event_type,
                &self.event_data,
                &self.previous_hash,
            ),
            canonicalizer,
        )
    }

    /// True when the stored hash matches the recomputed one.
    pub fn has_valid_hash(&self, canonicalizer: &Canonicalizer) -> bool {
        matches!(self.recompute_hash(canonicalizer), Ok(h) if h == self.hash)
    }

    /// True for the first block of a ledger.
    pub fn is_genesis(&self) -> bool {
        self.index_number == 0
    }

    /// Read-side projection used by scoring.
    pub fn to_event(&self) -> BatchEvent {
        BatchEvent::new(
            self.event_type.clone(),
            self.event_data.clone(),
            self.timestamp.clone(),
        )
    }

    /// Typed view of the event data.
    pub fn payload(&self) -> EventPayload {
        EventPayload::parse(&self.event_type, &self.event_data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ts(s: &str) -> Timestamp {
        Timestamp::new(s.to_string())
    }

    #[test]
    fn first_block_links_to_sentinel() {
        let c = Canonicalizer::default_profile();
        let block = UnsealedBlock::after(
            None,
            ts("2024-06-10T12:00:00.000Z"),
            BatchId::new("B1".into()),
            EventType::BatchCreated,
            json!({}),
        )
        .seal(1, &c)
        .unwrap();
        assert_eq!(block.index_number, 0);
        assert!(block.previous_hash.is_genesis());
        assert!(block.is_genesis());
        assert!(block.has_valid_hash(&c));
    }

    #[test]
    fn successor_links_to_tip() {
        let c = Canonicalizer::default_profile();
        let first = UnsealedBlock::after(
            None,
            ts("2024-06-10T12:00:00.000Z"),
            BatchId::new("B1".into()),
            EventType::BatchCreated,
            json!({}),
        )
        .seal(1, &c)
        .unwrap();
        let second = UnsealedBlock::after(
            Some(&first),
            ts("2024-06-10T12:00:01.000Z"),
            BatchId::new("B2".into()),
            EventType::BatchCreated,
            json!({}),
        )
        .seal(2, &c)
        .unwrap();
        assert_eq!(second.index_number, 1);
        assert_eq!(second.previous_hash, first.hash);
    }

    #[test]
    fn sequence_id_is_not_hashed() {
        let c = Canonicalizer::default_profile();
        let mut block = UnsealedBlock::after(
            None,
            ts("2024-06-10T12:00:00.000Z"),
            BatchId::new("B1".into()),
            EventType::BatchCreated,
            json!({}),
        )
        .seal(1, &c)
        .unwrap();
        block.sequence_id = 99;
        assert!(block.has_valid_hash(&c));
    }

    #[test]
    fn tampered_data_invalidates_hash() {
        let c = Canonicalizer::default_profile();
        let mut block = UnsealedBlock::after(
            None,
            ts("2024-06-10T12:00:00.000Z"),
            BatchId::new("B1".into()),
            EventType::Rating,
            json!({"rating": 2}),
        )
        .seal(1, &c)
        .unwrap();
        block.event_data = json!({"rating": 5});
        assert!(!block.has_valid_hash(&c));
    }

    #[test]
    fn wire_shape_is_camel_case() {
        let c = Canonicalizer::default_profile();
        let block = UnsealedBlock::after(
            None,
            ts("2024-06-10T12:00:00.000Z"),
            BatchId::new("B1".into()),
            EventType::BatchCreated,
            json!({}),
        )
        .seal(1, &c)
        .unwrap();
        let value = serde_json::to_value(&block).unwrap();
        for key in [
            "sequenceId",
            "indexNumber",
            "timestamp",
            "batchId",
            "eventType",
            "eventData",
            "previousHash",
            "hash",
        ] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert_eq!(value["previousHash"], json!("0"));
        let back: Block = serde_json::from_value(value).unwrap();
        assert_eq!(back, block);
    }
}
