//! Read-side views over stored blocks.

use crate::error::StoreError;
use crate::filter::{BatchFilter, FilteredReader};
use crate::traits::StoreReader;
use custody_canonical::{BatchId, Timestamp};
use custody_core::{
    classify, compute_information_gain_with, BatchEvent, Block, CertificateTier, ScoringMode,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Collects the history of one batch from a reader, in stored order.
///
/// Performs a full sequential scan.
pub fn events_for_batch<R: StoreReader>(
    reader: R,
    batch_id: &BatchId,
) -> Result<Vec<BatchEvent>, StoreError> {
    let mut filtered = FilteredReader::new(
        reader,
        BatchFilter {
            batch_id: batch_id.clone(),
        },
    );
    Ok(filtered
        .read_all()?
        .iter()
        .map(Block::to_event)
        .collect())
}

/// One row of the batch listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    /// Batch tag.
    pub batch_id: BatchId,
    /// Timestamp of the batch's first block.
    pub first_event: Timestamp,
    /// Timestamp of the batch's latest block.
    pub last_event: Timestamp,
    /// Number of blocks tagged with the batch.
    pub event_count: usize,
    /// Information-gain score of the batch history.
    pub score: i64,
    /// Tier for `score`.
    pub certificate: CertificateTier,
}

/// Summarizes every batch found in `blocks` (global order).
///
/// Rows are ordered by `last_event` descending, ties broken by batch id.
pub fn summarize_batches(blocks: &[Block], mode: ScoringMode) -> Vec<BatchSummary> {
    let mut histories: BTreeMap<&BatchId, Vec<BatchEvent>> = BTreeMap::new();
    for block in blocks {
        histories
            .entry(&block.batch_id)
            .or_default()
            .push(block.to_event());
    }

    let mut rows: Vec<BatchSummary> = histories
        .into_iter()
        .filter_map(|(batch_id, events)| {
            let first_event = events.first()?.timestamp.clone();
            let last_event = events.last()?.timestamp.clone();
            let score = compute_information_gain_with(&events, mode);
            Some(BatchSummary {
                batch_id: batch_id.clone(),
                first_event,
                last_event,
                event_count: events.len(),
                score,
                certificate: classify(score),
            })
        })
        .collect();

    rows.sort_by(|a, b| {
        b.last_event
            .cmp(&a.last_event)
            .then_with(|| a.batch_id.cmp(&b.batch_id))
    });
    rows
}
