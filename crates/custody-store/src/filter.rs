//! Block filtering API for selective iteration.

use crate::error::StoreError;
use crate::traits::StoreReader;
use custody_canonical::{BatchId, Timestamp};
use custody_core::{Block, EventType};

/// Trait for filtering blocks during iteration.
pub trait BlockFilter {
    /// Returns true if the block matches the filter criteria.
    fn matches(&self, block: &Block) -> bool;
}

/// Filter by batch tag.
#[derive(Debug, Clone)]
pub struct BatchFilter {
    /// Batch to match.
    pub batch_id: BatchId,
}

impl BlockFilter for BatchFilter {
    fn matches(&self, block: &Block) -> bool {
        block.batch_id == self.batch_id
    }
}

/// Filter by event type.
#[derive(Debug, Clone)]
pub struct EventTypeFilter {
    /// Event type to match.
    pub event_type: EventType,
}

impl BlockFilter for EventTypeFilter {
    fn matches(&self, block: &Block) -> bool {
        block.event_type == self.event_type
    }
}

/// Filter by time range.
///
/// Timestamps share one fixed-width UTC format, so string comparison is
/// chronological.
#[derive(Debug, Clone)]
pub struct TimeRangeFilter {
    /// Include blocks at or after this timestamp.
    pub after: Option<Timestamp>,
    /// Include blocks at or before this timestamp.
    pub before: Option<Timestamp>,
}

impl BlockFilter for TimeRangeFilter {
    fn matches(&self, block: &Block) -> bool {
        let at = block.timestamp.as_str();

        if let Some(ref after) = self.after {
            if at < after.as_str() {
                return false;
            }
        }

        if let Some(ref before) = self.before {
            if at > before.as_str() {
                return false;
            }
        }

        true
    }
}

/// Composite filter: all filters must match (AND).
pub struct AndFilter {
    /// Filters to combine with AND logic.
    pub filters: Vec<Box<dyn BlockFilter>>,
}

impl BlockFilter for AndFilter {
    fn matches(&self, block: &Block) -> bool {
        self.filters.iter().all(|f| f.matches(block))
    }
}

/// Composite filter: any filter must match (OR).
pub struct OrFilter {
    /// Filters to combine with OR logic.
    pub filters: Vec<Box<dyn BlockFilter>>,
}

impl BlockFilter for OrFilter {
    fn matches(&self, block: &Block) -> bool {
        self.filters.iter().any(|f| f.matches(block))
    }
}

/// Reader that filters blocks from an underlying reader.
#[derive(Debug)]
pub struct FilteredReader<R: StoreReader, F: BlockFilter> {
    reader: R,
    filter: F,
}

impl<R: StoreReader, F: BlockFilter> FilteredReader<R, F> {
    /// Creates a new filtered reader.
    pub fn new(reader: R, filter: F) -> Self {
        Self { reader, filter }
    }

    /// The underlying reader.
    pub fn inner(&self) -> &R {
        &self.reader
    }
}

impl<R: StoreReader, F: BlockFilter> StoreReader for FilteredReader<R, F> {
    fn read_next(&mut self) -> Result<Option<Block>, StoreError> {
        loop {
            match self.reader.read_next()? {
                None => return Ok(None),
                Some(block) if self.filter.matches(&block) => return Ok(Some(block)),
                Some(_) => continue,
            }
        }
    }
}
