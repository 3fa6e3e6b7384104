//! The hash-chained custody ledger.
//!
//! One [`Ledger`] owns one chain. Appends serialize on a single mutex that
//! covers reading the tip, hashing, persisting and publishing, so no two
//! appends can observe the same predecessor. Committed blocks are published
//! into a read-mostly view; readers never wait on disk I/O.

use crate::config::LedgerConfig;
use crate::error::{LedgerError, StoreError};
use crate::journal::{JournalBackendReader, JournalBackendWriter};
use crate::memory::MemoryStore;
use crate::traits::{StoreReader, StoreWriter};
use crate::view::{summarize_batches, BatchSummary};
use custody_canonical::{BatchId, Canonicalizer, Digest};
use custody_core::{
    verify_chain, BatchEvent, Block, Certificate, ChainIntegrityError, Clock, EventPayload,
    EventType, ScoringMode, SystemClock, UnsealedBlock,
};
use custody_journal::{ReadMode, WriteOptions};
use serde_json::Value;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard};
use tracing::{debug, info, warn};

struct WriterState {
    // `None` once closed, or for a read-only ledger
    store: Option<Box<dyn StoreWriter>>,
    tip: Option<Block>,
}

/// Append-only, hash-linked event ledger shared by reference.
///
/// ```
/// use custody_canonical::BatchId;
/// use custody_core::{CertificateTier, EventType, ScoringMode};
/// use custody_store::Ledger;
/// use serde_json::json;
///
/// let ledger = Ledger::in_memory();
/// let batch = BatchId::new("B1".into());
/// ledger.append(batch.clone(), EventType::BatchCreated, json!({}))?;
/// ledger.append(batch.clone(), EventType::Rating, json!({"rating": 5}))?;
///
/// assert!(ledger.verify_chain().is_ok());
/// let cert = ledger.certificate(&batch, ScoringMode::Inline);
/// assert_eq!(cert.score, 3);
/// assert_eq!(cert.tier, CertificateTier::None);
/// # Ok::<(), custody_store::LedgerError>(())
/// ```
pub struct Ledger {
    writer: Mutex<WriterState>,
    committed: RwLock<Vec<Block>>,
    clock: Arc<dyn Clock>,
    canonicalizer: Canonicalizer,
    scoring: ScoringMode,
}

impl Ledger {
    /// Ledger over an arbitrary backend.
    ///
    /// `existing` must be the blocks `store` already holds, in order; the
    /// next append links to the last of them.
    pub fn from_parts(
        store: Box<dyn StoreWriter>,
        existing: Vec<Block>,
        clock: Arc<dyn Clock>,
        scoring: ScoringMode,
    ) -> Self {
        Self::with_store(Some(store), existing, clock, scoring)
    }

    fn with_store(
        store: Option<Box<dyn StoreWriter>>,
        existing: Vec<Block>,
        clock: Arc<dyn Clock>,
        scoring: ScoringMode,
    ) -> Self {
        Self {
            writer: Mutex::new(WriterState {
                store,
                tip: existing.last().cloned(),
            }),
            committed: RwLock::new(existing),
            clock,
            canonicalizer: Canonicalizer::default_profile(),
            scoring,
        }
    }

    /// Empty ledger that keeps its blocks in memory.
    pub fn in_memory() -> Self {
        Self::from_parts(
            Box::new(MemoryStore::new()),
            Vec::new(),
            Arc::new(SystemClock),
            ScoringMode::default(),
        )
    }

    /// Opens the ledger described by `config`, stamping blocks with the
    /// system clock.
    pub fn open(config: &LedgerConfig) -> Result<Self, LedgerError> {
        Self::open_with_clock(config, Arc::new(SystemClock))
    }

    /// Opens the ledger described by `config` with a custom clock.
    ///
    /// An existing journal is replayed to restore the tip. In permissive
    /// mode an incomplete trailing frame is cut off before the first append;
    /// in strict mode it is an error. The ledger holds the journal's writer
    /// lock until it is closed or dropped, so a second open of the same
    /// journal fails with [`LedgerError::Storage`].
    pub fn open_with_clock(
        config: &LedgerConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, LedgerError> {
        let Some(path) = config.journal_path.as_deref() else {
            let ledger = Self::from_parts(
                Box::new(MemoryStore::new()),
                Vec::new(),
                clock,
                config.scoring,
            );
            info!(blocks = 0, "in-memory ledger opened");
            return Ok(ledger);
        };

        let mut writer = JournalBackendWriter::open(
            path,
            WriteOptions {
                sync: config.sync,
                create: true,
                append: true,
            },
        )?;

        let mut reader = JournalBackendReader::open(path, config.read_mode)?;
        let blocks = reader.read_all()?;
        if reader.torn_tail() {
            warn!(
                path = %path.display(),
                valid_len = reader.valid_len(),
                file_len = writer.len(),
                "discarding torn trailing frame"
            );
            writer.truncate(reader.valid_len())?;
        }

        info!(path = %path.display(), blocks = blocks.len(), "ledger opened");
        Ok(Self::from_parts(
            Box::new(writer),
            blocks,
            clock,
            config.scoring,
        ))
    }

    /// Replays an existing journal for reading only.
    ///
    /// Takes no writer lock and never modifies the file: a missing journal
    /// is an error and a torn trailing frame is skipped, not trimmed.
    /// Appends fail with [`LedgerError::Closed`].
    pub fn open_read_only(config: &LedgerConfig) -> Result<Self, LedgerError> {
        let Some(path) = config.journal_path.as_deref() else {
            return Ok(Self::with_store(
                None,
                Vec::new(),
                Arc::new(SystemClock),
                config.scoring,
            ));
        };

        let mut reader = JournalBackendReader::open(path, config.read_mode)?;
        let blocks = reader.read_all()?;
        if reader.torn_tail() {
            warn!(
                path = %path.display(),
                valid_len = reader.valid_len(),
                "ignoring torn trailing frame"
            );
        }

        info!(path = %path.display(), blocks = blocks.len(), "ledger opened read-only");
        Ok(Self::with_store(
            None,
            blocks,
            Arc::new(SystemClock),
            config.scoring,
        ))
    }

    fn view(&self) -> RwLockReadGuard<'_, Vec<Block>> {
        // only ever mutated by push, so a poisoned view is still consistent
        self.committed.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends one event to the chain and returns the committed block.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::Serialization`] when `event_data` cannot be hashed
    /// - [`LedgerError::Storage`] when the backend rejects the block
    /// - [`LedgerError::Poisoned`] / [`LedgerError::Closed`]
    ///
    /// On error the ledger, its tip and every batch history are unchanged.
    pub fn append(
        &self,
        batch_id: BatchId,
        event_type: EventType,
        event_data: Value,
    ) -> Result<Block, LedgerError> {
        let mut state = self.writer.lock().map_err(|_| LedgerError::Poisoned)?;
        if state.store.is_none() {
            return Err(LedgerError::Closed);
        }

        let sequence_id = state.tip.as_ref().map_or(1, |tip| tip.sequence_id + 1);
        let block = UnsealedBlock::after(
            state.tip.as_ref(),
            self.clock.now(),
            batch_id,
            event_type,
            event_data,
        )
        .seal(sequence_id, &self.canonicalizer)?;

        state
            .store
            .as_mut()
            .ok_or(LedgerError::Closed)?
            .append(&block)?;

        self.committed
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(block.clone());
        state.tip = Some(block.clone());

        debug!(
            sequence = block.sequence_id,
            index = block.index_number,
            batch = %block.batch_id,
            event_type = %block.event_type,
            "block appended"
        );
        Ok(block)
    }

    /// Appends a typed payload.
    pub fn append_payload(
        &self,
        batch_id: BatchId,
        payload: EventPayload,
    ) -> Result<Block, LedgerError> {
        let (event_type, event_data) = payload
            .into_parts()
            .map_err(|e| LedgerError::Serialization(e.into()))?;
        self.append(batch_id, event_type, event_data)
    }

    /// History of one batch in append order. Unknown batches yield an
    /// empty history.
    pub fn events_by_batch(&self, batch_id: &BatchId) -> Vec<BatchEvent> {
        self.view()
            .iter()
            .filter(|block| &block.batch_id == batch_id)
            .map(Block::to_event)
            .collect()
    }

    /// Scores and classifies one batch.
    pub fn certificate(&self, batch_id: &BatchId, mode: ScoringMode) -> Certificate {
        Certificate::issue(batch_id.clone(), self.events_by_batch(batch_id), mode)
    }

    /// One summary row per batch, most recently active first.
    pub fn batch_summaries(&self, mode: ScoringMode) -> Vec<BatchSummary> {
        summarize_batches(&self.view(), mode)
    }

    /// Reconciliation mode from the configuration.
    pub fn scoring_mode(&self) -> ScoringMode {
        self.scoring
    }

    /// Recomputes every hash and checks every link.
    pub fn verify_chain(&self) -> Result<(), ChainIntegrityError> {
        let result = verify_chain(&self.view(), &self.canonicalizer);
        if let Err(ref e) = result {
            warn!(sequence = e.sequence_id, fault = %e.fault, "chain integrity violated");
        }
        result
    }

    /// Copy of every committed block in global order.
    pub fn blocks(&self) -> Vec<Block> {
        self.view().clone()
    }

    /// Number of committed blocks.
    pub fn len(&self) -> usize {
        self.view().len()
    }

    /// True when nothing has been appended.
    pub fn is_empty(&self) -> bool {
        self.view().is_empty()
    }

    /// Latest committed block.
    pub fn tip(&self) -> Option<Block> {
        self.view().last().cloned()
    }

    /// Flushes and releases the backend, including the journal lock, and
    /// rejects further appends. Reads keep working.
    pub fn close(&self) -> Result<(), LedgerError> {
        let mut state = self.writer.lock().map_err(|_| LedgerError::Poisoned)?;
        let Some(mut store) = state.store.take() else {
            return Ok(());
        };
        if let Err(e) = store.flush() {
            state.store = Some(store);
            return Err(e.into());
        }
        info!(blocks = self.len(), "ledger closed");
        Ok(())
    }
}

/// Result of auditing a journal file.
#[derive(Debug)]
pub struct VerifyReport {
    /// Complete blocks read.
    pub block_count: usize,
    /// Hash of the last complete block.
    pub tip: Option<Digest>,
    /// An incomplete trailing frame was found and ignored.
    pub torn_tail: bool,
    /// Outcome of chain verification over the complete blocks.
    pub integrity: Result<(), ChainIntegrityError>,
}

impl VerifyReport {
    /// True when the chain verified and the file ends cleanly.
    pub fn is_clean(&self) -> bool {
        self.integrity.is_ok() && !self.torn_tail
    }
}

/// Re-reads a journal from disk and verifies its chain. Never writes.
pub fn verify_journal(path: impl AsRef<Path>) -> Result<VerifyReport, StoreError> {
    let path = path.as_ref();
    let mut reader = JournalBackendReader::open(path, ReadMode::Permissive)?;
    let blocks = reader.read_all()?;
    let integrity = verify_chain(&blocks, &Canonicalizer::default_profile());

    match &integrity {
        Ok(()) => info!(path = %path.display(), blocks = blocks.len(), "journal verified"),
        Err(e) => warn!(
            path = %path.display(),
            sequence = e.sequence_id,
            fault = %e.fault,
            "journal failed verification"
        ),
    }

    Ok(VerifyReport {
        block_count: blocks.len(),
        tip: blocks.last().map(|b| b.hash.clone()),
        torn_tail: reader.torn_tail(),
        integrity,
    })
}
