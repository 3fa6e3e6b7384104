//! Hash-chained custody ledger with pluggable storage backends.
//!
//! This crate provides:
//! - [`Ledger`], the single-writer, hash-linked event ledger service
//! - `StoreWriter` and `StoreReader` traits for append-only block storage
//! - Journal-backed and in-memory backends
//! - Block filtering and batch views for read-side queries
//! - [`verify_journal`] for offline audits of a journal file
//!
//! The journal backend is the durable implementation; see
//! `custody_journal::frame` for the file layout.

#![deny(missing_docs)]

/// Ledger configuration.
pub mod config;
/// Error types for store operations.
pub mod error;
/// Block filtering API.
pub mod filter;
/// Journal-backed storage implementation.
pub mod journal;
/// The ledger service.
pub mod ledger;
/// In-memory storage implementation.
pub mod memory;
/// Storage backend traits.
pub mod traits;
/// Batch views over stored blocks.
pub mod view;

pub use config::LedgerConfig;
pub use custody_journal::{ReadMode, WriteOptions};
pub use error::{LedgerError, StoreError};
pub use filter::{
    AndFilter, BatchFilter, BlockFilter, EventTypeFilter, FilteredReader, OrFilter,
    TimeRangeFilter,
};
pub use journal::{JournalBackendReader, JournalBackendWriter};
pub use ledger::{verify_journal, Ledger, VerifyReport};
pub use memory::{MemoryReader, MemoryStore};
pub use traits::{StoreReader, StoreWriter};
pub use view::{events_for_batch, summarize_batches, BatchSummary};
