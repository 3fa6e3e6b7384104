//! Error types for store and ledger operations.

use custody_core::CoreError;
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// I/O error during read or write.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Journal backend error.
    #[error("journal error: {0}")]
    Journal(#[from] custody_journal::JournalError),
    /// Configuration file could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
    /// Other error.
    #[error("{0}")]
    Other(String),
}

/// Errors returned by [`Ledger`](crate::Ledger) operations.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// The block could not be persisted. The ledger is unchanged.
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
    /// The event data could not be canonicalized. Nothing was written.
    #[error("serialization error: {0}")]
    Serialization(#[from] CoreError),
    /// Another appender panicked while holding the writer lock.
    #[error("ledger write lock poisoned")]
    Poisoned,
    /// The ledger was closed.
    #[error("ledger is closed")]
    Closed,
}
