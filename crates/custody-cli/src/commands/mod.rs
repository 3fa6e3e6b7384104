//! Subcommand implementations.

pub mod append;
pub mod batches;
pub mod canonicalize;
pub mod certificate;
pub mod create_batch;
pub mod history;
pub mod list;
pub mod verify;

use crate::path;
use custody_canonical::BatchId;
use custody_store::{Ledger, LedgerConfig};

/// Opens the configured ledger, replaying its journal.
pub(crate) fn open_ledger(config: &LedgerConfig) -> Result<Ledger, Box<dyn std::error::Error>> {
    Ledger::open(config).map_err(|e| {
        let shown = config
            .journal_path
            .as_deref()
            .map(path::sanitize_path_for_error)
            .unwrap_or_else(|| "<memory>".to_string());
        format!("Failed to open ledger {}: {}", shown, e).into()
    })
}

/// Replays the configured journal without locking or modifying it. The
/// journal must already exist.
pub(crate) fn open_ledger_read_only(
    config: &LedgerConfig,
) -> Result<Ledger, Box<dyn std::error::Error>> {
    if let Some(journal) = config.journal_path.as_deref() {
        path::validate_journal_path(journal, true)
            .map_err(|e| format!("Invalid journal path: {}", e))?;
    }
    Ledger::open_read_only(config).map_err(|e| {
        let shown = config
            .journal_path
            .as_deref()
            .map(path::sanitize_path_for_error)
            .unwrap_or_else(|| "<memory>".to_string());
        format!("Failed to open ledger {}: {}", shown, e).into()
    })
}

pub(crate) fn parse_batch_id(raw: String) -> Result<BatchId, Box<dyn std::error::Error>> {
    BatchId::parse(raw).map_err(|e| format!("Invalid batch id: {}", e).into())
}
