//! Ledger configuration.

use crate::error::StoreError;
use custody_core::ScoringMode;
use custody_journal::ReadMode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings for [`Ledger::open`](crate::Ledger::open).
///
/// Loadable from JSON; absent keys take their defaults.
///
/// ```
/// use custody_store::LedgerConfig;
///
/// let config: LedgerConfig =
///     serde_json::from_str(r#"{"journalPath": "ledger.csj", "scoring": "deferred"}"#)?;
/// assert!(!config.sync);
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LedgerConfig {
    /// Journal file; `None` keeps the ledger in memory.
    pub journal_path: Option<PathBuf>,
    /// Fsync after every append.
    pub sync: bool,
    /// How a torn trailing frame is treated on open.
    pub read_mode: ReadMode,
    /// Default reconciliation mode for certificates.
    pub scoring: ScoringMode,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            journal_path: None,
            sync: false,
            read_mode: ReadMode::Permissive,
            scoring: ScoringMode::Inline,
        }
    }
}

impl LedgerConfig {
    /// In-memory configuration with defaults.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Default configuration backed by the journal at `path`.
    pub fn with_journal(path: impl Into<PathBuf>) -> Self {
        Self {
            journal_path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Reads a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}
