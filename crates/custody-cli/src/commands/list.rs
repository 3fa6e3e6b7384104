//! List command implementation.

use crate::output;
use crate::path;
use custody_canonical::{BatchId, Timestamp};
use custody_core::EventType;
use custody_store::{
    AndFilter, BatchFilter, BlockFilter, EventTypeFilter, FilteredReader, JournalBackendReader,
    LedgerConfig, OrFilter, StoreReader, TimeRangeFilter,
};
use std::path::PathBuf;

/// Which blocks `list` prints. Every set criterion must match; multiple
/// event types match any of them.
#[derive(Debug, Default)]
pub struct Selection {
    pub batch: Option<String>,
    pub event_types: Vec<String>,
    pub after: Option<String>,
    pub before: Option<String>,
}

impl Selection {
    fn into_filter(self) -> Result<AndFilter, Box<dyn std::error::Error>> {
        let mut filters: Vec<Box<dyn BlockFilter>> = Vec::new();

        if let Some(batch) = self.batch {
            let batch_id =
                BatchId::parse(batch).map_err(|e| format!("Invalid batch id: {}", e))?;
            filters.push(Box::new(BatchFilter { batch_id }));
        }

        if !self.event_types.is_empty() {
            filters.push(Box::new(OrFilter {
                filters: self
                    .event_types
                    .into_iter()
                    .map(|t| {
                        Box::new(EventTypeFilter {
                            event_type: EventType::from(t),
                        }) as Box<dyn BlockFilter>
                    })
                    .collect(),
            }));
        }

        if self.after.is_some() || self.before.is_some() {
            let parse = |raw: Option<String>| -> Result<Option<Timestamp>, String> {
                raw.map(|t| Timestamp::parse(t).map_err(|e| format!("Invalid timestamp: {}", e)))
                    .transpose()
            };
            filters.push(Box::new(TimeRangeFilter {
                after: parse(self.after)?,
                before: parse(self.before)?,
            }));
        }

        Ok(AndFilter { filters })
    }
}

pub fn run(
    config: &LedgerConfig,
    json: bool,
    max_events: Option<u64>,
    selection: Selection,
) -> Result<(), Box<dyn std::error::Error>> {
    let journal = config
        .journal_path
        .clone()
        .unwrap_or_else(|| PathBuf::from(path::DEFAULT_JOURNAL));
    let journal_path = path::validate_journal_path(&journal, true)
        .map_err(|e| format!("Invalid journal path: {}", e))?;
    let filter = selection.into_filter()?;

    let reader = JournalBackendReader::open(&journal_path, config.read_mode).map_err(|e| {
        let sanitized = path::sanitize_path_for_error(&journal_path);
        format!("Failed to open journal file: {}: {}", sanitized, e)
    })?;
    let mut reader = FilteredReader::new(reader, filter);

    if !json {
        output::print_block_header();
    }

    let mut block_count: u64 = 0;
    while let Some(block) = reader.read_next()? {
        if let Some(max) = max_events {
            if block_count >= max {
                break;
            }
        }

        if json {
            println!("{}", serde_json::to_string(&block)?);
        } else {
            println!("{}", output::format_block_row(&block));
        }
        block_count += 1;
    }

    if reader.inner().torn_tail() {
        tracing::warn!(
            path = %path::sanitize_path_for_error(&journal_path),
            "journal ends in an incomplete frame"
        );
    }
    Ok(())
}
