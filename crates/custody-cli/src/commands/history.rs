//! History command implementation.

use super::parse_batch_id;
use crate::output;
use crate::path;
use custody_store::{events_for_batch, JournalBackendReader, LedgerConfig};
use std::path::PathBuf;

pub fn run(
    config: &LedgerConfig,
    batch: String,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let batch_id = parse_batch_id(batch)?;
    let journal = config
        .journal_path
        .clone()
        .unwrap_or_else(|| PathBuf::from(path::DEFAULT_JOURNAL));
    let journal_path = path::validate_journal_path(&journal, true)
        .map_err(|e| format!("Invalid journal path: {}", e))?;

    let reader = JournalBackendReader::open(&journal_path, config.read_mode).map_err(|e| {
        let sanitized = path::sanitize_path_for_error(&journal_path);
        format!("Failed to open journal file: {}: {}", sanitized, e)
    })?;
    let events = events_for_batch(reader, &batch_id)?;

    if json {
        println!("{}", output::format_json(&events));
        return Ok(());
    }

    output::print_event_header();
    for event in &events {
        println!("{}", output::format_event_row(event));
    }
    Ok(())
}
