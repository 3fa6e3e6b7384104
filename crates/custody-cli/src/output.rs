//! Output formatting utilities.

use custody_core::{BatchEvent, Block};
use custody_store::BatchSummary;
use serde::Serialize;

/// Formats a value as pretty JSON.
pub fn format_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

/// Formats a block as a table row.
pub fn format_block_row(block: &Block) -> String {
    format!(
        "{:<6} {:<6} {:<24} {:<20} {:<20} {}",
        block.sequence_id,
        block.index_number,
        block.timestamp.as_str(),
        truncate(block.batch_id.as_str(), 20),
        truncate(block.event_type.as_str(), 20),
        block.hash.short(16)
    )
}

/// Prints the block table header.
#[allow(clippy::print_literal)]
pub fn print_block_header() {
    println!(
        "{:<6} {:<6} {:<24} {:<20} {:<20} {}",
        "SEQ", "INDEX", "TIMESTAMP", "BATCH", "TYPE", "HASH"
    );
    println!("{}", "-".repeat(100));
}

/// Formats a batch event as a table row.
pub fn format_event_row(event: &BatchEvent) -> String {
    let data = serde_json::to_string(&event.event_data).unwrap_or_default();
    format!(
        "{:<24} {:<20} {:<22} {}",
        event.timestamp.as_str(),
        truncate(event.event_type.as_str(), 20),
        format_position(event),
        truncate(&data, 60)
    )
}

fn format_position(event: &BatchEvent) -> String {
    match event.payload().position().and_then(|p| p.pair()) {
        Some((lat, lng)) => format!("{:.5},{:.5}", lat, lng),
        None => "-".to_string(),
    }
}

/// Prints the event table header.
#[allow(clippy::print_literal)]
pub fn print_event_header() {
    println!(
        "{:<24} {:<20} {:<22} {}",
        "TIMESTAMP", "TYPE", "POSITION", "DATA"
    );
    println!("{}", "-".repeat(100));
}

/// Formats a batch summary as a table row.
pub fn format_summary_row(summary: &BatchSummary) -> String {
    format!(
        "{:<20} {:<24} {:<24} {:>6} {:>6} {}",
        truncate(summary.batch_id.as_str(), 20),
        summary.first_event.as_str(),
        summary.last_event.as_str(),
        summary.event_count,
        summary.score,
        summary.certificate
    )
}

/// Prints the batch summary table header.
#[allow(clippy::print_literal)]
pub fn print_summary_header() {
    println!(
        "{:<20} {:<24} {:<24} {:>6} {:>6} {}",
        "BATCH", "FIRST_EVENT", "LAST_EVENT", "EVENTS", "SCORE", "CERTIFICATE"
    );
    println!("{}", "-".repeat(100));
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
