//! Create-batch command implementation.

use super::{open_ledger, parse_batch_id};
use crate::output;
use chrono::Utc;
use custody_core::EventType;
use custody_store::LedgerConfig;
use serde_json::json;

pub fn run(config: &LedgerConfig, id: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let raw = id.unwrap_or_else(|| format!("B{}", Utc::now().timestamp_millis()));
    let batch_id = parse_batch_id(raw)?;

    let ledger = open_ledger(config)?;
    let block = ledger.append(batch_id.clone(), EventType::BatchCreated, json!({}))?;
    ledger.close()?;

    println!(
        "{}",
        output::format_json(&json!({ "batchId": batch_id, "block": block }))
    );
    Ok(())
}
