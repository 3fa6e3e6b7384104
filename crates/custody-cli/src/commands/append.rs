//! Append command implementation.

use super::{open_ledger, parse_batch_id};
use crate::output;
use custody_core::EventType;
use custody_store::LedgerConfig;
use serde_json::{json, Value};
use std::path::PathBuf;

pub fn run(
    config: &LedgerConfig,
    batch: String,
    event_type: String,
    data: Option<String>,
    data_file: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let batch_id = parse_batch_id(batch)?;
    let event_type = EventType::from(event_type);
    if !event_type.is_known() {
        tracing::warn!(event_type = %event_type, "recording unrecognized event type");
    }

    let event_data = match (data, data_file) {
        (Some(inline), _) => parse_data(&inline)?,
        (None, Some(file)) => {
            let text = std::fs::read_to_string(&file)
                .map_err(|e| format!("Failed to read file {}: {}", file.display(), e))?;
            parse_data(&text)?
        }
        (None, None) => json!({}),
    };

    let ledger = open_ledger(config)?;
    let block = ledger.append(batch_id, event_type, event_data)?;
    ledger.close()?;

    println!("{}", output::format_json(&block));
    Ok(())
}

fn parse_data(text: &str) -> Result<Value, Box<dyn std::error::Error>> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| format!("Invalid event data JSON: {}", e))?;
    if !value.is_object() {
        return Err("Event data must be a JSON object".into());
    }
    Ok(value)
}
