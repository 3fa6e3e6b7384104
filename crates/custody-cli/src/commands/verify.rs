//! Verify command implementation.

use crate::path;
use custody_store::{verify_journal, LedgerConfig};
use serde_json::json;
use std::path::PathBuf;

pub fn run(config: &LedgerConfig, json_output: bool) -> Result<(), Box<dyn std::error::Error>> {
    let journal = config
        .journal_path
        .clone()
        .unwrap_or_else(|| PathBuf::from(path::DEFAULT_JOURNAL));
    let journal = path::validate_journal_path(&journal, true)
        .map_err(|e| format!("Invalid journal path: {}", e))?;

    let report = verify_journal(&journal).map_err(|e| {
        let sanitized = path::sanitize_path_for_error(&journal);
        format!("Failed to open journal file: {}: {}", sanitized, e)
    })?;

    if json_output {
        let failure = report.integrity.as_ref().err().map(|e| {
            json!({
                "sequenceId": e.sequence_id,
                "fault": e.fault.to_string(),
            })
        });
        let out = json!({
            "valid": report.integrity.is_ok(),
            "blockCount": report.block_count,
            "tip": report.tip.as_ref().map(|d| d.as_str()),
            "tornTail": report.torn_tail,
            "failure": failure,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{:<12} {}", "BLOCKS", report.block_count);
        println!(
            "{:<12} {}",
            "TIP",
            report.tip.as_ref().map(|d| d.as_str()).unwrap_or("-")
        );
        println!("{:<12} {}", "TORN_TAIL", report.torn_tail);
        match &report.integrity {
            Ok(()) => println!("{:<12} Ok", "VERDICT"),
            Err(e) => println!("{:<12} Invalid ({})", "VERDICT", e),
        }
    }

    if !report.is_clean() {
        std::process::exit(1);
    }
    Ok(())
}
