//! Canonicalize command implementation.

use custody_canonical::{compute_digest, Canonicalizer};
use custody_core::BLOCK_DOMAIN_SEPARATOR;
use serde_json::Value;
use std::io::{self, Read};

/// Prints canonical bytes for the input; with `block_digest`, also the
/// block-domain SHA-256 of the input, which for a
/// `[index, timestamp, batchId, eventType, eventData, previousHash]` array
/// equals the hash a block would carry.
pub fn run(input: Option<String>, block_digest: bool) -> Result<(), Box<dyn std::error::Error>> {
    let canonicalizer = Canonicalizer::default_profile();

    let json_str = match input {
        Some(path) => std::fs::read_to_string(&path)
            .map_err(|e| format!("Failed to read file {}: {}", path, e))?,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let value: Value =
        serde_json::from_str(&json_str).map_err(|e| format!("Invalid JSON: {}", e))?;

    let result = canonicalizer
        .canonicalize(&value)
        .map_err(|e| format!("Canonicalization failed: {}", e))?;
    for warning in &result.report.warnings {
        tracing::info!(warning = ?warning, "canonicalization warning");
    }
    println!("{}", String::from_utf8_lossy(&result.bytes));

    if block_digest {
        let digest = compute_digest(BLOCK_DOMAIN_SEPARATOR, &value, &canonicalizer)?;
        println!("{}", digest.as_str());
    }
    Ok(())
}
