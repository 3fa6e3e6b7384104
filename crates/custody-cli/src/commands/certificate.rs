//! Certificate command implementation.

use super::{open_ledger_read_only, parse_batch_id};
use crate::output;
use custody_store::LedgerConfig;

pub fn run(
    config: &LedgerConfig,
    batch: String,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let batch_id = parse_batch_id(batch)?;
    let ledger = open_ledger_read_only(config)?;
    let certificate = ledger.certificate(&batch_id, ledger.scoring_mode());

    if json {
        println!("{}", output::format_json(&certificate));
        return Ok(());
    }

    println!("Batch:       {}", certificate.batch_id.as_str());
    println!("Events:      {}", certificate.events.len());
    println!("Score:       {}", certificate.score);
    println!("Certificate: {}", certificate.tier);
    Ok(())
}
