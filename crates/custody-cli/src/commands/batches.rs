//! Batches command implementation.

use super::open_ledger_read_only;
use crate::output;
use custody_store::LedgerConfig;

pub fn run(config: &LedgerConfig, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let ledger = open_ledger_read_only(config)?;
    let summaries = ledger.batch_summaries(ledger.scoring_mode());

    if json {
        println!("{}", output::format_json(&summaries));
        return Ok(());
    }

    output::print_summary_header();
    for summary in &summaries {
        println!("{}", output::format_summary_row(summary));
    }
    Ok(())
}
