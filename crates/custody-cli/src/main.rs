//! Custody CLI - command-line interface for recording and auditing custody events.

use clap::{ArgAction, Parser, Subcommand};
use custody_core::ScoringMode;
use custody_store::LedgerConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod output;
mod path;

use commands::{append, batches, canonicalize, certificate, create_batch, history, list, verify};

#[derive(Parser)]
#[command(name = "custody")]
#[command(about = "Supply-chain custody ledger CLI")]
struct Cli {
    /// Path to journal file (default: journalPath from --config, else custody.csj)
    #[arg(long, global = true)]
    journal: Option<PathBuf>,
    /// JSON ledger configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Fsync the journal after every append
    #[arg(long, global = true)]
    sync: bool,
    /// Reconcile handoff legs once over the whole history
    #[arg(long, global = true)]
    deferred: bool,
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Append an event to a batch and print the sealed block
    Append {
        /// Batch identifier
        batch: String,
        /// Event type (e.g. IOT_UPDATE, DISPATCHED, FINALIZED)
        event_type: String,
        /// Event data as inline JSON (default: {})
        #[arg(long, conflicts_with = "data_file")]
        data: Option<String>,
        /// Read event data from a JSON file
        #[arg(long)]
        data_file: Option<PathBuf>,
    },
    /// Record BATCH_CREATED for a new batch
    CreateBatch {
        /// Batch identifier (default: B<unix-millis>)
        #[arg(long)]
        id: Option<String>,
    },
    /// Show a batch's event history in ledger order
    History {
        /// Batch identifier
        batch: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Score a batch and show its certificate tier
    Certificate {
        /// Batch identifier
        batch: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Summarize every batch in the ledger
    Batches {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Verify the hash chain of a journal
    Verify {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List blocks in a journal
    List {
        /// Output as JSON (one block per line)
        #[arg(long)]
        json: bool,
        /// Stop after reading N blocks (default: unlimited)
        #[arg(long)]
        max_events: Option<u64>,
        /// Only blocks of this batch
        #[arg(long)]
        batch: Option<String>,
        /// Only blocks of this event type (repeatable; any may match)
        #[arg(long = "type")]
        event_types: Vec<String>,
        /// Only blocks at or after this UTC timestamp
        #[arg(long)]
        after: Option<String>,
        /// Only blocks at or before this UTC timestamp
        #[arg(long)]
        before: Option<String>,
    },
    /// Show canonical bytes for input JSON
    Canonicalize {
        /// Input JSON file (or stdin if not provided)
        input: Option<String>,
        /// Also print the block-domain SHA-256 of the input
        #[arg(long)]
        block_digest: bool,
    },
}

fn init_tracing(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Config file first, then command-line overrides.
fn ledger_config(cli: &Cli) -> Result<LedgerConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(file) => LedgerConfig::from_json_file(file).map_err(|e| {
            format!(
                "Failed to load config {}: {}",
                path::sanitize_path_for_error(file),
                e
            )
        })?,
        None => LedgerConfig::default(),
    };

    config.journal_path = Some(path::resolve_journal_path(
        cli.journal.as_deref(),
        config.journal_path.as_deref(),
    )?);
    if cli.sync {
        config.sync = true;
    }
    if cli.deferred {
        config.scoring = ScoringMode::Deferred;
    }
    Ok(config)
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = ledger_config(&cli).and_then(|config| match cli.command {
        Commands::Append {
            batch,
            event_type,
            data,
            data_file,
        } => append::run(&config, batch, event_type, data, data_file),
        Commands::CreateBatch { id } => create_batch::run(&config, id),
        Commands::History { batch, json } => history::run(&config, batch, json),
        Commands::Certificate { batch, json } => certificate::run(&config, batch, json),
        Commands::Batches { json } => batches::run(&config, json),
        Commands::Verify { json } => verify::run(&config, json),
        Commands::List {
            json,
            max_events,
            batch,
            event_types,
            after,
            before,
        } => list::run(
            &config,
            json,
            max_events,
            list::Selection {
                batch,
                event_types,
                after,
                before,
            },
        ),
        Commands::Canonicalize {
            input,
            block_digest,
        } => canonicalize::run(input, block_digest),
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
