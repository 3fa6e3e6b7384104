//! Append-only journal format for custody ledger blocks.
//!
//! This crate provides:
//! - Framed, append-only storage for block JSON
//! - Reader/writer APIs with strict and permissive modes
//! - Torn-tail detection so a crashed append can be discarded on reopen
//!
//! ## Quick Start
//!
//! ```no_run
//! use custody_canonical::{BatchId, Canonicalizer, Timestamp};
//! use custody_core::{EventType, UnsealedBlock};
//! use custody_journal::{JournalReader, JournalWriter, ReadMode, WriteOptions};
//! use serde_json::json;
//!
//! let block = UnsealedBlock::after(
//!     None,
//!     Timestamp::new("2024-06-10T12:00:00.000Z".into()),
//!     BatchId::new("B1".into()),
//!     EventType::BatchCreated,
//!     json!({}),
//! )
//! .seal(1, &Canonicalizer::default_profile())?;
//!
//! let mut writer = JournalWriter::open("ledger.csj", WriteOptions::default())?;
//! writer.append_block(&block)?;
//! writer.finish()?;
//!
//! let mut reader = JournalReader::open("ledger.csj", ReadMode::Strict)?;
//! while let Some(block) = reader.read_block()? {
//!     println!("{} {}", block.index_number, block.hash);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! The layout is documented in [`frame`].

#![deny(missing_docs)]

/// Error types for journal operations.
pub mod errors;
/// Frame structure and serialization.
pub mod frame;
/// Journal reader implementation.
pub mod reader;
/// Block payload encoding.
pub mod record;
/// Journal writer implementation.
pub mod writer;

pub use errors::JournalError;
pub use frame::{FrameKind, JournalHeader, RecordFrame};
pub use reader::{JournalReader, ReadMode};
pub use record::{decode_block, encode_block};
pub use writer::{JournalWriter, WriteOptions};
