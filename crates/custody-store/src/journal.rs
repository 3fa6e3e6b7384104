//! Journal-backed storage implementation.

use crate::error::StoreError;
use crate::traits::{StoreReader, StoreWriter};
use custody_core::Block;
use custody_journal::{JournalReader, JournalWriter, ReadMode, WriteOptions};
use std::path::Path;

/// Writer that appends blocks to a `.csj` journal file.
pub struct JournalBackendWriter {
    writer: JournalWriter,
}

impl JournalBackendWriter {
    /// Opens or creates the journal at `path`.
    pub fn open<P: AsRef<Path>>(path: P, options: WriteOptions) -> Result<Self, StoreError> {
        Ok(Self {
            writer: JournalWriter::open(path, options)?,
        })
    }

    /// Discards everything after `len` bytes.
    pub fn truncate(&mut self, len: u64) -> Result<(), StoreError> {
        Ok(self.writer.truncate(len)?)
    }

    /// Current journal length in bytes.
    pub fn len(&self) -> u64 {
        self.writer.len()
    }

    /// True when the journal holds no frames.
    pub fn is_empty(&self) -> bool {
        self.writer.is_empty()
    }

    /// Flushes and closes the journal.
    pub fn finish(self) -> Result<(), StoreError> {
        Ok(self.writer.finish()?)
    }
}

impl StoreWriter for JournalBackendWriter {
    fn append(&mut self, block: &Block) -> Result<(), StoreError> {
        Ok(self.writer.append_block(block)?)
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        Ok(self.writer.flush()?)
    }
}

/// Reader over the blocks of a `.csj` journal file.
pub struct JournalBackendReader {
    reader: JournalReader,
}

impl JournalBackendReader {
    /// Opens the journal at `path`.
    pub fn open<P: AsRef<Path>>(path: P, mode: ReadMode) -> Result<Self, StoreError> {
        Ok(Self {
            reader: JournalReader::open(path, mode)?,
        })
    }

    /// End of the last complete frame read so far.
    pub fn valid_len(&self) -> u64 {
        self.reader.valid_len()
    }

    /// True when reading stopped at an incomplete trailing frame.
    pub fn torn_tail(&self) -> bool {
        self.reader.torn_tail()
    }
}

impl StoreReader for JournalBackendReader {
    fn read_next(&mut self) -> Result<Option<Block>, StoreError> {
        Ok(self.reader.read_block()?)
    }
}
