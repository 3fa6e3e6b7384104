//! Journal reader implementation.

use crate::errors::JournalError;
use crate::frame::{FrameKind, JournalHeader, RecordFrame, FRAME_HEADER_SIZE, HEADER_SIZE};
use crate::record::decode_block;
use custody_core::Block;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, Read, Seek};
use std::path::Path;

/// Read mode for handling truncation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadMode {
    /// Truncated frames are errors.
    Strict,
    /// A truncated trailing frame is treated as end-of-file.
    #[default]
    Permissive,
}

/// Sequential reader over a journal file.
///
/// The reader supports two modes:
/// - [`ReadMode::Strict`] - Truncated frames are errors
/// - [`ReadMode::Permissive`] - Truncation is treated as end-of-file
///
/// # Example
///
/// ```no_run
/// use custody_journal::{JournalReader, ReadMode};
///
/// let mut reader = JournalReader::open("ledger.csj", ReadMode::Strict)?;
/// while let Some(block) = reader.read_block()? {
///     println!("{} {}", block.sequence_id, block.hash);
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct JournalReader {
    file: File,
    mode: ReadMode,
    position: u64,
    torn_tail: bool,
}

impl JournalReader {
    /// Opens a journal file for reading.
    ///
    /// The file header is validated and the reader is positioned at the first
    /// record frame after the header.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError`](crate::JournalError) if:
    /// - File cannot be opened
    /// - File header is invalid
    /// - I/O error occurs
    pub fn open<P: AsRef<Path>>(path: P, mode: ReadMode) -> Result<Self, JournalError> {
        let mut file = File::open(path)?;
        Self::read_header(&mut file)?;

        Ok(Self {
            file,
            mode,
            position: HEADER_SIZE as u64,
            torn_tail: false,
        })
    }

    fn read_header(file: &mut File) -> Result<JournalHeader, JournalError> {
        file.seek(io::SeekFrom::Start(0))?;
        let mut header_bytes = [0u8; HEADER_SIZE];
        file.read_exact(&mut header_bytes)?;
        JournalHeader::from_bytes(&header_bytes)
    }

    /// Offset of the next unread frame.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Length of the journal up to the end of the last complete frame read.
    ///
    /// Once the reader has returned `None`, this is where a writer should
    /// continue appending.
    pub fn valid_len(&self) -> u64 {
        self.position
    }

    /// True when a permissive read stopped at an incomplete trailing frame.
    pub fn torn_tail(&self) -> bool {
        self.torn_tail
    }

    fn truncated(&mut self) -> Result<Option<(FrameKind, Vec<u8>)>, JournalError> {
        if self.mode == ReadMode::Permissive {
            self.torn_tail = true;
            return Ok(None);
        }
        Err(JournalError::TruncatedFrame {
            offset: self.position,
        })
    }

    /// Reads the next frame from the journal.
    ///
    /// Returns `Ok(None)` at end-of-file (or at a truncated frame in
    /// permissive mode). The position only advances past complete frames.
    pub fn read_frame(&mut self) -> Result<Option<(FrameKind, Vec<u8>)>, JournalError> {
        self.file.seek(io::SeekFrom::Start(self.position))?;

        let file_size = self.file.metadata()?.len();
        if self.position >= file_size {
            return Ok(None);
        }

        let mut frame_header_bytes = [0u8; FRAME_HEADER_SIZE];
        match self.file.read_exact(&mut frame_header_bytes) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return self.truncated(),
            Err(e) => return Err(e.into()),
        }

        let frame = RecordFrame::from_bytes(&frame_header_bytes, self.position)?;

        let mut payload = vec![0u8; frame.len as usize];
        match self.file.read_exact(&mut payload) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return self.truncated(),
            Err(e) => return Err(e.into()),
        }

        self.position += (FRAME_HEADER_SIZE + payload.len()) as u64;
        Ok(Some((frame.kind, payload)))
    }

    /// Reads the next block, skipping unknown frame kinds.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError`](crate::JournalError) if:
    /// - Frame structure is invalid
    /// - The payload is not a block JSON object
    /// - Truncation detected (in strict mode)
    /// - I/O error occurs
    pub fn read_block(&mut self) -> Result<Option<Block>, JournalError> {
        loop {
            match self.read_frame()? {
                None => return Ok(None),
                Some((FrameKind::BlockJson, payload)) => return decode_block(&payload).map(Some),
                Some((FrameKind::Unknown(_), _)) => continue,
            }
        }
    }

    /// Reads every remaining block.
    pub fn read_all(&mut self) -> Result<Vec<Block>, JournalError> {
        let mut blocks = Vec::new();
        while let Some(block) = self.read_block()? {
            blocks.push(block);
        }
        Ok(blocks)
    }
}
