//! Journal writer implementation.

use crate::errors::JournalError;
use crate::frame::{FrameKind, JournalHeader, RecordFrame, HEADER_SIZE};
use crate::record::encode_block;
use custody_core::Block;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, Write};
use std::path::Path;

/// Options for journal writing.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Whether to fsync after each append (default: false).
    pub sync: bool,
    /// Whether to create the file if it doesn't exist (default: true).
    pub create: bool,
    /// Whether to keep existing frames (default: true). When false the file
    /// is cut back to its header.
    pub append: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            sync: false,
            create: true,
            append: true,
        }
    }
}

/// Append-only writer for a journal file (`.csj`).
///
/// Every append is a single `write_all` of frame header plus payload. If the
/// write fails the file is truncated back to its previous length, so a failed
/// append never leaves a partial frame behind.
///
/// # Example
///
/// ```no_run
/// use custody_canonical::{BatchId, Canonicalizer, Timestamp};
/// use custody_core::{EventType, UnsealedBlock};
/// use custody_journal::{JournalWriter, WriteOptions};
/// use serde_json::json;
///
/// let block = UnsealedBlock::after(
///     None,
///     Timestamp::new("2024-06-10T12:00:00.000Z".into()),
///     BatchId::new("B1".into()),
///     EventType::BatchCreated,
///     json!({}),
/// )
/// .seal(1, &Canonicalizer::default_profile())?;
///
/// let mut writer = JournalWriter::open("ledger.csj", WriteOptions::default())?;
/// writer.append_block(&block)?;
/// writer.finish()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct JournalWriter {
    file: File,
    sync: bool,
    len: u64,
}

impl JournalWriter {
    /// Opens or creates a journal file for writing.
    ///
    /// The writer holds an exclusive advisory lock on the file until it is
    /// dropped; a second writer on the same journal, in this process or
    /// another, fails with [`JournalError::Locked`]. An empty file gets a
    /// fresh header. An existing file must start with a valid header and is
    /// positioned at its end.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError`](crate::JournalError) if:
    /// - File cannot be opened/created
    /// - Another writer holds the journal
    /// - Existing file is not a valid journal
    /// - File is not empty but too small to be valid
    pub fn open<P: AsRef<Path>>(path: P, options: WriteOptions) -> Result<Self, JournalError> {
        let file = OpenOptions::new()
            .create(options.create)
            .write(true)
            .read(true)
            .open(path)?;
        lock_exclusive(&file)?;

        let mut writer = Self {
            file,
            sync: options.sync,
            len: 0,
        };

        let existing = writer.file.metadata()?.len();
        if existing == 0 {
            writer.write_header()?;
        } else if existing < HEADER_SIZE as u64 {
            return Err(JournalError::FileNotEmpty);
        } else {
            let mut header_bytes = [0u8; HEADER_SIZE];
            writer.file.seek(io::SeekFrom::Start(0))?;
            writer.file.read_exact(&mut header_bytes)?;
            JournalHeader::from_bytes(&header_bytes)?;
            writer.len = existing;
            if !options.append {
                writer.truncate(HEADER_SIZE as u64)?;
            }
            writer.file.seek(io::SeekFrom::Start(writer.len))?;
        }

        Ok(writer)
    }

    fn write_header(&mut self) -> Result<(), JournalError> {
        self.file.seek(io::SeekFrom::Start(0))?;
        self.file.write_all(&JournalHeader::new().to_bytes())?;
        self.file.flush()?;
        if self.sync {
            self.file.sync_all()?;
        }
        self.len = HEADER_SIZE as u64;
        Ok(())
    }

    /// Current file length in bytes.
    pub fn len(&self) -> u64 {
        self.len
    }

    /// True when the journal holds no frames.
    pub fn is_empty(&self) -> bool {
        self.len <= HEADER_SIZE as u64
    }

    /// Appends one block as a `BlockJson` frame.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError`](crate::JournalError) if serialization fails,
    /// the payload is too large, or the write fails. The file is unchanged
    /// in every case.
    pub fn append_block(&mut self, block: &Block) -> Result<(), JournalError> {
        let payload = encode_block(block)?;
        self.append_raw(FrameKind::BlockJson, &payload)
    }

    /// Appends a raw frame with the given kind and payload.
    pub fn append_raw(&mut self, kind: FrameKind, payload: &[u8]) -> Result<(), JournalError> {
        let buf = RecordFrame::encode(kind, payload)?;
        let before = self.len;

        if let Err(e) = self.write_frame(&buf) {
            let _ = self.truncate(before);
            return Err(e);
        }

        self.len = before + buf.len() as u64;
        Ok(())
    }

    fn write_frame(&mut self, buf: &[u8]) -> Result<(), JournalError> {
        self.file.write_all(buf)?;
        self.file.flush()?;
        if self.sync {
            self.file.sync_data()?;
        }
        Ok(())
    }

    /// Cuts the file back to `len` bytes, discarding anything after it.
    ///
    /// Used to drop a torn trailing frame before appending again.
    pub fn truncate(&mut self, len: u64) -> Result<(), JournalError> {
        let len = len.max(HEADER_SIZE as u64);
        self.file.set_len(len)?;
        self.file.seek(io::SeekFrom::Start(len))?;
        self.len = len;
        Ok(())
    }

    /// Flushes written frames, syncing to disk when `sync` is set.
    pub fn flush(&mut self) -> Result<(), JournalError> {
        self.file.flush()?;
        if self.sync {
            self.file.sync_all()?;
        }
        Ok(())
    }

    /// Finishes writing and closes the file.
    pub fn finish(mut self) -> Result<(), JournalError> {
        self.flush()
    }
}

/// Takes a non-blocking `flock(LOCK_EX)`. The lock is tied to this open file
/// and released when it is closed.
#[cfg(unix)]
fn lock_exclusive(file: &File) -> Result<(), JournalError> {
    use std::os::unix::io::AsRawFd;

    let rc = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) };
    if rc != 0 {
        let err = io::Error::last_os_error();
        return match err.raw_os_error() {
            Some(libc::EWOULDBLOCK) => Err(JournalError::Locked),
            _ => Err(JournalError::Io(err)),
        };
    }
    Ok(())
}

#[cfg(not(unix))]
fn lock_exclusive(_file: &File) -> Result<(), JournalError> {
    Ok(())
}

impl Drop for JournalWriter {
    fn drop(&mut self) {
        let _ = self.file.flush();
        if self.sync {
            let _ = self.file.sync_all();
        }
    }
}
