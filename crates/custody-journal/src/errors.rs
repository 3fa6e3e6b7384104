use thiserror::Error;

/// Errors that can occur during journal operations.
#[derive(Error, Debug)]
pub enum JournalError {
    /// I/O error during read or write.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Invalid file header (magic, version, or flags).
    #[error("invalid journal header: {0}")]
    InvalidHeader(String),
    /// Invalid frame structure (reserved bytes or length).
    #[error("invalid frame at offset {offset}: {reason}")]
    InvalidFrame {
        /// Byte offset where the frame starts.
        offset: u64,
        /// Reason for invalidity.
        reason: String,
    },
    /// Payload exceeds maximum size limit.
    #[error("payload size {size} exceeds maximum {max}")]
    PayloadTooLarge {
        /// Actual payload size.
        size: u64,
        /// Maximum allowed size.
        max: u32,
    },
    /// Invalid UTF-8 in a block payload.
    #[error("invalid UTF-8 in block payload: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
    /// Block payload is not a valid block JSON object.
    #[error("block JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// The file is too short to hold a header but not empty.
    #[error("file is not empty; cannot initialize header")]
    FileNotEmpty,
    /// Another writer holds the journal's lock.
    #[error("journal is locked by another writer")]
    Locked,
    /// Truncated frame detected in strict mode.
    #[error("truncated frame at offset {offset}")]
    TruncatedFrame {
        /// Byte offset of the incomplete frame.
        offset: u64,
    },
}
