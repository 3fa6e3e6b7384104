use thiserror::Error;

/// Core error types.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Block content could not be canonicalized for hashing.
    #[error("block hash computation failed: {0}")]
    Hash(#[from] custody_canonical::HashError),
    /// Event data could not be converted to JSON.
    #[error("invalid event data: {0}")]
    InvalidEvent(#[from] serde_json::Error),
}
