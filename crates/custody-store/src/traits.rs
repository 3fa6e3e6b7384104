//! Storage backend traits.

use crate::error::StoreError;
use custody_core::Block;

/// Durable sink for committed blocks.
///
/// `append` must be all-or-nothing: when it returns an error the backend
/// holds exactly what it held before the call.
pub trait StoreWriter: Send {
    /// Persists one block after every block already stored.
    fn append(&mut self, block: &Block) -> Result<(), StoreError>;

    /// Flushes buffered data to durable storage.
    fn flush(&mut self) -> Result<(), StoreError>;
}

/// Sequential reader over stored blocks, in append order.
pub trait StoreReader {
    /// Next block, or `None` at the end.
    fn read_next(&mut self) -> Result<Option<Block>, StoreError>;

    /// Drains the reader.
    fn read_all(&mut self) -> Result<Vec<Block>, StoreError> {
        let mut blocks = Vec::new();
        while let Some(block) = self.read_next()? {
            blocks.push(block);
        }
        Ok(blocks)
    }
}
