//! In-memory storage backend.

use crate::error::StoreError;
use crate::traits::{StoreReader, StoreWriter};
use custody_core::Block;
use std::collections::VecDeque;

/// Volatile block store for tests and embedding.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    blocks: Vec<Block>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Blocks stored so far.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Reader over a snapshot of the stored blocks.
    pub fn reader(&self) -> MemoryReader {
        MemoryReader::new(self.blocks.clone())
    }
}

impl StoreWriter for MemoryStore {
    fn append(&mut self, block: &Block) -> Result<(), StoreError> {
        self.blocks.push(block.clone());
        Ok(())
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Reader over an owned list of blocks.
#[derive(Debug, Default, Clone)]
pub struct MemoryReader {
    blocks: VecDeque<Block>,
}

impl MemoryReader {
    /// Reader yielding `blocks` in order.
    pub fn new(blocks: Vec<Block>) -> Self {
        Self {
            blocks: blocks.into(),
        }
    }
}

impl StoreReader for MemoryReader {
    fn read_next(&mut self) -> Result<Option<Block>, StoreError> {
        Ok(self.blocks.pop_front())
    }
}
