use std::fmt::{Debug, Formatter};

use crate::world::block::Block;
use crate::world::location::{LocalChunkLocation, OutsideBounds, WithinBounds};
use crate::world::{CHUNK_SIZE_X, CHUNK_SIZE_Y, CHUNK_VOLUME};

/// The block grid of a single chunk. A fresh grid contains only air.
#[derive(Clone, PartialEq, Eq)]
pub struct ChunkData {
    blocks: Box<[Block]>,
}

impl Default for ChunkData {
    fn default() -> Self {
        Self::new_filled(Block::AIR)
    }
}

impl Debug for ChunkData {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "ChunkData")
    }
}

impl ChunkData {
    pub fn new_filled(block: Block) -> Self {
        Self {
            blocks: vec![block; CHUNK_VOLUME].into_boxed_slice(),
        }
    }

    pub fn get_block(&self, local_chunk_location: LocalChunkLocation<WithinBounds>) -> Block {
        self.blocks[Self::position_to_index(local_chunk_location)]
    }

    /// Returns `None` for locations outside of this chunk
    pub fn try_get_block(&self, local_chunk_location: LocalChunkLocation<OutsideBounds>) -> Option<Block> {
        Some(self.get_block(local_chunk_location.try_into_checked()?))
    }

    pub fn set_block(&mut self, local_chunk_location: LocalChunkLocation<WithinBounds>, block: Block) {
        self.blocks[Self::position_to_index(local_chunk_location)] = block;
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.iter().all(Block::is_air)
    }

    pub fn position_to_index(local_chunk_location: LocalChunkLocation<WithinBounds>) -> usize {
        (local_chunk_location.z as usize * CHUNK_SIZE_Y + local_chunk_location.y as usize) * CHUNK_SIZE_X
            + local_chunk_location.x as usize
    }
}
