//! World storage: coordinates, the block registry, chunks, and the chunk
//! map that owns them (§3).

pub mod block;
pub mod chunk;
pub mod coords;
pub mod frame_budget;
pub mod spawn_finder;
pub mod world;

pub use block::{registry, BlockDef, BlockId, BlockRegistry, FaceTextures};
pub use chunk::{Chunk, ChunkState, LightByte, SubchunkMesh, SubchunkUpload};
pub use coords::{BlockPos, ChunkPos, LocalPos, CHUNK_HEIGHT, CHUNK_WIDTH, SUBCHUNK_COUNT};
pub use world::{World, WorldError};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChunkAccessError {
    #[error("chunk {0:?} is not loaded")]
    NotLoaded(ChunkPos),
}
