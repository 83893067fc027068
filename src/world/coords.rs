//! Coordinate spaces: world block, chunk, and chunk-local (§3.1).
//!
//! A chunk is 16 blocks wide on X/Z and 256 tall on Y, split into 16 stacked
//! 16^3 subchunks used for mesh buffers and frustum culling.

use serde::{Deserialize, Serialize};

pub const CHUNK_WIDTH: i32 = 16;
pub const CHUNK_HEIGHT: i32 = 256;
pub const SUBCHUNK_COUNT: i32 = CHUNK_HEIGHT / CHUNK_WIDTH;

/// A block position in world space (signed, one unit = one block).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub fn offset(&self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// Chunk this block belongs to.
    pub fn chunk_pos(&self) -> ChunkPos {
        ChunkPos::new(self.x.div_euclid(CHUNK_WIDTH), self.z.div_euclid(CHUNK_WIDTH))
    }

    /// Position local to its chunk; non-negative by construction.
    pub fn local_pos(&self) -> LocalPos {
        LocalPos {
            x: self.x.rem_euclid(CHUNK_WIDTH) as u8,
            y: self.y.clamp(0, CHUNK_HEIGHT - 1) as u16,
            z: self.z.rem_euclid(CHUNK_WIDTH) as u8,
        }
    }

    pub fn from_world_f32(pos: glam::Vec3) -> Self {
        Self::new(pos.x.floor() as i32, pos.y.floor() as i32, pos.z.floor() as i32)
    }

    pub fn to_world_f32(&self) -> glam::Vec3 {
        glam::Vec3::new(self.x as f32, self.y as f32, self.z as f32)
    }
}

/// A chunk's position in chunk-space (world block coordinate / chunk width,
/// floored). Chunks only tile X/Z; Y is always the full 256-tall column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkPos {
    pub x: i32,
    pub z: i32,
}

impl ChunkPos {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    pub fn offset(&self, dx: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.z + dz)
    }

    pub fn min_block(&self) -> BlockPos {
        BlockPos::new(self.x * CHUNK_WIDTH, 0, self.z * CHUNK_WIDTH)
    }

    pub fn distance_squared_to(&self, other: ChunkPos) -> i64 {
        let dx = (self.x - other.x) as i64;
        let dz = (self.z - other.z) as i64;
        dx * dx + dz * dz
    }

    /// The four chunks sharing a face with this one.
    pub fn neighbors4(&self) -> [ChunkPos; 4] {
        [
            self.offset(1, 0),
            self.offset(-1, 0),
            self.offset(0, 1),
            self.offset(0, -1),
        ]
    }

    /// GenRegion containing this chunk (see `crate::generation::region`).
    pub fn region_origin(&self, region_chunks: i32) -> ChunkPos {
        ChunkPos::new(
            self.x.div_euclid(region_chunks) * region_chunks,
            self.z.div_euclid(region_chunks) * region_chunks,
        )
    }
}

/// Position local to a chunk: x/z in [0, 16), y in [0, 256).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocalPos {
    pub x: u8,
    pub y: u16,
    pub z: u8,
}

impl LocalPos {
    pub fn new(x: u8, y: u16, z: u8) -> Self {
        debug_assert!((x as i32) < CHUNK_WIDTH && (z as i32) < CHUNK_WIDTH && (y as i32) < CHUNK_HEIGHT);
        Self { x, y, z }
    }

    /// Index into a flat 16x256x16 array, x-fastest then z then y.
    pub fn index(&self) -> usize {
        self.x as usize
            + self.z as usize * CHUNK_WIDTH as usize
            + self.y as usize * (CHUNK_WIDTH * CHUNK_WIDTH) as usize
    }

    pub fn subchunk_index(&self) -> usize {
        (self.y / CHUNK_WIDTH as u16) as usize
    }

    /// True if this position sits on the boundary plane between two
    /// subchunks (open question #4, resolved in SPEC_FULL.md §12.4).
    pub fn on_subchunk_boundary(&self) -> Option<usize> {
        let local_y = self.y % CHUNK_WIDTH as u16;
        if local_y == 0 && self.subchunk_index() > 0 {
            Some(self.subchunk_index() - 1)
        } else if local_y == CHUNK_WIDTH as u16 - 1 && self.subchunk_index() + 1 < SUBCHUNK_COUNT as usize {
            Some(self.subchunk_index() + 1)
        } else {
            None
        }
    }
}
