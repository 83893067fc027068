//! Procedural terrain generation (§4.1): layered noise fields feed a biome
//! blend, which drives surface dusting, cave carving, and feature
//! placement. Deterministic: the same seed and chunk position always
//! produce the same blocks.

pub mod biome;
pub mod caves;
pub mod climate;
pub mod features;
pub mod noise;
pub mod region;
pub mod surface;

use crate::generation::caves::CaveNoise;
use crate::generation::climate::SEA_LEVEL;
use crate::generation::region::GenRegionCache;
use crate::world::block::BlockId;
use crate::world::coords::{BlockPos, ChunkPos, LocalPos, CHUNK_HEIGHT, CHUNK_WIDTH};

/// Generation never fails: a seed plus a position always produces a
/// complete chunk. Kept as a zero-variant type so call sites that expect a
/// `Result` (matching the rest of the engine's error-handling convention)
/// still type-check without a reachable error path.
#[derive(Debug, thiserror::Error)]
pub enum GenError {}

pub struct Generator {
    seed: u32,
    caves: CaveNoise,
}

impl Generator {
    pub fn new(seed: u32) -> Self {
        Self { seed, caves: CaveNoise::new(seed) }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Fills one chunk's blocks: Phase C (column fill) and D (cave carving)
    /// in one pass, then Phase E (features) in a second pass over the
    /// already-carved column so a tree always roots on solid ground.
    pub fn generate_chunk(&self, pos: ChunkPos, regions: &mut GenRegionCache) -> Vec<BlockId> {
        let mut blocks = vec![BlockId::AIR; (CHUNK_WIDTH * CHUNK_WIDTH * CHUNK_HEIGHT) as usize];
        let min = pos.min_block();
        let region = regions.region_for(pos);

        for lx in 0..CHUNK_WIDTH {
            for lz in 0..CHUNK_WIDTH {
                let wx = min.x + lx;
                let wz = min.z + lz;
                let height = region.height_at(wx, wz);
                let blend = region.blend_at(wx, wz);
                let shore_dist_ocean = region.shore_dist_ocean_at(wx, wz);
                let shore = surface::ShoreContext {
                    slope: region.slope_at(wx, wz),
                    shore_dist_ocean,
                    is_ocean_neighborhood: region.is_ocean_at(wx, wz) || shore_dist_ocean <= region::SHORE_SCAN_RADIUS,
                    exposure: region.exposure_at(wx, wz),
                };

                for y in 0..CHUNK_HEIGHT {
                    let mut block = surface::column_block(blend, height, y, shore);
                    if block == BlockId::STONE && self.caves.is_cave(wx, y, wz, height) {
                        block = BlockId::AIR;
                    }
                    let local = LocalPos::new(lx as u8, y as u16, lz as u8);
                    blocks[local.index()] = block;
                }
            }
        }

        for lx in 0..CHUNK_WIDTH {
            for lz in 0..CHUNK_WIDTH {
                let wx = min.x + lx;
                let wz = min.z + lz;
                let height = region.height_at(wx, wz);
                if height <= SEA_LEVEL {
                    continue;
                }
                let blend = region.blend_at(wx, wz);
                let dominant = if blend.weight >= 0.5 { blend.primary } else { blend.secondary };

                if let Some(feature) = features::feature_at(self.seed, wx, wz, dominant, height - SEA_LEVEL) {
                    let base = BlockPos::new(wx, height, wz);
                    features::place_feature(feature, base, &mut |world_pos, id| {
                        if world_pos.chunk_pos() == pos {
                            blocks[world_pos.local_pos().index()] = id;
                        }
                    });
                }
            }
        }

        blocks
    }

    pub fn surface_height(&self, regions: &mut GenRegionCache, world_x: i32, world_z: i32) -> i32 {
        let chunk = BlockPos::new(world_x, 0, world_z).chunk_pos();
        regions.region_for(chunk).height_at(world_x, world_z)
    }
}
