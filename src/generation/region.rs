//! GenRegion: a 5x5-chunk working set of precomputed heights and biome
//! blends (§3.5). Feature placement near a chunk edge (a tree canopy
//! spilling into the neighbor) needs the neighbor's column data without
//! resampling noise for it, so generation works region-at-a-time and keeps
//! a small LRU of recently used regions.

use std::collections::{HashMap, VecDeque};

use crate::generation::biome::{classify, BiomeBlend};
use crate::generation::climate::{height_from_climate, ClimateNoise};
use crate::world::coords::{ChunkPos, CHUNK_WIDTH};

pub const REGION_CHUNKS: i32 = 5;

pub struct GenRegion {
    origin: ChunkPos,
    width_blocks: i32,
    heights: Vec<i32>,
    blends: Vec<BiomeBlend>,
    continentalness: Vec<f64>,
    exposure: Vec<f64>,
}

/// How far a column's shore-distance search looks before giving up and
/// calling the column landlocked (beaches never need to be wider than this).
pub const SHORE_SCAN_RADIUS: i32 = 8;

impl GenRegion {
    fn build(seed: u32, origin: ChunkPos) -> Self {
        let climate = ClimateNoise::new(seed);
        let width_blocks = REGION_CHUNKS * CHUNK_WIDTH;
        let mut heights = Vec::with_capacity((width_blocks * width_blocks) as usize);
        let mut blends = Vec::with_capacity((width_blocks * width_blocks) as usize);
        let mut continentalness = Vec::with_capacity((width_blocks * width_blocks) as usize);
        let mut exposure = Vec::with_capacity((width_blocks * width_blocks) as usize);
        let min = origin.min_block();

        for lz in 0..width_blocks {
            for lx in 0..width_blocks {
                let sample = climate.sample((min.x + lx) as f64, (min.z + lz) as f64);
                heights.push(height_from_climate(sample));
                blends.push(classify(sample));
                continentalness.push(sample.continentalness);
                exposure.push(sample.exposure);
            }
        }

        Self { origin, width_blocks, heights, blends, continentalness, exposure }
    }

    fn index(&self, world_x: i32, world_z: i32) -> usize {
        let min = self.origin.min_block();
        let lx = (world_x - min.x) as usize;
        let lz = (world_z - min.z) as usize;
        lz * self.width_blocks as usize + lx
    }

    pub fn height_at(&self, world_x: i32, world_z: i32) -> i32 {
        self.heights[self.index(world_x, world_z)]
    }

    pub fn blend_at(&self, world_x: i32, world_z: i32) -> BiomeBlend {
        self.blends[self.index(world_x, world_z)]
    }

    pub fn exposure_at(&self, world_x: i32, world_z: i32) -> f64 {
        self.exposure[self.index(world_x, world_z)]
    }

    /// A column counts as ocean water rather than an inland lake or river
    /// when its shelf sits below the continental baseline (§4.1 Phase A).
    pub fn is_ocean_at(&self, world_x: i32, world_z: i32) -> bool {
        self.continentalness[self.index(world_x, world_z)] < 0.0
    }

    /// `max|Δh|` over the 4-neighborhood (§4.1 Phase C). Columns at a region
    /// edge only look at whichever neighbors the region actually covers.
    pub fn slope_at(&self, world_x: i32, world_z: i32) -> i32 {
        let h = self.height_at(world_x, world_z);
        let mut max_delta = 0;
        for (dx, dz) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
            let (nx, nz) = (world_x + dx, world_z + dz);
            if self.covers(nx, nz) {
                max_delta = max_delta.max((h - self.height_at(nx, nz)).abs());
            }
        }
        max_delta
    }

    /// Chebyshev distance in blocks to the nearest ocean column, capped at
    /// [`SHORE_SCAN_RADIUS`] (beaches never need to look further than that).
    pub fn shore_dist_ocean_at(&self, world_x: i32, world_z: i32) -> i32 {
        if self.is_ocean_at(world_x, world_z) {
            return 0;
        }
        for r in 1..=SHORE_SCAN_RADIUS {
            for dz in -r..=r {
                for dx in -r..=r {
                    if dx.abs().max(dz.abs()) != r {
                        continue;
                    }
                    let (nx, nz) = (world_x + dx, world_z + dz);
                    if self.covers(nx, nz) && self.is_ocean_at(nx, nz) {
                        return r;
                    }
                }
            }
        }
        SHORE_SCAN_RADIUS + 1
    }

    /// True if `world_x, world_z` falls within this region's covered area
    /// (callers straddling a region boundary need a second lookup).
    pub fn covers(&self, world_x: i32, world_z: i32) -> bool {
        let min = self.origin.min_block();
        let max_x = min.x + self.width_blocks;
        let max_z = min.z + self.width_blocks;
        world_x >= min.x && world_x < max_x && world_z >= min.z && world_z < max_z
    }
}

/// LRU cache of recently built regions, bounded so long play sessions don't
/// retain every region ever visited.
pub struct GenRegionCache {
    seed: u32,
    capacity: usize,
    regions: HashMap<ChunkPos, GenRegion>,
    recency: VecDeque<ChunkPos>,
}

impl GenRegionCache {
    pub fn new(seed: u32, capacity: usize) -> Self {
        Self { seed, capacity: capacity.max(1), regions: HashMap::new(), recency: VecDeque::new() }
    }

    pub fn region_for(&mut self, chunk: ChunkPos) -> &GenRegion {
        let origin = chunk.region_origin(REGION_CHUNKS);

        if !self.regions.contains_key(&origin) {
            if self.regions.len() >= self.capacity {
                if let Some(evicted) = self.recency.pop_front() {
                    self.regions.remove(&evicted);
                }
            }
            self.regions.insert(origin, GenRegion::build(self.seed, origin));
        } else {
            self.recency.retain(|&p| p != origin);
        }
        self.recency.push_back(origin);
        self.regions.get(&origin).expect("just inserted")
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_covers_its_own_chunk_origin() {
        let mut cache = GenRegionCache::new(1, 4);
        let chunk = ChunkPos::new(0, 0);
        let region = cache.region_for(chunk);
        let min = chunk.min_block();
        assert!(region.covers(min.x, min.z));
    }

    #[test]
    fn cache_evicts_least_recently_used_beyond_capacity() {
        let mut cache = GenRegionCache::new(1, 2);
        cache.region_for(ChunkPos::new(0, 0));
        cache.region_for(ChunkPos::new(100, 0));
        cache.region_for(ChunkPos::new(200, 0));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn same_chunk_reuses_cached_region_without_growing() {
        let mut cache = GenRegionCache::new(1, 4);
        cache.region_for(ChunkPos::new(0, 0));
        cache.region_for(ChunkPos::new(0, 0));
        assert_eq!(cache.len(), 1);
    }
}
