//! Phase E: feature placement. Trees and cacti are placed deterministically
//! from a hash of world seed and column position rather than an RNG stream,
//! so the same seed always yields the same forest (§4.1 Phase E).

use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;

use crate::generation::biome::Biome;
use crate::world::block::BlockId;
use crate::world::coords::BlockPos;

const TREE_CHANCE_PER_MILLE: u64 = 15;
const CACTUS_CHANCE_PER_MILLE: u64 = 6;
/// Columns within this many blocks of sea level never grow trees, even in a
/// tree-capable biome (keeps beaches clear).
const COASTAL_NO_TREE_BAND: i32 = 4;

#[derive(Debug, Clone, Copy)]
pub enum Feature {
    Tree { trunk_height: i32 },
    Cactus,
}

fn column_hash(seed: u32, x: i32, z: i32, salt: u32) -> u64 {
    let mut hasher = FxHasher::default();
    (seed, salt, x, z).hash(&mut hasher);
    hasher.finish()
}

/// Decides whether a feature roots at column `(x, z)`, given the biome
/// blend's dominant biome and the column's height relative to sea level.
pub fn feature_at(seed: u32, x: i32, z: i32, dominant: Biome, height_above_sea: i32) -> Option<Feature> {
    if dominant.grows_trees() {
        if height_above_sea.abs() <= COASTAL_NO_TREE_BAND {
            return None;
        }
        if column_hash(seed, x, z, 30) % 1000 < TREE_CHANCE_PER_MILLE {
            let trunk_height = 4 + (column_hash(seed, x, z, 31) % 3) as i32;
            return Some(Feature::Tree { trunk_height });
        }
    } else if matches!(dominant, Biome::Desert) {
        if column_hash(seed, x, z, 32) % 1000 < CACTUS_CHANCE_PER_MILLE {
            return Some(Feature::Cactus);
        }
    }
    None
}

/// Writes a feature's blocks via `set_block`, rooted at `base` (the surface
/// block the feature stands on, so the first placed block is one above it).
pub fn place_feature(feature: Feature, base: BlockPos, set_block: &mut impl FnMut(BlockPos, BlockId)) {
    match feature {
        Feature::Tree { trunk_height } => {
            for i in 1..=trunk_height {
                set_block(base.offset(0, i, 0), BlockId::WOOD);
            }
            let canopy_center = base.offset(0, trunk_height, 0);
            for dx in -2..=2 {
                for dz in -2..=2 {
                    for dy in -1..=2 {
                        if dx.abs() + dz.abs() + dy.abs() > 4 {
                            continue;
                        }
                        set_block(canopy_center.offset(dx, dy, dz), BlockId::LEAVES);
                    }
                }
            }
        }
        Feature::Cactus => {
            set_block(base.offset(0, 1, 0), BlockId::CACTUS);
            set_block(base.offset(0, 2, 0), BlockId::CACTUS);
        }
    }
}
