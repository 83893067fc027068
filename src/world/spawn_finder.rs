//! Deterministic spawn-point search (§13): scans outward in rings from the
//! world origin for the first column whose generated surface sits above sea
//! level. Works directly off the generator rather than loaded chunks, so a
//! spawn point exists before anything has been generated.

use crate::generation::climate::SEA_LEVEL;
use crate::generation::region::GenRegionCache;
use crate::generation::Generator;
use crate::world::coords::BlockPos;

const SEARCH_RINGS: i32 = 32;
const SEARCH_STEP: i32 = 4;

/// Finds a safe spawn point, standing one block above the first dry surface
/// found scanning outward from the origin. Falls back to a fixed point just
/// above sea level if nothing dry turns up within the search rings.
pub fn find_safe_spawn(generator: &Generator, cache: &mut GenRegionCache) -> BlockPos {
    for ring in 0..=SEARCH_RINGS {
        for (rx, rz) in ring_offsets(ring) {
            let wx = rx * SEARCH_STEP;
            let wz = rz * SEARCH_STEP;
            if let Some(pos) = safe_column_at(generator, cache, wx, wz) {
                return pos;
            }
        }
    }
    BlockPos::new(0, SEA_LEVEL + 1, 0)
}

fn safe_column_at(generator: &Generator, cache: &mut GenRegionCache, wx: i32, wz: i32) -> Option<BlockPos> {
    let height = generator.surface_height(cache, wx, wz);
    if height > SEA_LEVEL {
        Some(BlockPos::new(wx, height + 1, wz))
    } else {
        None
    }
}

/// Offsets (in ring units) tracing the square ring `ring` blocks out from
/// the origin; `ring == 0` is just the origin itself.
fn ring_offsets(ring: i32) -> Vec<(i32, i32)> {
    if ring == 0 {
        return vec![(0, 0)];
    }
    let mut offsets = Vec::with_capacity((ring * 8) as usize);
    for x in -ring..=ring {
        offsets.push((x, -ring));
        offsets.push((x, ring));
    }
    for z in (-ring + 1)..ring {
        offsets.push((-ring, z));
        offsets.push((ring, z));
    }
    offsets
}
