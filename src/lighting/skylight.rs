//! Downward column sweep that seeds skylight for a freshly generated chunk,
//! plus the incremental column update used after a block edit (§4.3).

use crate::lighting::{LightAccess, LightType, LIGHT_FALLOFF, MAX_LIGHT_LEVEL};
use crate::world::coords::{BlockPos, CHUNK_HEIGHT, CHUNK_WIDTH};

/// Seeds skylight top-down for every column in a chunk: full brightness
/// until the first non-transparent block, falling off by one per block of
/// transparent material below it (matches the generator's definition of
/// "directly open to sky", §4.3).
pub fn calculate_chunk_skylight(world: &mut impl LightAccess, chunk_min: BlockPos) {
    for local_x in 0..CHUNK_WIDTH {
        for local_z in 0..CHUNK_WIDTH {
            let x = chunk_min.x + local_x;
            let z = chunk_min.z + local_z;
            let mut above_light = MAX_LIGHT_LEVEL;

            for y in (0..CHUNK_HEIGHT).rev() {
                let pos = BlockPos::new(x, y, z);
                let level = if !world.passes_light(pos) {
                    0
                } else if above_light == MAX_LIGHT_LEVEL {
                    MAX_LIGHT_LEVEL
                } else {
                    above_light.saturating_sub(LIGHT_FALLOFF)
                };
                world.set_sky_light(pos, level);
                above_light = level;
            }
        }
    }
}

/// Re-levels the column through `x, z` after a block was placed or removed
/// at `y`, without a full BFS: light only ever needs to extend further down
/// (block removed) or get cut off below (block placed).
pub fn update_column(world: &mut impl LightAccess, x: i32, z: i32, edited_y: i32) {
    let pos = BlockPos::new(x, edited_y, z);
    if world.passes_light(pos) {
        let above = world.get_sky_light(BlockPos::new(x, edited_y + 1, z));
        if above == MAX_LIGHT_LEVEL {
            let mut y = edited_y;
            while y >= 0 {
                let p = BlockPos::new(x, y, z);
                if !world.passes_light(p) {
                    break;
                }
                world.set_sky_light(p, MAX_LIGHT_LEVEL);
                y -= 1;
            }
        }
    } else {
        let mut y = edited_y - 1;
        while y >= 0 {
            let p = BlockPos::new(x, y, z);
            if world.get_light(p, LightType::Sky) == 0 {
                break;
            }
            world.set_sky_light(p, 0);
            y -= 1;
        }
    }
}
