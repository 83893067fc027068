//! BFS light propagation and removal, as explicit queue-driven loops rather
//! than recursion (same add/remove-queue algorithm the engine's light
//! propagator uses, just iterative so a long lit corridor can't blow the
//! stack).

use std::collections::VecDeque;

use crate::lighting::{neighbors, LightAccess, LightType, LIGHT_FALLOFF, MAX_LIGHT_LEVEL};
use crate::world::coords::BlockPos;

#[derive(Default)]
pub struct LightQueues {
    add: VecDeque<(BlockPos, LightType, u8)>,
    remove: VecDeque<(BlockPos, LightType, u8)>,
}

impl LightQueues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_add(&mut self, pos: BlockPos, kind: LightType, level: u8) {
        self.add.push_back((pos, kind, level));
    }

    pub fn queue_remove(&mut self, pos: BlockPos, kind: LightType, old_level: u8) {
        self.remove.push_back((pos, kind, old_level));
    }

    /// Drains removals first (so a removed source's former neighbors either
    /// go dark or get re-lit by whoever else reaches them), then additions.
    pub fn drain(&mut self, world: &mut impl LightAccess) {
        while let Some((pos, kind, old_level)) = self.remove.pop_front() {
            self.remove_one(world, pos, kind, old_level);
        }
        while let Some((pos, kind, level)) = self.add.pop_front() {
            self.add_one(world, pos, kind, level);
        }
    }

    fn add_one(&mut self, world: &mut impl LightAccess, pos: BlockPos, kind: LightType, level: u8) {
        if !world.is_loaded(pos) {
            return;
        }
        if !world.passes_light(pos) {
            return;
        }
        if level <= world.get_light(pos, kind) {
            return;
        }
        world.set_light(pos, kind, level);

        if level <= LIGHT_FALLOFF {
            return;
        }
        let next_level = level - LIGHT_FALLOFF;
        for neighbor in neighbors(pos) {
            if kind == LightType::Sky && neighbor.y < pos.y && level == MAX_LIGHT_LEVEL {
                self.add.push_back((neighbor, kind, MAX_LIGHT_LEVEL));
            } else {
                self.add.push_back((neighbor, kind, next_level));
            }
        }
    }

    fn remove_one(&mut self, world: &mut impl LightAccess, pos: BlockPos, kind: LightType, old_level: u8) {
        if !world.is_loaded(pos) {
            return;
        }
        let current = world.get_light(pos, kind);
        if current != old_level {
            return;
        }
        world.set_light(pos, kind, 0);

        for neighbor in neighbors(pos) {
            if !world.is_loaded(neighbor) {
                continue;
            }
            let neighbor_level = world.get_light(neighbor, kind);
            if neighbor_level == 0 {
                continue;
            }
            if neighbor_level < old_level {
                self.remove.push_back((neighbor, kind, neighbor_level));
            } else {
                self.add.push_back((neighbor, kind, neighbor_level));
            }
        }
    }
}
