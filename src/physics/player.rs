//! Player movement: axis-by-axis (Y, X, Z) swept-AABB voxel collision,
//! grounded detection, and the jump/fly toggle (§4.7).

use cgmath::{Point3, Vector3, Zero};

use crate::physics::aabb::{self, AABB};
use crate::world::block::BlockId;
use crate::world::coords::BlockPos;

pub const EYE_HEIGHT: f32 = 1.62;
const HALF_WIDTH: f32 = 0.3;
const HALF_HEIGHT: f32 = 0.9;
const GRAVITY: f32 = -32.0;
const JUMP_SPEED: f32 = 9.0;
const FLY_SPEED: f32 = 10.0;
const TERMINAL_VELOCITY: f32 = -78.4;

/// Axis sweep order the spec mandates: Y first (so a horizontal move can't
/// slide the player off a ledge it would otherwise have landed on), then X,
/// then Z.
const AXIS_ORDER: [usize; 3] = [1, 0, 2];

#[derive(Debug, Clone, Copy)]
pub struct Player {
    /// Center of the player's collision box.
    pub position: Point3<f32>,
    pub velocity: Vector3<f32>,
    pub grounded: bool,
    pub flying: bool,
}

impl Player {
    pub fn new(spawn: Point3<f32>) -> Self {
        Self { position: spawn, velocity: Vector3::zero(), grounded: false, flying: false }
    }

    pub fn half_extents(&self) -> Vector3<f32> {
        Vector3::new(HALF_WIDTH, HALF_HEIGHT, HALF_WIDTH)
    }

    pub fn aabb(&self) -> AABB {
        aabb::aabb_from_center_half_extents(self.position, self.half_extents())
    }

    pub fn eye_position(&self) -> Point3<f32> {
        Point3::new(self.position.x, self.position.y - HALF_HEIGHT + EYE_HEIGHT, self.position.z)
    }

    pub fn toggle_fly(&mut self) {
        self.flying = !self.flying;
        if self.flying {
            self.velocity.y = 0.0;
        }
    }

    pub fn jump(&mut self) {
        if self.flying {
            return;
        }
        if self.grounded {
            self.velocity.y = JUMP_SPEED;
            self.grounded = false;
        }
    }

    /// Integrates gravity (unless flying) and horizontal input into
    /// velocity, then resolves the move against the voxel world one axis at
    /// a time. `is_solid` answers whether the block at a world position
    /// blocks movement; a missing chunk should report `true` (treat as
    /// solid) so the player never sweeps into unloaded space.
    pub fn step(&mut self, horizontal_intent: Vector3<f32>, dt: f32, is_solid: impl Fn(BlockPos) -> bool) {
        if self.flying {
            self.velocity.x = horizontal_intent.x * FLY_SPEED;
            self.velocity.z = horizontal_intent.z * FLY_SPEED;
        } else {
            self.velocity.x = horizontal_intent.x * 4.3;
            self.velocity.z = horizontal_intent.z * 4.3;
            self.velocity.y = (self.velocity.y + GRAVITY * dt).max(TERMINAL_VELOCITY);
        }

        let delta = self.velocity * dt;
        self.grounded = false;

        for axis in AXIS_ORDER {
            let d = component(delta, axis);
            if d == 0.0 {
                continue;
            }
            let moving_box = self.aabb();
            let mut t = 1.0f32;
            for blocker in swept_block_candidates(&moving_box, axis, d, &is_solid) {
                if aabb::overlaps_other_axes(&moving_box, &blocker, axis) {
                    if let Some(hit_t) = aabb::sweep_axis(&moving_box, d, axis, &blocker) {
                        t = t.min(hit_t);
                    }
                }
            }
            set_component(&mut self.position, axis, component_point(self.position, axis) + d * t);
            if t < 1.0 {
                if axis == 1 && d < 0.0 {
                    self.grounded = true;
                }
                set_component_vec(&mut self.velocity, axis, 0.0);
            }
        }
    }
}

fn component(v: Vector3<f32>, axis: usize) -> f32 {
    match axis {
        0 => v.x,
        1 => v.y,
        _ => v.z,
    }
}

fn component_point(p: Point3<f32>, axis: usize) -> f32 {
    match axis {
        0 => p.x,
        1 => p.y,
        _ => p.z,
    }
}

fn set_component(p: &mut Point3<f32>, axis: usize, value: f32) {
    match axis {
        0 => p.x = value,
        1 => p.y = value,
        _ => p.z = value,
    }
}

fn set_component_vec(v: &mut Vector3<f32>, axis: usize, value: f32) {
    match axis {
        0 => v.x = value,
        1 => v.y = value,
        _ => v.z = value,
    }
}

/// Solid-block AABBs whose broad-phase box (along `axis`, widened by the
/// pending displacement `d`) could touch `moving_box`.
fn swept_block_candidates(moving_box: &AABB, axis: usize, d: f32, is_solid: &impl Fn(BlockPos) -> bool) -> Vec<AABB> {
    let mut lo = [moving_box.min.x.floor() as i32, moving_box.min.y.floor() as i32, moving_box.min.z.floor() as i32];
    let mut hi = [moving_box.max.x.ceil() as i32, moving_box.max.y.ceil() as i32, moving_box.max.z.ceil() as i32];
    if d > 0.0 {
        hi[axis] += d.ceil() as i32 + 1;
    } else {
        lo[axis] -= (-d).ceil() as i32 + 1;
    }

    let mut out = Vec::new();
    for x in lo[0]..hi[0] {
        for y in lo[1]..hi[1] {
            for z in lo[2]..hi[2] {
                let pos = BlockPos::new(x, y, z);
                if is_solid(pos) {
                    out.push(AABB {
                        min: Point3::new(x as f32, y as f32, z as f32),
                        max: Point3::new(x as f32 + 1.0, y as f32 + 1.0, z as f32 + 1.0),
                    });
                }
            }
        }
    }
    out
}

/// `BlockId::AIR` and non-solid registry entries never block movement;
/// everything else does.
pub fn block_blocks_movement(id: BlockId) -> bool {
    crate::world::block::registry().is_solid(id)
}
