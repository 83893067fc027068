//! DDA voxel raycast for block targeting (§4.7).

use cgmath::{InnerSpace, Point3, Vector3};

use crate::world::coords::BlockPos;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockFace {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl BlockFace {
    pub fn normal(self) -> Vector3<f32> {
        match self {
            BlockFace::PosX => Vector3::new(1.0, 0.0, 0.0),
            BlockFace::NegX => Vector3::new(-1.0, 0.0, 0.0),
            BlockFace::PosY => Vector3::new(0.0, 1.0, 0.0),
            BlockFace::NegY => Vector3::new(0.0, -1.0, 0.0),
            BlockFace::PosZ => Vector3::new(0.0, 0.0, 1.0),
            BlockFace::NegZ => Vector3::new(0.0, 0.0, -1.0),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RaycastHit {
    pub block: BlockPos,
    pub face: BlockFace,
    pub distance: f32,
}

/// Steps a DDA grid walk from `origin` along `direction` (need not be
/// normalized) until `is_solid` reports a hit or `max_distance` is exceeded.
/// Implements the Amanatides-Woo voxel traversal.
pub fn cast_ray(origin: Point3<f32>, direction: Vector3<f32>, max_distance: f32, is_solid: impl Fn(BlockPos) -> bool) -> Option<RaycastHit> {
    let dir = direction.normalize();
    if !dir.x.is_finite() || !dir.y.is_finite() || !dir.z.is_finite() {
        return None;
    }

    let mut x = origin.x.floor() as i32;
    let mut y = origin.y.floor() as i32;
    let mut z = origin.z.floor() as i32;

    let step_x = sign(dir.x);
    let step_y = sign(dir.y);
    let step_z = sign(dir.z);

    let t_delta_x = if dir.x != 0.0 { (1.0 / dir.x).abs() } else { f32::INFINITY };
    let t_delta_y = if dir.y != 0.0 { (1.0 / dir.y).abs() } else { f32::INFINITY };
    let t_delta_z = if dir.z != 0.0 { (1.0 / dir.z).abs() } else { f32::INFINITY };

    let mut t_max_x = next_boundary_distance(origin.x, dir.x, x);
    let mut t_max_y = next_boundary_distance(origin.y, dir.y, y);
    let mut t_max_z = next_boundary_distance(origin.z, dir.z, z);

    let mut last_face = BlockFace::PosY;
    let mut t = 0.0f32;

    while t <= max_distance {
        if is_solid(BlockPos::new(x, y, z)) {
            return Some(RaycastHit { block: BlockPos::new(x, y, z), face: last_face, distance: t });
        }

        if t_max_x < t_max_y && t_max_x < t_max_z {
            x += step_x;
            t = t_max_x;
            t_max_x += t_delta_x;
            last_face = if step_x > 0 { BlockFace::NegX } else { BlockFace::PosX };
        } else if t_max_y < t_max_z {
            y += step_y;
            t = t_max_y;
            t_max_y += t_delta_y;
            last_face = if step_y > 0 { BlockFace::NegY } else { BlockFace::PosY };
        } else {
            z += step_z;
            t = t_max_z;
            t_max_z += t_delta_z;
            last_face = if step_z > 0 { BlockFace::NegZ } else { BlockFace::PosZ };
        }
    }

    None
}

fn sign(v: f32) -> i32 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}

fn next_boundary_distance(origin: f32, dir: f32, cell: i32) -> f32 {
    if dir > 0.0 {
        ((cell as f32 + 1.0) - origin) / dir
    } else if dir < 0.0 {
        (cell as f32 - origin) / dir
    } else {
        f32::INFINITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ray_hits_block_directly_ahead() {
        let hit = cast_ray(
            Point3::new(0.5, 0.5, 0.5),
            Vector3::new(1.0, 0.0, 0.0),
            10.0,
            |pos| pos.x == 3,
        );
        let hit = hit.expect("expected a hit");
        assert_eq!(hit.block, BlockPos::new(3, 0, 0));
        assert_eq!(hit.face, BlockFace::NegX);
    }

    #[test]
    fn ray_misses_beyond_max_distance() {
        let hit = cast_ray(Point3::new(0.5, 0.5, 0.5), Vector3::new(1.0, 0.0, 0.0), 2.0, |pos| pos.x == 10);
        assert!(hit.is_none());
    }

    #[test]
    fn ray_reports_top_face_when_approached_from_above() {
        let hit = cast_ray(
            Point3::new(0.5, 5.0, 0.5),
            Vector3::new(0.0, -1.0, 0.0),
            10.0,
            |pos| pos.y == 2,
        )
        .unwrap();
        assert_eq!(hit.face, BlockFace::PosY);
    }
}
