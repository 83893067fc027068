//! Axis-aligned bounding boxes: pure data plus free functions, no methods
//! (matches the engine's data-oriented style throughout `physics`).

use cgmath::{Point3, Vector3};

#[derive(Debug, Clone, Copy)]
pub struct AABB {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

pub fn create_aabb(min: Point3<f32>, max: Point3<f32>) -> AABB {
    AABB { min, max }
}

pub fn aabb_from_center_half_extents(center: Point3<f32>, half_extents: Vector3<f32>) -> AABB {
    AABB {
        min: Point3::new(center.x - half_extents.x, center.y - half_extents.y, center.z - half_extents.z),
        max: Point3::new(center.x + half_extents.x, center.y + half_extents.y, center.z + half_extents.z),
    }
}

pub fn aabb_center(aabb: &AABB) -> Point3<f32> {
    Point3::new(
        (aabb.min.x + aabb.max.x) * 0.5,
        (aabb.min.y + aabb.max.y) * 0.5,
        (aabb.min.z + aabb.max.z) * 0.5,
    )
}

pub fn aabb_half_extents(aabb: &AABB) -> Vector3<f32> {
    Vector3::new(
        (aabb.max.x - aabb.min.x) * 0.5,
        (aabb.max.y - aabb.min.y) * 0.5,
        (aabb.max.z - aabb.min.z) * 0.5,
    )
}

pub fn aabb_intersects(a: &AABB, b: &AABB) -> bool {
    a.min.x <= b.max.x && a.max.x >= b.min.x &&
    a.min.y <= b.max.y && a.max.y >= b.min.y &&
    a.min.z <= b.max.z && a.max.z >= b.min.z
}

pub fn aabb_contains_point(aabb: &AABB, point: Point3<f32>) -> bool {
    point.x >= aabb.min.x && point.x <= aabb.max.x &&
    point.y >= aabb.min.y && point.y <= aabb.max.y &&
    point.z >= aabb.min.z && point.z <= aabb.max.z
}

pub fn aabb_translated(aabb: &AABB, offset: Vector3<f32>) -> AABB {
    AABB { min: aabb.min + offset, max: aabb.max + offset }
}

/// One axis of the swept-AABB voxel sweep (§4.7): how far `aabb` can move
/// along `axis` before it first touches `blocker`, clamped to `[0, 1]` of
/// the requested displacement `delta`. `None` if they never touch.
pub fn sweep_axis(aabb: &AABB, delta: f32, axis: usize, blocker: &AABB) -> Option<f32> {
    let (min, max, bmin, bmax) = match axis {
        0 => (aabb.min.x, aabb.max.x, blocker.min.x, blocker.max.x),
        1 => (aabb.min.y, aabb.max.y, blocker.min.y, blocker.max.y),
        _ => (aabb.min.z, aabb.max.z, blocker.min.z, blocker.max.z),
    };

    if delta > 0.0 {
        if max <= bmin {
            Some(((bmin - max) / delta).clamp(0.0, 1.0))
        } else {
            None
        }
    } else if delta < 0.0 {
        if min >= bmax {
            Some(((bmax - min) / delta).clamp(0.0, 1.0))
        } else {
            None
        }
    } else {
        None
    }
}

/// True if `aabb`'s span on the two axes other than `axis` overlaps `other`'s.
pub fn overlaps_other_axes(aabb: &AABB, other: &AABB, axis: usize) -> bool {
    match axis {
        0 => aabb.min.y < other.max.y && aabb.max.y > other.min.y &&
             aabb.min.z < other.max.z && aabb.max.z > other.min.z,
        1 => aabb.min.x < other.max.x && aabb.max.x > other.min.x &&
             aabb.min.z < other.max.z && aabb.max.z > other.min.z,
        _ => aabb.min.x < other.max.x && aabb.max.x > other.min.x &&
             aabb.min.y < other.max.y && aabb.max.y > other.min.y,
    }
}
