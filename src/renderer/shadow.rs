//! Cascaded shadow map math (§4.6 step 1): split distances for the camera's
//! view frustum, and a texel-snapped orthographic light-space matrix per
//! cascade. Grounded on `camera/mod.rs`'s floating-origin convention — the
//! camera eye is always the origin, so cascade frustum corners are built
//! directly from `forward`/`right`/`fovy`/`aspect` rather than an eye
//! position.

use cgmath::{ortho, InnerSpace, Matrix4, Point3, Transform, Vector3};

pub const SHADOW_MAP_RESOLUTION: u32 = 2048;
pub const SHADOW_CASCADE_COUNT: usize = 3;

/// Blend factor between the logarithmic and uniform split schemes. Near 0
/// gives evenly sized slices (wastes resolution close to the camera); near 1
/// gives the classic log split (undersamples distant geometry). 0.6 sits
/// close to the log end while keeping the nearest cascade from collapsing
/// to almost nothing.
pub const SPLIT_LAMBDA: f32 = 0.6;

/// Extra depth, in blocks, added on each side of a cascade's light-space
/// bounding box so a caster just outside the visible frustum slice still
/// lands inside the shadow map instead of clipping.
const DEPTH_PADDING: f32 = 4.0;

#[derive(Debug, Clone, Copy)]
pub struct ShadowCascade {
    pub light_space: Matrix4<f32>,
    pub split_far: f32,
    pub texel_size: f32,
}

/// Splits `[near, far]` into `count` slices using a blend of the
/// logarithmic and uniform schemes (§4.6 step 1). Returns each slice's far
/// distance; a slice's near distance is the previous entry's far distance
/// (or `near` for the first slice).
pub fn cascade_split_distances(near: f32, far: f32, lambda: f32, count: usize) -> Vec<f32> {
    (1..=count)
        .map(|i| {
            let fraction = i as f32 / count as f32;
            let log_split = near * (far / near).powf(fraction);
            let linear_split = near + (far - near) * fraction;
            lambda * log_split + (1.0 - lambda) * linear_split
        })
        .collect()
}

/// Rounds `value` down to the nearest multiple of `texel_size`, so a light
/// bounding box recomputed one frame later (as the camera moves) keeps its
/// texels aligned to the same world-space grid instead of sliding and
/// producing shimmering shadow edges.
pub fn snap_to_texel(value: f32, texel_size: f32) -> f32 {
    if texel_size <= f32::EPSILON {
        return value;
    }
    (value / texel_size).floor() * texel_size
}

fn frustum_corners(
    forward: Vector3<f32>,
    right: Vector3<f32>,
    up: Vector3<f32>,
    fovy_radians: f32,
    aspect_ratio: f32,
    near: f32,
    far: f32,
) -> [Vector3<f32>; 8] {
    let tan_half_fovy = (fovy_radians * 0.5).tan();
    let mut corners = [Vector3::new(0.0, 0.0, 0.0); 8];
    let mut i = 0;
    for depth in [near, far] {
        let half_height = depth * tan_half_fovy;
        let half_width = half_height * aspect_ratio;
        let center = forward * depth;
        for sy in [-1.0f32, 1.0] {
            for sx in [-1.0f32, 1.0] {
                corners[i] = center + up * (half_height * sy) + right * (half_width * sx);
                i += 1;
            }
        }
    }
    corners
}

/// Builds the light-space matrix for one cascade covering `[near, far]`
/// along the camera's forward axis (§4.6 step 1). `sun_dir` points from the
/// sun toward the scene, matching `AtmosphereState::sun_direction`. Takes
/// the camera's basis vectors directly rather than a `Camera` so it stays
/// usable from the per-frame inputs captured once at frame start.
pub fn build_cascade(
    forward: Vector3<f32>,
    right: Vector3<f32>,
    fovy_radians: f32,
    aspect_ratio: f32,
    sun_dir: Vector3<f32>,
    near: f32,
    far: f32,
    resolution: u32,
) -> ShadowCascade {
    let up = right.cross(forward).normalize();
    let corners = frustum_corners(forward, right, up, fovy_radians, aspect_ratio, near, far);

    let light_dir = sun_dir.normalize();
    let light_up = if light_dir.y.abs() > 0.99 { Vector3::unit_x() } else { Vector3::unit_y() };
    let light_view = Matrix4::look_at_rh(Point3::new(0.0, 0.0, 0.0), Point3::from_vec(light_dir), light_up);

    let mut min = Vector3::new(f32::MAX, f32::MAX, f32::MAX);
    let mut max = Vector3::new(f32::MIN, f32::MIN, f32::MIN);
    for corner in &corners {
        let p = light_view.transform_point(Point3::new(corner.x, corner.y, corner.z));
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        min.z = min.z.min(p.z);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
        max.z = max.z.max(p.z);
    }

    let width = (max.x - min.x).max(1e-3);
    let height = (max.y - min.y).max(1e-3);
    let half_extent = width.max(height) * 0.5;
    let texel_size = (half_extent * 2.0) / resolution.max(1) as f32;

    let center_x = snap_to_texel((min.x + max.x) * 0.5, texel_size);
    let center_y = snap_to_texel((min.y + max.y) * 0.5, texel_size);

    let ortho_proj = ortho(
        center_x - half_extent,
        center_x + half_extent,
        center_y - half_extent,
        center_y + half_extent,
        -max.z - DEPTH_PADDING,
        -min.z + DEPTH_PADDING,
    );

    ShadowCascade { light_space: ortho_proj * light_view, split_far: far, texel_size }
}
