//! Per-pass CPU-side parameter shaping (§4.6). Each function here produces
//! the values a pass's uniforms or fixed-function state need, and `execute`
//! routes them into the `Rhi` calls that actually apply them: clear color,
//! global uniforms, per-cascade light-space matrices.

use cgmath::Vector3;

use crate::renderer::graph::{FrameInputs, PassKind};
use crate::renderer::shadow;
use crate::rhi::Rhi;

/// Runs one pass's CPU-side shaping and feeds it into `rhi`. `splits` is
/// this frame's cascade far-distances, shared across all three shadow
/// passes so each only has to look up its own slice.
pub fn execute(pass: PassKind, inputs: &FrameInputs, rhi: &mut dyn Rhi, splits: &[f32]) {
    match pass {
        PassKind::ShadowCascade(idx) => shadow_cascade_pass(idx, inputs, rhi, splits),
        PassKind::Sky => {
            let (horizon, _sky) = sky_gradient(inputs);
            rhi.set_clear_color([horizon.x, horizon.y, horizon.z, 1.0]);
        }
        PassKind::OpaqueWorld => {
            // fog_params/karis_weight already folded into the per-frame
            // GlobalUniforms the graph writes once via `rhi.update_global`;
            // nothing pass-local left to apply here.
        }
        _ => {}
    }
}

fn shadow_cascade_pass(idx: u8, inputs: &FrameInputs, rhi: &mut dyn Rhi, splits: &[f32]) {
    let index = idx as usize;
    let Some(&split_far) = splits.get(index) else {
        log::warn!("[renderer] shadow cascade {idx} has no split distance; skipping");
        return;
    };
    let split_near = if index == 0 { inputs.camera_near } else { splits[index - 1] };
    let sun = inputs.atmosphere.sun_direction;
    let sun_dir = Vector3::new(sun.x, sun.y, sun.z);

    let cascade = shadow::build_cascade(
        inputs.camera_forward,
        inputs.camera_right,
        inputs.camera_fovy_radians,
        inputs.camera_aspect_ratio,
        sun_dir,
        split_near,
        split_far,
        shadow::SHADOW_MAP_RESOLUTION,
    );
    rhi.update_shadow_cascade(idx, cascade.light_space, cascade.split_far, cascade.texel_size);
}

/// Sky pass fullscreen gradient endpoints (§4.6 step 4).
pub fn sky_gradient(inputs: &FrameInputs) -> (glam::Vec3, glam::Vec3) {
    (inputs.atmosphere.horizon_color, inputs.atmosphere.sky_color)
}

/// Fog color follows the horizon so distant terrain blends into the sky
/// rather than clipping against it; density falls as the sun climbs so
/// overcast/night scenes keep more atmospheric haze (§4.6 step 5).
pub fn fog_params(inputs: &FrameInputs) -> (glam::Vec3, f32) {
    let density = 0.02 + (1.0 - inputs.atmosphere.day_factor) * 0.01;
    (inputs.atmosphere.horizon_color, density)
}

/// Karis average: weights a bloom-threshold sample by `1 / (1 + luma)` so a
/// single blown-out pixel cannot dominate the downsample pyramid (§4.6
/// step 9, "prevents fireflies").
pub fn karis_weight(r: f32, g: f32, b: f32) -> f32 {
    let luma = 0.2126 * r + 0.7152 * g + 0.0722 * b;
    1.0 / (1.0 + luma)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TonemapCurve {
    Aces,
    AgX,
}

impl TonemapCurve {
    pub fn from_pbr_quality(quality: crate::settings::PbrQuality) -> Self {
        match quality {
            crate::settings::PbrQuality::High => TonemapCurve::AgX,
            _ => TonemapCurve::Aces,
        }
    }
}
