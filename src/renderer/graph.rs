//! The per-frame render graph (§4.6): a fixed-order pass list, each one
//! skippable by settings or the `ZIGCRAFT_DISABLE_*` bring-up flags
//! (`Session::toggles`). `run_frame` drives the real `Rhi` frame and pass
//! boundaries; `passes` shapes the CPU-side parameters (uniforms, cascade
//! matrices, fog terms) each pass feeds into them.

use cgmath::Matrix4;

use crate::atmosphere::AtmosphereState;
use crate::camera::{Camera, CameraUniform};
use crate::rhi::{GlobalUniforms, Rhi};
use crate::session::GraphToggles;

/// One entry in the fixed pass order (§4.6). Order here is the contract:
/// pass N's writes must be visible before pass N+1 draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PassKind {
    ShadowCascade(u8),
    GBuffer,
    Ssao,
    Sky,
    OpaqueWorld,
    Clouds,
    EntitiesAndHand,
    TaaResolve,
    Bloom,
    TonemapGrade,
    Fxaa,
}

impl PassKind {
    pub const ORDER: [PassKind; 11] = [
        PassKind::ShadowCascade(0),
        PassKind::ShadowCascade(1),
        PassKind::ShadowCascade(2),
        PassKind::GBuffer,
        PassKind::Ssao,
        PassKind::Sky,
        PassKind::OpaqueWorld,
        PassKind::Clouds,
        PassKind::EntitiesAndHand,
        PassKind::TaaResolve,
        PassKind::Bloom,
        PassKind::TonemapGrade,
        PassKind::Fxaa,
    ];

    fn enabled(self, toggles: &GraphToggles) -> bool {
        match self {
            PassKind::ShadowCascade(_) => toggles.shadows,
            PassKind::GBuffer => toggles.gbuffer,
            PassKind::Ssao => toggles.ssao,
            PassKind::Clouds => toggles.clouds,
            // Sky, opaque world, entities, TAA/bloom/tonemap/FXAA have no
            // independent bring-up flag; they run whenever the graph does.
            _ => true,
        }
    }
}

/// Inputs shared by every pass this frame, built once and handed down the
/// list rather than recomputed per pass.
#[derive(Debug, Clone, Copy)]
pub struct FrameInputs {
    pub camera_uniform: CameraUniform,
    pub atmosphere: AtmosphereState,
    pub camera_forward: cgmath::Vector3<f32>,
    pub camera_right: cgmath::Vector3<f32>,
    pub camera_fovy_radians: f32,
    pub camera_aspect_ratio: f32,
    pub camera_near: f32,
    pub camera_far: f32,
}

impl FrameInputs {
    pub fn capture(camera: &Camera, atmosphere: AtmosphereState) -> Self {
        Self {
            camera_uniform: camera.uniform(),
            atmosphere,
            camera_forward: camera.forward(),
            camera_right: camera.right(),
            camera_fovy_radians: camera.fovy_radians,
            camera_aspect_ratio: camera.aspect_ratio,
            camera_near: camera.znear,
            camera_far: camera.zfar,
        }
    }

    /// The camera's eye is always the coordinate-space origin under the
    /// floating-origin convention (`Camera::view_matrix_relative`), so this
    /// is what every pass's uniforms should use for a world-space eye
    /// position rather than `Camera::eye` (which only matters for
    /// `to_relative` translation upstream of the renderer).
    fn camera_pos_relative(&self) -> [f32; 3] {
        [0.0, 0.0, 0.0]
    }

    fn global_uniforms(&self) -> GlobalUniforms {
        let (fog_color, fog_density) = crate::renderer::passes::fog_params(self);
        let bloom_threshold_weight = crate::renderer::passes::karis_weight(1.0, 1.0, 1.0);
        GlobalUniforms {
            view_proj: Matrix4::from(self.camera_uniform.view_projection_matrix),
            cam_pos: self.camera_pos_relative(),
            sun_dir: self.atmosphere.sun_direction.to_array(),
            fog_color: fog_color.to_array(),
            fog_density,
            bloom_threshold_weight,
        }
    }
}

/// One pass's outcome: whether it ran, for frame-diagnostics and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
    Ran,
    SkippedByToggle,
}

/// Executes the fixed pass order for one frame, returning which passes ran.
/// Opens the frame and drives pass boundaries on `rhi`; skipped passes never
/// touch it. A failed `begin_frame` (surface lost, device gone) drops the
/// whole frame rather than drawing into a half-initialized target.
pub fn run_frame(rhi: &mut dyn Rhi, inputs: &FrameInputs, toggles: &GraphToggles) -> Vec<(PassKind, PassOutcome)> {
    if let Err(err) = rhi.begin_frame() {
        log::warn!("[renderer] dropping frame: {err}");
        return Vec::new();
    }

    rhi.update_global(inputs.global_uniforms());

    let splits = crate::renderer::shadow::cascade_split_distances(
        inputs.camera_near,
        inputs.camera_far,
        crate::renderer::shadow::SPLIT_LAMBDA,
        crate::renderer::shadow::SHADOW_CASCADE_COUNT,
    );

    let mut main_pass_open = false;
    let results: Vec<(PassKind, PassOutcome)> = PassKind::ORDER
        .iter()
        .map(|&pass| {
            if !pass.enabled(toggles) {
                return (pass, PassOutcome::SkippedByToggle);
            }

            match pass {
                PassKind::ShadowCascade(idx) => {
                    rhi.begin_shadow_pass(idx);
                    crate::renderer::passes::execute(pass, inputs, rhi, &splits);
                    rhi.end_shadow_pass();
                }
                _ => {
                    if !main_pass_open {
                        rhi.begin_main_pass();
                        main_pass_open = true;
                    }
                    crate::renderer::passes::execute(pass, inputs, rhi, &splits);
                }
            }
            (pass, PassOutcome::Ran)
        })
        .collect();

    if main_pass_open {
        rhi.end_main_pass();
    }
    rhi.end_frame();
    results
}
