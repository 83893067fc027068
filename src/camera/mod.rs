//! Floating-origin camera (Glossary "Floating origin / camera-relative
//! rendering"): the view matrix is always built with the eye pinned at
//! `(0, 0, 0)`, and world geometry is translated by `world_pos - eye` before
//! it reaches the vertex stage. This keeps the values that hit the GPU's
//! single-precision matrices small no matter how far the player has walked
//! from the world origin.
//!
//! Grounded on the teacher's data-oriented `data_camera.rs`: plain data plus
//! free functions building `cgmath` matrices, no methods through `&mut self`.

use bytemuck::{Pod, Zeroable};
use cgmath::{perspective, InnerSpace, Matrix4, Point3, Rad, Vector3};

const MIN_PITCH: f32 = -std::f32::consts::FRAC_PI_2 + 0.01;
const MAX_PITCH: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_matrix: [[f32; 4]; 4],
    pub projection_matrix: [[f32; 4]; 4],
    pub view_projection_matrix: [[f32; 4]; 4],
    pub eye_world: [f32; 3],
    _padding: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub eye: [f32; 3],
    pub yaw_radians: f32,
    pub pitch_radians: f32,
    pub aspect_ratio: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn new(eye: [f32; 3], width: u32, height: u32) -> Self {
        Self {
            eye,
            yaw_radians: -std::f32::consts::FRAC_PI_2,
            pitch_radians: 0.0,
            aspect_ratio: width.max(1) as f32 / height.max(1) as f32,
            fovy_radians: std::f32::consts::FRAC_PI_4,
            znear: 0.1,
            zfar: 1000.0,
        }
    }

    pub fn set_aspect_ratio(&mut self, width: u32, height: u32) {
        self.aspect_ratio = width.max(1) as f32 / height.max(1) as f32;
    }

    pub fn rotate(&mut self, yaw_delta: f32, pitch_delta: f32) {
        self.yaw_radians += yaw_delta;
        self.pitch_radians = (self.pitch_radians + pitch_delta).clamp(MIN_PITCH, MAX_PITCH);
    }

    pub fn forward(&self) -> Vector3<f32> {
        let (sin_yaw, cos_yaw) = self.yaw_radians.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch_radians.sin_cos();
        Vector3::new(cos_pitch * cos_yaw, sin_pitch, cos_pitch * sin_yaw).normalize()
    }

    pub fn right(&self) -> Vector3<f32> {
        self.forward().cross(Vector3::unit_y()).normalize()
    }

    /// View matrix with the eye pinned at the origin. Geometry must already
    /// be expressed relative to `self.eye` via [`Camera::to_relative`].
    pub fn view_matrix_relative(&self) -> Matrix4<f32> {
        let forward = self.forward();
        Matrix4::look_at_rh(Point3::new(0.0, 0.0, 0.0), Point3::from_vec(forward), Vector3::unit_y())
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        perspective(Rad(self.fovy_radians), self.aspect_ratio, self.znear, self.zfar)
    }

    /// Translates a world-space position into camera-relative space; every
    /// chunk origin and instance position is passed through this before
    /// upload.
    pub fn to_relative(&self, world_pos: [f32; 3]) -> [f32; 3] {
        [world_pos[0] - self.eye[0], world_pos[1] - self.eye[1], world_pos[2] - self.eye[2]]
    }

    pub fn uniform(&self) -> CameraUniform {
        let view = self.view_matrix_relative();
        let proj = self.projection_matrix();
        let view_proj = proj * view;
        CameraUniform {
            view_matrix: view.into(),
            projection_matrix: proj.into(),
            view_projection_matrix: view_proj.into(),
            eye_world: self.eye,
            _padding: 0.0,
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new([0.0, 80.0, 0.0], 1280, 720)
    }
}
