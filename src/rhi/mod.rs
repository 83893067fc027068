//! Render Hardware Interface (§5): a capability-handle abstraction over the
//! GPU backend so the render graph's passes never touch `wgpu` types
//! directly. A `Handle` is an opaque index into backend-owned storage; `0`
//! is reserved as the invalid handle (mirrors `bytemuck::Zeroable` default).

pub mod wgpu_backend;

use cgmath::Matrix4;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct Handle(pub u32);

impl Handle {
    pub const INVALID: Handle = Handle(0);

    pub fn is_valid(self) -> bool {
        self.0 != 0
    }
}

#[derive(Debug, Error)]
pub enum RhiError {
    #[error("no suitable GPU adapter found")]
    NoAdapter,
    #[error("device request failed: {0}")]
    DeviceRequest(String),
    #[error("surface configuration failed: {0}")]
    SurfaceConfig(String),
    #[error("unknown handle {0:?}")]
    UnknownHandle(Handle),
    #[error("no frame is currently acquired")]
    NoActiveFrame,
    #[error("surface frame acquisition failed: {0}")]
    SurfaceLost(String),
    #[error("shader compilation failed: {0}")]
    ShaderCompile(String),
}

pub type RhiResult<T> = Result<T, RhiError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferUsage {
    Vertex,
    Index,
    Uniform,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureFormat {
    Rgba8Unorm,
    Rgba16Float,
    Depth32Float,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawTopology {
    TriangleList,
    TriangleStrip,
}

/// Everything the opaque and sky passes need to shade a frame (§4.5
/// "Uniforms"). Kept as one struct so `update_global` is a single call per
/// frame rather than one per field.
#[derive(Debug, Clone, Copy)]
pub struct GlobalUniforms {
    pub view_proj: Matrix4<f32>,
    pub cam_pos: [f32; 3],
    pub sun_dir: [f32; 3],
    pub fog_color: [f32; 3],
    pub fog_density: f32,
    pub bloom_threshold_weight: f32,
}

/// The subset of GPU operations the world and renderer need, named in terms
/// of what the caller is doing rather than `wgpu`'s API surface. A pass in
/// the render graph (§5.2) only ever talks to this trait.
///
/// `begin/end_frame` delimit one frame; uniform writes between them apply
/// only to draws within them. `begin/end_*_pass` nest non-overlappingly;
/// draws issued outside a pass are rejected rather than silently dropped.
pub trait Rhi {
    // Lifecycle
    fn wait_idle(&self);
    fn set_vsync(&mut self, enabled: bool);

    // Buffers
    fn create_vertex_buffer(&self, label: &str, bytes: &[u8]) -> Handle;
    fn create_index_buffer(&self, label: &str, bytes: &[u8]) -> Handle;
    fn write_buffer(&self, handle: Handle, offset: u64, bytes: &[u8]) -> RhiResult<()>;
    fn destroy_buffer(&self, handle: Handle);

    // Textures
    fn create_texture_2d(&self, label: &str, width: u32, height: u32, format: TextureFormat) -> Handle;
    fn update_texture_region(&self, handle: Handle, x: u32, y: u32, width: u32, height: u32, bytes: &[u8]) -> RhiResult<()>;
    fn create_depth_target(&self, label: &str, width: u32, height: u32) -> Handle;
    fn create_render_target(&self, label: &str, width: u32, height: u32, format: TextureFormat) -> Handle;
    fn destroy_texture(&self, handle: Handle);

    // Shaders
    fn create_shader(&self, label: &str, wgsl_source: &str) -> RhiResult<Handle>;
    fn destroy_shader(&self, handle: Handle);

    // Surface / frame
    fn resize_surface(&mut self, width: u32, height: u32);
    fn surface_size(&self) -> (u32, u32);
    fn begin_frame(&mut self) -> RhiResult<()>;
    fn end_frame(&mut self);
    fn set_viewport(&mut self, width: u32, height: u32);
    fn set_clear_color(&mut self, color: [f32; 4]);

    // Passes
    fn begin_shadow_pass(&mut self, cascade_idx: u8);
    fn end_shadow_pass(&mut self);
    fn begin_main_pass(&mut self);
    fn end_main_pass(&mut self);

    // Uniforms
    fn update_global(&mut self, uniforms: GlobalUniforms);
    fn update_shadow_cascade(&mut self, cascade_idx: u8, light_space: Matrix4<f32>, split_far: f32, texel_size: f32);
    fn set_model_matrix(&mut self, matrix: Matrix4<f32>);

    // Draw
    fn draw(&mut self, vertex_buffer: Handle, vertex_count: u32, topology: DrawTopology);
    fn draw_indexed(&mut self, vertex_buffer: Handle, index_buffer: Handle, index_count: u32);
    fn draw_sky(&mut self);
    fn draw_clouds(&mut self);
    fn draw_ui_quad(&mut self, textured: bool);
}
