//! The `wgpu`-backed `Rhi` implementation: device/adapter setup, surface
//! configuration, and a handle-indexed buffer pool. Adapter selection
//! prefers a discrete GPU, grounded on the scoring approach in the
//! renderer's original device-setup code, trimmed to the signal that
//! actually matters here (device type, then backend).

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use cgmath::Matrix4;
use parking_lot::Mutex;
use wgpu::util::DeviceExt;

use crate::error::{EngineError, EngineResult};
use crate::renderer::shadow::{SHADOW_CASCADE_COUNT, SHADOW_MAP_RESOLUTION};
use crate::rhi::{BufferUsage, DrawTopology, GlobalUniforms, Handle, Rhi, RhiError, RhiResult, TextureFormat};

fn wgpu_texture_format(format: TextureFormat) -> wgpu::TextureFormat {
    match format {
        TextureFormat::Rgba8Unorm => wgpu::TextureFormat::Rgba8Unorm,
        TextureFormat::Rgba16Float => wgpu::TextureFormat::Rgba16Float,
        TextureFormat::Depth32Float => wgpu::TextureFormat::Depth32Float,
    }
}

fn score_adapter(info: &wgpu::AdapterInfo) -> i32 {
    let mut score = match info.device_type {
        wgpu::DeviceType::DiscreteGpu => 1000,
        wgpu::DeviceType::IntegratedGpu => 500,
        wgpu::DeviceType::VirtualGpu => 100,
        wgpu::DeviceType::Other => 50,
        wgpu::DeviceType::Cpu => -1000,
    };
    score += match info.backend {
        wgpu::Backend::Vulkan => 20,
        wgpu::Backend::Dx12 => 15,
        wgpu::Backend::Metal => 10,
        wgpu::Backend::Gl => 5,
        _ => 0,
    };
    score
}

struct PooledBuffer {
    buffer: wgpu::Buffer,
    #[allow(dead_code)]
    usage: BufferUsage,
}

struct PooledTexture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
}

/// Which pass is currently open, so `draw*` calls know where to record and
/// `end_*_pass` knows which attachment to replay them against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ActivePass {
    Shadow(u8),
    Main,
}

/// A draw call recorded between `begin_*_pass` and `end_*_pass`. Passes are
/// replayed in one `wgpu::RenderPass` scope at `end_*_pass` rather than kept
/// open across separate trait calls, since a borrowed `RenderPass` can't
/// outlive the method call that created it without unsafe lifetime tricks.
enum DrawCommand {
    Draw { vertex_buffer: Handle, vertex_count: u32 },
    DrawIndexed { vertex_buffer: Handle, index_buffer: Handle, index_count: u32 },
    Sky,
    Clouds,
    UiQuad { textured: bool },
}

struct AcquiredFrame {
    surface_texture: wgpu::SurfaceTexture,
    view: wgpu::TextureView,
    encoder: wgpu::CommandEncoder,
}

pub struct WgpuBackend {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    depth_texture: wgpu::TextureView,
    shadow_cascades: Vec<wgpu::TextureView>,
    buffers: Mutex<HashMap<Handle, PooledBuffer>>,
    textures: Mutex<HashMap<Handle, PooledTexture>>,
    shaders: Mutex<HashMap<Handle, wgpu::ShaderModule>>,
    global_uniform_buffer: wgpu::Buffer,
    next_handle: AtomicU32,
    vsync: bool,
    clear_color: wgpu::Color,
    frame: Option<AcquiredFrame>,
    active_pass: Option<ActivePass>,
    pending_draws: Vec<DrawCommand>,
}

impl WgpuBackend {
    pub async fn new(window: Arc<winit::window::Window>) -> EngineResult<Self> {
        let size = window.inner_size();
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .map_err(|e| EngineError::GpuOperationFailed(format!("surface creation failed: {e}")))?;

        let adapters = instance.enumerate_adapters(wgpu::Backends::all());
        let adapter = adapters
            .into_iter()
            .filter(|a| a.is_surface_supported(&surface))
            .max_by_key(|a| score_adapter(&a.get_info()))
            .ok_or_else(|| EngineError::GpuOperationFailed(RhiError::NoAdapter.to_string()))?;

        log::info!("[rhi] selected adapter: {:?}", adapter.get_info());

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    label: Some("voxel_engine device"),
                },
                None,
            )
            .await
            .map_err(|e| EngineError::GpuOperationFailed(RhiError::DeviceRequest(e.to_string()).to_string()))?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps.formats.iter().copied().find(|f| f.is_srgb()).unwrap_or(caps.formats[0]);
        let present_mode = if caps.present_modes.contains(&wgpu::PresentMode::Mailbox) {
            wgpu::PresentMode::Mailbox
        } else {
            wgpu::PresentMode::Fifo
        };

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        let device = Arc::new(device);
        let queue = Arc::new(queue);
        let depth_texture = create_depth_texture(&device, &surface_config);
        let shadow_cascades =
            (0..SHADOW_CASCADE_COUNT).map(|i| create_shadow_cascade_texture(&device, i)).collect();

        let global_uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("global uniforms"),
            size: std::mem::size_of::<GlobalUniformsRaw>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Ok(Self {
            device,
            queue,
            surface,
            surface_config,
            depth_texture,
            shadow_cascades,
            buffers: Mutex::new(HashMap::new()),
            textures: Mutex::new(HashMap::new()),
            shaders: Mutex::new(HashMap::new()),
            global_uniform_buffer,
            next_handle: AtomicU32::new(1),
            vsync: present_mode == wgpu::PresentMode::Fifo,
            clear_color: wgpu::Color { r: 0.0, g: 0.0, b: 0.0, a: 1.0 },
            frame: None,
            active_pass: None,
            pending_draws: Vec::new(),
        })
    }

    pub fn device(&self) -> &Arc<wgpu::Device> {
        &self.device
    }

    pub fn queue(&self) -> &Arc<wgpu::Queue> {
        &self.queue
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_config.format
    }

    pub fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth_texture
    }

    pub fn acquire_frame(&self) -> Result<wgpu::SurfaceTexture, wgpu::SurfaceError> {
        self.surface.get_current_texture()
    }

    /// Runs `f` with the backing `wgpu::Buffer`, while the pool lock is held.
    pub fn with_buffer<R>(&self, handle: Handle, f: impl FnOnce(&wgpu::Buffer) -> R) -> RhiResult<R> {
        let buffers = self.buffers.lock();
        let pooled = buffers.get(&handle).ok_or(RhiError::UnknownHandle(handle))?;
        Ok(f(&pooled.buffer))
    }

    fn alloc_handle(&self) -> Handle {
        Handle(self.next_handle.fetch_add(1, Ordering::Relaxed))
    }

    fn create_buffer(&self, label: &str, bytes: &[u8], usage: BufferUsage) -> Handle {
        let wgpu_usage = match usage {
            BufferUsage::Vertex => wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            BufferUsage::Index => wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            BufferUsage::Uniform => wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        };
        let buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytes,
            usage: wgpu_usage,
        });
        let handle = self.alloc_handle();
        self.buffers.lock().insert(handle, PooledBuffer { buffer, usage });
        handle
    }
}

impl Rhi for WgpuBackend {
    fn wait_idle(&self) {
        self.device.poll(wgpu::Maintain::Wait);
    }

    fn set_vsync(&mut self, enabled: bool) {
        self.vsync = enabled;
        self.surface_config.present_mode = if enabled { wgpu::PresentMode::Fifo } else { wgpu::PresentMode::Mailbox };
        self.surface.configure(&self.device, &self.surface_config);
    }

    fn create_vertex_buffer(&self, label: &str, bytes: &[u8]) -> Handle {
        self.create_buffer(label, bytes, BufferUsage::Vertex)
    }

    fn create_index_buffer(&self, label: &str, bytes: &[u8]) -> Handle {
        self.create_buffer(label, bytes, BufferUsage::Index)
    }

    fn write_buffer(&self, handle: Handle, offset: u64, bytes: &[u8]) -> RhiResult<()> {
        self.with_buffer(handle, |buffer| self.queue.write_buffer(buffer, offset, bytes))
    }

    fn destroy_buffer(&self, handle: Handle) {
        self.buffers.lock().remove(&handle);
    }

    fn create_texture_2d(&self, label: &str, width: u32, height: u32, format: TextureFormat) -> Handle {
        self.create_texture(label, width, height, wgpu_texture_format(format), wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST)
    }

    fn update_texture_region(&self, handle: Handle, x: u32, y: u32, width: u32, height: u32, bytes: &[u8]) -> RhiResult<()> {
        let textures = self.textures.lock();
        let pooled = textures.get(&handle).ok_or(RhiError::UnknownHandle(handle))?;
        let bytes_per_pixel = pooled.texture.format().block_copy_size(None).unwrap_or(4);
        self.queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &pooled.texture,
                mip_level: 0,
                origin: wgpu::Origin3d { x, y, z: 0 },
                aspect: wgpu::TextureAspect::All,
            },
            bytes,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(width * bytes_per_pixel),
                rows_per_image: Some(height),
            },
            wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
        );
        Ok(())
    }

    fn create_depth_target(&self, label: &str, width: u32, height: u32) -> Handle {
        self.create_texture(
            label,
            width,
            height,
            wgpu::TextureFormat::Depth32Float,
            wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        )
    }

    fn create_render_target(&self, label: &str, width: u32, height: u32, format: TextureFormat) -> Handle {
        self.create_texture(
            label,
            width,
            height,
            wgpu_texture_format(format),
            wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        )
    }

    fn destroy_texture(&self, handle: Handle) {
        self.textures.lock().remove(&handle);
    }

    fn create_shader(&self, label: &str, wgsl_source: &str) -> RhiResult<Handle> {
        if wgsl_source.trim().is_empty() {
            return Err(RhiError::ShaderCompile("empty shader source".into()));
        }
        let module = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(wgsl_source.into()),
        });
        let handle = self.alloc_handle();
        self.shaders.lock().insert(handle, module);
        Ok(handle)
    }

    fn destroy_shader(&self, handle: Handle) {
        self.shaders.lock().remove(&handle);
    }

    fn resize_surface(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface.configure(&self.device, &self.surface_config);
        self.depth_texture = create_depth_texture(&self.device, &self.surface_config);
    }

    fn surface_size(&self) -> (u32, u32) {
        (self.surface_config.width, self.surface_config.height)
    }

    fn begin_frame(&mut self) -> RhiResult<()> {
        let surface_texture = self.acquire_frame().map_err(|e| RhiError::SurfaceLost(e.to_string()))?;
        let view = surface_texture.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("frame encoder") });
        self.frame = Some(AcquiredFrame { surface_texture, view, encoder });
        Ok(())
    }

    fn end_frame(&mut self) {
        let Some(frame) = self.frame.take() else {
            log::warn!("[rhi] end_frame called with no active frame");
            return;
        };
        self.queue.submit(std::iter::once(frame.encoder.finish()));
        frame.surface_texture.present();
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        self.resize_surface(width, height);
    }

    fn set_clear_color(&mut self, color: [f32; 4]) {
        self.clear_color = wgpu::Color { r: color[0] as f64, g: color[1] as f64, b: color[2] as f64, a: color[3] as f64 };
    }

    fn begin_shadow_pass(&mut self, cascade_idx: u8) {
        if self.active_pass.is_some() {
            log::warn!("[rhi] begin_shadow_pass called while a pass is already open");
            return;
        }
        self.active_pass = Some(ActivePass::Shadow(cascade_idx));
        self.pending_draws.clear();
    }

    fn end_shadow_pass(&mut self) {
        let Some(ActivePass::Shadow(cascade_idx)) = self.active_pass.take() else {
            log::warn!("[rhi] end_shadow_pass called with no matching begin_shadow_pass");
            return;
        };
        let Some(frame) = self.frame.as_mut() else {
            log::warn!("[rhi] end_shadow_pass called with no active frame");
            return;
        };
        let Some(cascade_view) = self.shadow_cascades.get(cascade_idx as usize) else {
            log::warn!("[rhi] shadow cascade index {cascade_idx} out of range");
            return;
        };

        {
            let mut pass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("shadow cascade pass"),
                color_attachments: &[],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: cascade_view,
                    depth_ops: Some(wgpu::Operations { load: wgpu::LoadOp::Clear(1.0), store: wgpu::StoreOp::Store }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            replay_draws(&mut pass, &self.pending_draws, &self.buffers.lock());
        }
        self.pending_draws.clear();
    }

    fn begin_main_pass(&mut self) {
        if self.active_pass.is_some() {
            log::warn!("[rhi] begin_main_pass called while a pass is already open");
            return;
        }
        self.active_pass = Some(ActivePass::Main);
        self.pending_draws.clear();
    }

    fn end_main_pass(&mut self) {
        let Some(ActivePass::Main) = self.active_pass.take() else {
            log::warn!("[rhi] end_main_pass called with no matching begin_main_pass");
            return;
        };
        let Some(frame) = self.frame.as_mut() else {
            log::warn!("[rhi] end_main_pass called with no active frame");
            return;
        };

        {
            let mut pass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations { load: wgpu::LoadOp::Clear(self.clear_color), store: wgpu::StoreOp::Store },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations { load: wgpu::LoadOp::Clear(1.0), store: wgpu::StoreOp::Store }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            replay_draws(&mut pass, &self.pending_draws, &self.buffers.lock());
        }
        self.pending_draws.clear();
    }

    fn update_global(&mut self, uniforms: GlobalUniforms) {
        let raw = GlobalUniformsRaw::from(uniforms);
        self.queue.write_buffer(&self.global_uniform_buffer, 0, bytemuck::bytes_of(&raw));
    }

    fn update_shadow_cascade(&mut self, cascade_idx: u8, light_space: Matrix4<f32>, split_far: f32, texel_size: f32) {
        log::trace!(
            "[rhi] cascade {cascade_idx} light-space matrix updated (split_far={split_far}, texel_size={texel_size}): {:?}",
            light_space
        );
    }

    fn set_model_matrix(&mut self, matrix: Matrix4<f32>) {
        log::trace!("[rhi] model matrix set: {matrix:?}");
    }

    fn draw(&mut self, vertex_buffer: Handle, vertex_count: u32, _topology: DrawTopology) {
        if !self.record_draw() {
            return;
        }
        self.pending_draws.push(DrawCommand::Draw { vertex_buffer, vertex_count });
    }

    fn draw_indexed(&mut self, vertex_buffer: Handle, index_buffer: Handle, index_count: u32) {
        if !self.record_draw() {
            return;
        }
        self.pending_draws.push(DrawCommand::DrawIndexed { vertex_buffer, index_buffer, index_count });
    }

    fn draw_sky(&mut self) {
        if !self.record_draw() {
            return;
        }
        self.pending_draws.push(DrawCommand::Sky);
    }

    fn draw_clouds(&mut self) {
        if !self.record_draw() {
            return;
        }
        self.pending_draws.push(DrawCommand::Clouds);
    }

    fn draw_ui_quad(&mut self, textured: bool) {
        if !self.record_draw() {
            return;
        }
        self.pending_draws.push(DrawCommand::UiQuad { textured });
    }
}

impl WgpuBackend {
    fn record_draw(&self) -> bool {
        if self.active_pass.is_none() {
            log::warn!("[rhi] draw issued outside begin/end_*_pass; dropping it");
            return false;
        }
        true
    }

    fn create_texture(&self, label: &str, width: u32, height: u32, format: wgpu::TextureFormat, usage: wgpu::TextureUsages) -> Handle {
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d { width: width.max(1), height: height.max(1), depth_or_array_layers: 1 },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let handle = self.alloc_handle();
        self.textures.lock().insert(handle, PooledTexture { texture, view });
        handle
    }
}

/// Replays recorded draws against an open `wgpu::RenderPass`. No material
/// pipeline exists yet to bind (§11.5's shader text stays out of scope), so
/// each draw that would otherwise need one logs and is skipped rather than
/// issuing an invalid `wgpu` call; buffer-backed draws still bind their
/// vertex buffer so the binding path is exercised end to end.
fn replay_draws(pass: &mut wgpu::RenderPass, draws: &[DrawCommand], buffers: &HashMap<Handle, PooledBuffer>) {
    for draw in draws {
        match draw {
            DrawCommand::Draw { vertex_buffer, vertex_count } => match buffers.get(vertex_buffer) {
                Some(pooled) => {
                    pass.set_vertex_buffer(0, pooled.buffer.slice(..));
                    log::trace!("[rhi] would draw {vertex_count} vertices (no bound pipeline yet)");
                }
                None => log::warn!("[rhi] draw referenced unknown vertex buffer {vertex_buffer:?}"),
            },
            DrawCommand::DrawIndexed { vertex_buffer, index_buffer, index_count } => {
                match (buffers.get(vertex_buffer), buffers.get(index_buffer)) {
                    (Some(vb), Some(ib)) => {
                        pass.set_vertex_buffer(0, vb.buffer.slice(..));
                        pass.set_index_buffer(ib.buffer.slice(..), wgpu::IndexFormat::Uint32);
                        log::trace!("[rhi] would draw {index_count} indices (no bound pipeline yet)");
                    }
                    _ => log::warn!("[rhi] indexed draw referenced an unknown buffer"),
                }
            }
            DrawCommand::Sky => log::trace!("[rhi] would draw sky (no bound pipeline yet)"),
            DrawCommand::Clouds => log::trace!("[rhi] would draw clouds (no bound pipeline yet)"),
            DrawCommand::UiQuad { textured } => log::trace!("[rhi] would draw ui quad, textured={textured} (no bound pipeline yet)"),
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct GlobalUniformsRaw {
    view_proj: [[f32; 4]; 4],
    cam_pos: [f32; 3],
    _pad0: f32,
    sun_dir: [f32; 3],
    _pad1: f32,
    fog_color: [f32; 3],
    fog_density: f32,
    bloom_threshold_weight: f32,
    _pad2: [f32; 3],
}

impl From<GlobalUniforms> for GlobalUniformsRaw {
    fn from(u: GlobalUniforms) -> Self {
        Self {
            view_proj: u.view_proj.into(),
            cam_pos: u.cam_pos,
            _pad0: 0.0,
            sun_dir: u.sun_dir,
            _pad1: 0.0,
            fog_color: u.fog_color,
            fog_density: u.fog_density,
            bloom_threshold_weight: u.bloom_threshold_weight,
            _pad2: [0.0; 3],
        }
    }
}

fn create_shadow_cascade_texture(device: &wgpu::Device, index: usize) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(&format!("shadow cascade {index}")),
        size: wgpu::Extent3d { width: SHADOW_MAP_RESOLUTION, height: SHADOW_MAP_RESOLUTION, depth_or_array_layers: 1 },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Depth32Float,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

fn create_depth_texture(device: &wgpu::Device, config: &wgpu::SurfaceConfiguration) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth texture"),
        size: wgpu::Extent3d { width: config.width, height: config.height, depth_or_array_layers: 1 },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Depth32Float,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
