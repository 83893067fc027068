//! Voxel world engine core: chunked storage, procedural generation, a
//! concurrent job pipeline, greedy meshing, an RHI-backed render graph, and
//! player physics. Networking, save/load, mod sandboxing, and light
//! transport beyond the documented pipeline are explicitly out of scope.

pub mod atmosphere;
pub mod camera;
pub mod cli;
pub mod error;
pub mod generation;
pub mod input;
pub mod jobs;
pub mod lighting;
pub mod mesher;
pub mod panic_handler;
pub mod physics;
pub mod renderer;
pub mod rhi;
pub mod session;
pub mod settings;
pub mod world;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use cgmath::Point3;
use winit::event::{DeviceEvent, ElementState, Event, WindowEvent};
use winit::event_loop::{EventLoop, EventLoopBuilder};
use winit::window::WindowBuilder;

pub use camera::Camera;
pub use cli::Cli;
pub use error::{EngineError, EngineResult, ErrorContext, OptionExt};
pub use session::Session;
pub use settings::Settings;
pub use world::{World, WorldError};

use input::InputState;
use physics::Player;
use rhi::wgpu_backend::WgpuBackend;
use world::frame_budget::{ChunkLoadThrottler, FrameBudget};

const SETTINGS_FILENAME: &str = "settings.json";
const CHUNK_LOAD_RADIUS: i32 = 8;

fn build_event_loop() -> EventLoop<()> {
    log::debug!("[Engine::new] creating event loop");

    // X11 is forced on Linux: WSL/X11 setups intermittently fail to pick a
    // working backend through winit's platform auto-detection.
    #[cfg(target_os = "linux")]
    {
        use winit::platform::x11::EventLoopBuilderExtX11;
        EventLoopBuilder::new()
            .with_x11()
            .build()
            .expect("failed to create X11 event loop")
    }

    #[cfg(not(target_os = "linux"))]
    {
        EventLoop::new().expect("failed to create event loop")
    }
}

/// Owns everything that exists for the lifetime of one running world:
/// settings, session state, the world store, the player, and the render
/// backend. Construct with [`Engine::new`] and hand control to [`Engine::run`].
pub struct Engine {
    cli: Cli,
    session: Session,
    world: World,
    player: Player,
    camera: Camera,
    input: InputState,
}

impl Engine {
    pub fn new(cli: Cli) -> Self {
        let settings_path = PathBuf::from(SETTINGS_FILENAME);
        let settings = Settings::load(&settings_path);
        let session = Session::new(settings, &cli);

        let seed = 0;
        let world = World::new(seed);
        let spawn = world::spawn_finder::find_safe_spawn(
            world.generator(),
            &mut generation::region::GenRegionCache::new(world.generator().seed(), 4),
        );

        let player = Player::new(Point3::new(spawn.x as f32, spawn.y as f32, spawn.z as f32));
        let eye = player.eye_position();
        let camera = Camera::new([eye.x, eye.y, eye.z], session.settings.window_width, session.settings.window_height);

        Self { cli, session, world, player, camera, input: InputState::new() }
    }

    /// Runs the windowed event loop until the user closes the window or a
    /// bounded smoke-test run consumes its frame budget (§6).
    pub fn run(mut self) -> EngineResult<()> {
        let event_loop = build_event_loop();
        let window = Arc::new(
            WindowBuilder::new()
                .with_title("voxel_engine")
                .with_inner_size(winit::dpi::LogicalSize::new(
                    self.session.settings.window_width,
                    self.session.settings.window_height,
                ))
                .build(&event_loop)
                .map_err(|e| EngineError::Internal(format!("window creation failed: {e}")))?,
        );

        let mut rhi = pollster::block_on(WgpuBackend::new(window.clone()))
            .map_err(|e| EngineError::GpuOperationFailed(e.to_string()))?;
        let mut budget = FrameBudget::with_target_fps(60.0);
        let throttler = ChunkLoadThrottler::new(4);
        let mut last_frame = Instant::now();

        event_loop
            .run(move |event, elwt| {
                match event {
                    Event::WindowEvent { event: WindowEvent::CloseRequested, .. } => elwt.exit(),
                    Event::WindowEvent { event: WindowEvent::Resized(size), .. } => {
                        rhi.resize_surface(size.width, size.height);
                        self.camera.set_aspect_ratio(size.width, size.height);
                    }
                    Event::WindowEvent {
                        event: WindowEvent::KeyboardInput { event: key_event, .. },
                        ..
                    } => {
                        if let winit::keyboard::PhysicalKey::Code(code) = key_event.physical_key {
                            self.input.process_key(code, key_event.state);
                            if code == input::KeyCode::Space && key_event.state == ElementState::Pressed {
                                self.session.register_jump_press(Instant::now());
                            }
                        }
                    }
                    Event::WindowEvent { event: WindowEvent::MouseInput { button, state, .. }, .. } => {
                        self.input.process_mouse_button(button, state);
                    }
                    Event::DeviceEvent { event: DeviceEvent::MouseMotion { delta }, .. } => {
                        self.input.process_mouse_motion(delta);
                    }
                    Event::AboutToWait => {
                        let now = Instant::now();
                        let dt = (now - last_frame).as_secs_f32();
                        last_frame = now;

                        budget.begin_frame();
                        self.tick(dt, &mut budget, &throttler, &rhi);

                        let toggles = self.session.toggles;
                        let inputs = renderer::FrameInputs::capture(&self.camera, self.session.atmosphere());
                        renderer::run_frame(&mut rhi, &inputs, &toggles);

                        if self.session.tick_smoke_frame() {
                            elwt.exit();
                        }
                    }
                    _ => {}
                }
            })
            .map_err(|e| EngineError::Internal(format!("event loop exited with error: {e}")))
    }

    fn tick(&mut self, dt: f32, budget: &mut FrameBudget, _throttler: &ChunkLoadThrottler, rhi: &WgpuBackend) {
        self.session.advance_time(dt);

        let (dx, dy) = self.input.get_mouse_delta();
        self.input.clear_mouse_delta();
        self.camera.rotate(
            dx * self.session.settings.mouse_sensitivity * 0.002,
            -dy * self.session.settings.mouse_sensitivity * 0.002,
        );
        self.camera.eye = [self.player.eye_position().x, self.player.eye_position().y, self.player.eye_position().z];

        if self.session.skip_world_update {
            return;
        }

        let observer = world::ChunkPos::new(
            (self.player.aabb().min.x / world::CHUNK_WIDTH as f32).floor() as i32,
            (self.player.aabb().min.z / world::CHUNK_WIDTH as f32).floor() as i32,
        );
        self.world.ensure_loaded_near(observer, CHUNK_LOAD_RADIUS);
        self.world.update(observer, rhi, budget);
        self.world.evict_far_chunks(observer, CHUNK_LOAD_RADIUS + 2);
    }
}
