use anyhow::{Context, Result, anyhow};
use clap::Parser;
use glam::{UVec2, Vec2, Vec3};
use lumen_common::Transform;
use lumen_ecs::{Camera, Light, LightKind};
use lumen_engine::{Engine, EngineConfig, Key, PLAYER_MARKER};
use lumen_render_wgpu::{WgpuBackend, pipeline_shaders};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "lumen-desktop", about = "Lumen 2D scene engine")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// JSON engine config
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable bloom
    #[arg(long)]
    bloom: bool,

    /// Integer downscale of the offscreen buffers
    #[arg(long)]
    render_scale: Option<u32>,

    /// Start with the simulation stopped
    #[arg(long)]
    stopped: bool,
}

impl Cli {
    /// The config file, if any, with flags applied on top.
    fn engine_config(&self) -> Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => EngineConfig::default(),
        };
        if self.bloom {
            config.pipeline.bloom_enable = true;
        }
        if let Some(scale) = self.render_scale {
            config.render_scale = scale;
        }
        if self.stopped {
            config.start_playing = false;
        }
        config.validate()?;
        Ok(config)
    }
}

fn direction_key(key: KeyCode) -> Option<Key> {
    match key {
        KeyCode::KeyW | KeyCode::ArrowUp => Some(Key::Up),
        KeyCode::KeyS | KeyCode::ArrowDown => Some(Key::Down),
        KeyCode::KeyA | KeyCode::ArrowLeft => Some(Key::Left),
        KeyCode::KeyD | KeyCode::ArrowRight => Some(Key::Right),
        _ => None,
    }
}

/// Camera, a row of falling crates, a player and a few lights.
fn build_demo_scene(engine: &mut Engine<WgpuBackend>) -> Result<()> {
    let world = engine.world_mut();
    let camera = world.create_entity()?;
    world.new_component::<Camera>(camera)?;

    let sun = world.create_entity()?;
    world.insert_component(
        sun,
        Light {
            kind: LightKind::Global,
            intensity: 0.3,
            color: Vec3::new(0.8, 0.85, 1.0),
            ..Light::default()
        },
    )?;

    for (i, color) in [Vec3::new(4.0, 1.5, 0.5), Vec3::new(0.5, 1.5, 4.0)]
        .into_iter()
        .enumerate()
    {
        let lamp = engine.world_mut().create_entity()?;
        let x = if i == 0 { -6.0 } else { 6.0 };
        engine
            .world_mut()
            .insert_component(lamp, Transform::from_position(Vec2::new(x, 2.0)))?;
        engine.world_mut().insert_component(
            lamp,
            Light {
                kind: LightKind::Point,
                intensity: 2.0,
                radial_falloff: 0.5,
                volumetric_intensity: 0.2,
                color,
            },
        )?;
    }

    for i in 0..5 {
        let position = Vec2::new(-4.0 + 2.0 * i as f32, 6.0 + i as f32);
        let crate_entity = engine.spawn_sprite(position)?;
        engine.spawn_body(crate_entity)?;
    }

    let player = engine.spawn_sprite(Vec2::new(0.0, -4.0))?;
    engine.world_mut().set_marker(player, PLAYER_MARKER)?;

    tracing::info!(entities = engine.world().entity_count(), "demo scene built");
    Ok(())
}

/// Create the window and GPU device, then the engine on top of them.
fn init_engine(
    event_loop: &ActiveEventLoop,
    config: &EngineConfig,
) -> Result<(Arc<Window>, Engine<WgpuBackend>)> {
    let attrs = Window::default_attributes()
        .with_title(config.window_title.clone())
        .with_inner_size(PhysicalSize::new(config.window_size.x, config.window_size.y));
    let window = Arc::new(
        event_loop
            .create_window(attrs)
            .context("creating window")?,
    );

    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        ..Default::default()
    });
    let surface = instance
        .create_surface(window.clone())
        .context("creating surface")?;

    let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
        power_preference: wgpu::PowerPreference::HighPerformance,
        compatible_surface: Some(&surface),
        force_fallback_adapter: false,
    }))
    .ok_or_else(|| anyhow!("no suitable GPU adapter"))?;

    let (device, queue) = pollster::block_on(adapter.request_device(
        &wgpu::DeviceDescriptor {
            label: Some("lumen_device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            memory_hints: Default::default(),
        },
        None,
    ))
    .context("creating device")?;

    let size = window.inner_size();
    let surface_caps = surface.get_capabilities(&adapter);
    let surface_format = surface_caps
        .formats
        .iter()
        .find(|f| f.is_srgb())
        .or_else(|| surface_caps.formats.first())
        .copied()
        .ok_or_else(|| anyhow!("surface has no supported formats"))?;
    let alpha_mode = surface_caps
        .alpha_modes
        .first()
        .copied()
        .unwrap_or(wgpu::CompositeAlphaMode::Auto);

    let surface_config = wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format: surface_format,
        width: size.width.max(1),
        height: size.height.max(1),
        present_mode: wgpu::PresentMode::AutoVsync,
        alpha_mode,
        view_formats: vec![],
        desired_maximum_frame_latency: 2,
    };
    surface.configure(&device, &surface_config);
    tracing::info!(
        "GPU initialized with {} backend",
        adapter.get_info().backend.to_str()
    );

    let backend = WgpuBackend::new(device, queue, surface, surface_config);
    let config = EngineConfig {
        window_size: UVec2::new(size.width.max(1), size.height.max(1)),
        ..config.clone()
    };
    let mut engine = Engine::new(backend, &config, &pipeline_shaders())?;
    build_demo_scene(&mut engine)?;
    Ok((window, engine))
}

struct App {
    config: EngineConfig,
    window: Option<Arc<Window>>,
    engine: Option<Engine<WgpuBackend>>,
    /// Fatal error raised inside the event loop, returned from `main`.
    error: Option<anyhow::Error>,
}

impl App {
    fn new(config: EngineConfig) -> Self {
        Self {
            config,
            window: None,
            engine: None,
            error: None,
        }
    }

    fn handle_key(&mut self, key: KeyCode, pressed: bool, event_loop: &ActiveEventLoop) {
        let Some(engine) = &mut self.engine else {
            return;
        };
        if let Some(direction) = direction_key(key) {
            engine.simulation_mut().input.set(direction, pressed);
            return;
        }
        if !pressed {
            return;
        }
        match key {
            KeyCode::Space => {
                engine.toggle_playing();
            }
            KeyCode::KeyB => {
                let settings = engine.settings_mut();
                settings.bloom_enable = !settings.bloom_enable;
                tracing::info!(bloom = settings.bloom_enable, "bloom toggled");
            }
            KeyCode::Escape => event_loop.exit(),
            _ => {}
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        match init_engine(event_loop, &self.config) {
            Ok((window, engine)) => {
                self.window = Some(window);
                self.engine = Some(engine);
            }
            Err(e) => {
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(engine) = &mut self.engine {
                    let size = UVec2::new(new_size.width.max(1), new_size.height.max(1));
                    if let Err(e) = engine.resize(size) {
                        tracing::error!("resize failed: {e}");
                    }
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                self.handle_key(key, key_state == ElementState::Pressed, event_loop);
            }
            WindowEvent::Focused(false) => {
                if let Some(engine) = &mut self.engine {
                    engine.simulation_mut().input.clear();
                }
            }
            WindowEvent::RedrawRequested => {
                if let Some(engine) = &mut self.engine {
                    if let Err(e) = engine.frame() {
                        tracing::warn!("frame not presented: {e}");
                    }
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(engine) = &mut self.engine {
            engine.shutdown();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    tracing::info!("lumen-desktop starting");
    let config = cli.engine_config()?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    match app.error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
