use crate::config::{ConfigError, EngineConfig};
use crate::simulation::{Simulation, register_builtin_systems};
use glam::{UVec2, Vec2};
use lumen_assets::AssetStore;
use lumen_common::{BodyHandle, EntityId, Transform};
use lumen_ecs::{EcsError, World};
use lumen_physics::PhysicsBridge;
use lumen_render::{
    DefaultResources, PipelineSettings, PipelineShaders, RenderBackend, RenderError,
    RenderPipeline, load_builtin, release_all,
};
use lumen_scheduler::{Condition, Phase, Scheduler};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Ecs(#[from] EcsError),
}

/// Owns every subsystem and runs the frame.
///
/// A frame is PreUpdate, Update, the render passes, LateUpdate, then present.
/// Systems run against the [`Simulation`]; the renderer only reads the world.
pub struct Engine<B: RenderBackend> {
    scheduler: Scheduler<Simulation>,
    simulation: Simulation,
    pipeline: RenderPipeline,
    backend: B,
    assets: AssetStore,
    defaults: DefaultResources,
    settings: PipelineSettings,
    frames: u64,
}

impl<B: RenderBackend + std::fmt::Debug> std::fmt::Debug for Engine<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("scheduler", &self.scheduler)
            .field("simulation", &self.simulation)
            .field("pipeline", &self.pipeline)
            .field("backend", &self.backend)
            .field("settings", &self.settings)
            .field("frames", &self.frames)
            .finish_non_exhaustive()
    }
}

impl<B: RenderBackend> Engine<B> {
    /// Load the built-in resources into `backend`, allocate the pipeline and
    /// register the built-in systems.
    pub fn new(
        mut backend: B,
        config: &EngineConfig,
        shaders: &PipelineShaders,
    ) -> Result<Self, EngineError> {
        config.validate()?;

        let mut assets = AssetStore::new();
        let (resources, defaults) = load_builtin(&mut assets, &mut backend, shaders)?;
        let pipeline = RenderPipeline::new(&mut backend, config.render_config(), resources)?;

        let world = World::new(&config.world_path);
        let physics = PhysicsBridge::with_gravity(config.gravity);
        let mut scheduler = Scheduler::new();
        register_builtin_systems(&mut scheduler);
        scheduler.set_state(config.start_playing);

        tracing::info!(
            world = %config.world_path.display(),
            playing = config.start_playing,
            "engine started"
        );
        Ok(Self {
            scheduler,
            simulation: Simulation::new(world, physics),
            pipeline,
            backend,
            assets,
            defaults,
            settings: config.pipeline,
            frames: 0,
        })
    }

    /// Run one frame. Only a failed present is returned; draw failures are
    /// handled inside the pipeline.
    pub fn frame(&mut self) -> Result<(), RenderError> {
        self.scheduler
            .update_systems(&mut self.simulation, Phase::PreUpdate);
        self.scheduler
            .update_systems(&mut self.simulation, Phase::Update);
        self.pipeline
            .render(&mut self.backend, &self.simulation.world, &self.settings);
        self.scheduler
            .update_systems(&mut self.simulation, Phase::LateUpdate);
        self.frames += 1;
        self.backend.present()
    }

    pub fn resize(&mut self, window_size: UVec2) -> Result<(), RenderError> {
        tracing::debug!(width = window_size.x, height = window_size.y, "window resized");
        self.pipeline.resize(&mut self.backend, window_size)
    }

    pub fn set_render_scale(&mut self, render_scale: u32) -> Result<(), RenderError> {
        self.pipeline.set_render_scale(&mut self.backend, render_scale)
    }

    pub fn register_system(
        &mut self,
        name: impl Into<String>,
        phase: Phase,
        condition: Condition,
        function: impl FnMut(&mut Simulation) + 'static,
    ) {
        self.scheduler
            .register_system(name, phase, condition, function);
    }

    pub fn is_playing(&self) -> bool {
        self.scheduler.state()
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.scheduler.set_state(playing);
    }

    /// Flip the play state and return the new one.
    pub fn toggle_playing(&mut self) -> bool {
        let playing = !self.scheduler.state();
        self.scheduler.set_state(playing);
        playing
    }

    pub fn spawn_body(&mut self, entity: EntityId) -> Result<BodyHandle, EcsError> {
        self.simulation.spawn_body(entity)
    }

    /// New entity at `position` drawn with the default sprite.
    pub fn spawn_sprite(&mut self, position: Vec2) -> Result<EntityId, EcsError> {
        let world = &mut self.simulation.world;
        let entity = world.create_entity()?;
        world.insert_component(entity, Transform::from_position(position))?;
        world.insert_component(entity, self.defaults.renderable())?;
        Ok(entity)
    }

    pub fn destroy_entity(&mut self, entity: EntityId) -> bool {
        self.simulation.destroy_entity(entity)
    }

    /// Release the pipeline framebuffers and every uploaded asset.
    pub fn shutdown(&mut self) {
        self.pipeline.destroy(&mut self.backend);
        let released = release_all(&self.assets, &mut self.backend);
        tracing::info!(frames = self.frames, released, "engine shut down");
    }

    pub fn world(&self) -> &World {
        &self.simulation.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.simulation.world
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    pub fn simulation_mut(&mut self) -> &mut Simulation {
        &mut self.simulation
    }

    pub fn scheduler(&self) -> &Scheduler<Simulation> {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut Scheduler<Simulation> {
        &mut self.scheduler
    }

    pub fn pipeline(&self) -> &RenderPipeline {
        &self.pipeline
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn assets(&self) -> &AssetStore {
        &self.assets
    }

    pub fn defaults(&self) -> &DefaultResources {
        &self.defaults
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut PipelineSettings {
        &mut self.settings
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }
}
