use crate::backend::{
    FullscreenDraw, LightUniform, MAX_LIGHTS, MeshDraw, PassParams, RenderBackend, RenderError,
    RenderTarget,
};
use crate::camera::{CameraMatrices, camera_matrices};
use crate::framebuffer::{FramebufferInfo, FramebufferRegistry, RenderConfig};
use crate::resources::PipelineResources;
use glam::{UVec2, Vec4};
use lumen_common::{FramebufferHandle, ShaderHandle, TextureHandle, Transform};
use lumen_ecs::{Light, Renderable, World};
use serde::{Deserialize, Serialize};

pub const MIN_BLOOM_STRENGTH: u32 = 1;
pub const MAX_BLOOM_STRENGTH: u32 = 20;

/// Per-frame switches for the pass sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    pub bloom_enable: bool,
    /// Blur iterations, clamped to `1..=20` when used.
    pub bloom_strength: u32,
    /// Present into the output framebuffer instead of the screen.
    pub render_to_output_buffer: bool,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            bloom_enable: false,
            bloom_strength: 10,
            render_to_output_buffer: false,
        }
    }
}

impl PipelineSettings {
    pub fn blur_iterations(&self) -> u32 {
        self.bloom_strength
            .clamp(MIN_BLOOM_STRENGTH, MAX_BLOOM_STRENGTH)
    }
}

/// Which texture of a renderable a geometry pass samples.
#[derive(Debug, Clone, Copy)]
enum Channel {
    Color,
    Normal,
}

/// Deferred pass chain: color, normal, lighting, bloom, present.
///
/// Each pass binds its output, optionally samples earlier outputs, draws and
/// unbinds. A missing resource or a failed draw skips that draw only; the
/// frame always runs to the end.
#[derive(Debug)]
pub struct RenderPipeline {
    config: RenderConfig,
    framebuffers: FramebufferRegistry,
    resources: PipelineResources,
    color_buffer: FramebufferHandle,
    normal_buffer: FramebufferHandle,
    shaded: FramebufferHandle,
    bloom_buffer: FramebufferHandle,
    bloom_buffer_2: FramebufferHandle,
    output_buffer: FramebufferHandle,
    lights: Vec<LightUniform>,
    dropped_lights: usize,
}

impl RenderPipeline {
    pub fn new(
        backend: &mut dyn RenderBackend,
        config: RenderConfig,
        resources: PipelineResources,
    ) -> Result<Self, RenderError> {
        let size = config.render_size();
        let mut framebuffers = FramebufferRegistry::new();
        let mut scaled = |name: &str, recreate_on_resize: bool| {
            framebuffers.create(
                &mut *backend,
                FramebufferInfo {
                    name: name.to_string(),
                    recreate_on_resize,
                },
                size,
            )
        };
        let color_buffer = scaled("color_buffer", true)?;
        let normal_buffer = scaled("normal_buffer", true)?;
        let shaded = scaled("shaded", true)?;
        let bloom_buffer = scaled("bloom_buffer", true)?;
        let bloom_buffer_2 = scaled("bloom_buffer_2", true)?;
        let output_buffer = scaled("output_buffer", false)?;

        tracing::info!(width = size.x, height = size.y, "render pipeline ready");
        Ok(Self {
            config,
            framebuffers,
            resources,
            color_buffer,
            normal_buffer,
            shaded,
            bloom_buffer,
            bloom_buffer_2,
            output_buffer,
            lights: Vec::new(),
            dropped_lights: 0,
        })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn framebuffers(&self) -> &FramebufferRegistry {
        &self.framebuffers
    }

    pub fn color_buffer(&self) -> FramebufferHandle {
        self.color_buffer
    }

    pub fn normal_buffer(&self) -> FramebufferHandle {
        self.normal_buffer
    }

    pub fn shaded(&self) -> FramebufferHandle {
        self.shaded
    }

    pub fn bloom_buffers(&self) -> [FramebufferHandle; 2] {
        [self.bloom_buffer, self.bloom_buffer_2]
    }

    pub fn output_buffer(&self) -> FramebufferHandle {
        self.output_buffer
    }

    /// Lights left out of the last lighting pass because of [`MAX_LIGHTS`].
    pub fn dropped_lights(&self) -> usize {
        self.dropped_lights
    }

    pub fn set_clear_color(&mut self, color: Vec4) {
        self.config.clear_color = color;
    }

    /// The window changed size. Scaled framebuffers are reallocated before
    /// this returns.
    pub fn resize(
        &mut self,
        backend: &mut dyn RenderBackend,
        window_size: UVec2,
    ) -> Result<(), RenderError> {
        self.config.window_size = window_size;
        backend.resize_surface(window_size);
        self.framebuffers
            .resize(backend, self.config.render_size())
    }

    pub fn set_render_scale(
        &mut self,
        backend: &mut dyn RenderBackend,
        render_scale: u32,
    ) -> Result<(), RenderError> {
        self.config.render_scale = render_scale.max(1);
        self.framebuffers
            .resize(backend, self.config.render_size())
    }

    /// Run every pass for one frame.
    pub fn render(
        &mut self,
        backend: &mut dyn RenderBackend,
        world: &World,
        settings: &PipelineSettings,
    ) {
        let camera = camera_matrices(world, self.config.aspect());
        if camera.is_none() {
            tracing::trace!("no camera, geometry passes draw nothing");
        }
        self.color_pass(backend, world, camera.as_ref());
        self.normal_pass(backend, world, camera.as_ref());
        self.lighting_pass(backend, world, camera.as_ref());
        self.bloom_pass(backend, settings);
        self.present_pass(backend, settings);
    }

    pub fn color_pass(
        &mut self,
        backend: &mut dyn RenderBackend,
        world: &World,
        camera: Option<&CameraMatrices>,
    ) {
        let clear = self.config.clear_color;
        self.geometry_pass(backend, world, camera, self.color_buffer, clear, Channel::Color);
    }

    pub fn normal_pass(
        &mut self,
        backend: &mut dyn RenderBackend,
        world: &World,
        camera: Option<&CameraMatrices>,
    ) {
        // Empty pixels read as "no normal".
        let clear = Vec4::new(0.0, 0.0, 0.0, 0.0);
        self.geometry_pass(backend, world, camera, self.normal_buffer, clear, Channel::Normal);
    }

    fn geometry_pass(
        &self,
        backend: &mut dyn RenderBackend,
        world: &World,
        camera: Option<&CameraMatrices>,
        target: FramebufferHandle,
        clear: Vec4,
        channel: Channel,
    ) {
        if !begin(backend, target, Some(clear)) {
            return;
        }
        if let Some(camera) = camera {
            for (id, renderable) in world.iter::<Renderable>() {
                let Some(draw) = mesh_draw(renderable, channel) else {
                    tracing::debug!(entity = %id, ?channel, "renderable incomplete, skipped");
                    continue;
                };
                let Some(transform) = world.get_component::<Transform>(id) else {
                    continue;
                };
                let draw = MeshDraw {
                    model: transform.model_matrix(),
                    view: camera.view,
                    projection: camera.projection,
                    ..draw
                };
                if let Err(e) = backend.draw_mesh(&draw) {
                    tracing::debug!(entity = %id, error = %e, "draw skipped");
                }
            }
        }
        backend.unbind_framebuffer();
    }

    /// Shade color with normals under every light into `shaded`.
    pub fn lighting_pass(
        &mut self,
        backend: &mut dyn RenderBackend,
        world: &World,
        camera: Option<&CameraMatrices>,
    ) {
        let camera = camera.copied().unwrap_or(CameraMatrices::IDENTITY);
        self.lights.clear();
        let mut dropped = 0;
        for (id, light) in world.iter::<Light>() {
            let Some(transform) = world.get_component::<Transform>(id) else {
                continue;
            };
            if self.lights.len() == MAX_LIGHTS {
                dropped += 1;
                continue;
            }
            self.lights.push(light_uniform(light, transform, &camera));
        }
        // Reported on change only, not every frame.
        if dropped != self.dropped_lights && dropped > 0 {
            tracing::warn!(
                dropped,
                max = MAX_LIGHTS,
                "too many lights, highest entity ids not shaded"
            );
        }
        self.dropped_lights = dropped;

        if !begin(backend, self.shaded, Some(Vec4::ZERO)) {
            return;
        }
        self.fullscreen(
            backend,
            self.resources.deferred_shader,
            [Some(self.color_buffer), Some(self.normal_buffer)],
            PassParams::Lighting {
                lights: &self.lights,
            },
        );
        backend.unbind_framebuffer();
    }

    /// Bright extraction, ping-pong blur, additive combine onto `shaded`.
    pub fn bloom_pass(&mut self, backend: &mut dyn RenderBackend, settings: &PipelineSettings) {
        if !settings.bloom_enable {
            return;
        }

        if begin(backend, self.bloom_buffer, Some(Vec4::ZERO)) {
            self.fullscreen(
                backend,
                self.resources.bright_shader,
                [Some(self.shaded), None],
                PassParams::None,
            );
            backend.unbind_framebuffer();
        }

        let iterations = settings.blur_iterations();
        for i in 0..iterations {
            let horizontal = i % 2 == 0;
            let (source, target) = if horizontal {
                (self.bloom_buffer, self.bloom_buffer_2)
            } else {
                (self.bloom_buffer_2, self.bloom_buffer)
            };
            if !begin(backend, target, None) {
                continue;
            }
            self.fullscreen(
                backend,
                self.resources.blur_shader,
                [Some(source), None],
                PassParams::Blur { horizontal },
            );
            backend.unbind_framebuffer();
        }

        let blurred = self.final_bloom_buffer(iterations);
        if begin(backend, self.shaded, None) {
            self.fullscreen(
                backend,
                self.resources.combine_shader,
                [Some(blurred), None],
                PassParams::None,
            );
            backend.unbind_framebuffer();
        }
    }

    /// Where the blur chain ends after `iterations` passes.
    pub fn final_bloom_buffer(&self, iterations: u32) -> FramebufferHandle {
        if iterations % 2 == 1 {
            self.bloom_buffer_2
        } else {
            self.bloom_buffer
        }
    }

    /// Draw `shaded` to the screen or the output buffer.
    pub fn present_pass(&mut self, backend: &mut dyn RenderBackend, settings: &PipelineSettings) {
        let target = if settings.render_to_output_buffer {
            RenderTarget::Framebuffer(self.output_buffer)
        } else {
            RenderTarget::Screen
        };
        if let Err(e) = backend.bind_framebuffer(target) {
            tracing::warn!(error = %e, "present target unavailable");
            return;
        }
        if let Err(e) = backend.clear(self.config.clear_color) {
            tracing::warn!(error = %e, "clear failed");
        }
        self.fullscreen(
            backend,
            self.resources.screen_shader,
            [Some(self.shaded), None],
            PassParams::None,
        );
        backend.unbind_framebuffer();
    }

    /// Destroy every framebuffer the pipeline created.
    pub fn destroy(&mut self, backend: &mut dyn RenderBackend) {
        self.framebuffers.destroy_all(backend);
    }

    fn fullscreen(
        &self,
        backend: &mut dyn RenderBackend,
        shader: ShaderHandle,
        inputs: [Option<FramebufferHandle>; 2],
        params: PassParams<'_>,
    ) {
        let draw = FullscreenDraw {
            shader,
            quad: self.resources.screen_quad,
            inputs,
            params,
        };
        if let Err(e) = backend.draw_fullscreen(&draw) {
            tracing::debug!(error = %e, "full-screen draw skipped");
        }
    }
}

/// Bind `target` and optionally clear it. False if the target is unusable.
fn begin(backend: &mut dyn RenderBackend, target: FramebufferHandle, clear: Option<Vec4>) -> bool {
    if let Err(e) = backend.bind_framebuffer(RenderTarget::Framebuffer(target)) {
        tracing::warn!(error = %e, "pass skipped");
        return false;
    }
    if let Some(color) = clear {
        if let Err(e) = backend.clear(color) {
            tracing::warn!(error = %e, "clear failed");
        }
    }
    true
}

fn mesh_draw(renderable: &Renderable, channel: Channel) -> Option<MeshDraw> {
    if !renderable.is_complete() {
        return None;
    }
    let texture: TextureHandle = match channel {
        Channel::Color => renderable.color?,
        Channel::Normal => renderable.normal?,
    };
    Some(MeshDraw {
        shader: renderable.shader?,
        data: renderable.data?,
        texture,
        model: glam::Mat4::IDENTITY,
        view: glam::Mat4::IDENTITY,
        projection: glam::Mat4::IDENTITY,
    })
}

fn light_uniform(light: &Light, transform: &Transform, camera: &CameraMatrices) -> LightUniform {
    LightUniform {
        kind: light.kind.code(),
        position: camera.project_to_screen(transform.world_position()),
        color: light.color,
        intensity: light.intensity,
        radial_falloff: light.radial_falloff,
        volumetric_intensity: light.volumetric_intensity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{Command, RecordedParams, RecordingBackend};
    use crate::resources::{DefaultResources, load_builtin, tests::test_shaders};
    use glam::{Vec2, Vec3};
    use lumen_assets::AssetStore;
    use lumen_ecs::{Camera, LightKind};

    struct Fixture {
        backend: RecordingBackend,
        pipeline: RenderPipeline,
        defaults: DefaultResources,
        resources: PipelineResources,
        world: World,
    }

    fn fixture() -> Fixture {
        let mut store = AssetStore::new();
        let mut backend = RecordingBackend::new();
        let (resources, defaults) = load_builtin(&mut store, &mut backend, &test_shaders()).unwrap();
        let pipeline = RenderPipeline::new(&mut backend, RenderConfig::default(), resources).unwrap();
        backend.clear_commands();

        let mut world = World::new("test.world");
        let camera = world.create_entity().unwrap();
        world.new_component::<Camera>(camera).unwrap();
        Fixture {
            backend,
            pipeline,
            defaults,
            resources,
            world,
        }
    }

    fn bloom(strength: u32) -> PipelineSettings {
        PipelineSettings {
            bloom_enable: true,
            bloom_strength: strength,
            ..PipelineSettings::default()
        }
    }

    #[test]
    fn pipeline_allocates_at_render_size() {
        let f = fixture();
        assert_eq!(f.pipeline.framebuffers().len(), 6);
        for fb in [f.pipeline.color_buffer(), f.pipeline.shaded(), f.pipeline.output_buffer()] {
            assert_eq!(f.backend.framebuffer_size(fb), Some(UVec2::new(200, 150)));
        }
    }

    #[test]
    fn one_renderable_one_color_draw() {
        let mut f = fixture();
        let e = f.world.create_entity().unwrap();
        *f.world.new_component::<Renderable>(e).unwrap() = f.defaults.renderable();

        f.pipeline
            .render(&mut f.backend, &f.world, &PipelineSettings::default());

        let color = RenderTarget::Framebuffer(f.pipeline.color_buffer());
        let draws = f.backend.mesh_draws_into(color);
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].texture, f.defaults.color_texture);

        let normal = RenderTarget::Framebuffer(f.pipeline.normal_buffer());
        let draws = f.backend.mesh_draws_into(normal);
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].texture, f.defaults.normal_texture);
    }

    #[test]
    fn incomplete_renderable_is_skipped() {
        let mut f = fixture();
        let e = f.world.create_entity().unwrap();
        let renderable = Renderable {
            normal: None,
            ..f.defaults.renderable()
        };
        *f.world.new_component::<Renderable>(e).unwrap() = renderable;

        f.pipeline
            .render(&mut f.backend, &f.world, &PipelineSettings::default());

        let color = RenderTarget::Framebuffer(f.pipeline.color_buffer());
        assert!(f.backend.mesh_draws_into(color).is_empty());
        assert_eq!(f.backend.fullscreen_draws().len(), 2);
    }

    #[test]
    fn draws_follow_entity_order() {
        let mut f = fixture();
        let mut ids = Vec::new();
        for x in [3.0, 1.0, 2.0] {
            let e = f.world.create_entity().unwrap();
            f.world.get_component_mut::<Transform>(e).unwrap().position = Vec2::new(x, 0.0);
            *f.world.new_component::<Renderable>(e).unwrap() = f.defaults.renderable();
            ids.push(e);
        }

        f.pipeline
            .render(&mut f.backend, &f.world, &PipelineSettings::default());

        let color = RenderTarget::Framebuffer(f.pipeline.color_buffer());
        let xs: Vec<f32> = f
            .backend
            .mesh_draws_into(color)
            .iter()
            .map(|d| d.model.w_axis.x)
            .collect();
        assert_eq!(xs, vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn no_camera_draws_no_geometry() {
        let mut f = fixture();
        let mut world = World::new("empty.world");
        let e = world.create_entity().unwrap();
        *world.new_component::<Renderable>(e).unwrap() = f.defaults.renderable();

        f.pipeline
            .render(&mut f.backend, &world, &PipelineSettings::default());

        let color = RenderTarget::Framebuffer(f.pipeline.color_buffer());
        assert!(f.backend.mesh_draws_into(color).is_empty());
        assert_eq!(f.backend.fullscreen_draws().len(), 2);
    }

    #[test]
    fn bloom_disabled_never_touches_bloom_buffers() {
        let mut f = fixture();
        f.pipeline
            .render(&mut f.backend, &f.world, &PipelineSettings::default());
        for fb in f.pipeline.bloom_buffers() {
            assert!(!f.backend.touched(fb));
        }
    }

    #[test]
    fn bloom_combine_reads_last_blur_target() {
        for n in [1, 2, 10, 20] {
            let mut f = fixture();
            f.pipeline.render(&mut f.backend, &f.world, &bloom(n));

            let [first, second] = f.pipeline.bloom_buffers();
            let expected = if n % 2 == 1 { second } else { first };

            let draws = f.backend.fullscreen_draws();
            let blurs: Vec<_> = draws
                .iter()
                .filter(|d| d.1 == f.resources.blur_shader)
                .collect();
            assert_eq!(blurs.len(), n as usize);
            assert_eq!(blurs[0].0, RenderTarget::Framebuffer(second));
            assert_eq!(blurs[0].3, &RecordedParams::Blur { horizontal: true });
            assert_eq!(
                blurs.last().unwrap().0,
                RenderTarget::Framebuffer(expected)
            );

            let combine = draws
                .iter()
                .find(|d| d.1 == f.resources.combine_shader)
                .unwrap();
            assert_eq!(combine.0, RenderTarget::Framebuffer(f.pipeline.shaded()));
            assert_eq!(combine.2, [Some(expected), None]);
        }
    }

    #[test]
    fn bloom_strength_is_clamped() {
        let mut f = fixture();
        f.pipeline.render(&mut f.backend, &f.world, &bloom(0));
        let blurs = f
            .backend
            .fullscreen_draws()
            .iter()
            .filter(|d| d.1 == f.resources.blur_shader)
            .count();
        assert_eq!(blurs, 1);
        assert_eq!(bloom(99).blur_iterations(), MAX_BLOOM_STRENGTH);
    }

    #[test]
    fn passes_run_in_order() {
        let mut f = fixture();
        f.pipeline.render(&mut f.backend, &f.world, &bloom(2));
        let shaders: Vec<ShaderHandle> = f.backend.fullscreen_draws().iter().map(|d| d.1).collect();
        let r = f.resources;
        assert_eq!(
            shaders,
            vec![
                r.deferred_shader,
                r.bright_shader,
                r.blur_shader,
                r.blur_shader,
                r.combine_shader,
                r.screen_shader
            ]
        );
        let binds = f
            .backend
            .commands()
            .iter()
            .filter(|c| matches!(c, Command::Bind(_)))
            .count();
        let unbinds = f
            .backend
            .commands()
            .iter()
            .filter(|c| matches!(c, Command::Unbind))
            .count();
        assert_eq!(binds, unbinds);

        let [first, second] = f.pipeline.bloom_buffers();
        assert_eq!(f.backend.bind_count(f.pipeline.color_buffer()), 1);
        assert_eq!(f.backend.bind_count(f.pipeline.shaded()), 2);
        assert_eq!(f.backend.bind_count(first), 2);
        assert_eq!(f.backend.bind_count(second), 1);
    }

    #[test]
    fn clear_color_applies_to_color_pass() {
        let mut f = fixture();
        let red = Vec4::new(1.0, 0.0, 0.0, 1.0);
        f.pipeline.set_clear_color(red);
        f.pipeline
            .render(&mut f.backend, &f.world, &PipelineSettings::default());
        let color = RenderTarget::Framebuffer(f.pipeline.color_buffer());
        assert!(f
            .backend
            .commands()
            .contains(&Command::Clear { target: color, color: red }));
        assert_eq!(f.pipeline.config().clear_color, red);
    }

    #[test]
    fn lights_beyond_the_limit_are_counted() {
        let mut f = fixture();
        for _ in 0..MAX_LIGHTS + 8 {
            let e = f.world.create_entity().unwrap();
            f.world.new_component::<Light>(e).unwrap();
        }
        f.pipeline
            .render(&mut f.backend, &f.world, &PipelineSettings::default());

        let draws = f.backend.fullscreen_draws();
        let RecordedParams::Lighting { lights } = draws[0].3 else {
            panic!("first full-screen draw is not lighting");
        };
        assert_eq!(lights.len(), MAX_LIGHTS);
        assert_eq!(f.pipeline.dropped_lights(), 8);

        let last = f.world.entities().last().unwrap();
        f.world.destroy_entity(last);
        f.pipeline
            .render(&mut f.backend, &f.world, &PipelineSettings::default());
        assert_eq!(f.pipeline.dropped_lights(), 7);
    }

    #[test]
    fn present_goes_to_output_buffer_when_asked() {
        let mut f = fixture();
        let settings = PipelineSettings {
            render_to_output_buffer: true,
            ..PipelineSettings::default()
        };
        f.pipeline.render(&mut f.backend, &f.world, &settings);
        let last = *f.backend.fullscreen_draws().last().unwrap();
        assert_eq!(last.0, RenderTarget::Framebuffer(f.pipeline.output_buffer()));
        assert_eq!(last.2, [Some(f.pipeline.shaded()), None]);
    }

    #[test]
    fn lights_are_projected_in_id_order() {
        let mut f = fixture();
        let a = f.world.create_entity().unwrap();
        f.world.new_component::<Light>(a).unwrap().kind = LightKind::Global;
        let b = f.world.create_entity().unwrap();
        f.world.get_component_mut::<Transform>(b).unwrap().position = Vec2::new(10.0 * 4.0 / 3.0 / 2.0, 0.0);
        *f.world.new_component::<Light>(b).unwrap() = Light {
            color: Vec3::new(1.0, 0.0, 0.0),
            intensity: 2.0,
            ..Light::default()
        };

        f.pipeline
            .render(&mut f.backend, &f.world, &PipelineSettings::default());

        let draws = f.backend.fullscreen_draws();
        let RecordedParams::Lighting { lights } = draws[0].3 else {
            panic!("first full-screen draw is not lighting");
        };
        assert_eq!(draws[0].2, [Some(f.pipeline.color_buffer()), Some(f.pipeline.normal_buffer())]);
        assert_eq!(lights.len(), 2);
        assert_eq!(lights[0].kind, 0);
        assert!((lights[0].position - Vec2::splat(0.5)).length() < 1e-5);
        assert_eq!(lights[1].kind, 1);
        assert_eq!(lights[1].intensity, 2.0);
        assert!((lights[1].position - Vec2::new(0.75, 0.5)).length() < 1e-5);
    }

    #[test]
    fn resize_reallocates_scaled_buffers_only() {
        let mut f = fixture();
        f.pipeline
            .resize(&mut f.backend, UVec2::new(1280, 720))
            .unwrap();
        assert_eq!(
            f.backend.framebuffer_size(f.pipeline.shaded()),
            Some(UVec2::new(320, 180))
        );
        assert_eq!(
            f.backend.framebuffer_size(f.pipeline.output_buffer()),
            Some(UVec2::new(200, 150))
        );

        f.pipeline.set_render_scale(&mut f.backend, 2).unwrap();
        assert_eq!(
            f.backend.framebuffer_size(f.pipeline.color_buffer()),
            Some(UVec2::new(640, 360))
        );
        assert_eq!(f.pipeline.config().render_scale, 2);
    }

    #[test]
    fn destroy_releases_every_framebuffer() {
        let mut f = fixture();
        f.pipeline.destroy(&mut f.backend);
        assert_eq!(f.backend.framebuffer_count(), 0);
    }
}
