use bytemuck::{Pod, Zeroable};
use glam::{UVec2, Vec4};
use lumen_assets::{BlendMode, MeshData, ShaderKind, ShaderSource, TextureData, Vertex};
use lumen_common::{FramebufferHandle, GpuDataHandle, ShaderHandle, TextureHandle};
use lumen_render::{
    FullscreenDraw, MAX_LIGHTS, MeshDraw, PassParams, RenderBackend, RenderError, RenderTarget,
};
use slotmap::SlotMap;
use std::collections::HashMap;
use wgpu::util::DeviceExt;

/// Offscreen targets hold HDR color so lighting and bloom can exceed 1.0.
const FRAMEBUFFER_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;
const TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];

const ADDITIVE: wgpu::BlendState = wgpu::BlendState {
    color: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
    alpha: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
};

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct MeshUniforms {
    model: [[f32; 4]; 4],
    view: [[f32; 4]; 4],
    projection: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct GpuLight {
    position: [f32; 2],
    kind: u32,
    intensity: f32,
    color: [f32; 3],
    radial_falloff: f32,
    volumetric_intensity: f32,
    _pad: [f32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct PassUniforms {
    params: [u32; 4],
    texel: [f32; 4],
    lights: [GpuLight; MAX_LIGHTS],
}

struct GpuTexture {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

struct GpuShader {
    label: String,
    module: wgpu::ShaderModule,
    kind: ShaderKind,
    blend: BlendMode,
}

struct GpuMesh {
    vertices: wgpu::Buffer,
    indices: Option<wgpu::Buffer>,
    count: u32,
}

struct GpuFramebuffer {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    size: UVec2,
}

struct PendingDraw {
    shader: ShaderHandle,
    mesh: GpuDataHandle,
    bind_group: wgpu::BindGroup,
}

/// Draws recorded against the bound target, encoded when it is unbound.
struct PendingPass {
    target: RenderTarget,
    clear: Option<wgpu::Color>,
    draws: Vec<PendingDraw>,
}

/// wgpu implementation of [`RenderBackend`].
///
/// Each bind/unbind pair becomes one render pass submitted on unbind. The
/// surface texture is acquired the first time the screen is bound in a frame
/// and shown by [`RenderBackend::present`].
pub struct WgpuBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    mesh_layout: wgpu::BindGroupLayout,
    fullscreen_layout: wgpu::BindGroupLayout,
    mesh_pipeline_layout: wgpu::PipelineLayout,
    fullscreen_pipeline_layout: wgpu::PipelineLayout,
    sampler: wgpu::Sampler,
    placeholder: GpuTexture,
    textures: HashMap<TextureHandle, GpuTexture>,
    shaders: HashMap<ShaderHandle, GpuShader>,
    meshes: HashMap<GpuDataHandle, GpuMesh>,
    framebuffers: SlotMap<FramebufferHandle, GpuFramebuffer>,
    pipelines: HashMap<(ShaderHandle, wgpu::TextureFormat), wgpu::RenderPipeline>,
    pass: Option<PendingPass>,
    frame: Option<wgpu::SurfaceTexture>,
}

impl WgpuBackend {
    /// Wrap an initialized device and a configured surface.
    pub fn new(
        device: wgpu::Device,
        queue: wgpu::Queue,
        surface: wgpu::Surface<'static>,
        surface_config: wgpu::SurfaceConfiguration,
    ) -> Self {
        let sampled_texture = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        };
        let uniform = |visibility| wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };
        let sampler_entry = wgpu::BindGroupLayoutEntry {
            binding: 1,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            count: None,
        };

        let mesh_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("mesh_bind_group_layout"),
            entries: &[
                uniform(wgpu::ShaderStages::VERTEX),
                sampler_entry,
                sampled_texture(2),
            ],
        });
        let fullscreen_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("fullscreen_bind_group_layout"),
                entries: &[
                    uniform(wgpu::ShaderStages::FRAGMENT),
                    sampler_entry,
                    sampled_texture(2),
                    sampled_texture(3),
                ],
            });

        let mesh_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("mesh_pipeline_layout"),
            bind_group_layouts: &[&mesh_layout],
            push_constant_ranges: &[],
        });
        let fullscreen_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("fullscreen_pipeline_layout"),
                bind_group_layouts: &[&fullscreen_layout],
                push_constant_ranges: &[],
            });

        // Nearest filtering keeps the low-resolution look when upscaled.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("nearest_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let placeholder = create_texture(
            &device,
            &queue,
            "placeholder_texture",
            &TextureData::solid(1, 1, [0, 0, 0, 0]),
        );

        Self {
            device,
            queue,
            surface,
            surface_config,
            mesh_layout,
            fullscreen_layout,
            mesh_pipeline_layout,
            fullscreen_pipeline_layout,
            sampler,
            placeholder,
            textures: HashMap::new(),
            shaders: HashMap::new(),
            meshes: HashMap::new(),
            framebuffers: SlotMap::with_key(),
            pipelines: HashMap::new(),
            pass: None,
            frame: None,
        }
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_config.format
    }

    fn target_format(&self, target: RenderTarget) -> wgpu::TextureFormat {
        match target {
            RenderTarget::Screen => self.surface_config.format,
            RenderTarget::Framebuffer(_) => FRAMEBUFFER_FORMAT,
        }
    }

    fn bound_target(&self) -> Result<RenderTarget, RenderError> {
        self.pass
            .as_ref()
            .map(|p| p.target)
            .ok_or(RenderError::NoTargetBound)
    }

    fn push_draw(&mut self, draw: PendingDraw) -> Result<(), RenderError> {
        let pass = self.pass.as_mut().ok_or(RenderError::NoTargetBound)?;
        pass.draws.push(draw);
        Ok(())
    }

    fn acquire_frame(&mut self) -> Result<(), RenderError> {
        if self.frame.is_some() {
            return Ok(());
        }
        match self.surface.get_current_texture() {
            Ok(frame) => {
                self.frame = Some(frame);
                Ok(())
            }
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.surface_config);
                Err(RenderError::Surface("surface lost, reconfigured".into()))
            }
            Err(e) => Err(RenderError::Surface(e.to_string())),
        }
    }

    /// Build (once) the pipeline for `shader` writing to `format`.
    fn ensure_pipeline(
        &mut self,
        shader: ShaderHandle,
        format: wgpu::TextureFormat,
        expected: ShaderKind,
    ) -> Result<(), RenderError> {
        let gpu = self
            .shaders
            .get(&shader)
            .ok_or(RenderError::MissingShader(shader))?;
        if gpu.kind != expected {
            return Err(RenderError::Shader {
                label: gpu.label.clone(),
                message: format!("expected a {expected:?} shader, got {:?}", gpu.kind),
            });
        }
        if self.pipelines.contains_key(&(shader, format)) {
            return Ok(());
        }

        let layout = match gpu.kind {
            ShaderKind::Mesh => &self.mesh_pipeline_layout,
            ShaderKind::Fullscreen => &self.fullscreen_pipeline_layout,
        };
        let blend = match gpu.blend {
            BlendMode::Replace => wgpu::BlendState::REPLACE,
            BlendMode::Alpha => wgpu::BlendState::ALPHA_BLENDING,
            BlendMode::Additive => ADDITIVE,
        };

        let pipeline = self
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(&gpu.label),
                layout: Some(layout),
                vertex: wgpu::VertexState {
                    module: &gpu.module,
                    entry_point: Some("vs_main"),
                    compilation_options: Default::default(),
                    buffers: &[wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<Vertex>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &VERTEX_ATTRIBUTES,
                    }],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &gpu.module,
                    entry_point: Some("fs_main"),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend: Some(blend),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    ..Default::default()
                },
                depth_stencil: None,
                multisample: Default::default(),
                multiview: None,
                cache: None,
            });
        tracing::debug!(?shader, ?format, "render pipeline built");
        self.pipelines.insert((shader, format), pipeline);
        Ok(())
    }

    /// Encode and submit the pending pass, if any.
    fn flush(&mut self) {
        let Some(pass) = self.pass.take() else {
            return;
        };

        let screen_view;
        let view = match pass.target {
            RenderTarget::Framebuffer(handle) => match self.framebuffers.get(handle) {
                Some(fb) => &fb.view,
                None => {
                    tracing::warn!(?handle, "framebuffer destroyed while bound");
                    return;
                }
            },
            RenderTarget::Screen => match &self.frame {
                Some(frame) => {
                    screen_view = frame
                        .texture
                        .create_view(&wgpu::TextureViewDescriptor::default());
                    &screen_view
                }
                None => return,
            },
        };
        let format = self.target_format(pass.target);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("pass_encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: match pass.clear {
                            Some(color) => wgpu::LoadOp::Clear(color),
                            None => wgpu::LoadOp::Load,
                        },
                        store: wgpu::StoreOp::Store,
                    },
                })],
                ..Default::default()
            });

            for draw in &pass.draws {
                let (Some(pipeline), Some(mesh)) = (
                    self.pipelines.get(&(draw.shader, format)),
                    self.meshes.get(&draw.mesh),
                ) else {
                    continue;
                };
                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(0, &draw.bind_group, &[]);
                render_pass.set_vertex_buffer(0, mesh.vertices.slice(..));
                match &mesh.indices {
                    Some(indices) => {
                        render_pass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint32);
                        render_pass.draw_indexed(0..mesh.count, 0, 0..1);
                    }
                    None => render_pass.draw(0..mesh.count, 0..1),
                }
            }
        }
        self.queue.submit(std::iter::once(encoder.finish()));
    }
}

fn create_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: &str,
    data: &TextureData,
) -> GpuTexture {
    let size = wgpu::Extent3d {
        width: data.width,
        height: data.height,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: TEXTURE_FORMAT,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    queue.write_texture(
        texture.as_image_copy(),
        &data.rgba,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * data.width),
            rows_per_image: Some(data.height),
        },
        size,
    );
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    GpuTexture {
        _texture: texture,
        view,
    }
}

fn create_framebuffer_texture(
    device: &wgpu::Device,
    label: &str,
    size: UVec2,
) -> (wgpu::Texture, wgpu::TextureView) {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width: size.x.max(1),
            height: size.y.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: FRAMEBUFFER_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}

fn wgpu_color(color: Vec4) -> wgpu::Color {
    wgpu::Color {
        r: color.x as f64,
        g: color.y as f64,
        b: color.z as f64,
        a: color.w as f64,
    }
}

impl RenderBackend for WgpuBackend {
    fn create_framebuffer(
        &mut self,
        label: &str,
        size: UVec2,
    ) -> Result<FramebufferHandle, RenderError> {
        let (texture, view) = create_framebuffer_texture(&self.device, label, size);
        Ok(self.framebuffers.insert(GpuFramebuffer {
            texture,
            view,
            size,
        }))
    }

    fn resize_framebuffer(
        &mut self,
        framebuffer: FramebufferHandle,
        size: UVec2,
    ) -> Result<(), RenderError> {
        let fb = self
            .framebuffers
            .get_mut(framebuffer)
            .ok_or(RenderError::MissingFramebuffer(framebuffer))?;
        let (texture, view) = create_framebuffer_texture(&self.device, "framebuffer", size);
        fb.texture.destroy();
        fb.texture = texture;
        fb.view = view;
        fb.size = size;
        Ok(())
    }

    fn destroy_framebuffer(&mut self, framebuffer: FramebufferHandle) -> bool {
        match self.framebuffers.remove(framebuffer) {
            Some(fb) => {
                fb.texture.destroy();
                true
            }
            None => false,
        }
    }

    fn bind_framebuffer(&mut self, target: RenderTarget) -> Result<(), RenderError> {
        self.flush();
        match target {
            RenderTarget::Framebuffer(handle) => {
                if !self.framebuffers.contains_key(handle) {
                    return Err(RenderError::MissingFramebuffer(handle));
                }
            }
            RenderTarget::Screen => self.acquire_frame()?,
        }
        self.pass = Some(PendingPass {
            target,
            clear: None,
            draws: Vec::new(),
        });
        Ok(())
    }

    fn unbind_framebuffer(&mut self) {
        self.flush();
    }

    fn clear(&mut self, color: Vec4) -> Result<(), RenderError> {
        let pass = self.pass.as_mut().ok_or(RenderError::NoTargetBound)?;
        // Clearing discards everything drawn so far in this pass.
        pass.draws.clear();
        pass.clear = Some(wgpu_color(color));
        Ok(())
    }

    fn draw_mesh(&mut self, draw: &MeshDraw) -> Result<(), RenderError> {
        let target = self.bound_target()?;
        self.ensure_pipeline(draw.shader, self.target_format(target), ShaderKind::Mesh)?;
        if !self.meshes.contains_key(&draw.data) {
            return Err(RenderError::MissingMesh(draw.data));
        }
        let texture = self
            .textures
            .get(&draw.texture)
            .ok_or(RenderError::MissingTexture(draw.texture))?;

        let uniforms = MeshUniforms {
            model: draw.model.to_cols_array_2d(),
            view: draw.view.to_cols_array_2d(),
            projection: draw.projection.to_cols_array_2d(),
        };
        let buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("mesh_uniforms"),
                contents: bytemuck::bytes_of(&uniforms),
                usage: wgpu::BufferUsages::UNIFORM,
            });
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("mesh_bind_group"),
            layout: &self.mesh_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
            ],
        });

        self.push_draw(PendingDraw {
            shader: draw.shader,
            mesh: draw.data,
            bind_group,
        })
    }

    fn draw_fullscreen(&mut self, draw: &FullscreenDraw<'_>) -> Result<(), RenderError> {
        let target = self.bound_target()?;
        self.ensure_pipeline(
            draw.shader,
            self.target_format(target),
            ShaderKind::Fullscreen,
        )?;
        if !self.meshes.contains_key(&draw.quad) {
            return Err(RenderError::MissingMesh(draw.quad));
        }

        let mut views = [&self.placeholder.view, &self.placeholder.view];
        let mut texel_source = None;
        for (slot, input) in draw.inputs.iter().enumerate() {
            if let Some(handle) = input {
                let fb = self
                    .framebuffers
                    .get(*handle)
                    .ok_or(RenderError::MissingFramebuffer(*handle))?;
                views[slot] = &fb.view;
                texel_source.get_or_insert(fb.size);
            }
        }
        let texel_size = texel_source.unwrap_or(UVec2::ONE).max(UVec2::ONE);

        let mut uniforms = PassUniforms::zeroed();
        uniforms.texel = [
            1.0 / texel_size.x as f32,
            1.0 / texel_size.y as f32,
            0.0,
            0.0,
        ];
        match draw.params {
            PassParams::None => {}
            PassParams::Blur { horizontal } => uniforms.params[1] = horizontal as u32,
            PassParams::Lighting { lights } => {
                let count = lights.len().min(MAX_LIGHTS);
                uniforms.params[0] = count as u32;
                for (gpu, light) in uniforms.lights.iter_mut().zip(&lights[..count]) {
                    *gpu = GpuLight {
                        position: light.position.to_array(),
                        kind: light.kind,
                        intensity: light.intensity,
                        color: light.color.to_array(),
                        radial_falloff: light.radial_falloff,
                        volumetric_intensity: light.volumetric_intensity,
                        _pad: [0.0; 3],
                    };
                }
            }
        }

        let buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("pass_uniforms"),
                contents: bytemuck::bytes_of(&uniforms),
                usage: wgpu::BufferUsages::UNIFORM,
            });
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("fullscreen_bind_group"),
            layout: &self.fullscreen_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(views[0]),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::TextureView(views[1]),
                },
            ],
        });

        self.push_draw(PendingDraw {
            shader: draw.shader,
            mesh: draw.quad,
            bind_group,
        })
    }

    fn upload_texture(
        &mut self,
        handle: TextureHandle,
        data: &TextureData,
    ) -> Result<(), RenderError> {
        let texture = create_texture(&self.device, &self.queue, "texture", data);
        self.textures.insert(handle, texture);
        Ok(())
    }

    fn upload_shader(
        &mut self,
        handle: ShaderHandle,
        source: &ShaderSource,
    ) -> Result<(), RenderError> {
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let module = self
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(&source.label),
                source: wgpu::ShaderSource::Wgsl(source.wgsl.as_str().into()),
            });
        if let Some(error) = pollster::block_on(self.device.pop_error_scope()) {
            return Err(RenderError::Shader {
                label: source.label.clone(),
                message: error.to_string(),
            });
        }
        self.pipelines.retain(|(shader, _), _| *shader != handle);
        self.shaders.insert(
            handle,
            GpuShader {
                label: source.label.clone(),
                module,
                kind: source.kind,
                blend: source.blend,
            },
        );
        tracing::debug!(label = %source.label, "shader compiled");
        Ok(())
    }

    fn upload_mesh(&mut self, handle: GpuDataHandle, data: &MeshData) -> Result<(), RenderError> {
        let vertices = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("mesh_vertices"),
                contents: bytemuck::cast_slice(&data.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let indices = data.is_indexed().then(|| {
            self.device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("mesh_indices"),
                    contents: bytemuck::cast_slice(&data.indices),
                    usage: wgpu::BufferUsages::INDEX,
                })
        });
        let count = if data.is_indexed() {
            data.indices.len()
        } else {
            data.vertices.len()
        } as u32;
        self.meshes.insert(
            handle,
            GpuMesh {
                vertices,
                indices,
                count,
            },
        );
        Ok(())
    }

    fn release_texture(&mut self, handle: TextureHandle) -> bool {
        self.textures.remove(&handle).is_some()
    }

    fn release_shader(&mut self, handle: ShaderHandle) -> bool {
        self.pipelines.retain(|(shader, _), _| *shader != handle);
        self.shaders.remove(&handle).is_some()
    }

    fn release_mesh(&mut self, handle: GpuDataHandle) -> bool {
        self.meshes.remove(&handle).is_some()
    }

    fn present(&mut self) -> Result<(), RenderError> {
        self.flush();
        if let Some(frame) = self.frame.take() {
            frame.present();
        }
        Ok(())
    }

    fn resize_surface(&mut self, size: UVec2) {
        self.flush();
        self.frame = None;
        self.surface_config.width = size.x.max(1);
        self.surface_config.height = size.y.max(1);
        self.surface.configure(&self.device, &self.surface_config);
    }
}
