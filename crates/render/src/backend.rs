use glam::{Mat4, UVec2, Vec2, Vec3, Vec4};
use lumen_assets::{MeshData, ShaderSource, TextureData};
use lumen_common::{FramebufferHandle, GpuDataHandle, ShaderHandle, TextureHandle};

/// Lights beyond this count are dropped from the lighting pass.
pub const MAX_LIGHTS: usize = 32;

/// Errors reported by a render backend.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("texture {0:?} is not uploaded")]
    MissingTexture(TextureHandle),
    #[error("shader {0:?} is not uploaded")]
    MissingShader(ShaderHandle),
    #[error("mesh {0:?} is not uploaded")]
    MissingMesh(GpuDataHandle),
    #[error("framebuffer {0:?} does not exist")]
    MissingFramebuffer(FramebufferHandle),
    #[error("no render target is bound")]
    NoTargetBound,
    #[error("shader {label} failed to compile: {message}")]
    Shader { label: String, message: String },
    #[error("surface error: {0}")]
    Surface(String),
}

/// Where draws go until the next unbind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderTarget {
    Screen,
    Framebuffer(FramebufferHandle),
}

/// One light as the lighting shader sees it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightUniform {
    /// `LightKind::code()`: 0 global, 1 point.
    pub kind: u32,
    /// Position in `[0, 1]²` screen space.
    pub position: Vec2,
    pub color: Vec3,
    pub intensity: f32,
    pub radial_falloff: f32,
    pub volumetric_intensity: f32,
}

/// Per-pass parameters for full-screen shaders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PassParams<'a> {
    None,
    Blur { horizontal: bool },
    Lighting { lights: &'a [LightUniform] },
}

/// Geometry draw into the bound target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshDraw {
    pub shader: ShaderHandle,
    pub data: GpuDataHandle,
    pub texture: TextureHandle,
    pub model: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
}

/// Full-screen quad draw sampling up to two framebuffers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FullscreenDraw<'a> {
    pub shader: ShaderHandle,
    pub quad: GpuDataHandle,
    pub inputs: [Option<FramebufferHandle>; 2],
    pub params: PassParams<'a>,
}

/// Immediate-mode GPU interface the pipeline drives.
///
/// Resources uploaded here are keyed by the asset store handle they came from
/// and live until released explicitly. Framebuffers are created and destroyed
/// by the pipeline; a resize keeps the handle and replaces the storage.
pub trait RenderBackend {
    fn create_framebuffer(
        &mut self,
        label: &str,
        size: UVec2,
    ) -> Result<FramebufferHandle, RenderError>;
    fn resize_framebuffer(
        &mut self,
        framebuffer: FramebufferHandle,
        size: UVec2,
    ) -> Result<(), RenderError>;
    fn destroy_framebuffer(&mut self, framebuffer: FramebufferHandle) -> bool;

    fn bind_framebuffer(&mut self, target: RenderTarget) -> Result<(), RenderError>;
    fn unbind_framebuffer(&mut self);
    fn clear(&mut self, color: Vec4) -> Result<(), RenderError>;
    fn draw_mesh(&mut self, draw: &MeshDraw) -> Result<(), RenderError>;
    fn draw_fullscreen(&mut self, draw: &FullscreenDraw<'_>) -> Result<(), RenderError>;

    fn upload_texture(
        &mut self,
        handle: TextureHandle,
        data: &TextureData,
    ) -> Result<(), RenderError>;
    fn upload_shader(
        &mut self,
        handle: ShaderHandle,
        source: &ShaderSource,
    ) -> Result<(), RenderError>;
    fn upload_mesh(&mut self, handle: GpuDataHandle, data: &MeshData) -> Result<(), RenderError>;
    fn release_texture(&mut self, handle: TextureHandle) -> bool;
    fn release_shader(&mut self, handle: ShaderHandle) -> bool;
    fn release_mesh(&mut self, handle: GpuDataHandle) -> bool;

    /// Finish the frame and show whatever was drawn to the screen.
    fn present(&mut self) -> Result<(), RenderError>;

    /// The window surface changed size.
    fn resize_surface(&mut self, _size: UVec2) {}
}
