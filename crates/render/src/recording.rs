use crate::backend::{
    FullscreenDraw, LightUniform, MeshDraw, PassParams, RenderBackend, RenderError, RenderTarget,
};
use glam::{UVec2, Vec4};
use lumen_assets::{MeshData, ShaderSource, TextureData};
use lumen_common::{FramebufferHandle, GpuDataHandle, ShaderHandle, TextureHandle};
use slotmap::SlotMap;
use std::collections::BTreeSet;

/// Owned copy of [`PassParams`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedParams {
    None,
    Blur { horizontal: bool },
    Lighting { lights: Vec<LightUniform> },
}

impl From<PassParams<'_>> for RecordedParams {
    fn from(params: PassParams<'_>) -> Self {
        match params {
            PassParams::None => Self::None,
            PassParams::Blur { horizontal } => Self::Blur { horizontal },
            PassParams::Lighting { lights } => Self::Lighting {
                lights: lights.to_vec(),
            },
        }
    }
}

/// Everything a [`RecordingBackend`] was asked to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    CreateFramebuffer {
        handle: FramebufferHandle,
        label: String,
        size: UVec2,
    },
    ResizeFramebuffer {
        handle: FramebufferHandle,
        size: UVec2,
    },
    DestroyFramebuffer(FramebufferHandle),
    Bind(RenderTarget),
    Unbind,
    Clear {
        target: RenderTarget,
        color: Vec4,
    },
    DrawMesh {
        target: RenderTarget,
        draw: MeshDraw,
    },
    DrawFullscreen {
        target: RenderTarget,
        shader: ShaderHandle,
        inputs: [Option<FramebufferHandle>; 2],
        params: RecordedParams,
    },
    Present,
}

/// Headless backend that validates handles and records every call.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    framebuffers: SlotMap<FramebufferHandle, UVec2>,
    textures: BTreeSet<TextureHandle>,
    shaders: BTreeSet<ShaderHandle>,
    meshes: BTreeSet<GpuDataHandle>,
    bound: Option<RenderTarget>,
    commands: Vec<Command>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Forget recorded commands, keeping resources.
    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    pub fn framebuffer_size(&self, handle: FramebufferHandle) -> Option<UVec2> {
        self.framebuffers.get(handle).copied()
    }

    pub fn framebuffer_count(&self) -> usize {
        self.framebuffers.len()
    }

    /// Uploaded textures, shaders and meshes.
    pub fn resource_count(&self) -> usize {
        self.textures.len() + self.shaders.len() + self.meshes.len()
    }

    /// How many times `handle` was bound as a target.
    pub fn bind_count(&self, handle: FramebufferHandle) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, Command::Bind(RenderTarget::Framebuffer(h)) if *h == handle))
            .count()
    }

    /// Whether `handle` was bound or sampled.
    pub fn touched(&self, handle: FramebufferHandle) -> bool {
        self.commands.iter().any(|c| match c {
            Command::Bind(RenderTarget::Framebuffer(h)) => *h == handle,
            Command::DrawFullscreen { inputs, .. } => inputs.contains(&Some(handle)),
            _ => false,
        })
    }

    /// Mesh draws that landed in `target`.
    pub fn mesh_draws_into(&self, target: RenderTarget) -> Vec<&MeshDraw> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                Command::DrawMesh { target: t, draw } if *t == target => Some(draw),
                _ => None,
            })
            .collect()
    }

    /// Full-screen draws as `(target, shader, inputs, params)`.
    pub fn fullscreen_draws(
        &self,
    ) -> Vec<(RenderTarget, ShaderHandle, [Option<FramebufferHandle>; 2], &RecordedParams)> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                Command::DrawFullscreen {
                    target,
                    shader,
                    inputs,
                    params,
                } => Some((*target, *shader, *inputs, params)),
                _ => None,
            })
            .collect()
    }

    fn target(&self) -> Result<RenderTarget, RenderError> {
        self.bound.ok_or(RenderError::NoTargetBound)
    }

    fn check_framebuffer(&self, handle: FramebufferHandle) -> Result<(), RenderError> {
        if self.framebuffers.contains_key(handle) {
            Ok(())
        } else {
            Err(RenderError::MissingFramebuffer(handle))
        }
    }

    fn check_shader(&self, handle: ShaderHandle) -> Result<(), RenderError> {
        if self.shaders.contains(&handle) {
            Ok(())
        } else {
            Err(RenderError::MissingShader(handle))
        }
    }

    fn check_mesh(&self, handle: GpuDataHandle) -> Result<(), RenderError> {
        if self.meshes.contains(&handle) {
            Ok(())
        } else {
            Err(RenderError::MissingMesh(handle))
        }
    }
}

impl RenderBackend for RecordingBackend {
    fn create_framebuffer(
        &mut self,
        label: &str,
        size: UVec2,
    ) -> Result<FramebufferHandle, RenderError> {
        let handle = self.framebuffers.insert(size);
        self.commands.push(Command::CreateFramebuffer {
            handle,
            label: label.to_string(),
            size,
        });
        Ok(handle)
    }

    fn resize_framebuffer(
        &mut self,
        framebuffer: FramebufferHandle,
        size: UVec2,
    ) -> Result<(), RenderError> {
        let slot = self
            .framebuffers
            .get_mut(framebuffer)
            .ok_or(RenderError::MissingFramebuffer(framebuffer))?;
        *slot = size;
        self.commands.push(Command::ResizeFramebuffer {
            handle: framebuffer,
            size,
        });
        Ok(())
    }

    fn destroy_framebuffer(&mut self, framebuffer: FramebufferHandle) -> bool {
        let removed = self.framebuffers.remove(framebuffer).is_some();
        if removed {
            self.commands.push(Command::DestroyFramebuffer(framebuffer));
        }
        removed
    }

    fn bind_framebuffer(&mut self, target: RenderTarget) -> Result<(), RenderError> {
        if let RenderTarget::Framebuffer(h) = target {
            self.check_framebuffer(h)?;
        }
        self.bound = Some(target);
        self.commands.push(Command::Bind(target));
        Ok(())
    }

    fn unbind_framebuffer(&mut self) {
        self.bound = None;
        self.commands.push(Command::Unbind);
    }

    fn clear(&mut self, color: Vec4) -> Result<(), RenderError> {
        let target = self.target()?;
        self.commands.push(Command::Clear { target, color });
        Ok(())
    }

    fn draw_mesh(&mut self, draw: &MeshDraw) -> Result<(), RenderError> {
        let target = self.target()?;
        self.check_shader(draw.shader)?;
        self.check_mesh(draw.data)?;
        if !self.textures.contains(&draw.texture) {
            return Err(RenderError::MissingTexture(draw.texture));
        }
        self.commands.push(Command::DrawMesh {
            target,
            draw: *draw,
        });
        Ok(())
    }

    fn draw_fullscreen(&mut self, draw: &FullscreenDraw<'_>) -> Result<(), RenderError> {
        let target = self.target()?;
        self.check_shader(draw.shader)?;
        self.check_mesh(draw.quad)?;
        for input in draw.inputs.iter().flatten() {
            self.check_framebuffer(*input)?;
        }
        self.commands.push(Command::DrawFullscreen {
            target,
            shader: draw.shader,
            inputs: draw.inputs,
            params: draw.params.into(),
        });
        Ok(())
    }

    fn upload_texture(
        &mut self,
        handle: TextureHandle,
        _data: &TextureData,
    ) -> Result<(), RenderError> {
        self.textures.insert(handle);
        Ok(())
    }

    fn upload_shader(
        &mut self,
        handle: ShaderHandle,
        _source: &ShaderSource,
    ) -> Result<(), RenderError> {
        self.shaders.insert(handle);
        Ok(())
    }

    fn upload_mesh(&mut self, handle: GpuDataHandle, _data: &MeshData) -> Result<(), RenderError> {
        self.meshes.insert(handle);
        Ok(())
    }

    fn release_texture(&mut self, handle: TextureHandle) -> bool {
        self.textures.remove(&handle)
    }

    fn release_shader(&mut self, handle: ShaderHandle) -> bool {
        self.shaders.remove(&handle)
    }

    fn release_mesh(&mut self, handle: GpuDataHandle) -> bool {
        self.meshes.remove(&handle)
    }

    fn present(&mut self) -> Result<(), RenderError> {
        self.commands.push(Command::Present);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Mat4;

    #[test]
    fn draw_without_target_fails() {
        let mut backend = RecordingBackend::new();
        let err = backend.clear(Vec4::ONE).unwrap_err();
        assert!(matches!(err, RenderError::NoTargetBound));
    }

    #[test]
    fn draw_with_unknown_resources_fails() {
        let mut backend = RecordingBackend::new();
        backend.bind_framebuffer(RenderTarget::Screen).unwrap();
        let draw = MeshDraw {
            shader: ShaderHandle::default(),
            data: GpuDataHandle::default(),
            texture: TextureHandle::default(),
            model: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
        };
        assert!(matches!(
            backend.draw_mesh(&draw),
            Err(RenderError::MissingShader(_))
        ));

        backend
            .upload_shader(draw.shader, &test_shader())
            .unwrap();
        backend
            .upload_mesh(draw.data, &MeshData::sprite_quad())
            .unwrap();
        assert!(matches!(
            backend.draw_mesh(&draw),
            Err(RenderError::MissingTexture(_))
        ));

        backend
            .upload_texture(draw.texture, &TextureData::solid(1, 1, [255; 4]))
            .unwrap();
        backend.draw_mesh(&draw).unwrap();
        assert_eq!(backend.mesh_draws_into(RenderTarget::Screen).len(), 1);
    }

    #[test]
    fn destroyed_framebuffer_cannot_be_bound() {
        let mut backend = RecordingBackend::new();
        let fb = backend.create_framebuffer("fb", UVec2::ONE).unwrap();
        assert!(backend.destroy_framebuffer(fb));
        assert!(!backend.destroy_framebuffer(fb));
        assert!(matches!(
            backend.bind_framebuffer(RenderTarget::Framebuffer(fb)),
            Err(RenderError::MissingFramebuffer(_))
        ));
    }

    fn test_shader() -> ShaderSource {
        ShaderSource {
            label: "test".into(),
            wgsl: String::new(),
            kind: lumen_assets::ShaderKind::Mesh,
            blend: lumen_assets::BlendMode::Replace,
        }
    }
}
