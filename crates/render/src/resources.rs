//! Built-in resources every scene can rely on, and bulk upload/release of the
//! asset store.

use crate::backend::{RenderBackend, RenderError};
use lumen_assets::{AssetStore, MeshData, ShaderSource, TextureData};
use lumen_common::{GpuDataHandle, ShaderHandle, TextureHandle};
use lumen_ecs::Renderable;

pub const SPRITE_QUAD_KEY: &str = "meshes/default_quad";
pub const SCREEN_QUAD_KEY: &str = "meshes/screen_quad";
pub const DEFAULT_COLOR_KEY: &str = "textures/default_color";
pub const DEFAULT_NORMAL_KEY: &str = "textures/default_normal";

/// Sources for the shaders the pipeline and default sprites need. The
/// backend crate supplies these in its own shading language.
#[derive(Debug, Clone)]
pub struct PipelineShaders {
    pub sprite: ShaderSource,
    pub deferred: ShaderSource,
    pub bright: ShaderSource,
    pub blur: ShaderSource,
    pub combine: ShaderSource,
    pub screen: ShaderSource,
}

/// Shaders and geometry of the full-screen passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineResources {
    pub deferred_shader: ShaderHandle,
    pub bright_shader: ShaderHandle,
    pub blur_shader: ShaderHandle,
    pub combine_shader: ShaderHandle,
    pub screen_shader: ShaderHandle,
    pub screen_quad: GpuDataHandle,
}

/// Fallbacks for renderables created without their own assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultResources {
    pub sprite_shader: ShaderHandle,
    pub sprite_quad: GpuDataHandle,
    pub color_texture: TextureHandle,
    pub normal_texture: TextureHandle,
}

impl DefaultResources {
    /// A fully populated renderable using only defaults.
    pub fn renderable(&self) -> Renderable {
        Renderable {
            color: Some(self.color_texture),
            normal: Some(self.normal_texture),
            shader: Some(self.sprite_shader),
            data: Some(self.sprite_quad),
        }
    }
}

fn shader_key(source: &ShaderSource) -> String {
    format!("shaders/{}", source.label)
}

/// Register the built-ins in `store` and upload them.
pub fn load_builtin(
    store: &mut AssetStore,
    backend: &mut dyn RenderBackend,
    shaders: &PipelineShaders,
) -> Result<(PipelineResources, DefaultResources), RenderError> {
    let mut shader = |source: &ShaderSource| -> Result<ShaderHandle, RenderError> {
        let handle = store.shaders.insert(&shader_key(source), source.clone());
        backend.upload_shader(handle, source)?;
        Ok(handle)
    };
    let sprite_shader = shader(&shaders.sprite)?;
    let pipeline_shaders = [
        shader(&shaders.deferred)?,
        shader(&shaders.bright)?,
        shader(&shaders.blur)?,
        shader(&shaders.combine)?,
        shader(&shaders.screen)?,
    ];

    let screen = MeshData::screen_quad();
    let screen_quad = store.meshes.insert(SCREEN_QUAD_KEY, screen.clone());
    backend.upload_mesh(screen_quad, &screen)?;

    let sprite = MeshData::sprite_quad();
    let sprite_quad = store.meshes.insert(SPRITE_QUAD_KEY, sprite.clone());
    backend.upload_mesh(sprite_quad, &sprite)?;

    let color = TextureData::solid(1, 1, [255, 255, 255, 255]);
    let color_texture = store.textures.insert(DEFAULT_COLOR_KEY, color.clone());
    backend.upload_texture(color_texture, &color)?;

    // Flat normal pointing out of the screen.
    let normal = TextureData::solid(1, 1, [128, 128, 255, 255]);
    let normal_texture = store.textures.insert(DEFAULT_NORMAL_KEY, normal.clone());
    backend.upload_texture(normal_texture, &normal)?;

    let [deferred_shader, bright_shader, blur_shader, combine_shader, screen_shader] =
        pipeline_shaders;
    tracing::debug!(assets = store.len(), "built-in resources loaded");

    Ok((
        PipelineResources {
            deferred_shader,
            bright_shader,
            blur_shader,
            combine_shader,
            screen_shader,
            screen_quad,
        },
        DefaultResources {
            sprite_shader,
            sprite_quad,
            color_texture,
            normal_texture,
        },
    ))
}

/// Upload every asset in `store`. Returns how many were uploaded.
pub fn upload_all(
    store: &AssetStore,
    backend: &mut dyn RenderBackend,
) -> Result<usize, RenderError> {
    let mut count = 0;
    for (handle, texture) in store.textures.iter() {
        backend.upload_texture(handle, texture)?;
        count += 1;
    }
    for (handle, source) in store.shaders.iter() {
        backend.upload_shader(handle, source)?;
        count += 1;
    }
    for (handle, mesh) in store.meshes.iter() {
        backend.upload_mesh(handle, mesh)?;
        count += 1;
    }
    Ok(count)
}

/// Release the GPU side of every asset in `store`. Returns how many the
/// backend actually held.
pub fn release_all(store: &AssetStore, backend: &mut dyn RenderBackend) -> usize {
    let textures = store
        .textures
        .iter()
        .filter(|(h, _)| backend.release_texture(*h))
        .count();
    let shaders = store
        .shaders
        .iter()
        .filter(|(h, _)| backend.release_shader(*h))
        .count();
    let meshes = store
        .meshes
        .iter()
        .filter(|(h, _)| backend.release_mesh(*h))
        .count();
    textures + shaders + meshes
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::recording::RecordingBackend;
    use lumen_assets::{BlendMode, ShaderKind};

    pub(crate) fn test_shaders() -> PipelineShaders {
        let source = |label: &str, kind| ShaderSource {
            label: label.into(),
            wgsl: String::new(),
            kind,
            blend: BlendMode::Replace,
        };
        PipelineShaders {
            sprite: source("sprite", ShaderKind::Mesh),
            deferred: source("deferred", ShaderKind::Fullscreen),
            bright: source("bright", ShaderKind::Fullscreen),
            blur: source("blur", ShaderKind::Fullscreen),
            combine: source("combine", ShaderKind::Fullscreen),
            screen: source("screen", ShaderKind::Fullscreen),
        }
    }

    #[test]
    fn builtins_are_stored_and_uploaded() {
        let mut store = AssetStore::new();
        let mut backend = RecordingBackend::new();
        let (pipeline, defaults) = load_builtin(&mut store, &mut backend, &test_shaders()).unwrap();

        assert_eq!(store.len(), 10);
        assert_eq!(backend.resource_count(), 10);
        assert_ne!(pipeline.blur_shader, pipeline.bright_shader);
        assert!(defaults.renderable().is_complete());
        assert_eq!(store.meshes.find(SCREEN_QUAD_KEY), Some(pipeline.screen_quad));
    }

    #[test]
    fn release_all_empties_backend() {
        let mut store = AssetStore::new();
        let mut backend = RecordingBackend::new();
        load_builtin(&mut store, &mut backend, &test_shaders()).unwrap();

        assert_eq!(release_all(&store, &mut backend), 10);
        assert_eq!(backend.resource_count(), 0);
        assert_eq!(release_all(&store, &mut backend), 0);

        assert_eq!(upload_all(&store, &mut backend).unwrap(), 10);
        assert_eq!(backend.resource_count(), 10);
    }
}
