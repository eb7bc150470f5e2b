use crate::AssetError;
use bytemuck::{Pod, Zeroable};

/// RGBA8 pixel data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl TextureData {
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self, AssetError> {
        let expected = width as usize * height as usize * 4;
        if width == 0 || height == 0 || rgba.len() != expected {
            return Err(AssetError::InvalidTexture {
                width,
                height,
                len: rgba.len(),
            });
        }
        Ok(Self {
            width,
            height,
            rgba,
        })
    }

    /// A texture filled with one color.
    pub fn solid(width: u32, height: u32, color: [u8; 4]) -> Self {
        let w = width.max(1);
        let h = height.max(1);
        Self {
            width: w,
            height: h,
            rgba: color.repeat(w as usize * h as usize),
        }
    }
}

/// Which vertex/bind layout a shader is written against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderKind {
    /// Per-entity geometry: model/view/projection uniforms plus one texture.
    Mesh,
    /// Full-screen pass: pass parameters plus two framebuffer inputs.
    Fullscreen,
}

/// How a shader's output is combined with the target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BlendMode {
    #[default]
    Replace,
    Alpha,
    Additive,
}

/// Shader source. Entry points are `vs_main` and `fs_main`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    pub label: String,
    pub wgsl: String,
    pub kind: ShaderKind,
    pub blend: BlendMode,
}

/// Interleaved vertex: position then texture coordinate.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

/// Vertex data with an optional index list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Axis-aligned quad centred on the origin, `half` units to each side.
    pub fn quad(half: f32) -> Self {
        let h = half;
        #[rustfmt::skip]
        let vertices = vec![
            Vertex { position: [ h,  h, 0.0], uv: [1.0, 1.0] },
            Vertex { position: [ h, -h, 0.0], uv: [1.0, 0.0] },
            Vertex { position: [-h, -h, 0.0], uv: [0.0, 0.0] },
            Vertex { position: [-h,  h, 0.0], uv: [0.0, 1.0] },
        ];
        Self {
            vertices,
            indices: vec![0, 1, 3, 1, 2, 3],
        }
    }

    /// Unit sprite quad used by default renderables.
    pub fn sprite_quad() -> Self {
        Self::quad(0.5)
    }

    /// Quad covering clip space, used by every full-screen pass.
    pub fn screen_quad() -> Self {
        Self::quad(1.0)
    }

    pub fn is_indexed(&self) -> bool {
        !self.indices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn texture_size_is_validated() {
        assert!(TextureData::new(2, 2, vec![0; 16]).is_ok());
        assert!(TextureData::new(2, 2, vec![0; 15]).is_err());
        assert!(TextureData::new(0, 2, vec![]).is_err());
    }

    #[test]
    fn solid_texture_has_full_buffer() {
        let t = TextureData::solid(3, 2, [1, 2, 3, 4]);
        assert_eq!(t.rgba.len(), 24);
        assert_eq!(&t.rgba[20..], &[1, 2, 3, 4]);
    }

    #[test]
    fn quads_are_indexed_triangles() {
        let q = MeshData::screen_quad();
        assert!(q.is_indexed());
        assert_eq!(q.indices.len(), 6);
        assert!(q.indices.iter().all(|&i| (i as usize) < q.vertices.len()));
        assert_eq!(q.vertices[0].position, [1.0, 1.0, 0.0]);
    }
}
