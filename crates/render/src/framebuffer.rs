use crate::backend::{RenderBackend, RenderError};
use glam::{UVec2, Vec4};
use lumen_common::FramebufferHandle;
use serde::{Deserialize, Serialize};

/// How a framebuffer was registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FramebufferInfo {
    pub name: String,
    /// Reallocated at the render size whenever the window or scale changes.
    pub recreate_on_resize: bool,
}

/// Window size and the integer downscale the pipeline renders at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    pub window_size: UVec2,
    pub render_scale: u32,
    pub clear_color: Vec4,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_size: UVec2::new(800, 600),
            render_scale: 4,
            clear_color: Vec4::new(0.0, 0.0, 0.0, 1.0),
        }
    }
}

impl RenderConfig {
    /// `window_size / render_scale`, at least one pixel on each axis.
    pub fn render_size(&self) -> UVec2 {
        (self.window_size / self.render_scale.max(1)).max(UVec2::ONE)
    }

    pub fn aspect(&self) -> f32 {
        let size = self.render_size();
        size.x as f32 / size.y as f32
    }
}

#[derive(Debug)]
struct Entry {
    handle: FramebufferHandle,
    info: FramebufferInfo,
    size: UVec2,
}

/// Every framebuffer the pipeline owns, in creation order.
#[derive(Debug, Default)]
pub struct FramebufferRegistry {
    entries: Vec<Entry>,
}

impl FramebufferRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(
        &mut self,
        backend: &mut dyn RenderBackend,
        info: FramebufferInfo,
        size: UVec2,
    ) -> Result<FramebufferHandle, RenderError> {
        let handle = backend.create_framebuffer(&info.name, size)?;
        tracing::debug!(name = %info.name, width = size.x, height = size.y, "framebuffer created");
        self.entries.push(Entry { handle, info, size });
        Ok(handle)
    }

    /// Reallocate every `recreate_on_resize` framebuffer whose size differs
    /// from `size`. Handles stay the same.
    pub fn resize(
        &mut self,
        backend: &mut dyn RenderBackend,
        size: UVec2,
    ) -> Result<(), RenderError> {
        for entry in &mut self.entries {
            if !entry.info.recreate_on_resize || entry.size == size {
                continue;
            }
            backend.resize_framebuffer(entry.handle, size)?;
            tracing::debug!(
                name = %entry.info.name,
                width = size.x,
                height = size.y,
                "framebuffer reallocated"
            );
            entry.size = size;
        }
        Ok(())
    }

    pub fn info(&self, handle: FramebufferHandle) -> Option<&FramebufferInfo> {
        self.entry(handle).map(|e| &e.info)
    }

    pub fn size(&self, handle: FramebufferHandle) -> Option<UVec2> {
        self.entry(handle).map(|e| e.size)
    }

    pub fn find(&self, name: &str) -> Option<FramebufferHandle> {
        self.entries
            .iter()
            .find(|e| e.info.name == name)
            .map(|e| e.handle)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Destroy every registered framebuffer.
    pub fn destroy_all(&mut self, backend: &mut dyn RenderBackend) {
        for entry in self.entries.drain(..) {
            backend.destroy_framebuffer(entry.handle);
            tracing::debug!(name = %entry.info.name, "framebuffer destroyed");
        }
    }

    fn entry(&self, handle: FramebufferHandle) -> Option<&Entry> {
        self.entries.iter().find(|e| e.handle == handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::RecordingBackend;

    fn info(name: &str, recreate_on_resize: bool) -> FramebufferInfo {
        FramebufferInfo {
            name: name.into(),
            recreate_on_resize,
        }
    }

    #[test]
    fn render_size_divides_and_clamps() {
        let config = RenderConfig::default();
        assert_eq!(config.render_size(), UVec2::new(200, 150));

        let tiny = RenderConfig {
            window_size: UVec2::new(3, 0),
            render_scale: 4,
            ..RenderConfig::default()
        };
        assert_eq!(tiny.render_size(), UVec2::ONE);

        let zero_scale = RenderConfig {
            render_scale: 0,
            ..RenderConfig::default()
        };
        assert_eq!(zero_scale.render_size(), UVec2::new(800, 600));
    }

    #[test]
    fn resize_only_touches_flagged_buffers() {
        let mut backend = RecordingBackend::new();
        let mut registry = FramebufferRegistry::new();
        let scaled = registry
            .create(&mut backend, info("scaled", true), UVec2::new(200, 150))
            .unwrap();
        let fixed = registry
            .create(&mut backend, info("fixed", false), UVec2::new(64, 64))
            .unwrap();

        registry.resize(&mut backend, UVec2::new(256, 144)).unwrap();

        assert_eq!(registry.size(scaled), Some(UVec2::new(256, 144)));
        assert_eq!(backend.framebuffer_size(scaled), Some(UVec2::new(256, 144)));
        assert_eq!(registry.size(fixed), Some(UVec2::new(64, 64)));
        assert_eq!(backend.framebuffer_size(fixed), Some(UVec2::new(64, 64)));
    }

    #[test]
    fn destroy_all_releases_backend_storage() {
        let mut backend = RecordingBackend::new();
        let mut registry = FramebufferRegistry::new();
        let fb = registry
            .create(&mut backend, info("a", true), UVec2::ONE)
            .unwrap();
        assert_eq!(registry.find("a"), Some(fb));

        registry.destroy_all(&mut backend);
        assert!(registry.is_empty());
        assert_eq!(backend.framebuffer_size(fb), None);
    }
}
