//! Opaque generational handles.
//!
//! Components and caches hold handles, never the resources themselves. The
//! owner of a resource (asset store, render backend, physics world) checks
//! the key version on every access, so a handle to an unloaded or destroyed
//! resource simply resolves to nothing. The default handle is the null key
//! and never resolves.

use slotmap::new_key_type;

new_key_type! {
    /// Texture owned by the asset store and uploaded to the render backend.
    pub struct TextureHandle;
    /// Shader owned by the asset store and uploaded to the render backend.
    pub struct ShaderHandle;
    /// Vertex/index data owned by the asset store and uploaded to the render backend.
    pub struct GpuDataHandle;
    /// Off-screen render target owned by the render backend.
    pub struct FramebufferHandle;
    /// Rigid body owned by the physics world.
    pub struct BodyHandle;
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::{Key, SlotMap};

    #[test]
    fn default_handle_is_null() {
        assert!(TextureHandle::default().is_null());
        assert!(BodyHandle::default().is_null());
    }

    #[test]
    fn removed_key_goes_stale() {
        let mut map: SlotMap<ShaderHandle, u32> = SlotMap::with_key();
        let a = map.insert(1);
        assert_eq!(map.remove(a), Some(1));
        let b = map.insert(2);
        assert_ne!(a, b);
        assert!(map.get(a).is_none());
        assert!(map.get(ShaderHandle::null()).is_none());
    }

    #[test]
    fn handles_serialize() {
        let mut map: SlotMap<GpuDataHandle, ()> = SlotMap::with_key();
        let h = map.insert(());
        let json = serde_json::to_string(&h).unwrap();
        let back: GpuDataHandle = serde_json::from_str(&json).unwrap();
        assert_eq!(back, h);
    }
}
