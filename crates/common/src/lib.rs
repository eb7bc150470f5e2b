//! Shared types for the lumen engine.
//!
//! Everything here is plain data: entity ids, the planar transform, and the
//! opaque handles components use to reference resources they do not own.

mod handle;
mod types;

pub use handle::{BodyHandle, FramebufferHandle, GpuDataHandle, ShaderHandle, TextureHandle};
pub use types::{EntityId, Transform};
