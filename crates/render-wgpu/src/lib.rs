//! wgpu render backend for the lumen engine.
//!
//! [`WgpuBackend`] implements `lumen_render::RenderBackend` on top of a wgpu
//! device and window surface. [`pipeline_shaders`] supplies the WGSL for the
//! sprite shader and every full-screen pass of the deferred pipeline.
//!
//! # Invariants
//! - Offscreen framebuffers are `Rgba16Float`; the screen uses the surface format.
//! - A bound target is encoded and submitted when it is unbound.
//! - GPU resources are freed only by an explicit release or destroy.

mod gpu;
mod shaders;

pub use gpu::WgpuBackend;
pub use shaders::{SPRITE_SHADER, pipeline_shaders};
