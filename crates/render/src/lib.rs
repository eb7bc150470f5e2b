//! Backend-agnostic deferred renderer.
//!
//! [`RenderPipeline`] reads the world and drives a [`RenderBackend`] through
//! the pass chain color → normal → lighting → bloom → present. The backend
//! owns the GPU; the pipeline owns the framebuffers it created and
//! reallocates them when the window or render scale changes.
//!
//! # Invariants
//! - The renderer never mutates the world.
//! - Entities and lights are visited in ascending entity id order.
//! - A failed draw never aborts the frame.

mod backend;
mod camera;
mod framebuffer;
mod pipeline;
mod recording;
mod resources;

pub use backend::{
    FullscreenDraw, LightUniform, MAX_LIGHTS, MeshDraw, PassParams, RenderBackend, RenderError,
    RenderTarget,
};
pub use camera::{
    CAMERA_DISTANCE, CameraMatrices, ORTHO_HALF_HEIGHT, active_camera, camera_matrices,
};
pub use framebuffer::{FramebufferInfo, FramebufferRegistry, RenderConfig};
pub use pipeline::{MAX_BLOOM_STRENGTH, MIN_BLOOM_STRENGTH, PipelineSettings, RenderPipeline};
pub use recording::{Command, RecordedParams, RecordingBackend};
pub use resources::{
    DEFAULT_COLOR_KEY, DEFAULT_NORMAL_KEY, DefaultResources, PipelineResources, PipelineShaders,
    SCREEN_QUAD_KEY, SPRITE_QUAD_KEY, load_builtin, release_all, upload_all,
};
