use glam::{Vec2, Vec3};
use lumen_common::{BodyHandle, GpuDataHandle, ShaderHandle, TextureHandle, Transform};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Data that can be attached to an entity.
///
/// `TAG` is the stable name the world serializer writes for this type. It must
/// never change once worlds have been saved with it.
pub trait Component: Default + 'static {
    const TAG: &'static str;
}

impl Component for Transform {
    const TAG: &'static str = "Transform";
}

/// Renderable component: references the textures, shader and vertex data used
/// by the geometry passes. Any missing reference makes the entity invisible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Renderable {
    pub color: Option<TextureHandle>,
    pub normal: Option<TextureHandle>,
    pub shader: Option<ShaderHandle>,
    pub data: Option<GpuDataHandle>,
}

impl Renderable {
    /// True when every resource needed by the color and normal passes is set.
    pub fn is_complete(&self) -> bool {
        self.color.is_some() && self.normal.is_some() && self.shader.is_some() && self.data.is_some()
    }
}

impl Component for Renderable {
    const TAG: &'static str = "Renderable";
}

/// Rigid body link. Simulation and synchronization only happen while `enabled`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhysicsBody {
    pub handle: BodyHandle,
    pub enabled: bool,
}

impl Component for PhysicsBody {
    const TAG: &'static str = "PhysicsBody";
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectionMode {
    #[default]
    Perspective,
    Orthographic,
}

/// Camera component. `position` is an offset from the entity's transform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub position: Vec2,
    pub mode: ProjectionMode,
}

impl Component for Camera {
    const TAG: &'static str = "Camera";
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LightKind {
    Global,
    #[default]
    Point,
}

impl LightKind {
    /// Integer code uploaded to the lighting shader.
    pub fn code(self) -> u32 {
        match self {
            Self::Global => 0,
            Self::Point => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Light {
    pub kind: LightKind,
    pub intensity: f32,
    pub radial_falloff: f32,
    pub volumetric_intensity: f32,
    pub color: Vec3,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            kind: LightKind::Point,
            intensity: 1.0,
            radial_falloff: 1.0,
            volumetric_intensity: 0.0,
            color: Vec3::ONE,
        }
    }
}

impl Component for Light {
    const TAG: &'static str = "Light";
}

/// Script attachment consumed by the script host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    pub path: String,
    pub entry: String,
    pub parameters: BTreeMap<String, String>,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            path: String::new(),
            entry: "main".into(),
            parameters: BTreeMap::new(),
        }
    }
}

impl Component for Script {
    const TAG: &'static str = "Script";
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::Key;

    #[test]
    fn tags_are_distinct() {
        let tags = [
            Transform::TAG,
            Renderable::TAG,
            PhysicsBody::TAG,
            Camera::TAG,
            Light::TAG,
            Script::TAG,
        ];
        let mut sorted = tags.to_vec();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), tags.len());
    }

    #[test]
    fn default_renderable_is_incomplete() {
        assert!(!Renderable::default().is_complete());
    }

    #[test]
    fn default_physics_body_is_disabled_and_null() {
        let body = PhysicsBody::default();
        assert!(!body.enabled);
        assert!(body.handle.is_null());
    }

    #[test]
    fn script_defaults_to_main_entry() {
        assert_eq!(Script::default().entry, "main");
    }
}
