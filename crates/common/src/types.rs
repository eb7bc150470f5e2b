use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Unique identifier for an entity in the world.
///
/// Ids are allocated by the world in increasing order and are never reused
/// within a session. [`EntityId::NULL`] never names a live entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    /// Sentinel meaning "no entity".
    pub const NULL: Self = Self(u32::MAX);

    /// First id handed out by a fresh world.
    pub const FIRST: Self = Self(1);

    pub fn is_null(self) -> bool {
        self == Self::NULL
    }

    /// The id following this one, or `None` once ids run out.
    pub fn next(self) -> Option<Self> {
        self.0
            .checked_add(1)
            .map(Self)
            .filter(|id| !id.is_null())
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_null() {
            write!(f, "#null")
        } else {
            write!(f, "#{}", self.0)
        }
    }
}

/// Planar transform: position, draw/physics layer, scale, rotation in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec2,
    pub layer: i32,
    pub scale: Vec2,
    pub rotation: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            layer: 0,
            scale: Vec2::ONE,
            rotation: 0.0,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec2) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// World position with the layer as depth.
    pub fn world_position(&self) -> Vec3 {
        self.position.extend(self.layer as f32)
    }

    /// Model matrix: translate to (x, y, layer), rotate about Z, scale in XY.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.world_position())
            * Mat4::from_rotation_z(self.rotation)
            * Mat4::from_scale(self.scale.extend(1.0))
    }
}
