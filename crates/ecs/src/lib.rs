//! Deterministic entity-component store.
//!
//! Components live in one BTreeMap-backed table per type, addressed through a
//! single generic interface (`new_component::<T>`, `get_component::<T>`, ...).
//!
//! # Invariants
//! - Iteration order is ascending entity id for every table.
//! - An entity and its transform exist together.
//! - Destroying an entity removes it from every table.

mod component;
mod world;

pub use component::{
    Camera, Component, Light, LightKind, PhysicsBody, ProjectionMode, Renderable, Script,
};
pub use lumen_common::{EntityId, Transform};
pub use world::{EcsError, World};
