//! Rigid-body simulation for the scene.
//!
//! [`PhysicsWorld`] wraps the rapier2d sets and steps them at [`PHYSICS_DT`].
//! [`PhysicsBridge`] reconciles it with the `Transform`s of entities carrying a
//! `PhysicsBody` once per fixed tick.

mod bridge;
mod world;

pub use bridge::PhysicsBridge;
pub use world::{
    BODY_DENSITY, BODY_FRICTION, BodyPose, DEFAULT_GRAVITY, PHYSICS_DT, PhysicsWorld,
    SOLVER_ITERATIONS,
};
