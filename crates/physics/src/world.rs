//! Rapier2D world stepped at a fixed rate.

use lumen_common::{BodyHandle, Transform};
use rapier2d::prelude::*;
use slotmap::{Key, KeyData};
use std::fmt;

/// Fixed timestep for physics simulation (60Hz).
pub const PHYSICS_DT: f32 = 1.0 / 60.0;

/// Constraint solver iterations per step.
pub const SOLVER_ITERATIONS: usize = 6;

/// Default gravity, one unit per second squared downward.
pub const DEFAULT_GRAVITY: [f32; 2] = [0.0, -1.0];

/// Density of every body created by [`PhysicsWorld::create_body`].
pub const BODY_DENSITY: f32 = 1.0;

/// Friction of every body created by [`PhysicsWorld::create_body`].
pub const BODY_FRICTION: f32 = 0.3;

/// Pose of a rigid body in engine terms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyPose {
    pub position: glam::Vec2,
    pub rotation: f32,
}

/// Physics world containing all Rapier2D state.
pub struct PhysicsWorld {
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub integration_parameters: IntegrationParameters,
    pub physics_pipeline: PhysicsPipeline,
    pub island_manager: IslandManager,
    pub broad_phase: DefaultBroadPhase,
    pub narrow_phase: NarrowPhase,
    pub impulse_joint_set: ImpulseJointSet,
    pub multibody_joint_set: MultibodyJointSet,
    pub ccd_solver: CCDSolver,
    pub gravity: Vector,
    frame: u64,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PhysicsWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhysicsWorld")
            .field("frame", &self.frame)
            .field("rigid_body_count", &self.rigid_body_set.len())
            .field("collider_count", &self.collider_set.len())
            .finish_non_exhaustive()
    }
}

impl PhysicsWorld {
    pub fn new() -> Self {
        Self::with_gravity(DEFAULT_GRAVITY)
    }

    pub fn with_gravity(gravity: [f32; 2]) -> Self {
        let integration_parameters = IntegrationParameters {
            dt: PHYSICS_DT,
            num_solver_iterations: SOLVER_ITERATIONS,
            ..Default::default()
        };

        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            gravity: Vector::new(gravity[0], gravity[1]),
            frame: 0,
        }
    }

    /// Advances the simulation by one fixed timestep.
    pub fn step(&mut self) {
        self.physics_pipeline.step(
            self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            &(),
            &(),
        );
        self.frame += 1;
    }

    /// Number of steps taken so far.
    pub fn current_frame(&self) -> u64 {
        self.frame
    }

    /// Dynamic body at the transform's pose with a box collider sized to its scale.
    pub fn create_body(&mut self, transform: &Transform) -> BodyHandle {
        let mut body = RigidBodyBuilder::dynamic()
            .translation(Vector::new(transform.position.x, transform.position.y))
            .build();
        body.set_rotation(Rotation::from_angle(transform.rotation), false);
        let handle = self.rigid_body_set.insert(body);

        let half = transform.scale.abs() * 0.5;
        let collider = ColliderBuilder::cuboid(half.x, half.y)
            .density(BODY_DENSITY)
            .friction(BODY_FRICTION)
            .build();
        self.collider_set
            .insert_with_parent(collider, handle, &mut self.rigid_body_set);

        to_body_handle(handle)
    }

    /// Removes a body and its colliders. Stale handles are ignored.
    pub fn remove_body(&mut self, handle: BodyHandle) -> bool {
        let Some(raw) = to_rapier(handle) else {
            return false;
        };
        self.rigid_body_set
            .remove(
                raw,
                &mut self.island_manager,
                &mut self.collider_set,
                &mut self.impulse_joint_set,
                &mut self.multibody_joint_set,
                true,
            )
            .is_some()
    }

    pub fn body_is_valid(&self, handle: BodyHandle) -> bool {
        self.body(handle).is_some()
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&RigidBody> {
        self.rigid_body_set.get(to_rapier(handle)?)
    }

    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut RigidBody> {
        self.rigid_body_set.get_mut(to_rapier(handle)?)
    }

    pub fn body_pose(&self, handle: BodyHandle) -> Option<BodyPose> {
        self.body(handle).map(pose_of)
    }

    pub fn body_count(&self) -> usize {
        self.rigid_body_set.len()
    }
}

pub(crate) fn pose_of(body: &RigidBody) -> BodyPose {
    let t = body.translation();
    BodyPose {
        position: glam::Vec2::new(t.x, t.y),
        rotation: body.rotation().angle(),
    }
}

// Rapier's (index, generation) pair is packed into the key's FFI form. Slot
// map versions must be odd, so the generation is stored as `2g + 1`.
fn to_body_handle(handle: RigidBodyHandle) -> BodyHandle {
    let (index, generation) = handle.into_raw_parts();
    let version = (u64::from(generation) << 1) | 1;
    BodyHandle::from(KeyData::from_ffi((version << 32) | u64::from(index)))
}

fn to_rapier(handle: BodyHandle) -> Option<RigidBodyHandle> {
    if handle.is_null() {
        return None;
    }
    let ffi = handle.data().as_ffi();
    let index = (ffi & 0xffff_ffff) as u32;
    let generation = ((ffi >> 32) >> 1) as u32;
    Some(RigidBodyHandle::from_raw_parts(index, generation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn world_creation() {
        let world = PhysicsWorld::new();
        assert_eq!(world.current_frame(), 0);
        assert_eq!(world.integration_parameters.dt, PHYSICS_DT);
        assert_eq!(
            world.integration_parameters.num_solver_iterations,
            SOLVER_ITERATIONS
        );
        assert_eq!(world.body_count(), 0);
    }

    #[test]
    fn step_advances_frame() {
        let mut world = PhysicsWorld::new();
        world.step();
        world.step();
        assert_eq!(world.current_frame(), 2);
    }

    #[test]
    fn body_starts_at_transform_pose() {
        let mut world = PhysicsWorld::new();
        let t = Transform {
            position: Vec2::new(3.0, 4.0),
            rotation: 0.5,
            ..Transform::default()
        };
        let handle = world.create_body(&t);
        let pose = world.body_pose(handle).unwrap();
        assert!((pose.position - t.position).length() < 1e-5);
        assert!((pose.rotation - 0.5).abs() < 1e-5);
        assert_eq!(world.collider_set.len(), 1);
    }

    #[test]
    fn gravity_pulls_bodies_down() {
        let mut world = PhysicsWorld::new();
        let handle = world.create_body(&Transform::default());
        for _ in 0..30 {
            world.step();
        }
        assert!(world.body_pose(handle).unwrap().position.y < 0.0);
    }

    #[test]
    fn handles_map_back_to_rapier() {
        let mut world = PhysicsWorld::new();
        let a = world.create_body(&Transform::default());
        world.remove_body(a);
        let b = world.create_body(&Transform::default());
        assert!(!b.is_null());
        assert_ne!(a, b);

        let raw = to_rapier(b).unwrap();
        assert_eq!(to_body_handle(raw), b);
        assert!(world.rigid_body_set.get(raw).is_some());
        assert!(to_rapier(BodyHandle::default()).is_none());
    }

    #[test]
    fn removed_body_handle_is_invalid() {
        let mut world = PhysicsWorld::new();
        let handle = world.create_body(&Transform::default());
        assert!(world.body_is_valid(handle));
        assert!(world.remove_body(handle));
        assert!(!world.body_is_valid(handle));
        assert!(!world.remove_body(handle));
        assert!(!world.body_is_valid(BodyHandle::null()));
    }
}
