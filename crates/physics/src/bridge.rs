use crate::world::{BodyPose, PhysicsWorld, pose_of};
use lumen_common::{BodyHandle, EntityId, Transform};
use lumen_ecs::{PhysicsBody, World};
use rapier2d::prelude::*;
use std::f32::consts::{PI, TAU};

/// Poses closer than this are considered in sync.
const POSE_EPSILON: f32 = 1e-5;

/// Keeps scene transforms and rigid bodies in agreement.
///
/// Each tick the transform wins if something other than physics moved it
/// since the last sync; otherwise the simulated pose is written back.
#[derive(Debug, Default)]
pub struct PhysicsBridge {
    world: PhysicsWorld,
}

impl PhysicsBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gravity(gravity: [f32; 2]) -> Self {
        Self {
            world: PhysicsWorld::with_gravity(gravity),
        }
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.world
    }

    pub fn physics_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.world
    }

    pub fn create_body(&mut self, transform: &Transform) -> BodyHandle {
        let handle = self.world.create_body(transform);
        tracing::debug!(?handle, "rigid body created");
        handle
    }

    pub fn remove_body(&mut self, handle: BodyHandle) -> bool {
        self.world.remove_body(handle)
    }

    pub fn body_is_valid(&self, handle: BodyHandle) -> bool {
        self.world.body_is_valid(handle)
    }

    pub fn body_pose(&self, handle: BodyHandle) -> Option<BodyPose> {
        self.world.body_pose(handle)
    }

    /// Runs one fixed tick: override, step, write back.
    pub fn update(&mut self, scene: &mut World) {
        let bodies: Vec<(EntityId, PhysicsBody)> = scene
            .iter::<PhysicsBody>()
            .map(|(id, body)| (id, *body))
            .collect();

        for (id, physics) in &bodies {
            let Some(body) = self.world.body_mut(physics.handle) else {
                tracing::trace!(entity = %id, "no valid rigid body");
                continue;
            };

            if !physics.enabled {
                if !body.is_sleeping() {
                    body.sleep();
                }
                continue;
            }

            if body.is_sleeping() {
                body.wake_up(true);
            }

            if let Some(transform) = scene.get_component::<Transform>(*id) {
                let pose = pose_of(body);
                if !in_sync(&pose, transform) {
                    body.set_translation(
                        Vector::new(transform.position.x, transform.position.y),
                        true,
                    );
                    body.set_rotation(Rotation::from_angle(transform.rotation), true);
                    body.set_linvel(Vector::new(0.0, 0.0), true);
                }
            }
        }

        self.world.step();

        for (id, physics) in &bodies {
            if !physics.enabled {
                continue;
            }
            let Some(pose) = self.world.body_pose(physics.handle) else {
                continue;
            };
            if let Some(transform) = scene.get_component_mut::<Transform>(*id) {
                transform.position = pose.position;
                transform.rotation = pose.rotation;
            }
        }
    }
}

fn in_sync(pose: &BodyPose, transform: &Transform) -> bool {
    (pose.position - transform.position).abs().max_element() <= POSE_EPSILON
        && angle_between(pose.rotation, transform.rotation).abs() <= POSE_EPSILON
}

/// Signed difference `a - b` wrapped into [-π, π).
fn angle_between(a: f32, b: f32) -> f32 {
    (a - b + PI).rem_euclid(TAU) - PI
}
