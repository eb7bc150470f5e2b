use glam::{Mat4, Vec2, Vec3};
use lumen_common::{EntityId, Transform};
use lumen_ecs::{Camera, World};

/// Distance from the scene plane to the camera eye.
pub const CAMERA_DISTANCE: f32 = 3.0;
/// Half of the visible world height under the orthographic projection.
pub const ORTHO_HALF_HEIGHT: f32 = 10.0;
const NEAR: f32 = 0.1;
const FAR: f32 = 100.0;

/// View and projection used by one frame's passes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraMatrices {
    pub view: Mat4,
    pub projection: Mat4,
}

impl CameraMatrices {
    pub const IDENTITY: Self = Self {
        view: Mat4::IDENTITY,
        projection: Mat4::IDENTITY,
    };

    /// Camera looking down -Z at `eye` with an orthographic projection.
    pub fn orthographic(eye: Vec2, aspect: f32) -> Self {
        let from = eye.extend(CAMERA_DISTANCE);
        let view = Mat4::look_at_rh(from, eye.extend(0.0), Vec3::Y);
        let half_w = ORTHO_HALF_HEIGHT * aspect;
        let projection = Mat4::orthographic_rh(
            -half_w,
            half_w,
            -ORTHO_HALF_HEIGHT,
            ORTHO_HALF_HEIGHT,
            NEAR,
            FAR,
        );
        Self { view, projection }
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }

    /// Project a world point into `[0, 1]²` screen space, origin bottom-left.
    pub fn project_to_screen(&self, point: Vec3) -> Vec2 {
        let clip = self.view_projection() * point.extend(1.0);
        let ndc = if clip.w.abs() > f32::EPSILON {
            clip.truncate().truncate() / clip.w
        } else {
            clip.truncate().truncate()
        };
        (ndc + Vec2::ONE) * 0.5
    }
}

/// The camera with the lowest entity id, with its eye position in world space.
pub fn active_camera(world: &World) -> Option<(EntityId, Vec2)> {
    let (id, camera) = world.iter::<Camera>().next()?;
    let base = world
        .get_component::<Transform>(id)
        .map(|t| t.position)
        .unwrap_or_default();
    Some((id, base + camera.position))
}

/// Matrices for the active camera. Render passes always project
/// orthographically, whatever mode the camera is set to.
pub fn camera_matrices(world: &World, aspect: f32) -> Option<CameraMatrices> {
    active_camera(world).map(|(_, eye)| CameraMatrices::orthographic(eye, aspect))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_centre_projects_to_screen_centre() {
        let m = CameraMatrices::orthographic(Vec2::new(4.0, -2.0), 4.0 / 3.0);
        let p = m.project_to_screen(Vec3::new(4.0, -2.0, 0.0));
        assert!((p - Vec2::splat(0.5)).length() < 1e-5);
    }

    #[test]
    fn top_right_of_view_maps_to_one() {
        let m = CameraMatrices::orthographic(Vec2::ZERO, 2.0);
        let p = m.project_to_screen(Vec3::new(20.0, 10.0, 0.0));
        assert!((p - Vec2::ONE).length() < 1e-5);
    }

    #[test]
    fn lowest_id_camera_wins() {
        let mut world = World::new("test.world");
        let first = world.create_entity().unwrap();
        let second = world.create_entity().unwrap();
        world.new_component::<Camera>(second).unwrap().position = Vec2::new(9.0, 9.0);
        world.get_component_mut::<Transform>(first).unwrap().position = Vec2::new(1.0, 0.0);
        world.new_component::<Camera>(first).unwrap().position = Vec2::new(0.0, 2.0);

        let (id, eye) = active_camera(&world).unwrap();
        assert_eq!(id, first);
        assert_eq!(eye, Vec2::new(1.0, 2.0));
    }

    #[test]
    fn no_camera_no_matrices() {
        let world = World::new("test.world");
        assert!(camera_matrices(&world, 1.0).is_none());
    }
}
