use crate::input::InputState;
use crate::script::{NullScriptHost, ScriptHost};
use lumen_common::{BodyHandle, EntityId, Transform};
use lumen_ecs::{EcsError, PhysicsBody, Script, World};
use lumen_physics::PhysicsBridge;
use lumen_scheduler::{Condition, Phase, Scheduler};

/// Marker of entities the game system moves with the direction keys.
pub const PLAYER_MARKER: &str = "player";
/// Distance a player moves per tick for each held direction.
pub const PLAYER_SPEED: f32 = 0.1;

pub const SCRIPT_SYSTEM: &str = "Script System";
pub const PHYSICS_SYSTEM: &str = "Physics System";
pub const GAME_SYSTEM: &str = "Game System";

/// Everything systems may touch during a tick.
pub struct Simulation {
    pub world: World,
    pub physics: PhysicsBridge,
    pub scripts: Box<dyn ScriptHost>,
    pub input: InputState,
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("world", &self.world)
            .field("physics", &self.physics)
            .field("input", &self.input)
            .finish_non_exhaustive()
    }
}

impl Simulation {
    pub fn new(world: World, physics: PhysicsBridge) -> Self {
        Self {
            world,
            physics,
            scripts: Box::new(NullScriptHost),
            input: InputState::new(),
        }
    }

    /// Give `entity` a rigid body built from its transform. A body it
    /// already had is removed first.
    pub fn spawn_body(&mut self, entity: EntityId) -> Result<BodyHandle, EcsError> {
        let transform = *self
            .world
            .get_component::<Transform>(entity)
            .ok_or(EcsError::EntityNotFound(entity))?;
        if let Some(old) = self.world.get_component::<PhysicsBody>(entity) {
            self.physics.remove_body(old.handle);
        }
        let handle = self.physics.create_body(&transform);
        self.world
            .insert_component(entity, PhysicsBody { handle, enabled: true })?;
        Ok(handle)
    }

    /// Destroy `entity` together with its rigid body.
    pub fn destroy_entity(&mut self, entity: EntityId) -> bool {
        if let Some(body) = self.world.get_component::<PhysicsBody>(entity) {
            self.physics.remove_body(body.handle);
        }
        self.world.destroy_entity(entity)
    }

    /// Run every Script component through the script host.
    pub fn run_scripts(&mut self) {
        for (entity, script) in self.world.iter::<Script>() {
            if let Err(e) = self.scripts.run(entity, script) {
                tracing::warn!(entity = %entity, error = %e, "script failed");
            }
        }
    }

    /// One fixed physics tick.
    pub fn step_physics(&mut self) {
        self.physics.update(&mut self.world);
    }

    /// Move every player by the held direction keys.
    pub fn move_players(&mut self) {
        let delta = self.input.direction() * PLAYER_SPEED;
        if delta == glam::Vec2::ZERO {
            return;
        }
        let players: Vec<EntityId> = self.world.find_marked(PLAYER_MARKER).collect();
        for entity in players {
            if let Some(transform) = self.world.get_component_mut::<Transform>(entity) {
                transform.position += delta;
            }
        }
    }
}

/// Register the script, physics and game systems, in that order.
pub fn register_builtin_systems(scheduler: &mut Scheduler<Simulation>) {
    scheduler.register_system(
        SCRIPT_SYSTEM,
        Phase::Update,
        Condition::WhenPlaying,
        Simulation::run_scripts,
    );
    scheduler.register_system(
        PHYSICS_SYSTEM,
        Phase::Update,
        Condition::WhenPlaying,
        Simulation::step_physics,
    );
    scheduler.register_system(
        GAME_SYSTEM,
        Phase::Update,
        Condition::WhenPlaying,
        Simulation::move_players,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Key;
    use crate::script::ScriptError;
    use glam::Vec2;
    use lumen_ecs::Light;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn simulation() -> Simulation {
        Simulation::new(World::new("test.world"), PhysicsBridge::new())
    }

    struct RecordingHost(Rc<RefCell<Vec<(EntityId, String)>>>);

    impl ScriptHost for RecordingHost {
        fn run(&mut self, entity: EntityId, script: &Script) -> Result<(), ScriptError> {
            self.0.borrow_mut().push((entity, script.path.clone()));
            match script.path.as_str() {
                "broken.py" => Err(ScriptError::Failed {
                    path: script.path.clone(),
                    entry: script.entry.clone(),
                    message: "boom".into(),
                }),
                "missing.py" => Err(ScriptError::NotFound(script.path.clone())),
                _ => Ok(()),
            }
        }
    }

    #[test]
    fn builtin_systems_in_order() {
        let mut scheduler = Scheduler::new();
        register_builtin_systems(&mut scheduler);
        let names: Vec<&str> = scheduler.systems().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec![SCRIPT_SYSTEM, PHYSICS_SYSTEM, GAME_SYSTEM]);
        assert!(scheduler
            .systems()
            .iter()
            .all(|s| s.phase == Phase::Update && s.condition == Condition::WhenPlaying));
    }

    #[test]
    fn players_move_with_held_keys() {
        let mut sim = simulation();
        let player = sim.world.create_entity().unwrap();
        sim.world.set_marker(player, PLAYER_MARKER).unwrap();
        let other = sim.world.create_entity().unwrap();

        sim.input.press(Key::Up);
        sim.input.press(Key::Left);
        sim.move_players();
        sim.move_players();

        let p = sim.world.get_component::<Transform>(player).unwrap().position;
        assert!((p - Vec2::new(-0.2, 0.2)).length() < 1e-6);
        assert_eq!(
            sim.world.get_component::<Transform>(other).unwrap().position,
            Vec2::ZERO
        );
    }

    #[test]
    fn scripts_run_in_id_order_and_errors_do_not_stop_the_tick() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut sim = simulation();
        sim.scripts = Box::new(RecordingHost(calls.clone()));

        let a = sim.world.create_entity().unwrap();
        let b = sim.world.create_entity().unwrap();
        let c = sim.world.create_entity().unwrap();
        let d = sim.world.create_entity().unwrap();
        sim.world.new_component::<Script>(d).unwrap().path = "d.py".into();
        sim.world.new_component::<Script>(c).unwrap().path = "missing.py".into();
        sim.world.new_component::<Script>(b).unwrap().path = "broken.py".into();
        sim.world.new_component::<Script>(a).unwrap().path = "a.py".into();

        sim.run_scripts();
        assert_eq!(
            *calls.borrow(),
            vec![
                (a, "a.py".to_string()),
                (b, "broken.py".to_string()),
                (c, "missing.py".to_string()),
                (d, "d.py".to_string()),
            ]
        );
    }

    #[test]
    fn spawn_body_links_physics() {
        let mut sim = simulation();
        let e = sim.world.create_entity().unwrap();
        let first = sim.spawn_body(e).unwrap();
        let second = sim.spawn_body(e).unwrap();

        assert!(!sim.physics.body_is_valid(first));
        assert!(sim.physics.body_is_valid(second));
        let body = sim.world.get_component::<PhysicsBody>(e).unwrap();
        assert_eq!(body.handle, second);
        assert!(body.enabled);
    }

    #[test]
    fn spawn_body_on_dead_entity_fails() {
        let mut sim = simulation();
        assert!(matches!(
            sim.spawn_body(EntityId(42)),
            Err(EcsError::EntityNotFound(_))
        ));
        assert_eq!(sim.physics.physics().body_count(), 0);
    }

    #[test]
    fn destroy_entity_removes_body_and_components() {
        let mut sim = simulation();
        let e = sim.world.create_entity().unwrap();
        let handle = sim.spawn_body(e).unwrap();
        sim.world.new_component::<Light>(e).unwrap();

        assert!(sim.destroy_entity(e));
        assert!(!sim.physics.body_is_valid(handle));
        assert!(!sim.world.contains_component::<Light>(e));
        assert!(!sim.world.contains_component::<PhysicsBody>(e));
        assert!(!sim.destroy_entity(e));
    }

    #[test]
    fn physics_tick_moves_bodies() {
        let mut sim = simulation();
        let e = sim.world.create_entity().unwrap();
        sim.spawn_body(e).unwrap();
        for _ in 0..10 {
            sim.step_physics();
        }
        assert!(sim.world.get_component::<Transform>(e).unwrap().position.y < 0.0);
    }
}
