//! Engine context tying the world, physics, scheduler and renderer together.
//!
//! [`Engine`] owns every subsystem; nothing lives in globals. The driver
//! feeds input into [`Simulation::input`], calls [`Engine::frame`] once per
//! redraw and forwards window resizes to [`Engine::resize`].

mod config;
mod engine;
mod input;
mod script;
mod simulation;

pub use config::{ConfigError, EngineConfig};
pub use engine::{Engine, EngineError};
pub use input::{InputState, Key};
pub use script::{NullScriptHost, ScriptError, ScriptHost};
pub use simulation::{
    GAME_SYSTEM, PHYSICS_SYSTEM, PLAYER_MARKER, PLAYER_SPEED, SCRIPT_SYSTEM, Simulation,
    register_builtin_systems,
};
