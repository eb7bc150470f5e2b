use lumen_common::EntityId;
use lumen_ecs::Script;

/// Errors a script host can report. They are logged, never propagated out
/// of the frame.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("script not found: {0}")]
    NotFound(String),
    #[error("script {path}::{entry} failed: {message}")]
    Failed {
        path: String,
        entry: String,
        message: String,
    },
}

/// Runs the Script components of the world, one call per component per tick.
pub trait ScriptHost {
    fn run(&mut self, entity: EntityId, script: &Script) -> Result<(), ScriptError>;
}

/// Host without an interpreter: every call is logged and succeeds.
#[derive(Debug, Default)]
pub struct NullScriptHost;

impl ScriptHost for NullScriptHost {
    fn run(&mut self, entity: EntityId, script: &Script) -> Result<(), ScriptError> {
        tracing::trace!(
            entity = %entity,
            path = %script.path,
            entry = %script.entry,
            "script skipped, no interpreter"
        );
        Ok(())
    }
}
