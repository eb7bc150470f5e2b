use serde::{Deserialize, Serialize};
use std::fmt;

/// Point in the frame a system runs at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    PreUpdate,
    Update,
    LateUpdate,
}

/// Play state a system requires.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    #[default]
    Always,
    WhenPlaying,
    WhenStopped,
}

impl Condition {
    pub fn is_satisfied(self, playing: bool) -> bool {
        match self {
            Self::Always => true,
            Self::WhenPlaying => playing,
            Self::WhenStopped => !playing,
        }
    }
}

pub type SystemFn<C> = Box<dyn FnMut(&mut C)>;

/// A registered system.
pub struct SystemInfo<C> {
    pub name: String,
    pub phase: Phase,
    pub condition: Condition,
    pub enabled: bool,
    function: SystemFn<C>,
}

impl<C> fmt::Debug for SystemInfo<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemInfo")
            .field("name", &self.name)
            .field("phase", &self.phase)
            .field("condition", &self.condition)
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

/// Ordered list of systems plus the play state.
pub struct Scheduler<C> {
    systems: Vec<SystemInfo<C>>,
    playing: bool,
}

impl<C> Default for Scheduler<C> {
    fn default() -> Self {
        Self {
            systems: Vec::new(),
            playing: false,
        }
    }
}

impl<C> fmt::Debug for Scheduler<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("systems", &self.systems)
            .field("playing", &self.playing)
            .finish()
    }
}

impl<C> Scheduler<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a system. It starts enabled. Names need not be unique.
    pub fn register_system(
        &mut self,
        name: impl Into<String>,
        phase: Phase,
        condition: Condition,
        function: impl FnMut(&mut C) + 'static,
    ) {
        let name = name.into();
        tracing::debug!(%name, ?phase, ?condition, "system registered");
        self.systems.push(SystemInfo {
            name,
            phase,
            condition,
            enabled: true,
            function: Box::new(function),
        });
    }

    /// Run every enabled system of `phase` whose condition holds, in
    /// registration order.
    pub fn update_systems(&mut self, context: &mut C, phase: Phase) {
        let playing = self.playing;
        for system in &mut self.systems {
            if system.enabled && system.phase == phase && system.condition.is_satisfied(playing) {
                (system.function)(context);
            }
        }
    }

    /// Enable or disable the first system called `name`. Returns false if
    /// there is none.
    pub fn set_system_enabled(&mut self, name: &str, enabled: bool) -> bool {
        match self.systems.iter_mut().find(|s| s.name == name) {
            Some(system) => {
                system.enabled = enabled;
                true
            }
            None => {
                tracing::debug!(name, "no such system");
                false
            }
        }
    }

    /// Whether the simulation is playing.
    pub fn state(&self) -> bool {
        self.playing
    }

    pub fn set_state(&mut self, playing: bool) {
        if self.playing != playing {
            tracing::info!(playing, "play state changed");
        }
        self.playing = playing;
    }

    pub fn systems(&self) -> &[SystemInfo<C>] {
        &self.systems
    }
}
