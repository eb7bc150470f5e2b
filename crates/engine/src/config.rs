use glam::{UVec2, Vec4};
use lumen_physics::DEFAULT_GRAVITY;
use lumen_render::{PipelineSettings, RenderConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Errors loading an [`EngineConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Startup configuration. Every field is optional in the JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub window_title: String,
    pub window_size: UVec2,
    /// Integer downscale of the offscreen buffers.
    pub render_scale: u32,
    pub clear_color: Vec4,
    pub gravity: [f32; 2],
    pub pipeline: PipelineSettings,
    /// Run WHEN_PLAYING systems from the first frame.
    pub start_playing: bool,
    pub world_path: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let render = RenderConfig::default();
        Self {
            window_title: "lumen".to_string(),
            window_size: render.window_size,
            render_scale: render.render_scale,
            clear_color: render.clear_color,
            gravity: DEFAULT_GRAVITY,
            pipeline: PipelineSettings::default(),
            start_playing: true,
            world_path: PathBuf::from("default.world"),
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_reader(std::fs::File::open(path)?)?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.render_scale == 0 {
            return Err(ConfigError::Invalid("render_scale must be at least 1".into()));
        }
        if self.window_size.x == 0 || self.window_size.y == 0 {
            return Err(ConfigError::Invalid(format!(
                "window_size {}x{} is empty",
                self.window_size.x, self.window_size.y
            )));
        }
        Ok(())
    }

    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            window_size: self.window_size,
            render_scale: self.render_scale,
            clear_color: self.clear_color,
        }
    }
}
