//! Configuration system
//!
//! Every configuration struct is plain serde data. Files are read and written
//! as TOML or RON depending on their extension.

use std::path::Path;

pub use serde::{Serialize, Deserialize};

use crate::foundation::math::Vec2;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        let config: Self = match extension(path) {
            Some("toml") => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?,
            Some("ron") => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?,
            _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject values that parse but cannot be used
    fn validate(&self) -> Result<(), ConfigError> {
        Ok(())
    }

    /// Save configuration to file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match extension(path) {
            Some("toml") => toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?,
            Some("ron") => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
            _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        };

        std::fs::write(path, contents)?;
        Ok(())
    }
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|ext| ext.to_str())
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Parsed value outside its usable range
    #[error("Invalid value: {0}")]
    Invalid(String),
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    /// Window configuration
    pub window: WindowConfig,
    /// Camera limits
    pub camera: CameraConfig,
    /// Batch renderer settings
    pub render: RenderConfig,
    /// Physics stepping
    pub physics: PhysicsConfig,
    /// Frame pump settings
    pub frame: FrameConfig,
}

impl Config for EngineConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.camera.validate()
    }
}

impl EngineConfig {
    /// Load from `path`, falling back to defaults when the file is missing or invalid
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load_from_file(path) {
            Ok(config) => {
                log::info!("Loaded engine config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Using default engine config ({}): {}", path.display(), e);
                Self::default()
            }
        }
    }
}

/// Window configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "engine2d".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

/// Camera scale limits
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Smallest allowed zoom
    pub min_scale: f32,
    /// Largest allowed zoom
    pub max_scale: f32,
    /// Fraction of the current scale applied per percentage step
    pub scale_step: f32,
}

impl CameraConfig {
    /// Check that the zoom limits are finite, positive and ordered
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (min, max) = (self.min_scale, self.max_scale);
        if !(min.is_finite() && max.is_finite()) || min <= 0.0 {
            return Err(ConfigError::Invalid(format!("camera scale limits [{min}, {max}] must be finite and positive")));
        }
        if min > max {
            return Err(ConfigError::Invalid(format!("camera min_scale {min} exceeds max_scale {max}")));
        }
        Ok(())
    }

    /// Limits safe to clamp against; unusable pairs are swapped or replaced by the defaults
    pub fn normalized(self) -> Self {
        match self.validate() {
            Ok(()) => self,
            Err(_) if self.min_scale.is_finite() && self.max_scale.is_finite() && self.max_scale > 0.0 && self.min_scale > 0.0 => {
                log::warn!("Swapping inverted camera scale limits [{}, {}]", self.min_scale, self.max_scale);
                Self {
                    min_scale: self.max_scale,
                    max_scale: self.min_scale,
                    ..self
                }
            }
            Err(e) => {
                log::warn!("{e}; using default camera scale limits");
                let defaults = Self::default();
                Self {
                    min_scale: defaults.min_scale,
                    max_scale: defaults.max_scale,
                    ..self
                }
            }
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.1,
            max_scale: 32.0,
            scale_step: 0.01,
        }
    }
}

/// Batch renderer settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Thickness of shape-batch lines in world units
    pub line_width: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { line_width: 1.0 }
    }
}

/// Physics stepping configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// World gravity
    pub gravity: Vec2,
    /// Velocity solver iterations per step
    pub velocity_iterations: u32,
    /// Position solver iterations per step
    pub position_iterations: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, -40.0),
            velocity_iterations: 6,
            position_iterations: 12,
        }
    }
}

/// Frame pump settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Largest simulated step per frame, in seconds
    pub max_delta_time: f32,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self { max_delta_time: 0.05 }
    }
}
