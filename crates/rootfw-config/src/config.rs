//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.ron";
const APP_NAME: &str = "rootfw";

/// Top-level framework configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Window / screen settings.
    pub window: WindowConfig,
    /// Default parameters for physical entities.
    pub physics: PhysicsConfig,
    /// Camera defaults.
    pub camera: CameraConfig,
    /// Sprite animation defaults.
    pub animation: AnimationConfig,
    /// Resource loading settings.
    pub resources: ResourceConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Window configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Screen width in pixels.
    pub width: u32,
    /// Screen height in pixels.
    pub height: u32,
    /// Window title.
    pub title: String,
    /// Frame cadence of the main loop.
    pub target_fps: u32,
}

/// Defaults applied to newly created physics bodies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Body mass; forces are divided by it.
    pub mass: f32,
    /// Downward gravity force in pixels/s².
    pub gravity: f32,
    /// Horizontal velocity multiplier applied per step while grounded.
    pub friction_ground: f32,
    /// Horizontal velocity multiplier applied per step while airborne.
    pub friction_air: f32,
    /// Maximum speed in pixels/s.
    pub max_speed: f32,
    /// Upward velocity given by a jump.
    pub jump_force: f32,
    /// Horizontal force applied by the platformer controller.
    pub move_force: f32,
}

/// Camera configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Higher values track the target faster.
    pub smoothness: f32,
    /// Initial zoom factor.
    pub zoom: f32,
}

/// Animation configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnimationConfig {
    /// Frame duration in seconds used when a clip has none of its own.
    pub default_frame_duration: f32,
}

/// Resource loading configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ResourceConfig {
    /// Base directory that relative resource paths resolve against.
    pub resource_path: PathBuf,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Outline entity rectangles when drawing.
    pub show_colliders: bool,
    /// Stop the loop after this many frames (headless runs).
    pub max_frames: Option<u64>,
}

// --- Default implementations ---

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "Root Framework Project".to_string(),
            target_fps: 60,
        }
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            mass: 1.0,
            gravity: 1500.0,
            friction_ground: 0.8,
            friction_air: 0.95,
            max_speed: 400.0,
            jump_force: 600.0,
            move_force: 1500.0,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            smoothness: 5.0,
            zoom: 1.0,
        }
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            default_frame_duration: 0.1,
        }
    }
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            resource_path: PathBuf::from("."),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            show_colliders: false,
            max_frames: None,
        }
    }
}

/// Platform configuration directory for rootfw, e.g. `~/.config/rootfw`.
///
/// Falls back to the working directory when the OS exposes none.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join(APP_NAME))
        .unwrap_or_else(|| PathBuf::from("."))
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("width: 800"));
        assert!(ron_str.contains("gravity: 1500.0"));
    }

    #[test]
    fn test_physics_defaults() {
        let physics = PhysicsConfig::default();
        assert_eq!(physics.mass, 1.0);
        assert_eq!(physics.friction_ground, 0.8);
        assert_eq!(physics.friction_air, 0.95);
        assert_eq!(physics.max_speed, 400.0);
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.debug.max_frames = Some(120);
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_field_uses_default() {
        let ron_str = "(window: (width: 320), debug: ())";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.window.width, 320);
        assert_eq!(config.window.height, 600);
        assert_eq!(config.camera, CameraConfig::default());
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.window.width = 1024;
        config.physics.gravity = 900.0;
        config.resources.resource_path = PathBuf::from("assets");

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join(CONFIG_FILE).exists());
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.camera.smoothness = 12.0;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert_eq!(result.unwrap().camera.smoothness, 12.0);
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();
        assert!(config.reload(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let result: Result<Config, _> = ron::from_str("{{not valid}}");
        assert!(result.is_err());
    }

    #[test]
    fn test_default_config_dir_ends_with_app_name() {
        let dir = default_config_dir();
        assert!(dir.ends_with(APP_NAME) || dir == PathBuf::from("."));
    }
}
