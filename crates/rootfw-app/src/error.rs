//! Application error types.

use rootfw_assets::AssetError;
use rootfw_config::ConfigError;
use rootfw_scene::SceneError;
use thiserror::Error;

/// Errors that stop the application loop or its setup.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("cannot run without scenes")]
    NoScenes,

    #[error("application is already running")]
    AlreadyRunning,

    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Asset(#[from] AssetError),
}
