//! Configuration system for rootfw.
//!
//! Settings persist to disk as RON files, can be overridden from the command
//! line via clap, and tolerate missing or unknown fields so older files keep
//! loading.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    AnimationConfig, CameraConfig, Config, DebugConfig, PhysicsConfig, ResourceConfig,
    WindowConfig, default_config_dir,
};
pub use error::ConfigError;
