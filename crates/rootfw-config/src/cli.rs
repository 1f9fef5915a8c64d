//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// rootfw command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "rootfw", about = "Root framework demo runner")]
pub struct CliArgs {
    /// Screen width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Screen height.
    #[arg(long)]
    pub height: Option<u32>,

    /// Target frames per second.
    #[arg(long)]
    pub fps: Option<u32>,

    /// Base directory for resources.
    #[arg(long)]
    pub resources: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Stop after this many frames.
    #[arg(long)]
    pub frames: Option<u64>,

    /// Save the last rendered frame to this PNG file.
    #[arg(long)]
    pub screenshot: Option<PathBuf>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.window.width = w;
        }
        if let Some(h) = args.height {
            self.window.height = h;
        }
        if let Some(fps) = args.fps {
            self.window.target_fps = fps;
        }
        if let Some(ref path) = args.resources {
            self.resources.resource_path = path.clone();
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
        if let Some(frames) = args.frames {
            self.debug.max_frames = Some(frames);
        }
    }
}
