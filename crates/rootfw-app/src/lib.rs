//! Application layer of rootfw.
//!
//! [`App`] ties the scene manager, timers, resource cache and frame buffer
//! to a [`Platform`] and runs the frame loop: events, update, timers, draw,
//! present.

mod app;
mod controller;
mod error;
mod frame_clock;
mod platform;

pub use app::{App, BACKGROUND};
pub use controller::{DEFAULT_MOVE_FORCE, PlatformerController};
pub use error::AppError;
pub use frame_clock::{FrameClock, MAX_FRAME_TIME, clamp_frame_time};
pub use platform::{HeadlessPlatform, Platform, StopHandle};
