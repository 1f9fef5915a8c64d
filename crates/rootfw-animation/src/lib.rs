//! Frame-timing state machine for sprite animation.
//!
//! An [`AnimatedSprite`] holds named clips of equally sized frames and
//! advances through the current clip as time passes, looping, clamping at the
//! last frame, or bouncing back and forth.

mod sprite;

pub use sprite::{AnimatedSprite, DEFAULT_FRAME_DURATION};
