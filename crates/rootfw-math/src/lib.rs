//! 2D float geometry for the rootfw framework: rectangles, vectors and
//! frame-rate independent smoothing.

mod rect;
mod smoothing;

pub use glam::Vec2;
pub use rect::Rect;
pub use smoothing::{smoothing_factor, smooth_toward, smooth_toward_vec2};
