//! Exponential smoothing used by the camera for position and zoom.

use glam::Vec2;

/// Per-frame interpolation factor `min(1, smoothness * dt)`.
///
/// Clamping to 1 means a large `dt` spike lands exactly on the target
/// instead of overshooting it.
pub fn smoothing_factor(smoothness: f32, dt: f32) -> f32 {
    (smoothness * dt).clamp(0.0, 1.0)
}

/// Move `value` toward `target` by the smoothing factor for this frame.
pub fn smooth_toward(value: f32, target: f32, smoothness: f32, dt: f32) -> f32 {
    value + (target - value) * smoothing_factor(smoothness, dt)
}

/// Vector form of [`smooth_toward`].
pub fn smooth_toward_vec2(value: Vec2, target: Vec2, smoothness: f32, dt: f32) -> Vec2 {
    value + (target - value) * smoothing_factor(smoothness, dt)
}
