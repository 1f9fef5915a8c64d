//! Axis-separated snap-to-contact resolution.

use rootfw_math::Rect;

/// Axis being resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// One overlap resolved during a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    /// Index into the obstacle slice passed to the move.
    pub obstacle: usize,
    /// Axis on which the overlap was resolved.
    pub axis: Axis,
}

/// Which side of an obstacle the moving rect was pushed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Push {
    /// Moving toward +axis: snapped against the obstacle's near face.
    Positive,
    /// Moving toward -axis: snapped against the obstacle's far face.
    Negative,
    /// No direction of travel; overlap is left as is.
    None,
}

/// Travel direction on one axis. The displacement decides; a zero
/// displacement falls back to the velocity component.
pub(crate) fn push_direction(displacement: f32, velocity: f32) -> Push {
    let direction = if displacement != 0.0 {
        displacement
    } else {
        velocity
    };
    if direction > 0.0 {
        Push::Positive
    } else if direction < 0.0 {
        Push::Negative
    } else {
        Push::None
    }
}

/// Snap `rect` out of `obstacle` along `axis`.
pub(crate) fn snap_out(rect: &mut Rect, obstacle: &Rect, axis: Axis, push: Push) {
    match (axis, push) {
        (Axis::X, Push::Positive) => rect.set_right(obstacle.left()),
        (Axis::X, Push::Negative) => rect.set_left(obstacle.right()),
        (Axis::Y, Push::Positive) => rect.set_bottom(obstacle.top()),
        (Axis::Y, Push::Negative) => rect.set_top(obstacle.bottom()),
        (_, Push::None) => {}
    }
}
