//! Simple AABB platformer physics.
//!
//! [`PhysicsBody`] integrates forces into velocity, applies horizontal
//! friction, and moves a [`Rect`](rootfw_math::Rect) through a set of static
//! obstacle rectangles, resolving overlaps one axis at a time.
//!
//! Known limits: there is no spatial partitioning (every move scans every
//! obstacle), no rotation, and no continuous collision detection, so a body
//! moving further than an obstacle's thickness in one step can tunnel
//! through it.

mod body;
mod collision;

pub use body::{
    DEFAULT_FRICTION_AIR, DEFAULT_FRICTION_GROUND, DEFAULT_GRAVITY, DEFAULT_JUMP_FORCE,
    DEFAULT_MASS, DEFAULT_MAX_SPEED, PhysicsBody,
};
pub use collision::{Axis, Contact};
