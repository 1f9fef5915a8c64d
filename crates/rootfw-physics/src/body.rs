//! The physical capability: force integration, friction, and collision response.

use rootfw_math::{Rect, Vec2};
use tracing::trace;

use crate::collision::{Axis, Contact, Push, push_direction, snap_out};

/// Default body mass.
pub const DEFAULT_MASS: f32 = 1.0;
/// Default downward gravity force, pixels/s².
pub const DEFAULT_GRAVITY: f32 = 1500.0;
/// Default horizontal velocity multiplier per step on the ground.
pub const DEFAULT_FRICTION_GROUND: f32 = 0.8;
/// Default horizontal velocity multiplier per step in the air.
pub const DEFAULT_FRICTION_AIR: f32 = 0.95;
/// Default speed cap, pixels/s.
pub const DEFAULT_MAX_SPEED: f32 = 400.0;
/// Default upward velocity given by [`PhysicsBody::jump`].
pub const DEFAULT_JUMP_FORCE: f32 = 600.0;

/// Velocity/acceleration state of a physical entity.
///
/// The body does not own a position: every operation that moves takes the
/// entity's rectangle, so the same rect stays the single source of truth for
/// drawing, queries, and the camera.
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsBody {
    /// Pixels per second; +y points down.
    pub velocity: Vec2,
    /// Accumulated since the last step, cleared by [`step`](Self::step).
    pub acceleration: Vec2,
    pub mass: f32,
    pub gravity: f32,
    pub friction_ground: f32,
    pub friction_air: f32,
    pub max_speed: f32,
    on_ground: bool,
}

impl Default for PhysicsBody {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsBody {
    pub fn new() -> Self {
        Self {
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            mass: DEFAULT_MASS,
            gravity: DEFAULT_GRAVITY,
            friction_ground: DEFAULT_FRICTION_GROUND,
            friction_air: DEFAULT_FRICTION_AIR,
            max_speed: DEFAULT_MAX_SPEED,
            on_ground: false,
        }
    }

    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_friction(mut self, ground: f32, air: f32) -> Self {
        self.friction_ground = ground;
        self.friction_air = air;
        self
    }

    pub fn with_max_speed(mut self, max_speed: f32) -> Self {
        self.max_speed = max_speed;
        self
    }

    /// True if the last vertical resolution landed on top of something.
    pub fn on_ground(&self) -> bool {
        self.on_ground
    }

    /// Accumulate `force / mass` into the acceleration.
    pub fn apply_force(&mut self, fx: f32, fy: f32) {
        self.acceleration.x += fx / self.mass;
        self.acceleration.y += fy / self.mass;
    }

    /// Apply the gravity force unless the body is standing on something.
    pub fn apply_gravity(&mut self) {
        if !self.on_ground {
            self.apply_force(0.0, self.gravity);
        }
    }

    /// Scale the velocity down to `max_speed`, keeping its direction.
    pub fn limit_speed(&mut self) {
        self.velocity = self.velocity.clamp_length_max(self.max_speed);
    }

    /// Jump with upward velocity `force`, only when on the ground.
    ///
    /// Returns whether the jump happened.
    pub fn jump(&mut self, force: f32) -> bool {
        if !self.on_ground {
            return false;
        }
        self.velocity.y = -force;
        self.on_ground = false;
        true
    }

    /// Advance one frame: gravity, integration, speed cap, horizontal
    /// friction, then movement with collision against `obstacles`.
    pub fn step(&mut self, rect: &mut Rect, dt: f32, obstacles: &[Rect]) -> Vec<Contact> {
        self.apply_gravity();

        self.velocity += self.acceleration * dt;
        self.acceleration = Vec2::ZERO;

        self.limit_speed();

        self.velocity.x *= if self.on_ground {
            self.friction_ground
        } else {
            self.friction_air
        };

        self.move_and_collide(rect, self.velocity.x * dt, self.velocity.y * dt, obstacles)
    }

    /// Move by `(dx, dy)`, resolving the x axis fully before moving on y.
    ///
    /// Resolving the axes separately avoids deciding which face a diagonal
    /// move hit first; the trade-off is tunnelling at high speed.
    pub fn move_and_collide(
        &mut self,
        rect: &mut Rect,
        dx: f32,
        dy: f32,
        obstacles: &[Rect],
    ) -> Vec<Contact> {
        let mut contacts = Vec::new();
        rect.x += dx;
        self.resolve_collisions(rect, Axis::X, dx, obstacles, &mut contacts);
        rect.y += dy;
        self.resolve_collisions(rect, Axis::Y, dy, obstacles, &mut contacts);
        contacts
    }

    fn resolve_collisions(
        &mut self,
        rect: &mut Rect,
        axis: Axis,
        displacement: f32,
        obstacles: &[Rect],
        contacts: &mut Vec<Contact>,
    ) {
        self.on_ground = false;

        for (index, obstacle) in obstacles.iter().enumerate() {
            if !rect.intersects(obstacle) {
                continue;
            }
            trace!(obstacle = index, ?axis, "collision");

            match axis {
                Axis::X => {
                    let push = push_direction(displacement, self.velocity.x);
                    snap_out(rect, obstacle, axis, push);
                    self.velocity.x = 0.0;
                }
                Axis::Y => {
                    let push = push_direction(displacement, self.velocity.y);
                    snap_out(rect, obstacle, axis, push);
                    if push == Push::Positive {
                        self.on_ground = true;
                    }
                    self.velocity.y = 0.0;
                }
            }
            contacts.push(Contact {
                obstacle: index,
                axis,
            });
        }
    }
}
