//! Keyboard-driven platformer movement as an entity behavior.

use rootfw_config::PhysicsConfig;
use rootfw_physics::DEFAULT_JUMP_FORCE;
use rootfw_scene::{Behavior, Entity, Event, Key};

/// Horizontal force applied while a direction key is held.
pub const DEFAULT_MOVE_FORCE: f32 = 1500.0;

/// Keyboard control for a physical entity: left/right push it, the jump key
/// makes it jump.
///
/// A jump press is remembered until the body is next on the ground, or until
/// the key is released, so a press that lands between ground contacts is not
/// lost.
#[derive(Debug, Clone)]
pub struct PlatformerController {
    pub left_key: Key,
    pub right_key: Key,
    pub jump_key: Key,
    pub move_force: f32,
    pub jump_force: f32,
    moving_left: bool,
    moving_right: bool,
    jump_requested: bool,
}

impl Default for PlatformerController {
    fn default() -> Self {
        Self::new(DEFAULT_MOVE_FORCE, DEFAULT_JUMP_FORCE)
    }
}

impl PlatformerController {
    /// Arrow keys to move, space to jump.
    pub fn new(move_force: f32, jump_force: f32) -> Self {
        Self {
            left_key: Key::Left,
            right_key: Key::Right,
            jump_key: Key::Space,
            move_force,
            jump_force,
            moving_left: false,
            moving_right: false,
            jump_requested: false,
        }
    }

    pub fn from_config(physics: &PhysicsConfig) -> Self {
        Self::new(physics.move_force, physics.jump_force)
    }

    pub fn with_keys(mut self, left: Key, right: Key, jump: Key) -> Self {
        self.left_key = left;
        self.right_key = right;
        self.jump_key = jump;
        self
    }

    pub fn is_moving_left(&self) -> bool {
        self.moving_left
    }

    pub fn is_moving_right(&self) -> bool {
        self.moving_right
    }

    pub fn is_jump_requested(&self) -> bool {
        self.jump_requested
    }
}

impl Behavior for PlatformerController {
    fn update(&mut self, entity: &mut Entity, _dt: f32) {
        let Some(body) = entity.body.as_mut() else {
            return;
        };
        if self.moving_left {
            body.apply_force(-self.move_force, 0.0);
        }
        if self.moving_right {
            body.apply_force(self.move_force, 0.0);
        }
        if self.jump_requested && body.jump(self.jump_force) {
            self.jump_requested = false;
        }
    }

    fn process_actions(&mut self, _entity: &mut Entity, event: &Event) {
        match event {
            Event::KeyDown(key) if *key == self.left_key => self.moving_left = true,
            Event::KeyUp(key) if *key == self.left_key => self.moving_left = false,
            Event::KeyDown(key) if *key == self.right_key => self.moving_right = true,
            Event::KeyUp(key) if *key == self.right_key => self.moving_right = false,
            _ => {}
        }
    }

    fn handle_event(&mut self, _entity: &mut Entity, event: &Event) {
        if event.is_key_down(self.jump_key) {
            self.jump_requested = true;
        } else if event.is_key_up(self.jump_key) {
            self.jump_requested = false;
        }
    }

    fn reset_actions(&mut self, _entity: &mut Entity) {
        self.moving_left = false;
        self.moving_right = false;
        self.jump_requested = false;
    }
}
