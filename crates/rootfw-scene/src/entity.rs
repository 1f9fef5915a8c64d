//! The entity type: a rectangle with tags, a parent scene, and optional
//! capabilities (physics, sprite, animation, custom behavior).

use std::collections::BTreeSet;
use std::fmt;

use rootfw_animation::AnimatedSprite;
use rootfw_assets::Canvas;
use rootfw_math::{Rect, Vec2};
use rootfw_physics::{Axis, Contact, PhysicsBody};

use crate::arena::EntityId;
use crate::behavior::Behavior;
use crate::camera::Camera;
use crate::event::Event;
use crate::sprite::Sprite;

/// Outline colour used when colliders are drawn.
pub const DEFAULT_DEBUG_COLOR: [u8; 4] = [255, 0, 0, 255];

pub struct Entity {
    /// Position and size in world (or, for HUD entities, screen) pixels.
    pub rect: Rect,
    tags: BTreeSet<String>,
    parent_scene: Option<String>,
    pub visible: bool,
    pub debug_color: [u8; 4],
    pub body: Option<PhysicsBody>,
    pub sprite: Option<Sprite>,
    pub animation: Option<AnimatedSprite>,
    behavior: Option<Box<dyn Behavior>>,
}

impl Default for Entity {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("rect", &self.rect)
            .field("tags", &self.tags)
            .field("parent_scene", &self.parent_scene)
            .field("visible", &self.visible)
            .field("body", &self.body)
            .field("sprite", &self.sprite.is_some())
            .field("animation", &self.animation.as_ref().and_then(|a| a.current_animation()))
            .field("behavior", &self.behavior.is_some())
            .finish()
    }
}

impl Entity {
    /// Empty, zero-sized entity at the origin with no capabilities.
    pub fn new() -> Self {
        Self {
            rect: Rect::default(),
            tags: BTreeSet::new(),
            parent_scene: None,
            visible: true,
            debug_color: DEFAULT_DEBUG_COLOR,
            body: None,
            sprite: None,
            animation: None,
            behavior: None,
        }
    }

    pub fn with_rect(mut self, rect: Rect) -> Self {
        self.rect = rect;
        self
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.add_tags(tags);
        self
    }

    pub fn with_body(mut self, body: PhysicsBody) -> Self {
        self.body = Some(body);
        self
    }

    /// Attach a still image; the rectangle takes the image's size.
    pub fn with_sprite(mut self, sprite: Sprite) -> Self {
        let (w, h) = sprite.size();
        self.rect.set_size(w as f32, h as f32);
        self.sprite = Some(sprite);
        self
    }

    /// Attach an animation; the rectangle takes the current clip's frame size.
    pub fn with_animation(mut self, animation: AnimatedSprite) -> Self {
        if let Some((w, h)) = animation.frame_size() {
            self.rect.set_size(w as f32, h as f32);
        }
        self.animation = Some(animation);
        self
    }

    pub fn with_behavior(mut self, behavior: impl Behavior + 'static) -> Self {
        self.behavior = Some(Box::new(behavior));
        self
    }

    pub fn with_debug_color(mut self, color: [u8; 4]) -> Self {
        self.debug_color = color;
        self
    }

    /// Move the top-left corner to `(x, y)`.
    pub fn set_position(&mut self, x: f32, y: f32) -> &mut Self {
        self.rect.set_position(x, y);
        self
    }

    pub fn set_center(&mut self, x: f32, y: f32) -> &mut Self {
        self.rect.set_center(x, y);
        self
    }

    pub fn position(&self) -> Vec2 {
        self.rect.position()
    }

    pub fn center(&self) -> Vec2 {
        self.rect.center()
    }

    // -- tags --

    pub fn add_tags(&mut self, tags: &[&str]) -> &mut Self {
        self.tags.extend(tags.iter().map(|tag| tag.to_string()));
        self
    }

    pub fn remove_tags(&mut self, tags: &[&str]) -> &mut Self {
        for tag in tags {
            self.tags.remove(*tag);
        }
        self
    }

    /// True if every tag in `tags` is present. An empty list always matches.
    pub fn has_tags(&self, tags: &[&str]) -> bool {
        tags.iter().all(|tag| self.tags.contains(*tag))
    }

    /// Tags in ascending order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    // -- scene membership --

    pub fn parent_scene(&self) -> Option<&str> {
        self.parent_scene.as_deref()
    }

    /// Move the entity to another scene (or to none).
    ///
    /// Setting the current parent again does nothing. Otherwise the
    /// behavior's `on_removed` runs while the old parent is still set, then
    /// the parent changes, then `on_added` runs for the new one.
    pub fn set_parent_scene(&mut self, scene: Option<&str>) -> &mut Self {
        if self.parent_scene.as_deref() == scene {
            return self;
        }
        if let Some(old) = self.parent_scene.clone() {
            self.with_behavior_hook(|behavior, entity| behavior.on_removed(entity, &old));
        }
        self.parent_scene = scene.map(str::to_string);
        if let Some(new) = scene {
            self.with_behavior_hook(|behavior, entity| behavior.on_added(entity, new));
        }
        self
    }

    // -- behavior --

    pub fn set_behavior(&mut self, behavior: impl Behavior + 'static) {
        self.behavior = Some(Box::new(behavior));
    }

    pub fn take_behavior(&mut self) -> Option<Box<dyn Behavior>> {
        self.behavior.take()
    }

    pub fn behavior_mut(&mut self) -> Option<&mut (dyn Behavior + 'static)> {
        self.behavior.as_deref_mut()
    }

    /// Run `hook` with the behavior lifted out of the entity, then put it
    /// back unless the hook installed a replacement.
    fn with_behavior_hook(&mut self, hook: impl FnOnce(&mut dyn Behavior, &mut Entity)) {
        if let Some(mut behavior) = self.behavior.take() {
            hook(behavior.as_mut(), self);
            if self.behavior.is_none() {
                self.behavior = Some(behavior);
            }
        }
    }

    // -- per frame --

    /// Behavior, then physics against `obstacles`, then animation.
    ///
    /// Returns the contacts resolved by the physics step.
    pub fn update(&mut self, dt: f32, obstacles: &[Rect]) -> Vec<Contact> {
        self.with_behavior_hook(|behavior, entity| behavior.update(entity, dt));

        let contacts = match self.body.as_mut() {
            Some(body) => body.step(&mut self.rect, dt, obstacles),
            None => Vec::new(),
        };

        if let Some(animation) = self.animation.as_mut() {
            animation.update(dt);
        }
        contacts
    }

    /// Two-phase event handling: actions first, then the event hook.
    pub fn process_event(&mut self, event: &Event) {
        self.with_behavior_hook(|behavior, entity| {
            behavior.process_actions(entity, event);
            behavior.handle_event(entity, event);
        });
    }

    /// Tell the behavior that a move was stopped by `other` on `axis`.
    pub fn notify_collision(&mut self, other: EntityId, axis: Axis) {
        self.with_behavior_hook(|behavior, entity| behavior.on_collision(entity, other, axis));
    }

    pub fn reset_actions(&mut self) {
        self.with_behavior_hook(|behavior, entity| behavior.reset_actions(entity));
    }

    /// Switch the animation clip and resize the rectangle to its frames.
    pub fn set_animation(&mut self, name: &str, reset: bool) -> bool {
        let Some(animation) = self.animation.as_mut() else {
            return false;
        };
        if !animation.set_animation(name, reset) {
            return false;
        }
        if let Some((w, h)) = animation.frame_size() {
            self.rect.set_size(w as f32, h as f32);
        }
        true
    }

    // -- drawing --

    /// Screen rectangle through `camera`, or the raw rectangle without one.
    pub fn screen_rect(&self, camera: Option<&Camera>) -> Rect {
        match camera {
            Some(camera) => camera.apply(self.rect),
            None => self.rect,
        }
    }

    /// Draw the current animation frame, or else the still sprite, stretched
    /// over the entity's screen rectangle.
    pub fn draw(&self, canvas: &mut Canvas, camera: Option<&Camera>) {
        if !self.visible {
            return;
        }
        let image = self
            .animation
            .as_ref()
            .and_then(AnimatedSprite::current_frame)
            .or_else(|| self.sprite.as_ref().map(Sprite::image));
        if let Some(image) = image {
            canvas.blit_scaled(image, self.screen_rect(camera));
        }
    }

    /// Outline the entity's rectangle in its debug colour.
    pub fn draw_collider(&self, canvas: &mut Canvas, camera: Option<&Camera>) {
        canvas.outline_rect(self.screen_rect(camera), self.debug_color);
    }
}
