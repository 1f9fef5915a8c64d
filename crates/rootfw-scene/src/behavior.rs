//! Per-entity custom logic.

use rootfw_physics::Axis;

use crate::arena::EntityId;
use crate::entity::Entity;
use crate::event::Event;

/// Custom per-entity logic.
///
/// A behavior is stored inside its [`Entity`] and receives that entity
/// mutably on every call. While a hook runs the entity's own behavior slot is
/// empty, so [`Entity::behavior_mut`] returns `None` from inside a hook.
///
/// Every method has an empty default; implement only what you need.
pub trait Behavior {
    /// Runs at the start of [`Entity::update`], before physics.
    fn update(&mut self, _entity: &mut Entity, _dt: f32) {}

    /// The physics step stopped the entity against the world entity
    /// `_other` on `_axis`. Runs once per contact, after the move.
    fn on_collision(&mut self, _entity: &mut Entity, _other: EntityId, _axis: Axis) {}

    /// The entity joined the scene `_scene`.
    fn on_added(&mut self, _entity: &mut Entity, _scene: &str) {}

    /// The entity is leaving the scene `_scene`. Its parent is still set.
    fn on_removed(&mut self, _entity: &mut Entity, _scene: &str) {}

    /// First phase of event handling: turn input into action state.
    fn process_actions(&mut self, _entity: &mut Entity, _event: &Event) {}

    /// Second phase of event handling: react to the event itself.
    fn handle_event(&mut self, _entity: &mut Entity, _event: &Event) {}

    /// Clear any action state gathered by [`process_actions`](Self::process_actions).
    fn reset_actions(&mut self, _entity: &mut Entity) {}
}
