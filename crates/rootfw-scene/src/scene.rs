//! A named screen or level: two entity layers, a camera, and optional logic.

use std::fmt;

use rootfw_assets::Canvas;
use rootfw_math::Rect;
use tracing::debug;

use crate::arena::{EntityArena, EntityId};
use crate::camera::Camera;
use crate::entity::Entity;
use crate::event::Event;
use crate::requests::SceneRequests;

/// Default camera screen size until the application sets the real one.
pub const DEFAULT_SCREEN_SIZE: (f32, f32) = (800.0, 600.0);

/// Which list of a scene an entity lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    /// Drawn through the camera, and collides with other world entities.
    World,
    /// Drawn in screen space, never collides.
    Hud,
}

/// Scene-specific hooks.
///
/// The logic is lifted out of its scene while a hook runs, so the hook gets
/// the scene and the entity arena mutably.
pub trait SceneLogic {
    /// The scene was added to a manager.
    fn on_added(&mut self, _scene: &mut Scene, _arena: &mut EntityArena) {}

    /// The scene became current. Runs after it turned active and visible.
    fn on_enter(&mut self, _scene: &mut Scene, _arena: &mut EntityArena) {}

    /// The scene stopped being current. Runs after it turned inactive and
    /// invisible.
    fn on_exit(&mut self, _scene: &mut Scene, _arena: &mut EntityArena) {}

    /// Runs after all entities were updated and before the camera.
    fn update(&mut self, _scene: &mut Scene, _arena: &mut EntityArena, _dt: f32) {}

    /// Runs after the entities saw the event.
    fn handle_event(&mut self, _scene: &mut Scene, _arena: &mut EntityArena, _event: &Event) {}

    /// Runs after the entities were drawn.
    fn draw(&mut self, _scene: &Scene, _arena: &EntityArena, _canvas: &mut Canvas) {}
}

pub struct Scene {
    name: String,
    active: bool,
    visible: bool,
    index: usize,
    world: Vec<EntityId>,
    hud: Vec<EntityId>,
    camera: Camera,
    show_colliders: bool,
    logic: Option<Box<dyn SceneLogic>>,
    requests: SceneRequests,
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("name", &self.name)
            .field("active", &self.active)
            .field("visible", &self.visible)
            .field("index", &self.index)
            .field("world", &self.world.len())
            .field("hud", &self.hud.len())
            .finish()
    }
}

impl Scene {
    /// New scene, inactive and invisible until entered.
    pub fn new(name: impl Into<String>) -> Self {
        let (width, height) = DEFAULT_SCREEN_SIZE;
        Self {
            name: name.into(),
            active: false,
            visible: false,
            index: 0,
            world: Vec::new(),
            hud: Vec::new(),
            camera: Camera::new(width, height),
            show_colliders: false,
            logic: None,
            requests: SceneRequests::new(),
        }
    }

    pub fn with_logic(mut self, logic: impl SceneLogic + 'static) -> Self {
        self.logic = Some(Box::new(logic));
        self
    }

    pub fn with_camera(mut self, camera: Camera) -> Self {
        self.camera = camera;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Position in the owning manager's list.
    pub fn index(&self) -> usize {
        self.index
    }

    pub(crate) fn set_index(&mut self, index: usize) {
        self.index = index;
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn show_colliders(&self) -> bool {
        self.show_colliders
    }

    /// Outline every entity's rectangle when drawing.
    pub fn set_show_colliders(&mut self, show: bool) {
        self.show_colliders = show;
    }

    /// Queue for scene changes. Once the scene is added to a manager this
    /// feeds that manager, so logic hooks can ask for a transition with
    /// `scene.requests().transition_to("level")`.
    pub fn requests(&self) -> &SceneRequests {
        &self.requests
    }

    pub(crate) fn set_requests(&mut self, requests: SceneRequests) {
        self.requests = requests;
    }

    // -- lifecycle --

    pub fn on_added(&mut self, arena: &mut EntityArena) {
        debug!(scene = %self.name, index = self.index, "scene added");
        self.with_logic_hook(|logic, scene| logic.on_added(scene, arena));
    }

    pub fn on_enter(&mut self, arena: &mut EntityArena) {
        self.active = true;
        self.visible = true;
        debug!(scene = %self.name, "scene entered");
        self.with_logic_hook(|logic, scene| logic.on_enter(scene, arena));
    }

    pub fn on_exit(&mut self, arena: &mut EntityArena) {
        self.active = false;
        self.visible = false;
        debug!(scene = %self.name, "scene exited");
        self.with_logic_hook(|logic, scene| logic.on_exit(scene, arena));
    }

    fn with_logic_hook(&mut self, hook: impl FnOnce(&mut dyn SceneLogic, &mut Scene)) {
        if let Some(mut logic) = self.logic.take() {
            hook(logic.as_mut(), self);
            if self.logic.is_none() {
                self.logic = Some(logic);
            }
        }
    }

    // -- membership --

    /// Drop handles whose entity is gone or now belongs to another scene.
    pub fn prune(&mut self, arena: &EntityArena) {
        let name = self.name.as_str();
        let owned = |id: &EntityId| {
            arena
                .get(*id)
                .is_some_and(|entity| entity.parent_scene() == Some(name))
        };
        self.world.retain(owned);
        self.hud.retain(owned);
    }

    fn layer_mut(&mut self, layer: Layer) -> &mut Vec<EntityId> {
        match layer {
            Layer::World => &mut self.world,
            Layer::Hud => &mut self.hud,
        }
    }

    /// Put `id` in `layer`.
    ///
    /// An entity already in the other layer of this scene is moved without
    /// firing hooks; one from another scene is reparented. Returns `false`
    /// for a stale handle.
    pub fn add_entity(&mut self, arena: &mut EntityArena, id: EntityId, layer: Layer) -> bool {
        self.prune(arena);
        let Some(entity) = arena.get_mut(id) else {
            return false;
        };
        let other = match layer {
            Layer::World => Layer::Hud,
            Layer::Hud => Layer::World,
        };
        self.layer_mut(other).retain(|existing| *existing != id);
        let list = self.layer_mut(layer);
        if !list.contains(&id) {
            list.push(id);
        }
        entity.set_parent_scene(Some(&self.name));
        true
    }

    pub fn add_world_entity(&mut self, arena: &mut EntityArena, id: EntityId) -> bool {
        self.add_entity(arena, id, Layer::World)
    }

    pub fn add_hud_entity(&mut self, arena: &mut EntityArena, id: EntityId) -> bool {
        self.add_entity(arena, id, Layer::Hud)
    }

    /// Take `id` out of `layer` and clear its parent. Returns whether it was
    /// there.
    pub fn remove_entity(&mut self, arena: &mut EntityArena, id: EntityId, layer: Layer) -> bool {
        self.prune(arena);
        let list = self.layer_mut(layer);
        let Some(position) = list.iter().position(|existing| *existing == id) else {
            return false;
        };
        list.remove(position);
        if let Some(entity) = arena.get_mut(id) {
            entity.set_parent_scene(None);
        }
        true
    }

    pub fn remove_world_entity(&mut self, arena: &mut EntityArena, id: EntityId) -> bool {
        self.remove_entity(arena, id, Layer::World)
    }

    pub fn remove_hud_entity(&mut self, arena: &mut EntityArena, id: EntityId) -> bool {
        self.remove_entity(arena, id, Layer::Hud)
    }

    /// Detach every entity of the scene.
    pub fn clear(&mut self, arena: &mut EntityArena) {
        self.prune(arena);
        for id in self.world.drain(..).chain(self.hud.drain(..)) {
            if let Some(entity) = arena.get_mut(id) {
                entity.set_parent_scene(None);
            }
        }
    }

    // -- queries --

    fn owns(&self, arena: &EntityArena, id: EntityId) -> bool {
        arena
            .get(id)
            .is_some_and(|entity| entity.parent_scene() == Some(self.name.as_str()))
    }

    /// Live world entities, in insertion order.
    pub fn world_entities<'a>(&'a self, arena: &'a EntityArena) -> impl Iterator<Item = EntityId> + 'a {
        self.world.iter().copied().filter(move |id| self.owns(arena, *id))
    }

    /// Live HUD entities, in insertion order.
    pub fn hud_entities<'a>(&'a self, arena: &'a EntityArena) -> impl Iterator<Item = EntityId> + 'a {
        self.hud.iter().copied().filter(move |id| self.owns(arena, *id))
    }

    pub fn world_entity_count(&self, arena: &EntityArena) -> usize {
        self.world_entities(arena).count()
    }

    pub fn hud_entity_count(&self, arena: &EntityArena) -> usize {
        self.hud_entities(arena).count()
    }

    pub fn contains(&self, arena: &EntityArena, id: EntityId) -> bool {
        (self.world.contains(&id) || self.hud.contains(&id)) && self.owns(arena, id)
    }

    /// Layer holding `id`, if the scene owns it.
    pub fn layer_of(&self, arena: &EntityArena, id: EntityId) -> Option<Layer> {
        if !self.owns(arena, id) {
            return None;
        }
        if self.world.contains(&id) {
            Some(Layer::World)
        } else if self.hud.contains(&id) {
            Some(Layer::Hud)
        } else {
            None
        }
    }

    /// Entities (world first, then HUD) carrying every tag in `tags`.
    pub fn get_by_tags(&self, arena: &EntityArena, tags: &[&str]) -> Vec<EntityId> {
        self.world_entities(arena)
            .chain(self.hud_entities(arena))
            .filter(|id| arena.get(*id).is_some_and(|entity| entity.has_tags(tags)))
            .collect()
    }

    pub fn get_by_uid(&self, arena: &EntityArena, uid: u32) -> Option<EntityId> {
        self.world_entities(arena)
            .chain(self.hud_entities(arena))
            .find(|id| id.uid() == uid)
    }

    /// The entity behind `id`, if this scene owns it.
    pub fn get_by_id<'a>(&self, arena: &'a EntityArena, id: EntityId) -> Option<&'a Entity> {
        if self.contains(arena, id) {
            arena.get(id)
        } else {
            None
        }
    }

    /// Rectangles of the world entities other than `id`.
    pub fn obstacles_for(&self, arena: &EntityArena, id: EntityId) -> Vec<Rect> {
        self.obstacle_entries(arena, id).map(|(_, rect)| rect).collect()
    }

    /// The world entities other than `id` with their rectangles.
    fn obstacle_entries<'a>(
        &'a self,
        arena: &'a EntityArena,
        id: EntityId,
    ) -> impl Iterator<Item = (EntityId, Rect)> + 'a {
        self.world_entities(arena)
            .filter(move |other| *other != id)
            .filter_map(move |other| arena.get(other).map(|entity| (other, entity.rect)))
    }

    // -- per frame --

    /// World entities, then HUD entities, then the logic hook, then the
    /// camera.
    ///
    /// Each world entity collides with the other world entities as they are
    /// at the moment it moves, and its behavior hears about every contact
    /// through [`Behavior::on_collision`](crate::Behavior::on_collision).
    /// HUD entities never collide.
    pub fn do_update(&mut self, arena: &mut EntityArena, dt: f32) {
        self.prune(arena);

        for id in self.world.clone() {
            let (others, obstacles): (Vec<EntityId>, Vec<Rect>) =
                self.obstacle_entries(arena, id).unzip();
            if let Some(entity) = arena.get_mut(id) {
                for contact in entity.update(dt, &obstacles) {
                    if let Some(other) = others.get(contact.obstacle) {
                        entity.notify_collision(*other, contact.axis);
                    }
                }
            }
        }
        for id in self.hud.clone() {
            if let Some(entity) = arena.get_mut(id) {
                entity.update(dt, &[]);
            }
        }

        self.with_logic_hook(|logic, scene| logic.update(scene, arena, dt));
        self.camera.update(dt, arena);
    }

    /// Entities (world, then HUD) then the logic hook.
    pub fn handle_event(&mut self, arena: &mut EntityArena, event: &Event) {
        self.prune(arena);
        for id in self.world.iter().chain(self.hud.iter()) {
            if let Some(entity) = arena.get_mut(*id) {
                entity.process_event(event);
            }
        }
        self.with_logic_hook(|logic, scene| logic.handle_event(scene, arena, event));
    }

    /// World entities through the camera, HUD entities as they are, then the
    /// logic hook.
    pub fn draw(&mut self, arena: &EntityArena, canvas: &mut Canvas) {
        for id in self.world_entities(arena) {
            if let Some(entity) = arena.get(id) {
                entity.draw(canvas, Some(&self.camera));
                if self.show_colliders {
                    entity.draw_collider(canvas, Some(&self.camera));
                }
            }
        }
        for id in self.hud_entities(arena) {
            if let Some(entity) = arena.get(id) {
                entity.draw(canvas, None);
                if self.show_colliders {
                    entity.draw_collider(canvas, None);
                }
            }
        }
        if let Some(mut logic) = self.logic.take() {
            logic.draw(self, arena, canvas);
            if self.logic.is_none() {
                self.logic = Some(logic);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use rootfw_physics::PhysicsBody;

    use super::*;
    use crate::sprite::Sprite;

    type Log = Rc<RefCell<Vec<String>>>;

    struct Hooks {
        log: Log,
    }

    impl SceneLogic for Hooks {
        fn on_enter(&mut self, scene: &mut Scene, _arena: &mut EntityArena) {
            self.log
                .borrow_mut()
                .push(format!("enter:{}", scene.is_active()));
        }

        fn update(&mut self, scene: &mut Scene, arena: &mut EntityArena, _dt: f32) {
            let x = scene
                .world_entities(arena)
                .next()
                .and_then(|id| arena.get(id))
                .map_or(0.0, |entity| entity.rect.x);
            self.log.borrow_mut().push(format!("update:{x}"));
        }

        fn handle_event(&mut self, _scene: &mut Scene, _arena: &mut EntityArena, event: &Event) {
            self.log.borrow_mut().push(format!("event:{event:?}"));
        }
    }

    fn block(x: f32, y: f32, w: f32, h: f32) -> Entity {
        Entity::new().with_rect(Rect::new(x, y, w, h))
    }

    #[test]
    fn test_new_scene_is_dormant() {
        let scene = Scene::new("menu");
        assert!(!scene.is_active());
        assert!(!scene.is_visible());
    }

    #[test]
    fn test_enter_and_exit_toggle_flags() {
        let log = Log::default();
        let mut arena = EntityArena::new();
        let mut scene = Scene::new("level").with_logic(Hooks { log: log.clone() });

        scene.on_enter(&mut arena);
        assert!(scene.is_active() && scene.is_visible());
        assert_eq!(*log.borrow(), vec!["enter:true"]);

        scene.on_exit(&mut arena);
        assert!(!scene.is_active() && !scene.is_visible());
    }

    #[test]
    fn test_add_world_sets_parent() {
        let mut arena = EntityArena::new();
        let id = arena.spawn(Entity::new());
        let mut scene = Scene::new("level");

        assert!(scene.add_world_entity(&mut arena, id));
        assert!(scene.add_world_entity(&mut arena, id));
        assert_eq!(scene.world_entity_count(&arena), 1);
        assert_eq!(arena.get(id).unwrap().parent_scene(), Some("level"));
    }

    #[test]
    fn test_moving_between_layers_keeps_one_entry() {
        let mut arena = EntityArena::new();
        let id = arena.spawn(Entity::new());
        let mut scene = Scene::new("level");

        scene.add_world_entity(&mut arena, id);
        scene.add_hud_entity(&mut arena, id);
        assert_eq!(scene.world_entity_count(&arena), 0);
        assert_eq!(scene.hud_entity_count(&arena), 1);
        assert_eq!(scene.layer_of(&arena, id), Some(Layer::Hud));
    }

    #[test]
    fn test_reparented_entity_leaves_old_scene() {
        let mut arena = EntityArena::new();
        let id = arena.spawn(Entity::new());
        let mut a = Scene::new("a");
        let mut b = Scene::new("b");

        a.add_world_entity(&mut arena, id);
        b.add_world_entity(&mut arena, id);
        assert!(!a.contains(&arena, id));
        assert!(b.contains(&arena, id));
        assert_eq!(a.world_entity_count(&arena), 0);
    }

    #[test]
    fn test_remove_clears_parent() {
        let mut arena = EntityArena::new();
        let id = arena.spawn(Entity::new());
        let mut scene = Scene::new("level");
        scene.add_world_entity(&mut arena, id);

        assert!(!scene.remove_hud_entity(&mut arena, id));
        assert!(scene.remove_world_entity(&mut arena, id));
        assert_eq!(arena.get(id).unwrap().parent_scene(), None);
        assert!(!scene.remove_world_entity(&mut arena, id));
    }

    #[test]
    fn test_despawned_entities_are_pruned() {
        let mut arena = EntityArena::new();
        let id = arena.spawn(Entity::new());
        let mut scene = Scene::new("level");
        scene.add_world_entity(&mut arena, id);
        arena.despawn(id);
        assert_eq!(scene.world_entity_count(&arena), 0);
        scene.do_update(&mut arena, 0.016);
    }

    #[test]
    fn test_queries_by_tags_and_uid() {
        let mut arena = EntityArena::new();
        let hero = arena.spawn(Entity::new().with_tags(&["player", "alive"]));
        let orc = arena.spawn(Entity::new().with_tags(&["enemy", "alive"]));
        let score = arena.spawn(Entity::new().with_tags(&["ui"]));
        let mut scene = Scene::new("level");
        scene.add_world_entity(&mut arena, hero);
        scene.add_world_entity(&mut arena, orc);
        scene.add_hud_entity(&mut arena, score);

        assert_eq!(scene.get_by_tags(&arena, &["alive"]), vec![hero, orc]);
        assert_eq!(scene.get_by_tags(&arena, &["alive", "enemy"]), vec![orc]);
        assert_eq!(scene.get_by_tags(&arena, &[]).len(), 3);
        assert_eq!(scene.get_by_uid(&arena, score.uid()), Some(score));
        assert_eq!(scene.get_by_uid(&arena, u32::MAX), None);

        let stranger = arena.spawn(Entity::new());
        assert!(scene.get_by_id(&arena, orc).is_some_and(|e| e.has_tags(&["enemy"])));
        assert!(scene.get_by_id(&arena, stranger).is_none());
    }

    #[test]
    fn test_update_collides_with_world_only() {
        let mut arena = EntityArena::new();
        let faller = arena.spawn(
            block(0.0, 0.0, 10.0, 10.0).with_body(PhysicsBody::new().with_max_speed(10_000.0)),
        );
        let floor = arena.spawn(block(-50.0, 20.0, 100.0, 10.0));
        let hud_panel = arena.spawn(block(-50.0, 12.0, 100.0, 4.0));
        let mut scene = Scene::new("level");
        scene.add_world_entity(&mut arena, faller);
        scene.add_world_entity(&mut arena, floor);
        scene.add_hud_entity(&mut arena, hud_panel);

        for _ in 0..60 {
            scene.do_update(&mut arena, 1.0 / 60.0);
        }
        // Resting on the floor, not on the HUD panel above it.
        assert_eq!(arena.get(faller).unwrap().rect.bottom(), 20.0);
    }

    #[test]
    fn test_collisions_reach_behavior_with_obstacle_id() {
        type Hits = Rc<RefCell<Vec<(EntityId, rootfw_physics::Axis)>>>;

        struct Recorder(Hits);
        impl crate::behavior::Behavior for Recorder {
            fn on_collision(
                &mut self,
                _entity: &mut Entity,
                other: EntityId,
                axis: rootfw_physics::Axis,
            ) {
                self.0.borrow_mut().push((other, axis));
            }
        }

        let hits = Hits::default();
        let mut arena = EntityArena::new();
        let wall = arena.spawn(block(100.0, -50.0, 10.0, 40.0));
        let floor = arena.spawn(block(-50.0, 20.0, 200.0, 10.0));
        let faller = arena.spawn(
            block(0.0, 0.0, 10.0, 10.0)
                .with_body(PhysicsBody::new())
                .with_behavior(Recorder(hits.clone())),
        );
        let mut scene = Scene::new("level");
        scene.add_world_entity(&mut arena, wall);
        scene.add_world_entity(&mut arena, floor);
        scene.add_world_entity(&mut arena, faller);

        for _ in 0..30 {
            scene.do_update(&mut arena, 1.0 / 60.0);
        }
        let hits = hits.borrow();
        assert!(!hits.is_empty());
        assert!(
            hits.iter()
                .all(|hit| *hit == (floor, rootfw_physics::Axis::Y))
        );
    }

    #[test]
    fn test_logic_update_sees_moved_entities() {
        let log = Log::default();
        let mut arena = EntityArena::new();
        let mover = arena.spawn(block(0.0, 0.0, 1.0, 1.0).with_body(
            PhysicsBody::new().with_gravity(0.0).with_friction(1.0, 1.0),
        ));
        arena.get_mut(mover).unwrap().body.as_mut().unwrap().velocity.x = 60.0;
        let mut scene = Scene::new("level").with_logic(Hooks { log: log.clone() });
        scene.add_world_entity(&mut arena, mover);

        scene.do_update(&mut arena, 0.5);
        assert_eq!(*log.borrow(), vec!["update:30"]);
    }

    #[test]
    fn test_camera_updates_after_entities() {
        let mut arena = EntityArena::new();
        let mover = arena.spawn(block(0.0, 0.0, 0.0, 0.0).with_body(
            PhysicsBody::new().with_gravity(0.0).with_friction(1.0, 1.0),
        ));
        arena.get_mut(mover).unwrap().body.as_mut().unwrap().velocity.x = 100.0;
        let mut scene = Scene::new("level").with_camera(Camera::new(0.0, 0.0));
        scene.add_world_entity(&mut arena, mover);
        scene.camera_mut().follow(mover, rootfw_math::Vec2::ZERO);

        scene.do_update(&mut arena, 1.0);
        // Camera smoothing factor is clamped to 1, so it lands on this frame's position.
        assert_eq!(scene.camera().position().x, 100.0);
    }

    #[test]
    fn test_handle_event_reaches_logic() {
        let log = Log::default();
        let mut arena = EntityArena::new();
        let mut scene = Scene::new("level").with_logic(Hooks { log: log.clone() });
        scene.handle_event(&mut arena, &Event::Custom("ping".into()));
        assert_eq!(*log.borrow(), vec!["event:Custom(\"ping\")"]);
    }

    #[test]
    fn test_draw_world_through_camera_hud_in_place() {
        let red = [255, 0, 0, 255];
        let green = [0, 255, 0, 255];
        let mut arena = EntityArena::new();
        let world = arena.spawn(Entity::new().with_sprite(Sprite::solid(2, 2, red)));
        let hud = arena.spawn(Entity::new().with_sprite(Sprite::solid(2, 2, green)));
        arena.get_mut(world).unwrap().set_position(12.0, 12.0);
        arena.get_mut(hud).unwrap().set_position(0.0, 0.0);

        let mut camera = Camera::new(20.0, 20.0);
        camera.set_target_position(rootfw_math::Vec2::new(10.0, 10.0));
        camera.snap_to_target();
        let mut scene = Scene::new("level").with_camera(camera);
        scene.add_world_entity(&mut arena, world);
        scene.add_hud_entity(&mut arena, hud);

        let mut canvas = Canvas::new(20, 20);
        scene.draw(&arena, &mut canvas);
        assert_eq!(canvas.pixel(2, 2), Some(red));
        assert_eq!(canvas.pixel(0, 0), Some(green));
    }
}
