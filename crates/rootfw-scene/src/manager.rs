//! Ordered scene list with the current scene at index 0.

use rootfw_assets::Canvas;
use tracing::{debug, info, warn};

use crate::arena::{EntityArena, EntityId};
use crate::entity::Entity;
use crate::error::SceneError;
use crate::event::Event;
use crate::requests::{SceneRequest, SceneRequests};
use crate::scene::{Layer, Scene};

/// Owns every scene and the entity arena they share.
///
/// The scene at index 0 is the current one. Transitions swap the target into
/// slot 0, so every scene's [`Scene::index`] always equals its position.
///
/// Scene changes asked for while a frame is running go through the
/// manager's [`SceneRequests`] queue and take effect in
/// [`apply_requests`](Self::apply_requests).
#[derive(Debug, Default)]
pub struct SceneManager {
    scenes: Vec<Scene>,
    arena: EntityArena,
    requests: SceneRequests,
}

impl SceneManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arena(&self) -> &EntityArena {
        &self.arena
    }

    pub fn arena_mut(&mut self) -> &mut EntityArena {
        &mut self.arena
    }

    /// Append `scenes` in order and enter the first one if nothing was loaded
    /// before.
    ///
    /// Fails without changing anything if two scenes share a name or a name
    /// is already taken.
    pub fn init_scenes(&mut self, scenes: Vec<Scene>) -> Result<(), SceneError> {
        for (i, scene) in scenes.iter().enumerate() {
            let duplicate_in_batch = scenes[..i].iter().any(|s| s.name() == scene.name());
            if duplicate_in_batch || self.has_scene(scene.name()) {
                return Err(SceneError::DuplicateScene(scene.name().to_string()));
            }
        }

        let was_empty = self.scenes.is_empty();
        for scene in scenes {
            self.push_scene(scene);
        }
        if was_empty && let Some(first) = self.scenes.first_mut() {
            first.on_enter(&mut self.arena);
        }
        Ok(())
    }

    /// Add one scene at the end. It becomes current only if it is the first.
    pub fn add_scene(&mut self, scene: Scene) -> Result<(), SceneError> {
        self.init_scenes(vec![scene])
    }

    fn push_scene(&mut self, mut scene: Scene) {
        scene.set_index(self.scenes.len());
        scene.set_requests(self.requests.clone());
        scene.on_added(&mut self.arena);
        self.scenes.push(scene);
    }

    /// Take a scene out of the manager and detach its entities.
    ///
    /// The last remaining scene cannot be removed. Removing the current
    /// scene enters the one that moves into slot 0.
    pub fn remove_scene(&mut self, name: &str) -> Result<Scene, SceneError> {
        let index = self.get_index_of_scene(name)?;
        if self.scenes.len() == 1 {
            return Err(SceneError::LastScene(name.to_string()));
        }

        let mut scene = self.scenes.remove(index);
        if index == 0 {
            scene.on_exit(&mut self.arena);
        }
        scene.clear(&mut self.arena);
        scene.set_requests(SceneRequests::new());
        self.reindex();
        if index == 0
            && let Some(current) = self.scenes.first_mut()
        {
            current.on_enter(&mut self.arena);
        }
        debug!(scene = name, "scene removed");
        Ok(scene)
    }

    fn reindex(&mut self) {
        for (i, scene) in self.scenes.iter_mut().enumerate() {
            scene.set_index(i);
        }
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    pub fn scenes(&self) -> impl Iterator<Item = &Scene> {
        self.scenes.iter()
    }

    /// Scene names in list order.
    pub fn scene_names(&self) -> Vec<&str> {
        self.scenes.iter().map(Scene::name).collect()
    }

    pub fn has_scene(&self, name: &str) -> bool {
        self.scenes.iter().any(|scene| scene.name() == name)
    }

    pub fn scene(&self, name: &str) -> Option<&Scene> {
        self.scenes.iter().find(|scene| scene.name() == name)
    }

    pub fn scene_mut(&mut self, name: &str) -> Option<&mut Scene> {
        self.scenes.iter_mut().find(|scene| scene.name() == name)
    }

    /// A scene together with the arena, for calls that need both.
    pub fn scene_and_arena_mut(&mut self, name: &str) -> Option<(&mut Scene, &mut EntityArena)> {
        let scene = self.scenes.iter_mut().find(|scene| scene.name() == name)?;
        Some((scene, &mut self.arena))
    }

    pub fn get_index_of_scene(&self, name: &str) -> Result<usize, SceneError> {
        self.scene(name)
            .map(Scene::index)
            .ok_or_else(|| SceneError::SceneNotFound(name.to_string()))
    }

    pub fn current_scene(&self) -> Result<&Scene, SceneError> {
        self.scenes.first().ok_or(SceneError::NoScenes)
    }

    pub fn current_scene_mut(&mut self) -> Result<&mut Scene, SceneError> {
        self.scenes.first_mut().ok_or(SceneError::NoScenes)
    }

    pub fn current_scene_name(&self) -> Result<&str, SceneError> {
        self.current_scene().map(Scene::name)
    }

    /// Exit the current scene, swap `name` into slot 0, and enter it.
    pub fn transition_to_scene(&mut self, name: &str) -> Result<(), SceneError> {
        let target = self.get_index_of_scene(name)?;

        self.scenes[0].on_exit(&mut self.arena);
        self.scenes.swap(0, target);
        self.scenes[0].set_index(0);
        self.scenes[target].set_index(target);
        self.scenes[0].on_enter(&mut self.arena);

        info!(scene = name, from = target, "transitioned to scene");
        Ok(())
    }

    /// Move `name` into slot `index`, swapping it with the scene there.
    /// No lifecycle hooks run.
    pub fn set_scene(&mut self, name: &str, index: usize) -> Result<(), SceneError> {
        let current = self.get_index_of_scene(name)?;
        if index >= self.scenes.len() {
            return Err(SceneError::IndexOutOfRange {
                index,
                len: self.scenes.len(),
            });
        }
        self.scenes.swap(current, index);
        self.scenes[current].set_index(current);
        self.scenes[index].set_index(index);
        Ok(())
    }

    /// Handle to the queue shared by every scene of this manager.
    pub fn requests(&self) -> SceneRequests {
        self.requests.clone()
    }

    /// Apply queued scene changes, oldest first.
    ///
    /// Stops at the first request that fails and returns its error; requests
    /// queued after it are dropped. Returns how many requests were applied.
    pub fn apply_requests(&mut self) -> Result<usize, SceneError> {
        let mut applied = 0;
        while let Some(request) = self.requests.pop() {
            let result = match &request {
                SceneRequest::Transition(name) => self.transition_to_scene(name),
                SceneRequest::SetScene { name, index } => self.set_scene(name, *index),
            };
            if let Err(err) = result {
                let dropped = self.requests.clear();
                if dropped > 0 {
                    warn!(dropped, "discarding scene requests after a failed one");
                }
                return Err(err);
            }
            applied += 1;
        }
        Ok(applied)
    }

    /// Names of active scenes, last in the list first.
    pub fn active_scenes(&self) -> Vec<&str> {
        self.scenes
            .iter()
            .rev()
            .filter(|scene| scene.is_active())
            .map(Scene::name)
            .collect()
    }

    /// Names of visible scenes, last in the list first.
    pub fn visible_scenes(&self) -> Vec<&str> {
        self.scenes
            .iter()
            .rev()
            .filter(|scene| scene.is_visible())
            .map(Scene::name)
            .collect()
    }

    // -- entities --

    /// Spawn an entity without a scene.
    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        self.arena.spawn(entity)
    }

    /// Spawn an entity straight into a scene layer.
    pub fn spawn_into(
        &mut self,
        scene: &str,
        layer: Layer,
        entity: Entity,
    ) -> Result<EntityId, SceneError> {
        let index = self.get_index_of_scene(scene)?;
        let id = self.arena.spawn(entity);
        self.scenes[index].add_entity(&mut self.arena, id, layer);
        Ok(id)
    }

    /// Detach an entity from its scene (firing its removal hook) and drop it.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        self.arena.get_mut(id)?.set_parent_scene(None);
        self.arena.despawn(id)
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.arena.get(id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.arena.get_mut(id)
    }

    // -- per frame --

    /// Events only reach the current scene.
    pub fn process_event(&mut self, event: &Event) {
        if let Some(current) = self.scenes.first_mut() {
            current.handle_event(&mut self.arena, event);
        }
    }

    /// Update every active scene in list order.
    pub fn update(&mut self, dt: f32) {
        for scene in &mut self.scenes {
            if scene.is_active() {
                scene.do_update(&mut self.arena, dt);
            }
        }
    }

    /// Draw every visible scene in list order.
    pub fn draw(&mut self, canvas: &mut Canvas) {
        for scene in &mut self.scenes {
            if scene.is_visible() {
                scene.draw(&self.arena, canvas);
            }
        }
    }
}
