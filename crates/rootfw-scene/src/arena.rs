//! Generational storage for every entity of a [`SceneManager`](crate::SceneManager).
//!
//! Scenes and cameras refer to entities through [`EntityId`] handles. A
//! handle to a despawned entity stops resolving instead of dangling, and its
//! slot can be reused by a later spawn under a new generation.

use std::fmt;

use slotmap::{Key, SlotMap, new_key_type};
use tracing::trace;

use crate::entity::Entity;

new_key_type! {
    /// Generation-tagged handle to an entity in an [`EntityArena`].
    pub struct EntityId;
}

impl EntityId {
    /// Slot index of this handle.
    ///
    /// Two live entities never share a uid; a uid freed by a despawn may be
    /// handed out again.
    pub fn uid(self) -> u32 {
        // `as_ffi` packs the generation in the high half and the slot in the low half.
        (self.data().as_ffi() & 0xffff_ffff) as u32
    }
}

/// Owner of all entities, keyed by [`EntityId`].
#[derive(Default)]
pub struct EntityArena {
    entities: SlotMap<EntityId, Entity>,
}

impl fmt::Debug for EntityArena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityArena").field("len", &self.len()).finish()
    }
}

impl EntityArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        let id = self.entities.insert(entity);
        trace!(uid = id.uid(), "entity spawned");
        id
    }

    /// Remove an entity and hand it back. Returns `None` for stale handles.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        let entity = self.entities.remove(id)?;
        trace!(uid = id.uid(), "entity despawned");
        Some(entity)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(id)
    }

    /// Live entity whose slot index is `uid`.
    pub fn find_uid(&self, uid: u32) -> Option<EntityId> {
        self.entities.keys().find(|id| id.uid() == uid)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut Entity)> {
        self.entities.iter_mut()
    }
}
