//! ECS World implementation
//!
//! The world owns the entity list and one [`ComponentStorage`] per component
//! type. Entity ids are indices into the entity list, so the list is the
//! single source of truth for the inline transform fields: component
//! iteration and whole-world iteration both hand out the same stored
//! [`Entity`], never a copy.

use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};

use super::storage::{AnyStorage, ComponentStorage};
use super::{Component, Entity, EntityId};
use crate::foundation::math::Vec2;
use crate::fatal;

static NEXT_WORLD_TAG: AtomicU32 = AtomicU32::new(0);

/// ECS World containing all entities and components
pub struct World {
    tag: u32,
    entities: Vec<Entity>,
    storages: HashMap<TypeId, Box<dyn AnyStorage>>,
}

impl World {
    /// Create a new world
    pub fn new() -> Self {
        Self {
            tag: NEXT_WORLD_TAG.fetch_add(1, Ordering::Relaxed),
            entities: Vec::new(),
            storages: HashMap::new(),
        }
    }

    /// Create a zero-initialized entity
    pub fn new_entity(&mut self) -> EntityId {
        let raw = u32::try_from(self.entities.len())
            .unwrap_or_else(|_| fatal!("entity id space exhausted"));
        let id = EntityId::new(self.tag, raw);
        self.entities.push(Entity::new(id));
        id
    }

    /// Create an entity with its transform fields set
    pub fn spawn(&mut self, position: Vec2, dimensions: Vec2, rotation: f32) -> EntityId {
        let id = self.new_entity();
        let entity = &mut self.entities[id.index()];
        entity.position = position;
        entity.dimensions = dimensions;
        entity.rotation = rotation;
        id
    }

    /// Entity record for `id`
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id.index()).filter(|entity| entity.id() == id)
    }

    /// Mutable entity record for `id`
    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id.index()).filter(|entity| entity.id() == id)
    }

    /// All entities in creation order
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Number of entities ever created in this world
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Whether `id` was issued by this world
    pub fn contains_entity(&self, id: EntityId) -> bool {
        self.entity(id).is_some()
    }

    /// Table for `T`, if one was ever created
    pub fn storage<T: Component>(&self) -> Option<&ComponentStorage<T>> {
        self.storages
            .get(&TypeId::of::<T>())
            .map(|storage| downcast_ref::<T>(storage.as_ref()))
    }

    /// Table for `T`, created on first access
    ///
    /// Crate-private: inserting through the table would bypass the
    /// ownership check in [`write`](Self::write).
    pub(crate) fn storage_mut<T: Component>(&mut self) -> &mut ComponentStorage<T> {
        let storage = self.storages.entry(TypeId::of::<T>()).or_insert_with(|| {
            log::debug!("Registered component table for {}", type_name::<T>());
            Box::new(ComponentStorage::<T>::new())
        });
        downcast_mut::<T>(storage.as_mut())
    }

    /// Component `T` of `entity`
    pub fn read<T: Component>(&self, entity: EntityId) -> Option<&T> {
        self.storage::<T>()?.get(entity)
    }

    /// Mutable component `T` of `entity`
    pub fn read_mut<T: Component>(&mut self, entity: EntityId) -> Option<&mut T> {
        self.storages
            .get_mut(&TypeId::of::<T>())
            .and_then(|storage| downcast_mut::<T>(storage.as_mut()).get_mut(entity))
    }

    /// Insert or overwrite component `T` of `entity`, returning the old value
    pub fn write<T: Component>(&mut self, entity: EntityId, value: T) -> Option<T> {
        if !self.contains_entity(entity) {
            fatal!("write of {} to entity {} not owned by this world", type_name::<T>(), entity);
        }
        self.storage_mut::<T>().insert(entity, value)
    }

    /// Remove component `T` of `entity`; absent entries are a no-op
    pub fn delete<T: Component>(&mut self, entity: EntityId) -> Option<T> {
        self.storages
            .get_mut(&TypeId::of::<T>())
            .and_then(|storage| downcast_mut::<T>(storage.as_mut()).remove(entity))
    }

    /// Whether `entity` has component `T`
    pub fn has<T: Component>(&self, entity: EntityId) -> bool {
        self.storage::<T>().is_some_and(|storage| storage.contains(entity))
    }

    /// Visit every entity holding `T` together with its component
    ///
    /// Order is unspecified. Structural changes to the `T` table cannot
    /// happen during the visit; collect ids first if entities need them.
    pub fn for_each<T: Component>(&mut self, mut visit: impl FnMut(&mut Entity, &mut T)) {
        let Some(storage) = self.storages.get_mut(&TypeId::of::<T>()) else {
            return;
        };
        let entities = &mut self.entities;
        for (id, value) in downcast_mut::<T>(storage.as_mut()).iter_mut() {
            match entities.get_mut(id.index()) {
                Some(entity) => visit(entity, value),
                None => fatal!("{} stored for entity {} missing from the entity list", type_name::<T>(), id),
            }
        }
    }

    /// Read-only variant of [`for_each`](Self::for_each)
    pub fn for_each_ref<T: Component>(&self, mut visit: impl FnMut(&Entity, &T)) {
        let Some(storage) = self.storage::<T>() else {
            return;
        };
        for (id, value) in storage.iter() {
            match self.entities.get(id.index()) {
                Some(entity) => visit(entity, value),
                None => fatal!("{} stored for entity {} missing from the entity list", type_name::<T>(), id),
            }
        }
    }

    /// Ids of every entity holding `T`
    pub fn entities_with<T: Component>(&self) -> Vec<EntityId> {
        self.storage::<T>()
            .map(|storage| storage.entities().collect())
            .unwrap_or_default()
    }

    /// Visit every entity regardless of its components, in creation order
    pub fn for_each_entity(&mut self, visit: impl FnMut(&mut Entity)) {
        self.entities.iter_mut().for_each(visit);
    }

    /// Number of component tables created so far
    pub fn storage_count(&self) -> usize {
        self.storages.len()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("entities", &self.entities.len())
            .field(
                "storages",
                &self.storages.values().map(|s| s.component_name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

fn downcast_ref<T: Component>(storage: &dyn AnyStorage) -> &ComponentStorage<T> {
    match storage.as_any().downcast_ref::<ComponentStorage<T>>() {
        Some(typed) => typed,
        None => fatal!(
            "component table holds {} but was accessed as {}",
            storage.component_name(),
            type_name::<T>()
        ),
    }
}

fn downcast_mut<T: Component>(storage: &mut dyn AnyStorage) -> &mut ComponentStorage<T> {
    let held = storage.component_name();
    match storage.as_any_mut().downcast_mut::<ComponentStorage<T>>() {
        Some(typed) => typed,
        None => fatal!("component table holds {} but was accessed as {}", held, type_name::<T>()),
    }
}
