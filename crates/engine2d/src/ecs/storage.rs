//! Per-type component tables
//!
//! Each component type gets one [`ComponentStorage`]. The world keeps them
//! behind the object-safe [`AnyStorage`] and downcasts at the boundary, so
//! game code only ever sees concrete types.

use std::any::Any;
use std::collections::HashMap;

use super::{Component, EntityId};

/// Map from entity to the value of one component type
///
/// Iteration order is unspecified.
#[derive(Debug)]
pub struct ComponentStorage<T: Component> {
    values: HashMap<EntityId, T>,
}

impl<T: Component> ComponentStorage<T> {
    /// Create an empty table
    pub fn new() -> Self {
        Self { values: HashMap::new() }
    }

    /// Insert or overwrite, returning the previous value
    pub(crate) fn insert(&mut self, entity: EntityId, value: T) -> Option<T> {
        self.values.insert(entity, value)
    }

    /// Value for `entity`
    pub fn get(&self, entity: EntityId) -> Option<&T> {
        self.values.get(&entity)
    }

    /// Mutable value for `entity`
    pub fn get_mut(&mut self, entity: EntityId) -> Option<&mut T> {
        self.values.get_mut(&entity)
    }

    /// Remove and return the value for `entity`
    pub fn remove(&mut self, entity: EntityId) -> Option<T> {
        self.values.remove(&entity)
    }

    /// Whether `entity` has a value
    pub fn contains(&self, entity: EntityId) -> bool {
        self.values.contains_key(&entity)
    }

    /// Number of stored values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// All `(entity, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &T)> {
        self.values.iter().map(|(&id, value)| (id, value))
    }

    /// All `(entity, value)` pairs, mutably
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut T)> {
        self.values.iter_mut().map(|(&id, value)| (id, value))
    }

    /// Entities that have a value
    pub fn entities(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.values.keys().copied()
    }
}

impl<T: Component> Default for ComponentStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Type-erased view of a component table
pub trait AnyStorage: Any {
    /// Upcast for downcasting to the concrete table
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Name of the stored component type, for diagnostics
    fn component_name(&self) -> &'static str;
}

impl<T: Component> AnyStorage for ComponentStorage<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn component_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}
