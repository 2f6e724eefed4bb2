//! Entity identities and inline transform fields

use std::fmt;

use crate::foundation::math::Vec2;

/// Entity identity
///
/// Issued in strictly increasing order by a [`super::World`] and never
/// reused. The raw value doubles as the entity's index in its world; the
/// issuing world's tag keeps ids from different worlds apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId {
    index: u32,
    world: u32,
}

impl EntityId {
    pub(super) fn new(world: u32, index: u32) -> Self {
        Self { index, world }
    }

    /// Raw identity value
    pub fn raw(self) -> u32 {
        self.index
    }

    pub(super) fn index(self) -> usize {
        self.index as usize
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index)
    }
}

/// Entity record: identity plus the transform every entity carries
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    id: EntityId,
    /// Center position in world units
    pub position: Vec2,
    /// Rotation in degrees, counter-clockwise
    pub rotation: f32,
    /// Width and height in world units
    pub dimensions: Vec2,
}

impl Entity {
    pub(super) fn new(id: EntityId) -> Self {
        Self {
            id,
            position: Vec2::zeros(),
            rotation: 0.0,
            dimensions: Vec2::zeros(),
        }
    }

    /// Entity identity
    pub fn id(&self) -> EntityId {
        self.id
    }
}
