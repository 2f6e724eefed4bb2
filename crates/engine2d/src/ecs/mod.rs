//! Entity-Component-System implementation
//!
//! One typed table per component type, keyed by entity id. There are no
//! archetypes and no multi-component queries: systems iterate one table
//! and look up any other components they need per entity.

pub mod world;
pub mod entity;
pub mod component;
pub mod storage;
pub mod system;
pub mod components;
pub mod systems;

#[cfg(test)]
mod tests;

pub use world::World;
pub use entity::{Entity, EntityId};
pub use component::Component;
pub use storage::ComponentStorage;
pub use system::{RenderSystem, System};
