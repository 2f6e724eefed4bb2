//! Physics body components
//!
//! Bodies live in the [`PhysicsWorld`]; the components only hold the handle.
//! The constructors size the body from the entity and register it with
//! [`ContactEvents`] so collision listeners can be attached right away.

use crate::ecs::{Component, Entity};
use crate::foundation::math::Vec2;
use crate::physics::{BodyDef, BodyEvents, BodyHandle, ColliderShape, ContactEvents, PhysicsWorld};

/// Entity driven by a dynamic body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DynamicBodyComponent {
    /// Body in the physics world
    pub body: BodyHandle,
}

impl Component for DynamicBodyComponent {}

impl DynamicBodyComponent {
    /// Create a dynamic body matching `entity`'s transform
    pub fn new(
        entity: &Entity,
        shape: ColliderShape,
        density: f32,
        friction: f32,
        restitution: f32,
        gravity_scale: f32,
        physics: &mut dyn PhysicsWorld,
        contacts: &mut ContactEvents,
    ) -> Self {
        let def = BodyDef::dynamic(entity.position, entity.dimensions, entity.rotation.to_radians(), shape)
            .with_material(density, friction, restitution)
            .with_gravity_scale(gravity_scale);
        let body = physics.create_body(&def);
        contacts.register(body, entity.id());
        Self { body }
    }

    /// Collision events of this body
    pub fn events<'a>(&self, contacts: &'a mut ContactEvents) -> Option<&'a mut BodyEvents> {
        contacts.events_mut(self.body)
    }

    /// Current body position
    pub fn position(&self, physics: &dyn PhysicsWorld) -> Option<Vec2> {
        physics.position(self.body)
    }

    /// Teleport the body
    pub fn set_position(&self, physics: &mut dyn PhysicsWorld, position: Vec2) {
        let angle = physics.angle(self.body).unwrap_or_default();
        physics.set_transform(self.body, position, angle);
    }

    /// Current linear velocity
    pub fn velocity(&self, physics: &dyn PhysicsWorld) -> Option<Vec2> {
        physics.linear_velocity(self.body)
    }

    /// Set the linear velocity
    pub fn set_velocity(&self, physics: &mut dyn PhysicsWorld, velocity: Vec2) {
        physics.set_linear_velocity(self.body, velocity);
    }

    /// Apply a force at the body center until the next step
    pub fn apply_force(&self, physics: &mut dyn PhysicsWorld, force: Vec2) {
        physics.apply_force(self.body, force);
    }

    /// Apply an angular impulse
    pub fn apply_angular_impulse(&self, physics: &mut dyn PhysicsWorld, impulse: f32) {
        physics.apply_angular_impulse(self.body, impulse);
    }

    /// Destroy the body and drop its listeners
    pub fn destroy(self, physics: &mut dyn PhysicsWorld, contacts: &mut ContactEvents) {
        physics.destroy_body(self.body);
        contacts.unregister(self.body);
    }
}

/// Entity anchored to a static body or trigger area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticBodyComponent {
    /// Body in the physics world
    pub body: BodyHandle,
}

impl Component for StaticBodyComponent {}

impl StaticBodyComponent {
    /// Create a solid static body matching `entity`'s transform
    pub fn new(
        entity: &Entity,
        shape: ColliderShape,
        friction: f32,
        physics: &mut dyn PhysicsWorld,
        contacts: &mut ContactEvents,
    ) -> Self {
        let def = BodyDef::fixed(entity.position, entity.dimensions, entity.rotation.to_radians())
            .with_shape(shape)
            .with_material(0.0, friction, 0.0);
        Self::from_def(entity, &def, physics, contacts)
    }

    /// Create a sensor that reports contacts without blocking anything
    pub fn trigger_area(
        entity: &Entity,
        shape: ColliderShape,
        physics: &mut dyn PhysicsWorld,
        contacts: &mut ContactEvents,
    ) -> Self {
        let def = BodyDef::trigger(entity.position, entity.dimensions, entity.rotation.to_radians()).with_shape(shape);
        Self::from_def(entity, &def, physics, contacts)
    }

    fn from_def(entity: &Entity, def: &BodyDef, physics: &mut dyn PhysicsWorld, contacts: &mut ContactEvents) -> Self {
        let body = physics.create_body(def);
        contacts.register(body, entity.id());
        Self { body }
    }

    /// Collision events of this body
    pub fn events<'a>(&self, contacts: &'a mut ContactEvents) -> Option<&'a mut BodyEvents> {
        contacts.events_mut(self.body)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::ecs::World;
    use crate::physics::KinematicWorld;

    #[test]
    fn test_dynamic_body_follows_entity_transform() {
        let mut world = World::new();
        let id = world.spawn(Vec2::new(3.0, 4.0), Vec2::new(2.0, 2.0), 90.0);
        let mut physics = KinematicWorld::default();
        let mut contacts = ContactEvents::new();

        let entity = world.entity(id).unwrap();
        let body = DynamicBodyComponent::new(entity, ColliderShape::Rect, 1.0, 0.3, 0.0, 1.0, &mut physics, &mut contacts);

        assert_eq!(body.position(&physics), Some(Vec2::new(3.0, 4.0)));
        assert_relative_eq!(physics.angle(body.body).unwrap(), std::f32::consts::FRAC_PI_2);
        assert_eq!(contacts.owner(body.body), Some(id));
        assert!(body.events(&mut contacts).is_some());

        body.destroy(&mut physics, &mut contacts);
        assert_eq!(physics.body_count(), 0);
        assert!(contacts.is_empty());
    }

    #[test]
    fn test_velocity_and_teleport() {
        let mut world = World::new();
        let id = world.spawn(Vec2::zeros(), Vec2::new(1.0, 1.0), 0.0);
        let mut physics = KinematicWorld::default();
        let mut contacts = ContactEvents::new();
        let body = DynamicBodyComponent::new(world.entity(id).unwrap(), ColliderShape::Circle, 1.0, 0.3, 0.0, 1.0, &mut physics, &mut contacts);

        body.set_velocity(&mut physics, Vec2::new(1.0, 0.0));
        assert_eq!(body.velocity(&physics), Some(Vec2::new(1.0, 0.0)));
        body.set_position(&mut physics, Vec2::new(5.0, 5.0));
        assert_eq!(body.position(&physics), Some(Vec2::new(5.0, 5.0)));
    }

    #[test]
    fn test_trigger_area_is_registered() {
        let mut world = World::new();
        let id = world.spawn(Vec2::zeros(), Vec2::new(4.0, 4.0), 0.0);
        let mut physics = KinematicWorld::default();
        let mut contacts = ContactEvents::new();
        let area = StaticBodyComponent::trigger_area(world.entity(id).unwrap(), ColliderShape::Rect, &mut physics, &mut contacts);

        assert_eq!(contacts.owner(area.body), Some(id));
        assert_eq!(physics.position(area.body), Some(Vec2::zeros()));
    }
}
