//! Physics collaborator contract
//!
//! Rigid-body simulation is delegated to a [`PhysicsWorld`] implementation.
//! The engine steps it once per frame after the update phase, passing a
//! [`ContactListener`] that fans contacts out to per-body events
//! ([`ContactEvents`]). Entities follow their bodies through
//! [`crate::ecs::systems::DynamicBodySyncSystem`], which copies position and
//! rotation back into the entity once per frame.

mod contacts;
mod kinematic;

pub use contacts::{BodyEvents, Collision, ContactEvents};
pub use kinematic::KinematicWorld;

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

use crate::foundation::math::Vec2;

new_key_type! {
    /// Handle to a body inside a [`PhysicsWorld`]
    pub struct BodyHandle;
}

/// How a body takes part in the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyType {
    /// Never moves
    Static,
    /// Moved by forces, gravity and contacts
    Dynamic,
}

/// Collider geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColliderShape {
    /// Box of the body's size
    Rect,
    /// Circle whose radius is the body's `size.x`
    Circle,
}

/// Body creation parameters
#[derive(Debug, Clone, PartialEq)]
pub struct BodyDef {
    /// Simulation role
    pub body_type: BodyType,
    /// Collider geometry
    pub shape: ColliderShape,
    /// Initial center position
    pub position: Vec2,
    /// Initial angle in radians
    pub angle: f32,
    /// Collider size
    pub size: Vec2,
    /// Mass per unit area
    pub density: f32,
    /// Coulomb friction
    pub friction: f32,
    /// Bounciness
    pub restitution: f32,
    /// Report contacts without colliding
    pub is_sensor: bool,
    /// Multiplier on world gravity
    pub gravity_scale: f32,
}

impl Default for BodyDef {
    fn default() -> Self {
        Self {
            body_type: BodyType::Static,
            shape: ColliderShape::Rect,
            position: Vec2::zeros(),
            angle: 0.0,
            size: Vec2::new(1.0, 1.0),
            density: 0.0,
            friction: 0.0,
            restitution: 0.0,
            is_sensor: false,
            gravity_scale: 1.0,
        }
    }
}

/// Gap left between neighbouring dynamic bodies so they do not start interpenetrated
const DYNAMIC_BODY_SKIN: f32 = 0.01;

impl BodyDef {
    /// Dynamic body sized like its entity, shrunk by a small skin
    pub fn dynamic(position: Vec2, size: Vec2, angle: f32, shape: ColliderShape) -> Self {
        Self {
            body_type: BodyType::Dynamic,
            shape,
            position,
            angle,
            size: size - Vec2::new(DYNAMIC_BODY_SKIN, DYNAMIC_BODY_SKIN),
            density: 1.0,
            friction: 0.3,
            ..Self::default()
        }
    }

    /// Immovable solid box
    pub fn fixed(position: Vec2, size: Vec2, angle: f32) -> Self {
        Self {
            position,
            size,
            angle,
            friction: 0.3,
            ..Self::default()
        }
    }

    /// Immovable sensor that reports contacts without blocking
    pub fn trigger(position: Vec2, size: Vec2, angle: f32) -> Self {
        Self {
            is_sensor: true,
            ..Self::fixed(position, size, angle)
        }
    }

    /// Replace the collider shape
    pub fn with_shape(mut self, shape: ColliderShape) -> Self {
        self.shape = shape;
        self
    }

    /// Replace density, friction and restitution
    pub fn with_material(mut self, density: f32, friction: f32, restitution: f32) -> Self {
        self.density = density;
        self.friction = friction;
        self.restitution = restitution;
        self
    }

    /// Replace the gravity multiplier
    pub fn with_gravity_scale(mut self, gravity_scale: f32) -> Self {
        self.gravity_scale = gravity_scale;
        self
    }
}

/// Contact callbacks raised while a world steps
pub trait ContactListener {
    /// Two bodies started touching at `point`
    fn begin_contact(&mut self, body_a: BodyHandle, body_b: BodyHandle, point: Vec2);

    /// Two bodies stopped touching
    fn end_contact(&mut self, body_a: BodyHandle, body_b: BodyHandle);
}

/// Rigid-body simulation used by the frame pump and the physics components
///
/// Accessors return `None` for handles that do not name a live body.
pub trait PhysicsWorld {
    /// Create a body
    fn create_body(&mut self, def: &BodyDef) -> BodyHandle;

    /// Destroy a body; returns false when it did not exist
    fn destroy_body(&mut self, body: BodyHandle) -> bool;

    /// Number of live bodies
    fn body_count(&self) -> usize;

    /// World gravity
    fn gravity(&self) -> Vec2;

    /// Center position of `body`
    fn position(&self, body: BodyHandle) -> Option<Vec2>;

    /// Angle of `body` in radians
    fn angle(&self, body: BodyHandle) -> Option<f32>;

    /// Teleport `body`
    fn set_transform(&mut self, body: BodyHandle, position: Vec2, angle: f32);

    /// Linear velocity of `body`
    fn linear_velocity(&self, body: BodyHandle) -> Option<Vec2>;

    /// Set the linear velocity of `body`
    fn set_linear_velocity(&mut self, body: BodyHandle, velocity: Vec2);

    /// Angular velocity of `body` in radians per second
    fn angular_velocity(&self, body: BodyHandle) -> Option<f32>;

    /// Set the angular velocity of `body`
    fn set_angular_velocity(&mut self, body: BodyHandle, velocity: f32);

    /// Force accumulated on `body` since the last step
    fn applied_force(&self, body: BodyHandle) -> Option<Vec2>;

    /// Apply a force at the center of `body` until the next step
    fn apply_force(&mut self, body: BodyHandle, force: Vec2);

    /// Apply an angular impulse to `body`
    fn apply_angular_impulse(&mut self, body: BodyHandle, impulse: f32);

    /// Visit bodies whose bounds overlap the box; the visitor returns false to stop
    fn query_aabb(&self, lower: Vec2, upper: Vec2, visit: &mut dyn FnMut(BodyHandle) -> bool);

    /// Advance the simulation and report contact changes to `listener`
    fn step(&mut self, dt: f32, velocity_iterations: u32, position_iterations: u32, listener: &mut dyn ContactListener);
}

/// First body overlapping the box spanned by `lower_left` and `top_right`
pub fn overlap_box(world: &dyn PhysicsWorld, lower_left: Vec2, top_right: Vec2) -> Option<BodyHandle> {
    let mut found = None;
    world.query_aabb(lower_left, top_right, &mut |body| {
        found = Some(body);
        false
    });
    found
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_dynamic_def_is_shrunk() {
        let def = BodyDef::dynamic(Vec2::new(1.0, 2.0), Vec2::new(1.0, 3.0), 0.0, ColliderShape::Rect);
        assert_eq!(def.body_type, BodyType::Dynamic);
        assert_relative_eq!(def.size.x, 0.99);
        assert_relative_eq!(def.size.y, 2.99);
        assert!(!def.is_sensor);
    }

    #[test]
    fn test_trigger_def_is_static_sensor() {
        let def = BodyDef::trigger(Vec2::zeros(), Vec2::new(2.0, 2.0), 0.5)
            .with_shape(ColliderShape::Circle);
        assert_eq!(def.body_type, BodyType::Static);
        assert!(def.is_sensor);
        assert_eq!(def.shape, ColliderShape::Circle);
        assert_relative_eq!(def.angle, 0.5);
    }
}
