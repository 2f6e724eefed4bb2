//! Body to entity synchronisation

use crate::ecs::components::DynamicBodyComponent;
use crate::ecs::System;
use crate::scene::UpdateContext;

/// Copies each dynamic body's position and angle into its entity
///
/// Angles come out of the physics world in radians and land on the entity
/// in degrees. Bodies that no longer exist leave their entity untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct DynamicBodySyncSystem;

impl System for DynamicBodySyncSystem {
    fn update(&mut self, ctx: &mut UpdateContext<'_>, _dt: f32) {
        let physics = &*ctx.services.physics;
        ctx.world.for_each::<DynamicBodyComponent>(|entity, body| {
            if let Some(position) = physics.position(body.body) {
                entity.position = position;
            }
            if let Some(angle) = physics.angle(body.body) {
                entity.rotation = angle.to_degrees();
            }
        });
    }
}
