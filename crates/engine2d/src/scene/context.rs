//! Per-frame contexts handed to systems

use super::Scene;
use crate::ecs::World;
use crate::engine::Services;
use crate::foundation::math::Vec2;
use crate::render::{Camera2D, ShapeBatch, SpriteBatch};

/// What an update system may touch during the update phase
pub struct UpdateContext<'a> {
    /// The running scene's world
    pub world: &'a mut World,
    /// Engine subsystems
    pub services: &'a mut Services,
    pub(super) next_scene: &'a mut Option<Scene>,
}

impl<'a> UpdateContext<'a> {
    /// Build a context around `world`
    ///
    /// A requested scene change lands in `next_scene`.
    pub fn new(world: &'a mut World, services: &'a mut Services, next_scene: &'a mut Option<Scene>) -> Self {
        Self {
            world,
            services,
            next_scene,
        }
    }

    /// Switch to `scene` once the update phase ends
    ///
    /// The last request of a frame wins.
    pub fn change_scene(&mut self, scene: Scene) {
        if let Some(pending) = self.next_scene.replace(scene) {
            log::debug!("Scene change to '{}' superseded", pending.name());
        }
    }

    /// Whether a scene change is pending
    pub fn scene_change_requested(&self) -> bool {
        self.next_scene.is_some()
    }

    /// Pointer position mapped through the camera into world space
    pub fn pointer_world_position(&self) -> Vec2 {
        self.services.pointer_world_position()
    }
}

/// What a render system may touch during the draw phase
///
/// The world is read-only here.
pub struct RenderContext<'a> {
    /// The running scene's world
    pub world: &'a World,
    /// Textured quad batch
    pub sprites: &'a mut SpriteBatch,
    /// Line and shape batch
    pub shapes: &'a mut ShapeBatch,
    /// Camera the batches will render with
    pub camera: &'a Camera2D,
}
