//! Scenes and the scene host
//!
//! A [`Scene`] owns one [`World`], the entity sequence created through it and
//! two ordered system lists. The [`SceneHost`] holds the running scene and
//! performs the switch protocol:
//!
//! 1. the outgoing scene is terminated (entity and system lists cleared)
//! 2. the incoming scene becomes current
//! 3. its start hook runs, once, before its first update
//!
//! The outgoing scene is handed back to the caller, which decides when to
//! drop it.

mod context;

pub use context::{RenderContext, UpdateContext};

use crate::ecs::{Component, Entity, EntityId, RenderSystem, System, World};
use crate::engine::Services;
use crate::fatal;
use crate::foundation::math::Vec2;
use crate::render::Rgba8;

type StartHook = Box<dyn FnOnce(&mut Scene, &mut Services)>;

/// A world plus the systems that drive and draw it
pub struct Scene {
    name: String,
    /// Clear color for the frame
    pub background: Rgba8,
    world: World,
    entities: Vec<EntityId>,
    update_systems: Vec<Box<dyn System>>,
    render_systems: Vec<Box<dyn RenderSystem>>,
    on_start: Option<StartHook>,
}

impl Scene {
    /// Create an empty scene
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            background: Rgba8::BLACK,
            world: World::new(),
            entities: Vec::new(),
            update_systems: Vec::new(),
            render_systems: Vec::new(),
            on_start: None,
        }
    }

    /// Set the hook run when the scene becomes current
    pub fn with_start(mut self, hook: impl FnOnce(&mut Scene, &mut Services) + 'static) -> Self {
        self.on_start = Some(Box::new(hook));
        self
    }

    /// Set the clear color
    pub fn with_background(mut self, background: Rgba8) -> Self {
        self.background = background;
        self
    }

    /// Scene name, for logs
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The scene's world
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable access to the scene's world
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Create an entity and return the stored record
    pub fn new_entity(&mut self, position: Vec2, dimensions: Vec2, rotation: f32) -> &mut Entity {
        let id = self.world.spawn(position, dimensions, rotation);
        self.entities.push(id);
        match self.world.entity_mut(id) {
            Some(entity) => entity,
            None => fatal!("entity {} vanished right after creation", id),
        }
    }

    /// Entities created through this scene, oldest first
    pub fn entities(&self) -> &[EntityId] {
        &self.entities
    }

    /// Number of entities created through this scene
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Most recently created entity
    ///
    /// Fatal on an empty scene.
    pub fn last_entity(&self) -> EntityId {
        match self.entities.last() {
            Some(&id) => id,
            None => fatal!("scene '{}' has no last entity", self.name),
        }
    }

    /// Write `component` to the most recently created entity
    pub fn write_component_to_last_entity<T: Component>(&mut self, component: T) -> Option<T> {
        let id = self.last_entity();
        self.world.write(id, component)
    }

    /// Remove component `T` from the most recently created entity
    pub fn delete_component_from_last_entity<T: Component>(&mut self) -> Option<T> {
        let id = self.last_entity();
        self.world.delete::<T>(id)
    }

    /// Append an update system; registration order is run order
    pub fn register_update_system(&mut self, system: impl System + 'static) {
        self.update_systems.push(Box::new(system));
    }

    /// Append a render system; registration order is draw order
    pub fn register_render_system(&mut self, system: impl RenderSystem + 'static) {
        self.render_systems.push(Box::new(system));
    }

    /// Number of update systems
    pub fn update_system_count(&self) -> usize {
        self.update_systems.len()
    }

    /// Number of render systems
    pub fn render_system_count(&self) -> usize {
        self.render_systems.len()
    }

    /// Run every update system with `dt`
    ///
    /// Returns the scene a system asked to switch to, if any.
    pub fn on_update(&mut self, dt: f32, services: &mut Services) -> Option<Scene> {
        let mut next_scene = None;
        let mut ctx = UpdateContext::new(&mut self.world, services, &mut next_scene);
        for system in &mut self.update_systems {
            system.update(&mut ctx, dt);
        }
        next_scene
    }

    /// Run every render system
    pub fn on_draw(&mut self, services: &mut Services) {
        let mut ctx = RenderContext {
            world: &self.world,
            sprites: &mut services.sprites,
            shapes: &mut services.shapes,
            camera: &services.camera,
        };
        for system in &mut self.render_systems {
            system.draw(&mut ctx);
        }
    }

    fn start(&mut self, services: &mut Services) {
        log::info!("Starting scene '{}'", self.name);
        if let Some(hook) = self.on_start.take() {
            hook(self, services);
        }
    }

    fn terminate(&mut self) {
        log::info!("Terminating scene '{}'", self.name);
        self.entities.clear();
        self.update_systems.clear();
        self.render_systems.clear();
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("name", &self.name)
            .field("entities", &self.entities.len())
            .field("update_systems", &self.update_systems.len())
            .field("render_systems", &self.render_systems.len())
            .finish_non_exhaustive()
    }
}

/// Owner of the running scene
#[derive(Debug, Default)]
pub struct SceneHost {
    current: Option<Scene>,
}

impl SceneHost {
    /// Host with no running scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `scene` current and start it, returning the terminated previous scene
    pub fn replace_scene(&mut self, scene: Scene, services: &mut Services) -> Option<Scene> {
        let previous = self.current.take().map(|mut old| {
            old.terminate();
            old
        });
        self.current.insert(scene).start(services);
        previous
    }

    /// Running scene
    pub fn current(&self) -> Option<&Scene> {
        self.current.as_ref()
    }

    /// Mutable running scene
    pub fn current_mut(&mut self) -> Option<&mut Scene> {
        self.current.as_mut()
    }

    /// Terminate and hand back the running scene
    pub fn take(&mut self) -> Option<Scene> {
        self.current.take().map(|mut scene| {
            scene.terminate();
            scene
        })
    }
}
