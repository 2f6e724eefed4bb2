//! # engine2d
//!
//! A lightweight 2D game runtime.
//!
//! ## Features
//!
//! - **ECS storage**: type-keyed component tables over a single entity list
//! - **Scenes**: ordered update and render systems with an explicit switch protocol
//! - **Batched rendering**: sprites grouped into draw calls by texture adjacency,
//!   lines and shapes in a single indexed draw
//! - **Camera2D**: lazily rebuilt orthographic view with zoom limits
//! - **Input**: action bindings with just-pressed/just-released edges
//! - **Physics contract**: pluggable rigid-body world with per-body contact events
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use engine2d::prelude::*;
//!
//! struct MyGame;
//!
//! impl Application for MyGame {
//!     fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
//!         let mut scene = Scene::new("main");
//!         scene.new_entity(Vec2::new(0.0, 0.0), Vec2::new(32.0, 32.0), 0.0);
//!         scene.write_component_to_last_entity(FillRectRenderComponent { tint: Rgba8::RED });
//!         scene.register_render_system(FillRectRenderSystem);
//!         engine.change_scene(scene);
//!         Ok(())
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut engine = Engine::headless(EngineConfig::default())?;
//!     engine.run(&mut MyGame, &mut HeadlessPlatform::new(60, 1.0 / 60.0))?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod events;
pub mod ecs;
pub mod scene;
pub mod render;
pub mod input;
pub mod physics;
pub mod assets;

mod application;
mod engine;

pub use application::{AppError, AppEvent, Application};
pub use engine::{Engine, EngineError, HeadlessPlatform, Platform, Services};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        AppError, AppEvent, Application,
        Engine, EngineError, HeadlessPlatform, Platform, Services,
        assets::{AssetManager, ImageData},
        config::{Config, EngineConfig},
        ecs::{Component, Entity, EntityId, RenderSystem, System, World},
        ecs::components::{
            AnimationComponent, CircleRenderComponent, DynamicBodyComponent, FillRectRenderComponent,
            LineRenderComponent, RectRenderComponent, SpriteAnimation, SpriteComponent, StaticBodyComponent,
            TriangleRenderComponent,
        },
        ecs::systems::{
            CircleRenderSystem, DynamicBodySyncSystem, FillRectRenderSystem, LineRenderSystem, RectRenderSystem,
            SpriteAnimationSystem, SpriteRenderOriginSystem, TriangleRenderSystem, TweenAnimatorSystem,
        },
        events::{Event, ListenerToken},
        foundation::math::{Mat4, Vec2, Vec2i},
        input::{InputBinding, InputManager, KeyCode, MouseButton},
        physics::{BodyDef, BodyHandle, ColliderShape, Collision, ContactEvents, PhysicsWorld},
        render::{Camera2D, Rgba8, ShapeBatch, SpriteBatch, Texture2D, TileSet},
        scene::{RenderContext, Scene, UpdateContext},
    };
}
