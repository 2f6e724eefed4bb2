//! Core engine implementation
//!
//! The [`Engine`] owns every subsystem and the running scene, and turns the
//! platform's frame ticks into one update phase and one draw phase:
//!
//! ```text
//! update: clamp dt → input snapshot → app.update → scene update systems
//!         → pending scene change → physics step → camera
//! draw:   clear → app.draw → scene render systems → camera
//!         → sprite batch → shape batch
//! ```

use std::collections::VecDeque;

use thiserror::Error;

use crate::application::{AppEvent, Application};
use crate::assets::{AssetError, AssetManager};
use crate::config::{ConfigError, EngineConfig};
use crate::foundation::math::Vec2;
use crate::foundation::time::FrameClock;
use crate::input::InputManager;
use crate::physics::{ContactEvents, KinematicWorld, PhysicsWorld};
use crate::render::{Camera2D, GraphicsBackend, HeadlessBackend, RenderError, Rgba8, ShapeBatch, SpriteBatch};
use crate::scene::{Scene, SceneHost};

/// Subsystems shared by the engine, scenes and systems
pub struct Services {
    /// Engine configuration
    pub config: EngineConfig,
    /// Graphics device
    pub backend: Box<dyn GraphicsBackend>,
    /// View camera
    pub camera: Camera2D,
    /// Textured quad batch
    pub sprites: SpriteBatch,
    /// Line and shape batch
    pub shapes: ShapeBatch,
    /// Keyboard, pointer and touch state
    pub input: InputManager,
    /// Rigid-body simulation
    pub physics: Box<dyn PhysicsWorld>,
    /// Per-body collision events
    pub contacts: ContactEvents,
    /// Texture loader
    pub assets: AssetManager,
}

impl Services {
    /// Build the batches and camera on top of `backend`
    pub fn new(
        config: EngineConfig,
        mut backend: Box<dyn GraphicsBackend>,
        physics: Box<dyn PhysicsWorld>,
    ) -> Result<Self, RenderError> {
        let viewport = backend.viewport();
        let sprites = SpriteBatch::new(backend.as_mut())?;
        let shapes = ShapeBatch::new(backend.as_mut(), config.render.line_width)?;
        Ok(Self {
            camera: Camera2D::new(viewport, config.camera),
            input: InputManager::new(viewport.y),
            sprites,
            shapes,
            backend,
            physics,
            contacts: ContactEvents::new(),
            assets: AssetManager::new(),
            config,
        })
    }

    /// Pointer position in world space
    pub fn pointer_world_position(&self) -> Vec2 {
        self.camera.screen_to_world(self.input.pointer_position())
    }
}

/// Source of frames and events
pub trait Platform {
    /// Events that arrived since the last call
    fn poll_events(&mut self) -> Vec<AppEvent>;

    /// Wait for the next frame and return its raw delta in seconds, or
    /// `None` when the platform is shutting down
    fn next_frame(&mut self) -> Option<f32>;
}

/// Platform producing a fixed number of fixed-length frames
#[derive(Debug, Clone)]
pub struct HeadlessPlatform {
    frames_left: u64,
    frame_time: f32,
    events: VecDeque<AppEvent>,
}

impl HeadlessPlatform {
    /// Run `frames` frames of `frame_time` seconds each
    pub fn new(frames: u64, frame_time: f32) -> Self {
        Self {
            frames_left: frames,
            frame_time,
            events: VecDeque::new(),
        }
    }

    /// Queue `event` for the next poll
    pub fn push_event(&mut self, event: AppEvent) {
        self.events.push_back(event);
    }
}

impl Platform for HeadlessPlatform {
    fn poll_events(&mut self) -> Vec<AppEvent> {
        self.events.drain(..).collect()
    }

    fn next_frame(&mut self) -> Option<f32> {
        if self.frames_left == 0 {
            return None;
        }
        self.frames_left -= 1;
        Some(self.frame_time)
    }
}

/// Main engine struct
pub struct Engine {
    /// Shared subsystems
    pub services: Services,
    scenes: SceneHost,
    clock: FrameClock,
    running: bool,
}

impl Engine {
    /// Create an engine drawing through `backend` and simulating with `physics`
    pub fn new(
        config: EngineConfig,
        backend: Box<dyn GraphicsBackend>,
        physics: Box<dyn PhysicsWorld>,
    ) -> Result<Self, EngineError> {
        log::info!("Initializing engine...");
        let clock = FrameClock::new(config.frame.max_delta_time);
        let services = Services::new(config, backend, physics)
            .map_err(|e| EngineError::InitializationFailed(format!("Batch renderer: {}", e)))?;
        Ok(Self {
            services,
            scenes: SceneHost::new(),
            clock,
            running: true,
        })
    }

    /// Engine on a recording backend and the built-in kinematic world
    pub fn headless(config: EngineConfig) -> Result<Self, EngineError> {
        let backend = HeadlessBackend::new(config.window.width, config.window.height);
        let physics = KinematicWorld::new(config.physics.gravity);
        Self::new(config, Box::new(backend), Box::new(physics))
    }

    /// Make `scene` current and start it
    ///
    /// Returns the terminated previous scene; dropping it releases its world.
    pub fn change_scene(&mut self, scene: Scene) -> Option<Scene> {
        log::info!("Changing scene to '{}'", scene.name());
        self.scenes.replace_scene(scene, &mut self.services)
    }

    /// Running scene
    pub fn current_scene(&self) -> Option<&Scene> {
        self.scenes.current()
    }

    /// Mutable running scene
    pub fn current_scene_mut(&mut self) -> Option<&mut Scene> {
        self.scenes.current_mut()
    }

    /// Run the update phase of one frame
    pub fn update<A: Application + ?Sized>(&mut self, app: &mut A, raw_delta: f32) -> Result<(), EngineError> {
        let dt = self.clock.tick(raw_delta);
        self.services.input.update();

        app.update(self, dt)
            .map_err(|e| EngineError::ApplicationError(format!("App update: {}", e)))?;

        let next = self
            .scenes
            .current_mut()
            .and_then(|scene| scene.on_update(dt, &mut self.services));
        if let Some(next) = next {
            self.change_scene(next);
        }

        let physics = self.services.config.physics;
        self.services.physics.step(
            dt,
            physics.velocity_iterations,
            physics.position_iterations,
            &mut self.services.contacts,
        );
        self.services.camera.update();
        Ok(())
    }

    /// Run the draw phase of one frame
    pub fn draw<A: Application + ?Sized>(&mut self, app: &mut A) -> Result<(), EngineError> {
        let background = self.scenes.current().map_or(Rgba8::BLACK, |scene| scene.background);
        self.services.backend.clear(background);

        app.draw(self)
            .map_err(|e| EngineError::ApplicationError(format!("App draw: {}", e)))?;

        if let Some(scene) = self.scenes.current_mut() {
            scene.on_draw(&mut self.services);
        }

        let services = &mut self.services;
        services.camera.update();
        services.sprites.render(services.backend.as_mut(), &services.camera)?;
        services.shapes.render(services.backend.as_mut(), &services.camera)?;
        Ok(())
    }

    /// Run frames from `platform` until it stops or [`quit`](Self::quit) is called
    pub fn run<A: Application + ?Sized>(&mut self, app: &mut A, platform: &mut dyn Platform) -> Result<(), EngineError> {
        app.initialize(self)
            .map_err(|e| EngineError::ApplicationError(format!("App initialization: {}", e)))?;

        log::info!("Starting main loop...");
        while self.running {
            for event in platform.poll_events() {
                app.handle_event(self, event)
                    .map_err(|e| EngineError::ApplicationError(format!("App event: {}", e)))?;
            }
            if !self.running {
                break;
            }
            let Some(raw_delta) = platform.next_frame() else {
                break;
            };
            self.update(app, raw_delta)?;
            self.draw(app)?;
        }

        app.cleanup(self);
        if let Some(scene) = self.scenes.take() {
            log::debug!("Released scene '{}'", scene.name());
        }
        log::info!("Engine shutdown complete after {} frames", self.clock.frame_count());
        Ok(())
    }

    /// Apply a platform event to input state and the viewport
    pub fn handle_event(&mut self, event: &AppEvent) {
        let services = &mut self.services;
        match *event {
            AppEvent::KeyInput { key, pressed } => services.input.handle_key(key, pressed),
            AppEvent::MouseButton { button, pressed } => services.input.handle_mouse_button(button, pressed),
            AppEvent::PointerMoved { x, y } => services.input.handle_pointer_moved(x, y),
            AppEvent::TouchStart { id, x, y } => services.input.handle_touch_start(id, x, y),
            AppEvent::TouchMoved { id, x, y } => services.input.handle_touch_moved(id, x, y),
            AppEvent::TouchEnd { id } => services.input.handle_touch_end(id),
            AppEvent::Resized { width, height } => {
                services.backend.resize(width, height);
                let viewport = services.backend.viewport();
                services.camera.init(viewport);
                services.input.set_canvas_height(viewport.y);
                log::debug!("Viewport resized to {}x{}", width, height);
            }
            AppEvent::CloseRequested => self.quit(),
        }
    }

    /// Request engine shutdown
    pub fn quit(&mut self) {
        log::info!("Engine shutdown requested");
        self.running = false;
    }

    /// Whether the frame loop keeps going
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Frame timing
    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }
}

/// Engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Initialization error
    #[error("Engine initialization failed: {0}")]
    InitializationFailed(String),

    /// Rendering error
    #[error("Rendering error: {0}")]
    Render(#[from] RenderError),

    /// Asset system error
    #[error("Asset system error: {0}")]
    Asset(#[from] AssetError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Application error
    #[error("Application error: {0}")]
    ApplicationError(String),
}
