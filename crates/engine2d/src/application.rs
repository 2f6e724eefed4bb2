//! Application trait and lifecycle management

use thiserror::Error;

use crate::assets::AssetError;
use crate::engine::{Engine, EngineError};
use crate::input::{KeyCode, MouseButton};
use crate::render::RenderError;

/// Application lifecycle trait
///
/// Implement this trait to build a game on the engine. Scenes carry most of
/// the per-frame work; the application hooks run around them.
pub trait Application {
    /// Initialize the application
    ///
    /// Called once before the first frame. Load assets and switch to the
    /// first scene here.
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError>;

    /// Update the application
    ///
    /// Called every frame after input is snapshotted and before the scene's
    /// update systems run.
    fn update(&mut self, _engine: &mut Engine, _delta_time: f32) -> Result<(), AppError> {
        Ok(())
    }

    /// Queue application-level geometry
    ///
    /// Called every frame after the clear and before the scene's render
    /// systems.
    fn draw(&mut self, _engine: &mut Engine) -> Result<(), AppError> {
        Ok(())
    }

    /// Handle a platform event
    fn handle_event(&mut self, engine: &mut Engine, event: AppEvent) -> Result<(), AppError> {
        engine.handle_event(&event);
        Ok(())
    }

    /// Cleanup the application
    ///
    /// Called once after the frame loop stops.
    fn cleanup(&mut self, _engine: &mut Engine) {}
}

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Engine error propagated to application level
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Asset loading error
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    /// Rendering setup error
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Custom application error
    #[error("Application error: {0}")]
    Custom(String),
}

/// Events delivered by the platform
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Key input event
    KeyInput {
        /// The key that was pressed/released
        key: KeyCode,
        /// Whether the key was pressed (true) or released (false)
        pressed: bool,
    },

    /// Pointer button event
    MouseButton {
        /// The button that was pressed/released
        button: MouseButton,
        /// Whether the button was pressed (true) or released (false)
        pressed: bool,
    },

    /// Pointer movement in window coordinates (origin top-left)
    PointerMoved {
        /// New X coordinate
        x: f32,
        /// New Y coordinate
        y: f32,
    },

    /// A touch began
    TouchStart {
        /// Touch identifier
        id: u64,
        /// X coordinate
        x: f32,
        /// Y coordinate
        y: f32,
    },

    /// A touch moved
    TouchMoved {
        /// Touch identifier
        id: u64,
        /// X coordinate
        x: f32,
        /// Y coordinate
        y: f32,
    },

    /// A touch ended
    TouchEnd {
        /// Touch identifier
        id: u64,
    },

    /// Canvas was resized
    Resized {
        /// New canvas width
        width: u32,
        /// New canvas height
        height: u32,
    },

    /// Close requested
    CloseRequested,
}
