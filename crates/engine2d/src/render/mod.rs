//! Batched 2D rendering
//!
//! Render systems queue sprites into a [`SpriteBatch`] and lines/shapes into
//! a [`ShapeBatch`] during the draw phase. At the end of the frame both
//! batches are compiled into draw calls against a [`GraphicsBackend`] using
//! the [`Camera2D`] view transform, then emptied.

pub mod backend;
pub mod camera;
pub mod headless;
pub mod shader;
pub mod shape_batch;
pub mod sprite_batch;
pub mod texture;
pub mod vertex;

pub use backend::{BackendResult, BufferHandle, GraphicsBackend, Primitive, ShaderError, ShaderHandle};
pub use camera::Camera2D;
pub use headless::{DrawCommand, HeadlessBackend, Recorder};
pub use shader::{ShaderProgram, ShaderSource};
pub use shape_batch::ShapeBatch;
pub use sprite_batch::{Glyph, RenderBatch, SpriteBatch};
pub use texture::{Texture2D, TextureFilter, TextureId, TileSet};
pub use vertex::{Rgba8, Vertex};

/// Rendering errors
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Backend reported a failure
    #[error("Backend error: {0}")]
    Backend(String),

    /// Buffer upload rejected
    #[error("Upload failed: {0}")]
    Upload(String),

    /// Texture data did not match its dimensions
    #[error("Invalid texture: {0}")]
    InvalidTexture(String),

    /// Combined shader source could not be split into stages
    #[error("Shader source error: {0}")]
    ShaderSource(String),
}
