//! Graphics collaborator contract
//!
//! The batchers talk to the GPU through this immediate-mode interface. A
//! platform crate implements it over WebGL/OpenGL; [`super::HeadlessBackend`]
//! implements it by recording commands.

use crate::foundation::math::{Mat4, Vec2};
use crate::render::{Rgba8, RenderError, TextureFilter, TextureId};

/// Result type for backend operations
pub type BackendResult<T> = Result<T, RenderError>;

/// Handle to a vertex (and index) buffer pair owned by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferHandle(pub u64);

/// Handle to a linked shader program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderHandle(pub u64);

/// Primitive topology for indexed draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// Independent triangles
    Triangles,
    /// Independent line segments
    Lines,
}

/// A shader program that failed to compile or link
///
/// The backend still hands out a program handle so rendering can continue
/// with degraded output.
#[derive(Debug, Clone, thiserror::Error)]
#[error("shader program {handle:?} failed to build: {log}")]
pub struct ShaderError {
    /// Program handle, usable even though the build failed
    pub handle: ShaderHandle,
    /// Compiler or linker log
    pub log: String,
}

/// Immediate-mode graphics API used by the batchers and the frame pump
pub trait GraphicsBackend {
    /// Current viewport size in pixels
    fn viewport(&self) -> Vec2;

    /// Notify the backend that the drawable area changed size
    fn resize(&mut self, width: u32, height: u32);

    /// Allocate a vertex buffer with an attached index buffer
    fn create_vertex_buffer(&mut self) -> BackendResult<BufferHandle>;

    /// Replace the vertex data of `buffer` with raw [`super::Vertex`] bytes
    fn upload_vertices(&mut self, buffer: BufferHandle, bytes: &[u8]) -> BackendResult<()>;

    /// Replace the index data of `buffer`
    fn upload_indices(&mut self, buffer: BufferHandle, indices: &[u32]) -> BackendResult<()>;

    /// Compile and link a program from vertex and fragment sources
    fn compile_program(&mut self, vertex_source: &str, fragment_source: &str) -> Result<ShaderHandle, ShaderError>;

    /// Make `program` current
    fn use_program(&mut self, program: ShaderHandle);

    /// Upload the view matrix uniform of `program`
    fn set_view_matrix(&mut self, program: ShaderHandle, view: &Mat4);

    /// Upload tightly packed RGBA8 pixels as a new texture
    fn create_texture(&mut self, width: u32, height: u32, rgba: &[u8], filter: TextureFilter) -> BackendResult<TextureId>;

    /// Bind `texture` to the sampler slot
    fn bind_texture(&mut self, texture: TextureId);

    /// Draw `count` vertices of `buffer` as triangles starting at `first`
    fn draw_arrays(&mut self, buffer: BufferHandle, first: usize, count: usize);

    /// Draw `count` indices of `buffer`
    fn draw_indexed(&mut self, buffer: BufferHandle, primitive: Primitive, count: usize);

    /// Clear the color target
    fn clear(&mut self, color: Rgba8);
}
