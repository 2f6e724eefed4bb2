//! Recording graphics backend
//!
//! Used for headless runs and tests. Every call is appended to a shared
//! [`Recording`] that stays inspectable through a [`Recorder`] after the
//! backend itself has been boxed and handed to the engine. A clear starts
//! a new frame, so the command list only ever holds the current frame.

use std::cell::{Ref, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::foundation::math::{Mat4, Vec2};
use crate::render::backend::{BackendResult, BufferHandle, GraphicsBackend, Primitive, ShaderError, ShaderHandle};
use crate::render::{Rgba8, RenderError, TextureFilter, TextureId, Vertex};

/// A recorded backend call that affects output
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Color target cleared
    Clear(Rgba8),
    /// Program made current
    UseProgram(ShaderHandle),
    /// View matrix uploaded
    SetViewMatrix(ShaderHandle, Mat4),
    /// Texture bound
    BindTexture(TextureId),
    /// Non-indexed triangle draw
    DrawArrays {
        /// Source buffer
        buffer: BufferHandle,
        /// First vertex
        first: usize,
        /// Vertex count
        count: usize,
    },
    /// Indexed draw
    DrawIndexed {
        /// Source buffer
        buffer: BufferHandle,
        /// Topology
        primitive: Primitive,
        /// Index count
        count: usize,
    },
}

/// Metadata of an uploaded texture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureInfo {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Sampling filter
    pub filter: TextureFilter,
}

/// Everything the headless backend has seen
#[derive(Debug, Default)]
pub struct Recording {
    /// Output-affecting calls of the current frame, in order
    pub commands: Vec<DrawCommand>,
    /// Clears seen so far
    pub frames: u64,
    /// Latest vertex bytes per buffer
    pub vertex_data: HashMap<BufferHandle, Vec<u8>>,
    /// Latest indices per buffer
    pub index_data: HashMap<BufferHandle, Vec<u32>>,
    /// Uploaded textures
    pub textures: HashMap<TextureId, TextureInfo>,
}

/// Shared read access to a headless backend's recording
#[derive(Debug, Clone)]
pub struct Recorder(Rc<RefCell<Recording>>);

impl Recorder {
    /// Borrow the full recording
    pub fn recording(&self) -> Ref<'_, Recording> {
        self.0.borrow()
    }

    /// Copy of the recorded commands
    pub fn commands(&self) -> Vec<DrawCommand> {
        self.0.borrow().commands.clone()
    }

    /// Number of recorded draw calls (array and indexed)
    pub fn draw_call_count(&self) -> usize {
        self.0
            .borrow()
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::DrawArrays { .. } | DrawCommand::DrawIndexed { .. }))
            .count()
    }

    /// Forget recorded commands, keeping buffers and textures
    pub fn clear_commands(&self) {
        self.0.borrow_mut().commands.clear();
    }

    /// Vertices last uploaded to `buffer`
    pub fn vertices(&self, buffer: BufferHandle) -> Vec<Vertex> {
        self.0
            .borrow()
            .vertex_data
            .get(&buffer)
            .map(|bytes| bytes.chunks_exact(Vertex::SIZE).map(bytemuck::pod_read_unaligned).collect())
            .unwrap_or_default()
    }

    /// Indices last uploaded to `buffer`
    pub fn indices(&self, buffer: BufferHandle) -> Vec<u32> {
        self.0.borrow().index_data.get(&buffer).cloned().unwrap_or_default()
    }

    /// Metadata of an uploaded texture
    pub fn texture(&self, id: TextureId) -> Option<TextureInfo> {
        self.0.borrow().textures.get(&id).copied()
    }
}

/// Graphics backend that records instead of rendering
#[derive(Debug)]
pub struct HeadlessBackend {
    viewport: Vec2,
    next_handle: u64,
    fail_shader_builds: bool,
    recording: Rc<RefCell<Recording>>,
}

impl HeadlessBackend {
    /// Create a backend with a `width` x `height` viewport
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            viewport: Vec2::new(width as f32, height as f32),
            next_handle: 1,
            fail_shader_builds: false,
            recording: Rc::new(RefCell::new(Recording::default())),
        }
    }

    /// Make every program build report a link failure
    #[must_use]
    pub fn with_failing_shaders(mut self) -> Self {
        self.fail_shader_builds = true;
        self
    }

    /// Handle for inspecting what this backend recorded
    pub fn recorder(&self) -> Recorder {
        Recorder(Rc::clone(&self.recording))
    }

    fn next_handle(&mut self) -> u64 {
        let handle = self.next_handle;
        self.next_handle += 1;
        handle
    }

    fn record(&self, command: DrawCommand) {
        self.recording.borrow_mut().commands.push(command);
    }
}

impl GraphicsBackend for HeadlessBackend {
    fn viewport(&self) -> Vec2 {
        self.viewport
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.viewport = Vec2::new(width as f32, height as f32);
    }

    fn create_vertex_buffer(&mut self) -> BackendResult<BufferHandle> {
        Ok(BufferHandle(self.next_handle()))
    }

    fn upload_vertices(&mut self, buffer: BufferHandle, bytes: &[u8]) -> BackendResult<()> {
        if bytes.len() % Vertex::SIZE != 0 {
            return Err(RenderError::Upload(format!(
                "{} bytes is not a whole number of {}-byte vertices",
                bytes.len(),
                Vertex::SIZE
            )));
        }
        self.recording.borrow_mut().vertex_data.insert(buffer, bytes.to_vec());
        Ok(())
    }

    fn upload_indices(&mut self, buffer: BufferHandle, indices: &[u32]) -> BackendResult<()> {
        self.recording.borrow_mut().index_data.insert(buffer, indices.to_vec());
        Ok(())
    }

    fn compile_program(&mut self, vertex_source: &str, fragment_source: &str) -> Result<ShaderHandle, ShaderError> {
        let handle = ShaderHandle(self.next_handle());
        if self.fail_shader_builds || vertex_source.trim().is_empty() || fragment_source.trim().is_empty() {
            return Err(ShaderError {
                handle,
                log: "headless link failure".to_string(),
            });
        }
        Ok(handle)
    }

    fn use_program(&mut self, program: ShaderHandle) {
        self.record(DrawCommand::UseProgram(program));
    }

    fn set_view_matrix(&mut self, program: ShaderHandle, view: &Mat4) {
        self.record(DrawCommand::SetViewMatrix(program, *view));
    }

    fn create_texture(&mut self, width: u32, height: u32, rgba: &[u8], filter: TextureFilter) -> BackendResult<TextureId> {
        let expected = width as usize * height as usize * 4;
        if width == 0 || height == 0 || rgba.len() != expected {
            return Err(RenderError::InvalidTexture(format!(
                "{width}x{height} texture needs {expected} bytes, got {}",
                rgba.len()
            )));
        }
        let id = TextureId(self.next_handle());
        self.recording
            .borrow_mut()
            .textures
            .insert(id, TextureInfo { width, height, filter });
        Ok(id)
    }

    fn bind_texture(&mut self, texture: TextureId) {
        self.record(DrawCommand::BindTexture(texture));
    }

    fn draw_arrays(&mut self, buffer: BufferHandle, first: usize, count: usize) {
        self.record(DrawCommand::DrawArrays { buffer, first, count });
    }

    fn draw_indexed(&mut self, buffer: BufferHandle, primitive: Primitive, count: usize) {
        self.record(DrawCommand::DrawIndexed { buffer, primitive, count });
    }

    fn clear(&mut self, color: Rgba8) {
        let mut recording = self.recording.borrow_mut();
        recording.commands.clear();
        recording.commands.push(DrawCommand::Clear(color));
        recording.frames += 1;
    }
}
