//! Shader sources and program creation

use crate::render::backend::{GraphicsBackend, ShaderHandle};
use crate::render::RenderError;

/// Combined source of the sprite batch program
pub const SPRITE_SHADER: &str = include_str!("../../shaders/sprite.glsl");

/// Combined source of the shape batch program
pub const SHAPE_SHADER: &str = include_str!("../../shaders/shape.glsl");

/// Vertex and fragment stages of one program
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderSource {
    /// Vertex stage
    pub vertex: String,
    /// Fragment stage
    pub fragment: String,
}

impl ShaderSource {
    /// Split a combined source on its `#shader vertex` / `#shader fragment` markers
    pub fn parse(source: &str) -> Result<Self, RenderError> {
        enum Stage {
            Vertex,
            Fragment,
        }

        let mut parsed = Self::default();
        let mut stage = None;

        for (number, line) in source.lines().enumerate() {
            if line.contains("#shader") {
                if line.contains("vertex") {
                    stage = Some(Stage::Vertex);
                } else if line.contains("fragment") {
                    stage = Some(Stage::Fragment);
                } else {
                    return Err(RenderError::ShaderSource(format!(
                        "line {}: unknown stage marker '{}'",
                        number + 1,
                        line.trim()
                    )));
                }
                continue;
            }

            let target = match stage {
                Some(Stage::Vertex) => &mut parsed.vertex,
                Some(Stage::Fragment) => &mut parsed.fragment,
                None if line.trim().is_empty() => continue,
                None => {
                    return Err(RenderError::ShaderSource(format!(
                        "line {}: source must start with #shader vertex/fragment",
                        number + 1
                    )))
                }
            };
            target.push_str(line);
            target.push('\n');
        }

        Ok(parsed)
    }
}

/// A program built on the backend
///
/// A program that failed to link is kept and still used; the failure only
/// shows up as broken output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShaderProgram {
    handle: ShaderHandle,
    linked: bool,
}

impl ShaderProgram {
    /// Parse `combined_source` and build it on `backend`
    pub fn from_combined(backend: &mut dyn GraphicsBackend, combined_source: &str) -> Result<Self, RenderError> {
        let source = ShaderSource::parse(combined_source)?;
        Ok(Self::build(backend, &source))
    }

    /// Build a program, downgrading compile and link failures to a warning
    pub fn build(backend: &mut dyn GraphicsBackend, source: &ShaderSource) -> Self {
        match backend.compile_program(&source.vertex, &source.fragment) {
            Ok(handle) => Self { handle, linked: true },
            Err(e) => {
                log::warn!("{e}");
                Self {
                    handle: e.handle,
                    linked: false,
                }
            }
        }
    }

    /// Backend handle
    pub fn handle(&self) -> ShaderHandle {
        self.handle
    }

    /// Whether the program linked successfully
    pub fn is_linked(&self) -> bool {
        self.linked
    }
}
