//! Untextured shape batching
//!
//! Lines are emitted as thick quads offset perpendicular to the segment by
//! half the line width. Outlined shapes are built from lines; filled rects
//! are emitted directly. Everything lands in one indexed triangle draw.

use std::f32::consts::TAU;

use crate::fatal;
use crate::foundation::math::{normalize_or_zero, perpendicular, rotate_about, Vec2};
use crate::render::backend::{BufferHandle, GraphicsBackend, Primitive};
use crate::render::shader::{ShaderProgram, SHAPE_SHADER};
use crate::render::{Camera2D, RenderError, Rgba8, Vertex};

/// Segments used to approximate a circle outline
pub const CIRCLE_SEGMENTS: usize = 16;

/// Per-frame line and shape batcher
#[derive(Debug)]
pub struct ShapeBatch {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    line_width: f32,
    buffer: BufferHandle,
    shader: ShaderProgram,
}

impl ShapeBatch {
    /// Create the batch's buffers and program on `backend`
    pub fn new(backend: &mut dyn GraphicsBackend, line_width: f32) -> Result<Self, RenderError> {
        let buffer = backend.create_vertex_buffer()?;
        let shader = ShaderProgram::from_combined(backend, SHAPE_SHADER)?;
        Ok(Self {
            vertices: Vec::new(),
            indices: Vec::new(),
            line_width,
            buffer,
            shader,
        })
    }

    /// Line thickness in world units
    pub fn line_width(&self) -> f32 {
        self.line_width
    }

    /// Change the line thickness for subsequent shapes
    pub fn set_line_width(&mut self, line_width: f32) {
        self.line_width = line_width.max(0.0);
    }

    fn push_quad(&mut self, corners: [Vec2; 4], color: Rgba8) {
        let base = quad_base_index(self.vertices.len());
        self.vertices.extend(corners.iter().map(|&c| Vertex::colored(c, color)));
        self.indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 1, base + 3]);
    }

    /// Thick line from `from` to `to`
    pub fn draw_line(&mut self, from: Vec2, to: Vec2, color: Rgba8) {
        let offset = normalize_or_zero(perpendicular(to - from)) * (self.line_width * 0.5);
        self.push_quad([from - offset, to - offset, from + offset, to + offset], color);
    }

    fn draw_closed_path(&mut self, points: &[Vec2], color: Rgba8) {
        for (i, &point) in points.iter().enumerate() {
            let next = points[(i + 1) % points.len()];
            self.draw_line(point, next, color);
        }
    }

    /// Rect outline centered on `center`
    pub fn draw_rect(&mut self, center: Vec2, dimensions: Vec2, color: Rgba8) {
        self.draw_rect_rotated(center, dimensions, color, 0.0);
    }

    /// Rect outline centered on `center`, rotated by `degrees`
    ///
    /// Edges overshoot by half a line width so the corners close.
    pub fn draw_rect_rotated(&mut self, center: Vec2, dimensions: Vec2, color: Rgba8, degrees: f32) {
        let half = dimensions * 0.5;
        let overshoot = self.line_width * 0.5;
        let edges = [
            (Vec2::new(-half.x - overshoot, half.y), Vec2::new(half.x + overshoot, half.y)),
            (Vec2::new(-half.x - overshoot, -half.y), Vec2::new(half.x + overshoot, -half.y)),
            (Vec2::new(half.x, half.y + overshoot), Vec2::new(half.x, -half.y - overshoot)),
            (Vec2::new(-half.x, half.y + overshoot), Vec2::new(-half.x, -half.y - overshoot)),
        ];

        for (from, to) in edges {
            self.draw_line(
                rotate_about(center + from, degrees, center),
                rotate_about(center + to, degrees, center),
                color,
            );
        }
    }

    /// Triangle outline inscribed in an ellipse of radii `dimensions` around `center`
    pub fn draw_triangle(&mut self, center: Vec2, dimensions: Vec2, color: Rgba8) {
        self.draw_triangle_rotated(center, dimensions, color, 0.0);
    }

    /// Rotated triangle outline
    pub fn draw_triangle_rotated(&mut self, center: Vec2, dimensions: Vec2, color: Rgba8, degrees: f32) {
        let points: [Vec2; 3] = std::array::from_fn(|i| {
            let angle = i as f32 / 3.0 * TAU;
            let point = center + Vec2::new(angle.cos() * dimensions.y, angle.sin() * dimensions.x);
            rotate_about(point, degrees, center)
        });
        self.draw_closed_path(&points, color);
    }

    /// Circle outline
    pub fn draw_circle(&mut self, center: Vec2, radius: f32, color: Rgba8) {
        let points: [Vec2; CIRCLE_SEGMENTS] = std::array::from_fn(|i| {
            let angle = i as f32 / CIRCLE_SEGMENTS as f32 * TAU;
            center + Vec2::new(angle.cos(), angle.sin()) * radius
        });
        self.draw_closed_path(&points, color);
    }

    /// Solid rect centered on `center`
    pub fn draw_fill_rect(&mut self, center: Vec2, dimensions: Vec2, color: Rgba8) {
        self.draw_fill_rect_rotated(center, dimensions, color, 0.0);
    }

    /// Solid rect centered on `center`, rotated by `degrees`
    pub fn draw_fill_rect_rotated(&mut self, center: Vec2, dimensions: Vec2, color: Rgba8, degrees: f32) {
        let half = dimensions * 0.5;
        let corners = [
            center - half,
            center + Vec2::new(-half.x, half.y),
            center + Vec2::new(half.x, -half.y),
            center + half,
        ]
        .map(|corner| rotate_about(corner, degrees, center));
        self.push_quad(corners, color);
    }

    /// Upload, draw everything in one indexed call, then drop per-frame state
    pub fn render(&mut self, backend: &mut dyn GraphicsBackend, camera: &Camera2D) -> Result<(), RenderError> {
        let result = self.submit(backend, camera);
        self.clear();
        result
    }

    fn submit(&self, backend: &mut dyn GraphicsBackend, camera: &Camera2D) -> Result<(), RenderError> {
        if self.indices.is_empty() {
            return Ok(());
        }

        backend.upload_vertices(self.buffer, bytemuck::cast_slice(&self.vertices))?;
        backend.upload_indices(self.buffer, &self.indices)?;
        backend.use_program(self.shader.handle());
        backend.set_view_matrix(self.shader.handle(), camera.view_matrix());
        backend.draw_indexed(self.buffer, Primitive::Triangles, self.indices.len());
        Ok(())
    }

    /// Drop queued geometry
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    /// Vertices queued this frame
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Indices queued this frame
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Backend buffer the batch uploads into
    pub fn buffer(&self) -> BufferHandle {
        self.buffer
    }
}

/// First index of a quad appended after `vertex_count` vertices
fn quad_base_index(vertex_count: usize) -> u32 {
    u32::try_from(vertex_count)
        .ok()
        .filter(|base| base.checked_add(3).is_some())
        .unwrap_or_else(|| fatal!("shape batch exceeded the u32 index range at {} vertices", vertex_count))
}
