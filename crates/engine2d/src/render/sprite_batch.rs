//! Sprite batching
//!
//! Render systems submit textured quads ("glyphs") during the draw phase.
//! At render time the glyphs are expanded into a flat triangle list and
//! grouped into draw calls by texture *adjacency*: a new batch starts
//! whenever a glyph's texture differs from the glyph submitted right before
//! it. Nothing is sorted, so submission order is exactly draw order, and two
//! runs of the same texture separated by another texture stay two batches.
//! Submit same-texture sprites contiguously to keep the draw-call count low.

use crate::foundation::math::{rotate_about, Vec2};
use crate::render::backend::{BufferHandle, GraphicsBackend};
use crate::render::shader::{ShaderProgram, SPRITE_SHADER};
use crate::render::{Camera2D, RenderError, Rgba8, Texture2D, TextureId, Vertex};

/// Vertices emitted per glyph (two triangles)
pub const VERTICES_PER_GLYPH: usize = 6;

/// One textured quad awaiting batching
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glyph {
    /// Bottom-left corner
    pub bottom_left: Vertex,
    /// Top-left corner
    pub top_left: Vertex,
    /// Top-right corner
    pub top_right: Vertex,
    /// Bottom-right corner
    pub bottom_right: Vertex,
    /// Texture sampled by the quad
    pub texture: TextureId,
}

impl Glyph {
    /// Axis-aligned quad centered on `center`
    ///
    /// `uv1` is the top-left and `uv2` the bottom-right texture coordinate.
    pub fn new(center: Vec2, dimensions: Vec2, uv1: Vec2, uv2: Vec2, texture: TextureId, tint: Rgba8) -> Self {
        Self::rotated(center, dimensions, uv1, uv2, texture, tint, 0.0)
    }

    /// Quad centered on `center`, rotated by `degrees` around it
    pub fn rotated(center: Vec2, dimensions: Vec2, uv1: Vec2, uv2: Vec2, texture: TextureId, tint: Rgba8, degrees: f32) -> Self {
        let half = dimensions * 0.5;
        let corner = |offset: Vec2| {
            let point = center + offset;
            if degrees == 0.0 {
                point
            } else {
                rotate_about(point, degrees, center)
            }
        };

        Self {
            bottom_left: Vertex::new(corner(-half), Vec2::new(uv1.x, uv2.y), tint),
            top_left: Vertex::new(corner(Vec2::new(-half.x, half.y)), uv1, tint),
            top_right: Vertex::new(corner(half), Vec2::new(uv2.x, uv1.y), tint),
            bottom_right: Vertex::new(corner(Vec2::new(half.x, -half.y)), uv2, tint),
            texture,
        }
    }

    /// The six vertices of the quad's two triangles
    pub fn triangles(&self) -> [Vertex; VERTICES_PER_GLYPH] {
        [
            self.bottom_left,
            self.top_right,
            self.bottom_right,
            self.bottom_left,
            self.top_right,
            self.top_left,
        ]
    }
}

/// A contiguous vertex range drawn with one texture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderBatch {
    /// First vertex of the range
    pub offset: usize,
    /// Number of vertices in the range
    pub vertex_count: usize,
    /// Texture bound for the draw call
    pub texture: TextureId,
}

impl RenderBatch {
    /// Number of quads covered by the batch
    pub fn quad_count(&self) -> usize {
        self.vertex_count / VERTICES_PER_GLYPH
    }
}

/// Per-frame textured quad batcher
#[derive(Debug)]
pub struct SpriteBatch {
    glyphs: Vec<Glyph>,
    vertices: Vec<Vertex>,
    batches: Vec<RenderBatch>,
    buffer: BufferHandle,
    shader: ShaderProgram,
}

impl SpriteBatch {
    /// Create the batch's buffer and program on `backend`
    pub fn new(backend: &mut dyn GraphicsBackend) -> Result<Self, RenderError> {
        let buffer = backend.create_vertex_buffer()?;
        let shader = ShaderProgram::from_combined(backend, SPRITE_SHADER)?;
        Ok(Self {
            glyphs: Vec::new(),
            vertices: Vec::new(),
            batches: Vec::new(),
            buffer,
            shader,
        })
    }

    /// Queue a prebuilt glyph
    pub fn push_glyph(&mut self, glyph: Glyph) {
        self.glyphs.push(glyph);
    }

    /// Sprite of `dimensions` centered on `center`
    pub fn draw_sprite(&mut self, center: Vec2, dimensions: Vec2, uv1: Vec2, uv2: Vec2, texture: &Texture2D, tint: Rgba8) {
        self.push_glyph(Glyph::new(center, dimensions, uv1, uv2, texture.id, tint));
    }

    /// Sprite at the texture's pixel size centered on `center`
    pub fn draw_sprite_origin(&mut self, center: Vec2, uv1: Vec2, uv2: Vec2, texture: &Texture2D, tint: Rgba8) {
        self.draw_sprite(center, texture.size(), uv1, uv2, texture, tint);
    }

    /// Sprite at the texture's pixel size times `scale`, centered on `center`
    pub fn draw_sprite_origin_scaled(&mut self, center: Vec2, uv1: Vec2, uv2: Vec2, scale: f32, texture: &Texture2D, tint: Rgba8) {
        self.draw_sprite(center, texture.size() * scale, uv1, uv2, texture, tint);
    }

    /// Sprite whose bottom-left corner sits at `position`
    pub fn draw_sprite_bottom_left(&mut self, position: Vec2, dimensions: Vec2, uv1: Vec2, uv2: Vec2, texture: &Texture2D, tint: Rgba8) {
        self.draw_sprite(position + dimensions * 0.5, dimensions, uv1, uv2, texture, tint);
    }

    /// Sprite whose bottom-right corner sits at `position`
    pub fn draw_sprite_bottom_right(&mut self, position: Vec2, dimensions: Vec2, uv1: Vec2, uv2: Vec2, texture: &Texture2D, tint: Rgba8) {
        let center = position + Vec2::new(-dimensions.x * 0.5, dimensions.y * 0.5);
        self.draw_sprite(center, dimensions, uv1, uv2, texture, tint);
    }

    /// Texture-sized sprite whose bottom-left corner sits at `position`
    pub fn draw_sprite_bottom_left_origin(&mut self, position: Vec2, uv1: Vec2, uv2: Vec2, texture: &Texture2D, tint: Rgba8) {
        self.draw_sprite_bottom_left(position, texture.size(), uv1, uv2, texture, tint);
    }

    /// Sprite of `dimensions` centered on `center`, rotated by `degrees`
    pub fn draw_sprite_rotated(&mut self, center: Vec2, dimensions: Vec2, uv1: Vec2, uv2: Vec2, texture: &Texture2D, tint: Rgba8, degrees: f32) {
        self.push_glyph(Glyph::rotated(center, dimensions, uv1, uv2, texture.id, tint, degrees));
    }

    /// Texture-sized sprite centered on `center`, rotated by `degrees`
    pub fn draw_sprite_origin_rotated(&mut self, center: Vec2, uv1: Vec2, uv2: Vec2, texture: &Texture2D, tint: Rgba8, degrees: f32) {
        self.draw_sprite_rotated(center, texture.size(), uv1, uv2, texture, tint, degrees);
    }

    /// Scaled texture-sized sprite centered on `center`, rotated by `degrees`
    pub fn draw_sprite_origin_scaled_rotated(
        &mut self,
        center: Vec2,
        uv1: Vec2,
        uv2: Vec2,
        scale: f32,
        texture: &Texture2D,
        tint: Rgba8,
        degrees: f32,
    ) {
        self.draw_sprite_rotated(center, texture.size() * scale, uv1, uv2, texture, tint, degrees);
    }

    /// Expand queued glyphs into the vertex list and compile batches
    pub fn finalize(&mut self) {
        self.vertices.clear();
        self.batches.clear();
        self.vertices.reserve(self.glyphs.len() * VERTICES_PER_GLYPH);

        let mut previous: Option<TextureId> = None;
        for glyph in &self.glyphs {
            if previous == Some(glyph.texture) {
                if let Some(batch) = self.batches.last_mut() {
                    batch.vertex_count += VERTICES_PER_GLYPH;
                }
            } else {
                self.batches.push(RenderBatch {
                    offset: self.vertices.len(),
                    vertex_count: VERTICES_PER_GLYPH,
                    texture: glyph.texture,
                });
            }
            previous = Some(glyph.texture);
            self.vertices.extend_from_slice(&glyph.triangles());
        }
    }

    /// Finalize, draw one call per batch, then drop all per-frame state
    pub fn render(&mut self, backend: &mut dyn GraphicsBackend, camera: &Camera2D) -> Result<(), RenderError> {
        self.finalize();
        let result = self.submit(backend, camera);
        self.clear();
        result
    }

    fn submit(&self, backend: &mut dyn GraphicsBackend, camera: &Camera2D) -> Result<(), RenderError> {
        if self.batches.is_empty() {
            return Ok(());
        }

        backend.upload_vertices(self.buffer, bytemuck::cast_slice(&self.vertices))?;
        backend.use_program(self.shader.handle());
        backend.set_view_matrix(self.shader.handle(), camera.view_matrix());

        for batch in &self.batches {
            backend.bind_texture(batch.texture);
            backend.draw_arrays(self.buffer, batch.offset, batch.vertex_count);
        }

        log::trace!("Sprite batch: {} glyphs in {} draw calls", self.glyphs.len(), self.batches.len());
        Ok(())
    }

    /// Drop queued glyphs, vertices and batches
    pub fn clear(&mut self) {
        self.glyphs.clear();
        self.vertices.clear();
        self.batches.clear();
    }

    /// Glyphs queued this frame
    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    /// Batches compiled by the last [`finalize`](Self::finalize)
    pub fn batches(&self) -> &[RenderBatch] {
        &self.batches
    }

    /// Vertices expanded by the last [`finalize`](Self::finalize)
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Backend buffer the batch uploads into
    pub fn buffer(&self) -> BufferHandle {
        self.buffer
    }

    /// Program used for drawing
    pub fn shader(&self) -> &ShaderProgram {
        &self.shader
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CameraConfig;
    use crate::render::{DrawCommand, HeadlessBackend};
    use approx::assert_relative_eq;

    fn texture(id: u64) -> Texture2D {
        Texture2D { id: TextureId(id), width: 16, height: 16 }
    }

    fn setup() -> (HeadlessBackend, SpriteBatch, Camera2D) {
        let mut backend = HeadlessBackend::new(640, 480);
        let batch = SpriteBatch::new(&mut backend).unwrap();
        let camera = Camera2D::new(Vec2::new(640.0, 480.0), CameraConfig::default());
        (backend, batch, camera)
    }

    fn submit(batch: &mut SpriteBatch, textures: &[Texture2D]) {
        for (i, tex) in textures.iter().enumerate() {
            batch.draw_sprite_origin(Vec2::new(i as f32 * 20.0, 0.0), Vec2::zeros(), Vec2::new(1.0, 1.0), tex, Rgba8::WHITE);
        }
    }

    #[test]
    fn test_glyph_corner_layout() {
        let glyph = Glyph::new(Vec2::new(10.0, 20.0), Vec2::new(4.0, 2.0), Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0), TextureId(1), Rgba8::WHITE);
        assert_eq!(glyph.bottom_left.position, [8.0, 19.0]);
        assert_eq!(glyph.top_right.position, [12.0, 21.0]);
        assert_eq!(glyph.bottom_left.uv, [0.0, 1.0]);
        assert_eq!(glyph.top_left.uv, [0.0, 0.0]);
        assert_eq!(glyph.top_right.uv, [1.0, 0.0]);
        assert_eq!(glyph.bottom_right.uv, [1.0, 1.0]);
    }

    #[test]
    fn test_glyph_triangle_order() {
        let glyph = Glyph::new(Vec2::zeros(), Vec2::new(2.0, 2.0), Vec2::zeros(), Vec2::new(1.0, 1.0), TextureId(1), Rgba8::WHITE);
        let tris = glyph.triangles();
        assert_eq!(tris[0], glyph.bottom_left);
        assert_eq!(tris[1], glyph.top_right);
        assert_eq!(tris[2], glyph.bottom_right);
        assert_eq!(tris[3], glyph.bottom_left);
        assert_eq!(tris[4], glyph.top_right);
        assert_eq!(tris[5], glyph.top_left);
    }

    #[test]
    fn test_rotated_glyph_turns_about_center() {
        let glyph = Glyph::rotated(Vec2::new(5.0, 5.0), Vec2::new(2.0, 2.0), Vec2::zeros(), Vec2::new(1.0, 1.0), TextureId(1), Rgba8::WHITE, 90.0);
        let bl = glyph.bottom_left.position();
        assert_relative_eq!(bl.x, 6.0, epsilon = 1e-5);
        assert_relative_eq!(bl.y, 4.0, epsilon = 1e-5);
    }

    #[test]
    fn test_bottom_anchored_variants() {
        let (_, mut batch, _) = setup();
        let tex = texture(1);
        batch.draw_sprite_bottom_left(Vec2::zeros(), Vec2::new(4.0, 2.0), Vec2::zeros(), Vec2::new(1.0, 1.0), &tex, Rgba8::WHITE);
        batch.draw_sprite_bottom_right(Vec2::zeros(), Vec2::new(4.0, 2.0), Vec2::zeros(), Vec2::new(1.0, 1.0), &tex, Rgba8::WHITE);
        batch.finalize();

        let verts = batch.vertices();
        assert_eq!(verts[0].position, [0.0, 0.0]);
        assert_eq!(verts[6 + 1].position, [0.0, 2.0]);
    }

    #[test]
    fn test_adjacent_textures_group_into_batches() {
        let (_, mut batch, _) = setup();
        let (a, b) = (texture(1), texture(2));
        submit(&mut batch, &[a, a, b, b, a]);
        batch.finalize();

        let batches = batch.batches();
        assert_eq!(batches.len(), 3);
        assert_eq!(batches.iter().map(RenderBatch::quad_count).collect::<Vec<_>>(), vec![2, 2, 1]);
        assert_eq!(batches.iter().map(|b| b.offset).collect::<Vec<_>>(), vec![0, 12, 24]);
        assert_eq!(batches[2].texture, a.id);
        assert_eq!(batch.vertices().len(), 30);
    }

    #[test]
    fn test_no_merge_across_runs() {
        let (_, mut batch, _) = setup();
        let (a, b, c) = (texture(1), texture(2), texture(3));
        submit(&mut batch, &[a, b, a, c, c, c, a]);
        batch.finalize();
        assert_eq!(batch.batches().len(), 5);
        assert_eq!(batch.batches()[3].quad_count(), 3);
    }

    #[test]
    fn test_render_issues_one_draw_per_batch_in_order() {
        let (mut backend, mut batch, mut camera) = setup();
        let recorder = backend.recorder();
        camera.update();
        let (a, b) = (texture(1), texture(2));
        submit(&mut batch, &[a, a, b, b, a]);

        batch.render(&mut backend, &camera).unwrap();

        let binds: Vec<_> = recorder
            .commands()
            .into_iter()
            .filter_map(|c| match c {
                DrawCommand::BindTexture(id) => Some(id),
                _ => None,
            })
            .collect();
        assert_eq!(binds, vec![a.id, b.id, a.id]);
        assert_eq!(recorder.draw_call_count(), 3);
        assert_eq!(recorder.vertices(batch.buffer()).len(), 30);
    }

    #[test]
    fn test_render_resets_frame_state() {
        let (mut backend, mut batch, camera) = setup();
        submit(&mut batch, &[texture(1), texture(2)]);
        batch.render(&mut backend, &camera).unwrap();

        assert_eq!(batch.glyph_count(), 0);
        assert!(batch.batches().is_empty());
        assert!(batch.vertices().is_empty());
    }

    #[test]
    fn test_empty_render_issues_no_draw_calls() {
        let (mut backend, mut batch, camera) = setup();
        let recorder = backend.recorder();
        batch.render(&mut backend, &camera).unwrap();
        assert_eq!(recorder.draw_call_count(), 0);
        assert!(recorder.commands().is_empty());
    }
}
