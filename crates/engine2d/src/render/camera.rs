//! # 2D Camera
//!
//! Position and zoom over an orthographic projection sized to the viewport.
//! The view transform is recomputed lazily: mutators only set a dirty flag
//! and [`Camera2D::update`] rebuilds the matrix once per frame.
//!
//! ## Coordinate System
//! - Screen space: pixels, origin bottom-left, Y up
//! - World space: the camera position sits at the viewport center
//!
//! The forward map used for the view matrix and the inverse map used for
//! picking are kept as mirror images:
//!
//! ```text
//! screen = scale * (world - position) + viewport / 2
//! world  = (screen - viewport / 2) / scale + position
//! ```

use nalgebra::Vector3;

use crate::config::CameraConfig;
use crate::foundation::math::{ortho_2d, Mat4, Vec2};

/// Orthographic 2D camera
#[derive(Debug, Clone)]
pub struct Camera2D {
    position: Vec2,
    scale: f32,
    viewport: Vec2,
    projection: Mat4,
    view: Mat4,
    dirty: bool,
    limits: CameraConfig,
}

impl Camera2D {
    /// Create a camera for `viewport` with the given zoom limits
    ///
    /// Unusable limits are normalized first, see [`CameraConfig::normalized`].
    pub fn new(viewport: Vec2, limits: CameraConfig) -> Self {
        let mut camera = Self {
            position: Vec2::zeros(),
            scale: 1.0,
            viewport,
            projection: Mat4::identity(),
            view: Mat4::identity(),
            dirty: true,
            limits: limits.normalized(),
        };
        camera.init(viewport);
        camera
    }

    /// Size the projection to `viewport` and reset the view transform
    ///
    /// Position and scale are kept, so this doubles as the resize hook.
    pub fn init(&mut self, viewport: Vec2) {
        self.viewport = viewport;
        self.projection = ortho_2d(viewport.x, viewport.y);
        self.view = Mat4::identity();
        self.dirty = true;
        log::debug!("Camera initialized for {}x{} viewport", viewport.x, viewport.y);
    }

    /// Recompute the view transform if any mutator ran since the last call
    ///
    /// Returns whether a recompute happened.
    pub fn update(&mut self) -> bool {
        if !self.dirty {
            return false;
        }

        let offset = -self.position + self.viewport * 0.5;
        let translation = Mat4::new_translation(&Vector3::new(offset.x, offset.y, 0.0));
        let zoom = Mat4::new_nonuniform_scaling(&Vector3::new(self.scale, self.scale, 1.0));
        self.view = zoom * self.projection * translation;
        self.dirty = false;

        log::trace!("Camera view rebuilt at {:?} scale {}", self.position, self.scale);
        true
    }

    /// Move the camera center to `position`
    pub fn scroll_to(&mut self, position: Vec2) {
        self.position = position;
        self.dirty = true;
    }

    /// Move the camera center by `offset`
    pub fn scroll_by(&mut self, offset: Vec2) {
        self.scroll_to(self.position + offset);
    }

    /// Set the zoom factor
    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
        self.regulate_scale();
    }

    /// Add `increment` to the zoom factor
    pub fn adjust_scale(&mut self, increment: f32) {
        self.scale += increment;
        self.regulate_scale();
    }

    /// Change the zoom by `increment` steps proportional to the current zoom
    pub fn adjust_scale_percentage(&mut self, increment: f32) {
        self.scale += self.limits.scale_step * self.scale * increment;
        self.regulate_scale();
    }

    fn regulate_scale(&mut self) {
        self.scale = self.scale.clamp(self.limits.min_scale, self.limits.max_scale);
        self.dirty = true;
    }

    /// Map a viewport point (pixels, origin bottom-left) to world space
    pub fn screen_to_world(&self, screen_point: Vec2) -> Vec2 {
        (screen_point - self.viewport * 0.5) / self.scale + self.position
    }

    /// Map a world point to viewport pixels
    pub fn world_to_screen(&self, world_point: Vec2) -> Vec2 {
        (world_point - self.position) * self.scale + self.viewport * 0.5
    }

    /// Camera center in world space
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Current zoom factor
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Viewport size in pixels
    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    /// Whether the view transform is stale
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Last computed view transform
    pub fn view_matrix(&self) -> &Mat4 {
        &self.view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector4;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const EPSILON: f32 = 1e-3;

    fn camera() -> Camera2D {
        Camera2D::new(Vec2::new(800.0, 600.0), CameraConfig::default())
    }

    #[test]
    fn test_update_is_lazy() {
        let mut cam = camera();
        assert!(cam.is_dirty());
        assert!(cam.update());
        assert!(!cam.update());
        cam.scroll_by(Vec2::new(1.0, 0.0));
        assert!(cam.update());
    }

    #[test]
    fn test_scale_is_clamped() {
        let mut cam = camera();
        cam.set_scale(100.0);
        assert_eq!(cam.scale(), 32.0);
        cam.adjust_scale(-50.0);
        assert_eq!(cam.scale(), 0.1);
        cam.set_scale(2.0);
        cam.adjust_scale_percentage(10.0);
        assert_relative_eq!(cam.scale(), 2.2, epsilon = 1e-6);
    }

    #[test]
    fn test_inverse_consistency() {
        let mut rng = StdRng::seed_from_u64(0x2d_ca3e);
        let mut cam = camera();

        for _ in 0..500 {
            let position = Vec2::new(rng.gen_range(-500.0..500.0), rng.gen_range(-500.0..500.0));
            let scale = rng.gen_range(0.1..32.0);
            let screen = Vec2::new(rng.gen_range(0.0..800.0), rng.gen_range(0.0..600.0));
            let world = Vec2::new(rng.gen_range(-1e3..1e3), rng.gen_range(-1e3..1e3));

            cam.scroll_to(position);
            cam.set_scale(scale);
            let screen_trip = cam.world_to_screen(cam.screen_to_world(screen));
            assert_relative_eq!(screen_trip.x, screen.x, epsilon = 1e-2);
            assert_relative_eq!(screen_trip.y, screen.y, epsilon = 1e-2);

            let world_trip = cam.screen_to_world(cam.world_to_screen(world));
            assert_relative_eq!(world_trip.x, world.x, epsilon = 1e-2);
            assert_relative_eq!(world_trip.y, world.y, epsilon = 1e-2);
        }
    }

    #[test]
    fn test_inverted_limits_do_not_panic() {
        let limits = CameraConfig {
            min_scale: 5.0,
            max_scale: 1.0,
            ..CameraConfig::default()
        };
        let mut cam = Camera2D::new(Vec2::new(800.0, 600.0), limits);
        cam.set_scale(2.0);
        assert_eq!(cam.scale(), 2.0);
        cam.set_scale(10.0);
        assert_eq!(cam.scale(), 5.0);
        cam.adjust_scale(-20.0);
        assert_eq!(cam.scale(), 1.0);
    }

    #[test]
    fn test_view_matrix_matches_world_to_screen() {
        let mut cam = camera();
        cam.scroll_to(Vec2::new(40.0, -10.0));
        cam.set_scale(1.5);
        cam.update();

        let world = Vec2::new(75.0, 20.0);
        let ndc = cam.view_matrix() * Vector4::new(world.x, world.y, 0.0, 1.0);
        let pixels = Vec2::new((ndc.x + 1.0) * 0.5 * 800.0, (ndc.y + 1.0) * 0.5 * 600.0);
        let expected = cam.world_to_screen(world);

        assert_relative_eq!(pixels.x, expected.x, epsilon = EPSILON);
        assert_relative_eq!(pixels.y, expected.y, epsilon = EPSILON);
    }

    #[test]
    fn test_camera_center_maps_to_viewport_center() {
        let mut cam = camera();
        cam.scroll_to(Vec2::new(9.0, 9.0));
        let center = cam.world_to_screen(Vec2::new(9.0, 9.0));
        assert_relative_eq!(center.x, 400.0);
        assert_relative_eq!(center.y, 300.0);
    }
}
