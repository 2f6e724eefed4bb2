//! Math utilities and types
//!
//! Thin aliases over `nalgebra` plus the handful of 2D helpers the batchers
//! and systems need. Angles are in degrees unless a name says otherwise.

pub use nalgebra::{Matrix4, Vector2};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// Integer 2D vector, used for tile coordinates
pub type Vec2i = Vector2<i32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Rotate `point` by `degrees` counter-clockwise around `pivot`
pub fn rotate_about(point: Vec2, degrees: f32, pivot: Vec2) -> Vec2 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let d = point - pivot;
    Vec2::new(d.x * cos - d.y * sin, d.x * sin + d.y * cos) + pivot
}

/// Left-hand perpendicular of `v`
pub fn perpendicular(v: Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}

/// Normalize `v`, returning zero for a zero-length vector
pub fn normalize_or_zero(v: Vec2) -> Vec2 {
    v.try_normalize(f32::EPSILON).unwrap_or_else(Vec2::zeros)
}

/// Linear interpolation between two floats
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Linear interpolation between two integers, truncating toward `a`
#[allow(clippy::cast_possible_truncation)]
pub fn lerp_i32(a: i32, b: i32, t: f32) -> i32 {
    a + ((b - a) as f32 * t) as i32
}

/// Orthographic projection for a viewport spanning `[0, width] x [0, height]`
pub fn ortho_2d(width: f32, height: f32) -> Mat4 {
    Mat4::new_orthographic(0.0, width, 0.0, height, -1.0, 1.0)
}
