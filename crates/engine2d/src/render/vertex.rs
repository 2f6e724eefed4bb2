//! Vertex and color types shared by the batchers

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec2;

/// 8-bit RGBA color
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize)]
pub struct Rgba8 {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
    /// Alpha
    pub a: u8,
}

impl Rgba8 {
    /// Opaque white
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    /// Opaque black
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    /// Opaque red
    pub const RED: Self = Self::new(255, 0, 0, 255);
    /// Opaque green
    pub const GREEN: Self = Self::new(0, 255, 0, 255);
    /// Opaque blue
    pub const BLUE: Self = Self::new(0, 0, 255, 255);
    /// Fully transparent black
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    /// Create a color from byte channels
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create a color from `[0, 1]` float channels, clamping out-of-range input
    pub fn from_floats(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self::new(channel_to_u8(r), channel_to_u8(g), channel_to_u8(b), channel_to_u8(a))
    }

    /// Channels as `[0, 1]` floats
    pub fn to_floats(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a].map(|c| f32::from(c) / 255.0)
    }

    /// Same color with the alpha channel replaced
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self { a: channel_to_u8(alpha), ..self }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn channel_to_u8(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Vertex layout consumed by both batch shaders
///
/// 20 bytes: position at offset 0, normalized color at 8, uv at 12.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// World-space position
    pub position: [f32; 2],
    /// Vertex tint
    pub color: Rgba8,
    /// Texture coordinates
    pub uv: [f32; 2],
}

impl Vertex {
    /// Size of one vertex in bytes
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// Create a vertex
    pub fn new(position: Vec2, uv: Vec2, color: Rgba8) -> Self {
        Self {
            position: [position.x, position.y],
            color,
            uv: [uv.x, uv.y],
        }
    }

    /// Create an untextured vertex
    pub fn colored(position: Vec2, color: Rgba8) -> Self {
        Self::new(position, Vec2::zeros(), color)
    }

    /// Position as a vector
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.position[0], self.position[1])
    }
}
