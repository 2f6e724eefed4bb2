//! Drawing components
//!
//! Geometry comes from the owning entity's transform unless the component
//! carries its own.

use crate::ecs::Component;
use crate::foundation::math::Vec2;
use crate::render::{Rgba8, Texture2D};

/// Whole-texture sprite drawn at the entity position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteComponent {
    /// Texture to draw
    pub texture: Texture2D,
    /// Vertex color multiplied into the texture
    pub tint: Rgba8,
}

impl Component for SpriteComponent {}

/// Line between two world points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineRenderComponent {
    /// Start point
    pub from: Vec2,
    /// End point
    pub to: Vec2,
}

impl Component for LineRenderComponent {}

/// Triangle outline centered on the entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleRenderComponent {
    /// Base width and height
    pub dimensions: Vec2,
}

impl Component for TriangleRenderComponent {}

/// Rect outline covering the entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectRenderComponent {
    /// Outline color
    pub tint: Rgba8,
}

impl Component for RectRenderComponent {}

/// Filled rect covering the entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillRectRenderComponent {
    /// Fill color
    pub tint: Rgba8,
}

impl Component for FillRectRenderComponent {}

/// Circle outline with the entity's width as radius
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CircleRenderComponent;

impl Component for CircleRenderComponent {}
