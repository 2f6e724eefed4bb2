//! Ready-made systems

pub mod animation;
pub mod physics;
pub mod render;

pub use animation::TweenAnimatorSystem;
pub use physics::DynamicBodySyncSystem;
pub use render::{
    CircleRenderSystem, FillRectRenderSystem, LineRenderSystem, RectRenderSystem, SpriteAnimationSystem,
    SpriteRenderOriginSystem, TriangleRenderSystem,
};
