//! Ready-made components
//!
//! Each render component has a matching system in [`super::systems`].

pub mod animation;
pub mod physics;
pub mod render;

pub use animation::{AnimationComponent, SpriteAnimation, TweenAnimation, Tweenable};
pub use physics::{DynamicBodyComponent, StaticBodyComponent};
pub use render::{
    CircleRenderComponent, FillRectRenderComponent, LineRenderComponent, RectRenderComponent, SpriteComponent,
    TriangleRenderComponent,
};
