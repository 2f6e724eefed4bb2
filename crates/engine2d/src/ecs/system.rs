//! System traits
//!
//! Systems receive their dependencies through a context argument instead of
//! reaching for a global engine.

use crate::scene::{RenderContext, UpdateContext};

/// Simulation system, run once per frame during the update phase
pub trait System {
    /// Advance by `dt` seconds
    fn update(&mut self, ctx: &mut UpdateContext<'_>, dt: f32);
}

/// Drawing system, run once per frame during the draw phase
///
/// Render systems get read-only access to the world; their only effect is
/// queueing geometry into the batches.
pub trait RenderSystem {
    /// Queue this frame's geometry
    fn draw(&mut self, ctx: &mut RenderContext<'_>);
}
