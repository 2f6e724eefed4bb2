//! Tween animator

use std::marker::PhantomData;

use crate::ecs::components::{AnimationComponent, Tweenable};
use crate::ecs::System;
use crate::scene::UpdateContext;

/// Advances every `AnimationComponent<T>` in the world by the frame time
pub struct TweenAnimatorSystem<T: Tweenable> {
    _marker: PhantomData<T>,
}

impl<T: Tweenable> TweenAnimatorSystem<T> {
    /// Create the animator
    pub fn new() -> Self {
        Self { _marker: PhantomData }
    }
}

impl<T: Tweenable> Default for TweenAnimatorSystem<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Tweenable> System for TweenAnimatorSystem<T> {
    fn update(&mut self, ctx: &mut UpdateContext<'_>, dt: f32) {
        ctx.world
            .for_each::<AnimationComponent<T>>(|_, animations| animations.advance(dt));
    }
}
