//! Keyframe tweens
//!
//! An [`AnimationComponent`] holds named [`TweenAnimation`]s over one value
//! type. Animations start stopped; [`AnimationComponent::play`] starts one
//! and stops the rest, [`AnimationComponent::play_simultaneous`] starts
//! several without touching the others. The tween animator system advances
//! playing animations once per frame.

use std::collections::HashMap;

use crate::ecs::Component;
use crate::foundation::math::{lerp, lerp_i32, Vec2i};

/// Values a tween can produce between keyframes
pub trait Tweenable: Copy + 'static {
    /// Whether values jump at keyframes instead of interpolating
    const STEPPED: bool = false;

    /// Value at fraction `t` of the way from `from` to `to`
    fn interpolate(from: Self, to: Self, t: f32) -> Self;
}

impl Tweenable for f32 {
    fn interpolate(from: Self, to: Self, t: f32) -> Self {
        lerp(from, to, t)
    }
}

impl Tweenable for i32 {
    fn interpolate(from: Self, to: Self, t: f32) -> Self {
        lerp_i32(from, to, t)
    }
}

/// Sprite-sheet coordinates step from frame to frame
impl Tweenable for Vec2i {
    const STEPPED: bool = true;

    fn interpolate(from: Self, _to: Self, _t: f32) -> Self {
        from
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Keyframe<T> {
    time: f32,
    value: T,
}

/// One named timeline of keyframes
#[derive(Debug, Clone, PartialEq)]
pub struct TweenAnimation<T: Tweenable> {
    keyframes: Vec<Keyframe<T>>,
    current_value: Option<T>,
    current_index: usize,
    current_time: f32,
    time_scale: f32,
    looping: bool,
    finished: bool,
}

impl<T: Tweenable> TweenAnimation<T> {
    /// Empty, stopped animation
    pub fn new(looping: bool) -> Self {
        Self {
            keyframes: Vec::new(),
            current_value: None,
            current_index: 0,
            current_time: 0.0,
            time_scale: 0.0,
            looping,
            finished: false,
        }
    }

    /// Add a keyframe; keyframes stay sorted by time
    pub fn register_keyframe(&mut self, time: f32, value: T) {
        let at = self.keyframes.partition_point(|k| k.time <= time);
        self.keyframes.insert(at, Keyframe { time, value });
        self.rewind();
    }

    /// Restart from the first keyframe without changing the play state
    pub fn rewind(&mut self) {
        self.current_index = 0;
        self.finished = false;
        if let Some(first) = self.keyframes.first() {
            self.current_time = first.time;
            self.current_value = Some(first.value);
        }
    }

    /// Value reached so far; the first keyframe's until the animation advances
    pub fn current_value(&self) -> Option<T> {
        self.current_value
    }

    /// Whether a non-looping animation reached its last keyframe
    pub fn has_finished(&self) -> bool {
        self.finished
    }

    /// Whether time advances for this animation
    pub fn is_playing(&self) -> bool {
        self.time_scale != 0.0
    }

    /// Whether the animation restarts after the last keyframe
    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// Time elapsed on the timeline
    pub fn current_time(&self) -> f32 {
        self.current_time
    }

    /// Timeline length from first to last keyframe
    pub fn length(&self) -> f32 {
        match (self.keyframes.first(), self.keyframes.last()) {
            (Some(first), Some(last)) => last.time - first.time,
            _ => 0.0,
        }
    }

    fn set_playing(&mut self, playing: bool) {
        self.time_scale = if playing { 1.0 } else { 0.0 };
    }

    /// Move the timeline forward by `dt` seconds
    ///
    /// At most one keyframe boundary is crossed per call.
    pub fn advance(&mut self, dt: f32) {
        if !self.is_playing() || self.finished || self.keyframes.len() < 2 {
            return;
        }
        self.current_time += dt * self.time_scale;

        let from = self.keyframes[self.current_index];
        let to = self.keyframes[self.current_index + 1];
        if !T::STEPPED {
            let span = to.time - from.time;
            let t = if span > 0.0 {
                ((self.current_time - from.time) / span).clamp(0.0, 1.0)
            } else {
                1.0
            };
            self.current_value = Some(T::interpolate(from.value, to.value, t));
        }

        if self.current_time < to.time {
            return;
        }
        self.current_index += 1;
        if self.current_index == self.keyframes.len() - 1 {
            self.current_index = 0;
            if self.looping {
                self.current_time = self.keyframes[0].time;
            } else {
                self.finished = true;
                self.current_value = Some(to.value);
                return;
            }
        }
        if T::STEPPED {
            self.current_value = Some(self.keyframes[self.current_index].value);
        }
    }
}

/// Named tweens over values of type `T`
///
/// Operations on names that were never added are no-ops returning
/// `false`/`None`.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationComponent<T: Tweenable> {
    animations: HashMap<String, TweenAnimation<T>>,
}

impl<T: Tweenable> Component for AnimationComponent<T> {}

impl<T: Tweenable> Default for AnimationComponent<T> {
    fn default() -> Self {
        Self {
            animations: HashMap::new(),
        }
    }
}

impl<T: Tweenable> AnimationComponent<T> {
    /// Component with no animations
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an empty stopped animation, replacing any with the same name
    pub fn add_animation(&mut self, name: impl Into<String>, looping: bool) {
        self.animations.insert(name.into(), TweenAnimation::new(looping));
    }

    /// Add a keyframe to `name`
    pub fn register_keyframe(&mut self, name: &str, time: f32, value: T) -> bool {
        self.animations
            .get_mut(name)
            .map(|anim| anim.register_keyframe(time, value))
            .is_some()
    }

    /// Play `name` and stop every other animation
    pub fn play(&mut self, name: &str) -> bool {
        if !self.animations.contains_key(name) {
            return false;
        }
        for (key, anim) in &mut self.animations {
            anim.set_playing(key == name);
        }
        true
    }

    /// Play each of `names`, leaving the others as they are
    pub fn play_simultaneous(&mut self, names: &[&str]) {
        for name in names {
            if let Some(anim) = self.animations.get_mut(*name) {
                anim.set_playing(true);
            }
        }
    }

    /// Stop each of `names`
    pub fn stop(&mut self, names: &[&str]) {
        for name in names {
            if let Some(anim) = self.animations.get_mut(*name) {
                anim.set_playing(false);
            }
        }
    }

    /// Stop every animation
    pub fn stop_all(&mut self) {
        self.animations.values_mut().for_each(|anim| anim.set_playing(false));
    }

    /// Current value of `name`
    pub fn current_value(&self, name: &str) -> Option<T> {
        self.animations.get(name).and_then(TweenAnimation::current_value)
    }

    /// Whether `name` finished
    pub fn has_finished(&self, name: &str) -> bool {
        self.animations.get(name).is_some_and(TweenAnimation::has_finished)
    }

    /// Whether `name` is playing
    pub fn is_playing(&self, name: &str) -> bool {
        self.animations.get(name).is_some_and(TweenAnimation::is_playing)
    }

    /// Animation `name`
    pub fn animation(&self, name: &str) -> Option<&TweenAnimation<T>> {
        self.animations.get(name)
    }

    /// Mutable animation `name`
    pub fn animation_mut(&mut self, name: &str) -> Option<&mut TweenAnimation<T>> {
        self.animations.get_mut(name)
    }

    /// Advance every playing animation
    pub fn advance(&mut self, dt: f32) {
        self.animations.values_mut().for_each(|anim| anim.advance(dt));
    }
}

/// Sprite-sheet animation driven by the entity's `AnimationComponent<Vec2i>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteAnimation {
    /// Name of the animation whose value picks the tile
    pub current_animation: String,
    /// Tile shown before the animation produces a value
    pub starting_sprite: Vec2i,
}

impl Component for SpriteAnimation {}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn fade() -> AnimationComponent<f32> {
        let mut anim = AnimationComponent::new();
        anim.add_animation("fade", false);
        anim.register_keyframe("fade", 0.0, 0.0);
        anim.register_keyframe("fade", 3.0, 1.0);
        anim.register_keyframe("fade", 6.0, 0.0);
        anim
    }

    #[test]
    fn test_stopped_animation_holds_first_value() {
        let mut anim = fade();
        anim.advance(1.0);
        assert_eq!(anim.current_value("fade"), Some(0.0));
        assert!(!anim.is_playing("fade"));
    }

    #[test]
    fn test_linear_interpolation_between_keyframes() {
        let mut anim = fade();
        assert!(anim.play("fade"));
        anim.advance(1.5);
        assert_relative_eq!(anim.current_value("fade").unwrap(), 0.5);
        anim.advance(1.5);
        assert_relative_eq!(anim.current_value("fade").unwrap(), 1.0);
        anim.advance(1.5);
        assert_relative_eq!(anim.current_value("fade").unwrap(), 0.5);
    }

    #[test]
    fn test_non_looping_finishes_on_last_value() {
        let mut anim = fade();
        anim.play("fade");
        for _ in 0..10 {
            anim.advance(1.0);
        }
        assert!(anim.has_finished("fade"));
        assert_relative_eq!(anim.current_value("fade").unwrap(), 0.0);
    }

    #[test]
    fn test_looping_restarts_from_first_keyframe() {
        let mut anim: AnimationComponent<f32> = AnimationComponent::new();
        anim.add_animation("pulse", true);
        anim.register_keyframe("pulse", 0.0, 0.0);
        anim.register_keyframe("pulse", 1.0, 10.0);
        anim.play("pulse");

        anim.advance(1.0);
        assert!(!anim.has_finished("pulse"));
        assert_relative_eq!(anim.animation("pulse").unwrap().current_time(), 0.0);
        anim.advance(0.25);
        assert_relative_eq!(anim.current_value("pulse").unwrap(), 2.5);
    }

    #[test]
    fn test_keyframes_are_sorted_on_register() {
        let mut anim: AnimationComponent<i32> = AnimationComponent::new();
        anim.add_animation("count", false);
        anim.register_keyframe("count", 2.0, 20);
        anim.register_keyframe("count", 0.0, 0);
        assert_eq!(anim.current_value("count"), Some(0));
        assert_relative_eq!(anim.animation("count").unwrap().length(), 2.0);

        anim.play("count");
        anim.advance(1.0);
        assert_eq!(anim.current_value("count"), Some(10));
    }

    #[test]
    fn test_stepped_values_jump_at_keyframes() {
        let mut anim: AnimationComponent<Vec2i> = AnimationComponent::new();
        anim.add_animation("walk", true);
        anim.register_keyframe("walk", 0.0, Vec2i::new(0, 0));
        anim.register_keyframe("walk", 0.1, Vec2i::new(1, 0));
        anim.register_keyframe("walk", 0.2, Vec2i::new(2, 0));
        anim.play("walk");

        anim.advance(0.05);
        assert_eq!(anim.current_value("walk"), Some(Vec2i::new(0, 0)));
        anim.advance(0.06);
        assert_eq!(anim.current_value("walk"), Some(Vec2i::new(1, 0)));
        anim.advance(0.1);
        assert_eq!(anim.current_value("walk"), Some(Vec2i::new(0, 0)));
    }

    #[test]
    fn test_play_is_exclusive_and_simultaneous_is_not() {
        let mut anim: AnimationComponent<f32> = AnimationComponent::new();
        for name in ["a", "b", "c"] {
            anim.add_animation(name, true);
        }
        anim.play_simultaneous(&["a", "b"]);
        assert!(anim.is_playing("a") && anim.is_playing("b"));

        anim.play("c");
        assert!(!anim.is_playing("a") && !anim.is_playing("b") && anim.is_playing("c"));

        anim.stop(&["c"]);
        assert!(!anim.is_playing("c"));
        anim.play_simultaneous(&["a", "c"]);
        anim.stop_all();
        assert!(!anim.is_playing("a") && !anim.is_playing("c"));
    }

    #[test]
    fn test_unknown_names_are_no_ops() {
        let mut anim: AnimationComponent<f32> = AnimationComponent::new();
        assert!(!anim.play("missing"));
        assert!(!anim.register_keyframe("missing", 0.0, 1.0));
        assert_eq!(anim.current_value("missing"), None);
        assert!(!anim.has_finished("missing"));
    }
}
