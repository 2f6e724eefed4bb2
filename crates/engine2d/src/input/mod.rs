//! Input management system
//!
//! Keys are mapped to named actions through a binding table. Raw key,
//! pointer and touch events update live state as they arrive; once per
//! frame, before any update system runs, [`InputManager::update`] snapshots
//! which actions are held so "just pressed" and "just released" can be
//! derived by comparing this frame's snapshot with the previous one.

mod keys;

pub use keys::{KeyCode, MouseButton, MouseButtons};

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::events::Event;
use crate::foundation::math::Vec2;

/// One entry of the binding table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputBinding {
    /// Logical action name
    pub action: String,
    /// Physical key driving the action
    pub key: KeyCode,
}

#[derive(Debug, Clone, Copy)]
struct ActionState {
    key: KeyCode,
    strength: f32,
    pressed: bool,
}

/// Input manager
pub struct InputManager {
    actions: HashMap<String, ActionState>,
    current_frame: HashSet<String>,
    previous_frame: HashSet<String>,
    mouse_buttons: MouseButtons,
    pointer: Vec2,
    canvas_height: f32,
    touches: HashMap<u64, Vec2>,
    on_left_mouse_pressed: Event<Vec2>,
}

impl InputManager {
    /// Create an input manager for a canvas `canvas_height` pixels tall
    pub fn new(canvas_height: f32) -> Self {
        Self {
            actions: HashMap::new(),
            current_frame: HashSet::new(),
            previous_frame: HashSet::new(),
            mouse_buttons: MouseButtons::empty(),
            pointer: Vec2::zeros(),
            canvas_height,
            touches: HashMap::new(),
            on_left_mouse_pressed: Event::new(),
        }
    }

    /// Bind `action` to `key`
    ///
    /// Binding a name that already exists is a no-op and returns false.
    pub fn bind(&mut self, action: impl Into<String>, key: KeyCode) -> bool {
        let action = action.into();
        if self.actions.contains_key(&action) {
            return false;
        }
        self.actions.insert(action, ActionState { key, strength: 0.0, pressed: false });
        true
    }

    /// Bind every entry of `bindings`
    pub fn bind_all(&mut self, bindings: &[InputBinding]) {
        for binding in bindings {
            self.bind(binding.action.clone(), binding.key);
        }
    }

    /// Move an existing action to `key`; unknown actions are ignored
    pub fn rebind(&mut self, action: &str, key: KeyCode) -> bool {
        match self.actions.get_mut(action) {
            Some(state) => {
                log::debug!("Rebinding '{action}' from {:?} to {:?}", state.key, key);
                state.key = key;
                true
            }
            None => false,
        }
    }

    /// Current binding table, sorted by action name
    pub fn bindings(&self) -> Vec<InputBinding> {
        let mut bindings: Vec<_> = self
            .actions
            .iter()
            .map(|(action, state)| InputBinding { action: action.clone(), key: state.key })
            .collect();
        bindings.sort_by(|a, b| a.action.cmp(&b.action));
        bindings
    }

    /// Snapshot held actions; call once per frame before update systems
    pub fn update(&mut self) {
        let held = self
            .actions
            .iter()
            .filter(|(_, state)| state.pressed)
            .map(|(action, _)| action.clone())
            .collect();
        self.previous_frame = std::mem::replace(&mut self.current_frame, held);
    }

    /// Apply a key press or release
    pub fn handle_key(&mut self, key: KeyCode, pressed: bool) {
        for state in self.actions.values_mut().filter(|state| state.key == key) {
            state.pressed = pressed;
            state.strength = if pressed { 1.0 } else { 0.0 };
        }
    }

    /// Apply a pointer button press or release
    pub fn handle_mouse_button(&mut self, button: MouseButton, pressed: bool) {
        self.mouse_buttons.set(button.flag(), pressed);
        if pressed && button == MouseButton::Left {
            let pointer = self.pointer;
            self.on_left_mouse_pressed.invoke(&pointer);
        }
    }

    /// Apply a pointer move given in window coordinates (origin top-left)
    pub fn handle_pointer_moved(&mut self, x: f32, y: f32) {
        self.pointer = Vec2::new(x, self.canvas_height - y);
    }

    /// Apply a touch start given in window coordinates
    pub fn handle_touch_start(&mut self, id: u64, x: f32, y: f32) {
        self.touches.insert(id, Vec2::new(x, self.canvas_height - y));
    }

    /// Apply a touch move given in window coordinates
    pub fn handle_touch_moved(&mut self, id: u64, x: f32, y: f32) {
        if let Some(touch) = self.touches.get_mut(&id) {
            *touch = Vec2::new(x, self.canvas_height - y);
        }
    }

    /// Apply a touch end
    pub fn handle_touch_end(&mut self, id: u64) {
        self.touches.remove(&id);
    }

    /// Track a canvas resize so pointer Y can be flipped correctly
    pub fn set_canvas_height(&mut self, canvas_height: f32) {
        self.canvas_height = canvas_height;
    }

    /// Whether `action` is held right now
    pub fn is_pressed(&self, action: &str) -> bool {
        self.actions.get(action).is_some_and(|state| state.pressed)
    }

    /// Whether `action` became held this frame
    pub fn is_just_pressed(&self, action: &str) -> bool {
        self.current_frame.contains(action) && !self.previous_frame.contains(action)
    }

    /// Whether `action` stopped being held this frame
    pub fn is_just_released(&self, action: &str) -> bool {
        !self.current_frame.contains(action) && self.previous_frame.contains(action)
    }

    /// Analog strength of `action` in `[0, 1]`
    pub fn action_strength(&self, action: &str) -> f32 {
        self.actions.get(action).map_or(0.0, |state| state.strength)
    }

    /// Whether `button` is held
    pub fn is_mouse_pressed(&self, button: MouseButton) -> bool {
        self.mouse_buttons.contains(button.flag())
    }

    /// Held pointer buttons
    pub fn mouse_buttons(&self) -> MouseButtons {
        self.mouse_buttons
    }

    /// Pointer position in canvas pixels, origin bottom-left
    pub fn pointer_position(&self) -> Vec2 {
        self.pointer
    }

    /// Number of active touches
    pub fn touch_count(&self) -> usize {
        self.touches.len()
    }

    /// Position of touch `id` in canvas pixels, origin bottom-left
    pub fn touch_position(&self, id: u64) -> Option<Vec2> {
        self.touches.get(&id).copied()
    }

    /// Fired with the pointer position when the left button goes down
    pub fn on_left_mouse_pressed(&mut self) -> &mut Event<Vec2> {
        &mut self.on_left_mouse_pressed
    }
}
