//! Key and pointer button identifiers

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

macro_rules! key_codes {
    ($($(#[$doc:meta])* $variant:ident => $code:literal,)+) => {
        /// Physical key, named after its DOM `KeyboardEvent.code`
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum KeyCode {
            $($(#[$doc])* $variant,)+
        }

        impl KeyCode {
            /// Every known key
            pub const ALL: &'static [KeyCode] = &[$(KeyCode::$variant,)+];

            /// Parse a DOM key code such as `"KeyA"` or `"ArrowLeft"`
            pub fn from_code(code: &str) -> Option<Self> {
                match code {
                    $($code => Some(Self::$variant),)+
                    _ => None,
                }
            }

            /// DOM key code of this key
            pub fn code(self) -> &'static str {
                match self {
                    $(Self::$variant => $code,)+
                }
            }
        }
    };
}

key_codes! {
    /// A key
    A => "KeyA",
    /// B key
    B => "KeyB",
    /// C key
    C => "KeyC",
    /// D key
    D => "KeyD",
    /// E key
    E => "KeyE",
    /// F key
    F => "KeyF",
    /// G key
    G => "KeyG",
    /// H key
    H => "KeyH",
    /// I key
    I => "KeyI",
    /// J key
    J => "KeyJ",
    /// K key
    K => "KeyK",
    /// L key
    L => "KeyL",
    /// M key
    M => "KeyM",
    /// N key
    N => "KeyN",
    /// O key
    O => "KeyO",
    /// P key
    P => "KeyP",
    /// Q key
    Q => "KeyQ",
    /// R key
    R => "KeyR",
    /// S key
    S => "KeyS",
    /// T key
    T => "KeyT",
    /// U key
    U => "KeyU",
    /// V key
    V => "KeyV",
    /// W key
    W => "KeyW",
    /// X key
    X => "KeyX",
    /// Y key
    Y => "KeyY",
    /// Z key
    Z => "KeyZ",
    /// 0 on the main row
    Digit0 => "Digit0",
    /// 1 on the main row
    Digit1 => "Digit1",
    /// 2 on the main row
    Digit2 => "Digit2",
    /// 3 on the main row
    Digit3 => "Digit3",
    /// 4 on the main row
    Digit4 => "Digit4",
    /// 5 on the main row
    Digit5 => "Digit5",
    /// 6 on the main row
    Digit6 => "Digit6",
    /// 7 on the main row
    Digit7 => "Digit7",
    /// 8 on the main row
    Digit8 => "Digit8",
    /// 9 on the main row
    Digit9 => "Digit9",
    /// Space bar
    Space => "Space",
    /// Enter key
    Enter => "Enter",
    /// Escape key
    Escape => "Escape",
    /// Backspace key
    Backspace => "Backspace",
    /// Tab key
    Tab => "Tab",
    /// Left shift
    ShiftLeft => "ShiftLeft",
    /// Right shift
    ShiftRight => "ShiftRight",
    /// Left control
    ControlLeft => "ControlLeft",
    /// Right control
    ControlRight => "ControlRight",
    /// Left alt
    AltLeft => "AltLeft",
    /// Right alt
    AltRight => "AltRight",
    /// Up arrow
    Up => "ArrowUp",
    /// Down arrow
    Down => "ArrowDown",
    /// Left arrow
    Left => "ArrowLeft",
    /// Right arrow
    Right => "ArrowRight",
    /// Page up
    PageUp => "PageUp",
    /// Page down
    PageDown => "PageDown",
    /// Home key
    Home => "Home",
    /// End key
    End => "End",
    /// Insert key
    Insert => "Insert",
    /// Delete key
    Delete => "Delete",
}

/// Pointer buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    /// Primary button
    Left,
    /// Wheel button
    Middle,
    /// Secondary button
    Right,
}

impl MouseButton {
    /// Map a DOM `MouseEvent.button` index
    pub fn from_index(index: i32) -> Option<Self> {
        match index {
            0 => Some(Self::Left),
            1 => Some(Self::Middle),
            2 => Some(Self::Right),
            _ => None,
        }
    }

    pub(super) fn flag(self) -> MouseButtons {
        match self {
            Self::Left => MouseButtons::LEFT,
            Self::Middle => MouseButtons::MIDDLE,
            Self::Right => MouseButtons::RIGHT,
        }
    }
}

bitflags! {
    /// Set of pointer buttons currently held
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MouseButtons: u8 {
        /// Primary button
        const LEFT = 1 << 0;
        /// Wheel button
        const MIDDLE = 1 << 1;
        /// Secondary button
        const RIGHT = 1 << 2;
    }
}
