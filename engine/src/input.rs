//! Abstract input events, decoupled from any terminal or windowing backend.

use till_types::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Backspace,
    Enter,
    Char,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// One user interaction, in scene coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Quit,
    KeyDown { key: Key, ch: Option<char> },
    PointerDown { pos: Point, button: PointerButton },
    PointerMove { pos: Point },
    PointerUp { pos: Point, button: PointerButton },
}

impl InputEvent {
    #[must_use]
    pub fn char(ch: char) -> Self {
        InputEvent::KeyDown {
            key: Key::Char,
            ch: Some(ch),
        }
    }

    #[must_use]
    pub fn key(key: Key) -> Self {
        InputEvent::KeyDown { key, ch: None }
    }

    #[must_use]
    pub fn press(pos: Point) -> Self {
        InputEvent::PointerDown {
            pos,
            button: PointerButton::Primary,
        }
    }

    #[must_use]
    pub fn release(pos: Point) -> Self {
        InputEvent::PointerUp {
            pos,
            button: PointerButton::Primary,
        }
    }

    /// Events that end the task immediately, whatever it is doing.
    #[must_use]
    pub fn is_exit(&self) -> bool {
        matches!(
            self,
            InputEvent::Quit
                | InputEvent::KeyDown {
                    key: Key::Escape,
                    ..
                }
        )
    }
}
