//! Input and custom events delivered to scenes and entities.

/// Keyboard keys the framework knows by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Space,
    Enter,
    Escape,
    Tab,
    Char(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

/// One event polled from the platform, or raised by game code.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The user asked to close the application.
    Quit,
    KeyDown(Key),
    KeyUp(Key),
    /// Cursor position in screen pixels.
    MouseMotion { x: f32, y: f32 },
    MouseButton {
        button: MouseButton,
        pressed: bool,
        x: f32,
        y: f32,
    },
    /// Application-defined event identified by name.
    Custom(String),
}

impl Event {
    pub fn is_key_down(&self, key: Key) -> bool {
        matches!(self, Event::KeyDown(k) if *k == key)
    }

    pub fn is_key_up(&self, key: Key) -> bool {
        matches!(self, Event::KeyUp(k) if *k == key)
    }
}
