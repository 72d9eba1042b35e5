//! Input management system
//!
//! The platform layer translates window events into [`InputEvent`]s. Discrete
//! presses drive game actions directly; keys that act while held (debug
//! camera movement) are tracked in [`HeldKeys`].

use bitflags::bitflags;

use crate::foundation::math::Vec2;

/// Key codes the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
    /// W key
    W,
    /// A key
    A,
    /// S key
    S,
    /// D key
    D,
    /// Z key
    Z,
    /// X key
    X,
    /// B key
    B,
    /// Y key
    Y,
    /// H key
    H,
    /// Q key
    Q,
    /// Space bar
    Space,
    /// Left shift
    LeftShift,
    /// Any key without a binding
    Other,
}

/// Key transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Initial press
    Press,
    /// OS auto-repeat while held
    Repeat,
    /// Key released
    Release,
}

/// Event delivered by the platform
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Keyboard event
    Key {
        /// Key
        key: Key,
        /// Transition
        action: KeyAction,
    },
    /// Absolute cursor position in window pixels
    CursorMoved {
        /// Horizontal position
        x: f64,
        /// Vertical position
        y: f64,
    },
    /// Framebuffer resized
    Resized {
        /// New width in pixels
        width: u32,
        /// New height in pixels
        height: u32,
    },
    /// Window close requested
    CloseRequested,
}

impl InputEvent {
    /// Shorthand for a key press
    pub fn press(key: Key) -> Self {
        Self::Key {
            key,
            action: KeyAction::Press,
        }
    }

    /// Shorthand for a key release
    pub fn release(key: Key) -> Self {
        Self::Key {
            key,
            action: KeyAction::Release,
        }
    }
}

bitflags! {
    /// Keys currently held down
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct HeldKeys: u8 {
        /// Forward
        const W = 1 << 0;
        /// Strafe left
        const A = 1 << 1;
        /// Backward
        const S = 1 << 2;
        /// Strafe right
        const D = 1 << 3;
        /// Rise
        const SPACE = 1 << 4;
        /// Sink
        const SHIFT = 1 << 5;
    }
}

impl HeldKeys {
    fn for_key(key: Key) -> Self {
        match key {
            Key::W => Self::W,
            Key::A => Self::A,
            Key::S => Self::S,
            Key::D => Self::D,
            Key::Space => Self::SPACE,
            Key::LeftShift => Self::SHIFT,
            _ => Self::empty(),
        }
    }
}

/// Accumulated input state between simulation ticks
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HeldKeys,
    cursor: Option<Vec2>,
    mouse_delta: Vec2,
}

impl InputState {
    /// Create an empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold an event into the held-key set and mouse delta
    pub fn handle_event(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::Key { key, action } => match action {
                KeyAction::Press | KeyAction::Repeat => self.held.insert(HeldKeys::for_key(key)),
                KeyAction::Release => self.held.remove(HeldKeys::for_key(key)),
            },
            InputEvent::CursorMoved { x, y } => {
                let position = Vec2::new(x as f32, y as f32);
                if let Some(previous) = self.cursor {
                    self.mouse_delta += position - previous;
                }
                self.cursor = Some(position);
            }
            InputEvent::Resized { .. } | InputEvent::CloseRequested => {}
        }
    }

    /// Keys currently held
    pub fn held(&self) -> HeldKeys {
        self.held
    }

    /// Cursor travel since the last call; resets the accumulator
    pub fn take_mouse_delta(&mut self) -> Vec2 {
        std::mem::replace(&mut self.mouse_delta, Vec2::zeros())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_held_keys_follow_press_and_release() {
        let mut input = InputState::new();
        input.handle_event(&InputEvent::press(Key::W));
        input.handle_event(&InputEvent::press(Key::LeftShift));
        input.handle_event(&InputEvent::press(Key::Up));
        assert_eq!(input.held(), HeldKeys::W | HeldKeys::SHIFT);

        input.handle_event(&InputEvent::release(Key::W));
        assert_eq!(input.held(), HeldKeys::SHIFT);
    }

    #[test]
    fn test_first_cursor_sample_has_no_delta() {
        let mut input = InputState::new();
        input.handle_event(&InputEvent::CursorMoved { x: 400.0, y: 300.0 });
        assert_eq!(input.take_mouse_delta(), Vec2::zeros());

        input.handle_event(&InputEvent::CursorMoved { x: 410.0, y: 295.0 });
        input.handle_event(&InputEvent::CursorMoved { x: 420.0, y: 290.0 });
        assert_eq!(input.take_mouse_delta(), Vec2::new(20.0, -10.0));
        assert_eq!(input.take_mouse_delta(), Vec2::zeros());
    }
}
