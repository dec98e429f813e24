//! Input vocabulary carried by pointer and keyboard events.
//!
//! Capturing platform input and hit-testing happen outside this crate; by the
//! time a value of these types reaches the tree its target is resolved.

/// Pointer button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button.
    Left,
    /// Secondary button. Triggers [`crate::Button`] by default.
    Right,
    /// Wheel button.
    Middle,
}

/// Non-character keys. Printable input arrives as
/// [`crate::event::KeyEventKind::Typed`] with a `char` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Escape.
    Escape,
    /// Enter or Return.
    Enter,
    /// Tab.
    Tab,
    /// Backspace.
    Backspace,
    /// Delete.
    Delete,
    /// Space bar.
    Space,
    /// Cursor up.
    Up,
    /// Cursor down.
    Down,
    /// Cursor left.
    Left,
    /// Cursor right.
    Right,
    /// Home.
    Home,
    /// End.
    End,
    /// Page up.
    PageUp,
    /// Page down.
    PageDown,
    /// Function key `F1` to `F24`.
    Function(u8),
}

impl Key {
    /// True for the keys that move a caret or a selection.
    #[must_use]
    pub const fn is_navigation(self) -> bool {
        matches!(
            self,
            Self::Up
                | Self::Down
                | Self::Left
                | Self::Right
                | Self::Home
                | Self::End
                | Self::PageUp
                | Self::PageDown
        )
    }
}

/// Modifier keys held while an event was produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    /// Shift.
    pub shift: bool,
    /// Control.
    pub ctrl: bool,
    /// Alt or Option.
    pub alt: bool,
    /// Super, Windows or Command.
    pub super_key: bool,
}

impl Modifiers {
    /// Nothing held.
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        super_key: false,
    };

    /// True if anything is held.
    #[must_use]
    pub const fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.super_key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifiers_any() {
        assert!(!Modifiers::NONE.any());
        let shifted = Modifiers {
            shift: true,
            ..Modifiers::default()
        };
        assert!(shifted.any());
    }

    #[test]
    fn test_navigation_keys() {
        assert!(Key::PageDown.is_navigation());
        assert!(!Key::Enter.is_navigation());
        assert!(!Key::Function(5).is_navigation());
    }
}
