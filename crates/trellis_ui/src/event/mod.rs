//! Typed event channels.
//!
//! Each component carries four independent channels (pointer, keyboard,
//! focus, property) plus its interpolators. Delivery is synchronous and
//! runs against a snapshot of the registry taken before the first listener
//! is called, so listeners may add or remove listeners while an event is
//! in flight. Changes only affect later deliveries.

mod listener;

pub use listener::{
    ChangeListener, FocusListener, KeyListener, ListenerList, MouseListener, PropertyListener,
};

use crate::geometry::{Point, Rect};
use crate::input::{Key, Modifiers, MouseButton};
use crate::widget::{ComponentId, Depth};

/// Names published on the property channel by the tree's own mutators.
pub mod property {
    /// `set_enabled`.
    pub const ENABLED: &str = "enabled";
    /// `set_visible`.
    pub const VISIBLE: &str = "visible";
    /// `set_bounds`, `set_location`, `set_size`.
    pub const BOUNDS: &str = "bounds";
    /// `set_focus`.
    pub const FOCUS: &str = "focus";
    /// `set_depth`.
    pub const DEPTH: &str = "depth";
    /// `set_transparency`.
    pub const TRANSPARENCY: &str = "transparency";
    /// `set_rotation`.
    pub const ROTATION: &str = "rotation";
    /// `set_border_painted`.
    pub const BORDER_PAINTED: &str = "borderPainted";
    /// `set_theme_name`.
    pub const THEME_NAME: &str = "themeName";
    /// Button selection.
    pub const SELECTED: &str = "selected";
    /// Range value.
    pub const VALUE: &str = "value";
}

/// What happened to the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseEventKind {
    /// A button went down.
    Pressed,
    /// A button came up.
    Released,
    /// The pointer moved with no button held.
    Moved,
    /// The pointer moved with a button held.
    Dragged,
}

/// Pointer event delivered to the component chosen by hit-testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    /// Target component.
    pub source: ComponentId,
    /// What happened.
    pub kind: MouseEventKind,
    /// The button involved.
    pub button: MouseButton,
    /// Pointer position, relative to the target.
    pub position: Point,
}

impl MouseEvent {
    /// Creates a new pointer event.
    #[must_use]
    pub const fn new(
        source: ComponentId,
        kind: MouseEventKind,
        button: MouseButton,
        position: Point,
    ) -> Self {
        Self {
            source,
            kind,
            button,
            position,
        }
    }

    /// Shorthand for a press at the given position.
    #[must_use]
    pub const fn pressed(source: ComponentId, button: MouseButton, position: Point) -> Self {
        Self::new(source, MouseEventKind::Pressed, button, position)
    }

    /// Shorthand for a release at the given position.
    #[must_use]
    pub const fn released(source: ComponentId, button: MouseButton, position: Point) -> Self {
        Self::new(source, MouseEventKind::Released, button, position)
    }
}

/// What happened on the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEventKind {
    /// A key went down.
    Pressed,
    /// A key came up.
    Released,
    /// A character was produced.
    Typed,
}

/// Keyboard event delivered to the focused component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Target component.
    pub source: ComponentId,
    /// What happened.
    pub kind: KeyEventKind,
    /// The physical key, when known.
    pub key: Option<Key>,
    /// The produced character, for typed events.
    pub character: Option<char>,
    /// Modifier state at the time of the event.
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Creates a key press or release.
    #[must_use]
    pub const fn key(source: ComponentId, kind: KeyEventKind, key: Key) -> Self {
        Self {
            source,
            kind,
            key: Some(key),
            character: None,
            modifiers: Modifiers::NONE,
        }
    }

    /// Creates a typed-character event.
    #[must_use]
    pub const fn typed(source: ComponentId, character: char) -> Self {
        Self {
            source,
            kind: KeyEventKind::Typed,
            key: None,
            character: Some(character),
            modifiers: Modifiers::NONE,
        }
    }

    /// Attaches modifier state.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Direction of a focus change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusEventKind {
    /// The component became the focus owner.
    Gained,
    /// The component stopped being the focus owner.
    Lost,
}

/// Focus notification for the component whose focus flag changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusEvent {
    /// The component whose focus changed.
    pub source: ComponentId,
    /// Gained or lost.
    pub kind: FocusEventKind,
}

impl FocusEvent {
    /// Creates a new focus event.
    #[must_use]
    pub const fn new(source: ComponentId, kind: FocusEventKind) -> Self {
        Self { source, kind }
    }
}

/// Value carried by a property notification.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// A flag.
    Bool(bool),
    /// An integer.
    Int(i32),
    /// A real number.
    Float(f32),
    /// A rectangle.
    Rect(Rect),
    /// A stacking depth.
    Depth(Depth),
    /// A string.
    Text(String),
}

/// Generic name/old/new notification.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyEvent {
    /// The component whose property changed.
    pub source: ComponentId,
    /// Property name, see [`property`].
    pub name: &'static str,
    /// Value before the change.
    pub old: PropertyValue,
    /// Value after the change.
    pub new: PropertyValue,
}

/// "Something changed" notification used by range widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeEvent {
    /// The component whose state changed.
    pub source: ComponentId,
}
