//! Listener capability traits and the ordered registry behind every channel.

use std::fmt;
use std::rc::Rc;

use super::{ChangeEvent, FocusEvent, KeyEvent, MouseEvent, PropertyEvent};
use crate::widget::ComponentTree;

/// Ordered registry of shared listeners.
///
/// Identity is pointer identity: adding a listener that is already present
/// is a no-op, and removal matches the exact `Rc` that was added.
pub struct ListenerList<L: ?Sized> {
    entries: Vec<Rc<L>>,
}

impl<L: ?Sized> ListenerList<L> {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends a listener. Returns false if it was already registered.
    pub fn add(&mut self, listener: Rc<L>) -> bool {
        if self.contains(&listener) {
            return false;
        }
        self.entries.push(listener);
        true
    }

    /// Removes a listener. Returns false if it was not registered.
    pub fn remove(&mut self, listener: &Rc<L>) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| !same_listener(entry, listener));
        self.entries.len() != before
    }

    /// Returns true if the listener is registered.
    #[must_use]
    pub fn contains(&self, listener: &Rc<L>) -> bool {
        self.entries.iter().any(|entry| same_listener(entry, listener))
    }

    /// Removes every listener.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns true if no listener is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Copies the registry in registration order.
    ///
    /// Dispatch iterates over this copy, never over the live list.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Rc<L>> {
        self.entries.clone()
    }
}

fn same_listener<L: ?Sized>(a: &Rc<L>, b: &Rc<L>) -> bool {
    Rc::as_ptr(a).cast::<()>() == Rc::as_ptr(b).cast::<()>()
}

impl<L: ?Sized> Default for ListenerList<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: ?Sized> Clone for ListenerList<L> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<L: ?Sized> fmt::Debug for ListenerList<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerList")
            .field("len", &self.entries.len())
            .finish()
    }
}

/// Receives pointer events for the component it is registered on.
pub trait MouseListener {
    /// A button went down.
    fn mouse_pressed(&self, _tree: &mut ComponentTree, _event: &MouseEvent) {}

    /// A button came up.
    fn mouse_released(&self, _tree: &mut ComponentTree, _event: &MouseEvent) {}

    /// The pointer moved.
    fn mouse_moved(&self, _tree: &mut ComponentTree, _event: &MouseEvent) {}

    /// The pointer moved with a button held.
    fn mouse_dragged(&self, _tree: &mut ComponentTree, _event: &MouseEvent) {}
}

/// Receives keyboard events while its component holds focus.
pub trait KeyListener {
    /// A key went down.
    fn key_pressed(&self, _tree: &mut ComponentTree, _event: &KeyEvent) {}

    /// A key came up.
    fn key_released(&self, _tree: &mut ComponentTree, _event: &KeyEvent) {}

    /// A character was typed.
    fn key_typed(&self, _tree: &mut ComponentTree, _event: &KeyEvent) {}
}

/// Receives focus changes of the component it is registered on.
pub trait FocusListener {
    /// The component became the focus owner.
    fn focus_gained(&self, _tree: &mut ComponentTree, _event: &FocusEvent) {}

    /// The component stopped being the focus owner.
    fn focus_lost(&self, _tree: &mut ComponentTree, _event: &FocusEvent) {}
}

/// Receives generic property notifications.
pub trait PropertyListener {
    /// A property changed value.
    fn property_changed(&self, tree: &mut ComponentTree, event: &PropertyEvent);
}

impl<F> PropertyListener for F
where
    F: Fn(&mut ComponentTree, &PropertyEvent),
{
    fn property_changed(&self, tree: &mut ComponentTree, event: &PropertyEvent) {
        self(tree, event);
    }
}

/// Receives "state changed" notifications from range widgets.
pub trait ChangeListener {
    /// The widget's state changed.
    fn state_changed(&self, tree: &mut ComponentTree, event: &ChangeEvent);
}

impl<F> ChangeListener for F
where
    F: Fn(&mut ComponentTree, &ChangeEvent),
{
    fn state_changed(&self, tree: &mut ComponentTree, event: &ChangeEvent) {
        self(tree, event);
    }
}
