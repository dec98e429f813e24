//! Listener registries and synchronous event delivery.
//!
//! Every `process_*` call copies the target's registry before the first
//! listener runs and delivers to that copy in registration order. Listeners
//! get the tree mutably and may register or remove listeners freely; those
//! changes apply from the next call on.

use std::rc::Rc;

use tracing::{trace, warn};

use super::{ComponentFlags, ComponentId, ComponentTree};
use crate::animation::Interpolator;
use crate::error::TreeResult;
use crate::event::{
    property, FocusEvent, FocusEventKind, FocusListener, KeyEvent, KeyEventKind, KeyListener,
    MouseEvent, MouseEventKind, MouseListener, PropertyEvent, PropertyListener, PropertyValue,
};
use crate::render::Surface;

impl ComponentTree {
    // ------------------------------------------------------------------
    // Pointer channel
    // ------------------------------------------------------------------

    /// Registers a pointer listener. Registering the same listener twice
    /// has no effect.
    pub fn add_mouse_listener(
        &mut self,
        id: ComponentId,
        listener: Rc<dyn MouseListener>,
    ) -> TreeResult<()> {
        self.component_mut(id)?.mouse_listeners.add(listener);
        Ok(())
    }

    /// Unregisters a pointer listener. Returns false if it was not registered.
    pub fn remove_mouse_listener(
        &mut self,
        id: ComponentId,
        listener: &Rc<dyn MouseListener>,
    ) -> TreeResult<bool> {
        Ok(self.component_mut(id)?.mouse_listeners.remove(listener))
    }

    /// Unregisters every pointer listener.
    pub fn remove_mouse_listeners(&mut self, id: ComponentId) -> TreeResult<()> {
        self.component_mut(id)?.mouse_listeners.clear();
        Ok(())
    }

    /// True if the component has at least one pointer listener.
    #[must_use]
    pub fn has_mouse_listener(&self, id: ComponentId) -> bool {
        self.get(id).is_some_and(|c| c.has_mouse_listener())
    }

    /// Copy of the pointer listeners in registration order.
    pub fn mouse_listeners(&self, id: ComponentId) -> TreeResult<Vec<Rc<dyn MouseListener>>> {
        Ok(self.component(id)?.mouse_listeners.snapshot())
    }

    /// Delivers a pointer event to the listeners of `event.source`.
    ///
    /// The target has already been chosen by hit-testing. Events for
    /// disabled or unknown components are dropped. Returns the number of
    /// listeners notified.
    pub fn process_mouse_event(&mut self, event: &MouseEvent) -> usize {
        let Some(target) = self.get(event.source) else {
            warn!(source = %event.source, "mouse event for unknown component dropped");
            return 0;
        };
        if !target.is_enabled() {
            trace!(source = %event.source, "mouse event for disabled component dropped");
            return 0;
        }

        let listeners = target.mouse_listeners.snapshot();
        trace!(source = %event.source, kind = ?event.kind, listeners = listeners.len(), "dispatching mouse event");
        for listener in &listeners {
            match event.kind {
                MouseEventKind::Pressed => listener.mouse_pressed(self, event),
                MouseEventKind::Released => listener.mouse_released(self, event),
                MouseEventKind::Moved => listener.mouse_moved(self, event),
                MouseEventKind::Dragged => listener.mouse_dragged(self, event),
            }
        }
        listeners.len()
    }

    // ------------------------------------------------------------------
    // Keyboard channel
    // ------------------------------------------------------------------

    /// Registers a keyboard listener.
    pub fn add_key_listener(
        &mut self,
        id: ComponentId,
        listener: Rc<dyn KeyListener>,
    ) -> TreeResult<()> {
        self.component_mut(id)?.key_listeners.add(listener);
        Ok(())
    }

    /// Unregisters a keyboard listener. Returns false if it was not registered.
    pub fn remove_key_listener(
        &mut self,
        id: ComponentId,
        listener: &Rc<dyn KeyListener>,
    ) -> TreeResult<bool> {
        Ok(self.component_mut(id)?.key_listeners.remove(listener))
    }

    /// Unregisters every keyboard listener.
    pub fn remove_key_listeners(&mut self, id: ComponentId) -> TreeResult<()> {
        self.component_mut(id)?.key_listeners.clear();
        Ok(())
    }

    /// True if the component has at least one keyboard listener.
    #[must_use]
    pub fn has_key_listener(&self, id: ComponentId) -> bool {
        self.get(id).is_some_and(|c| c.has_key_listener())
    }

    /// Copy of the keyboard listeners in registration order.
    pub fn key_listeners(&self, id: ComponentId) -> TreeResult<Vec<Rc<dyn KeyListener>>> {
        Ok(self.component(id)?.key_listeners.snapshot())
    }

    /// Delivers a keyboard event to the listeners of `event.source`.
    ///
    /// Only the focus owner receives keyboard input; events for a target
    /// that is unfocused, disabled or unknown are dropped.
    pub fn process_key_event(&mut self, event: &KeyEvent) -> usize {
        let Some(target) = self.get(event.source) else {
            warn!(source = %event.source, "key event for unknown component dropped");
            return 0;
        };
        if !target.has_focus() || !target.is_enabled() {
            trace!(source = %event.source, "key event for unfocused component dropped");
            return 0;
        }

        let listeners = target.key_listeners.snapshot();
        trace!(source = %event.source, kind = ?event.kind, listeners = listeners.len(), "dispatching key event");
        for listener in &listeners {
            match event.kind {
                KeyEventKind::Pressed => listener.key_pressed(self, event),
                KeyEventKind::Released => listener.key_released(self, event),
                KeyEventKind::Typed => listener.key_typed(self, event),
            }
        }
        listeners.len()
    }

    // ------------------------------------------------------------------
    // Focus channel
    // ------------------------------------------------------------------

    /// Registers a focus listener.
    pub fn add_focus_listener(
        &mut self,
        id: ComponentId,
        listener: Rc<dyn FocusListener>,
    ) -> TreeResult<()> {
        self.component_mut(id)?.focus_listeners.add(listener);
        Ok(())
    }

    /// Unregisters a focus listener. Returns false if it was not registered.
    pub fn remove_focus_listener(
        &mut self,
        id: ComponentId,
        listener: &Rc<dyn FocusListener>,
    ) -> TreeResult<bool> {
        Ok(self.component_mut(id)?.focus_listeners.remove(listener))
    }

    /// Unregisters every focus listener.
    pub fn remove_focus_listeners(&mut self, id: ComponentId) -> TreeResult<()> {
        self.component_mut(id)?.focus_listeners.clear();
        Ok(())
    }

    /// True if the component has at least one focus listener.
    #[must_use]
    pub fn has_focus_listener(&self, id: ComponentId) -> bool {
        self.get(id).is_some_and(|c| c.has_focus_listener())
    }

    /// Copy of the focus listeners in registration order.
    pub fn focus_listeners(&self, id: ComponentId) -> TreeResult<Vec<Rc<dyn FocusListener>>> {
        Ok(self.component(id)?.focus_listeners.snapshot())
    }

    /// Delivers a focus event to the listeners of `event.source`.
    pub fn process_focus_event(&mut self, event: &FocusEvent) -> usize {
        let Some(target) = self.get(event.source) else {
            warn!(source = %event.source, "focus event for unknown component dropped");
            return 0;
        };

        let listeners = target.focus_listeners.snapshot();
        trace!(source = %event.source, kind = ?event.kind, listeners = listeners.len(), "dispatching focus event");
        for listener in &listeners {
            match event.kind {
                FocusEventKind::Gained => listener.focus_gained(self, event),
                FocusEventKind::Lost => listener.focus_lost(self, event),
            }
        }
        listeners.len()
    }

    /// Sets or clears the focus flag and notifies focus listeners.
    ///
    /// The tree does not look for other focused components. Whoever moves
    /// focus must clear the previous owner first; [`crate::FocusManager`]
    /// does exactly that.
    pub fn set_focus(&mut self, id: ComponentId, focused: bool) -> TreeResult<()> {
        let component = self.component_mut(id)?;
        if component.has_focus() == focused {
            return Ok(());
        }
        component.state.flags.assign(ComponentFlags::FOCUSED, focused);

        let kind = if focused {
            FocusEventKind::Gained
        } else {
            FocusEventKind::Lost
        };
        self.process_focus_event(&FocusEvent::new(id, kind));
        self.fire_property_change(
            id,
            property::FOCUS,
            PropertyValue::Bool(!focused),
            PropertyValue::Bool(focused),
        );
        Ok(())
    }

    // ------------------------------------------------------------------
    // Property channel
    // ------------------------------------------------------------------

    /// Registers a property listener.
    pub fn add_property_listener(
        &mut self,
        id: ComponentId,
        listener: Rc<dyn PropertyListener>,
    ) -> TreeResult<()> {
        self.component_mut(id)?.property_listeners.add(listener);
        Ok(())
    }

    /// Unregisters a property listener. Returns false if it was not registered.
    pub fn remove_property_listener(
        &mut self,
        id: ComponentId,
        listener: &Rc<dyn PropertyListener>,
    ) -> TreeResult<bool> {
        Ok(self.component_mut(id)?.property_listeners.remove(listener))
    }

    /// Unregisters every property listener.
    pub fn remove_property_listeners(&mut self, id: ComponentId) -> TreeResult<()> {
        self.component_mut(id)?.property_listeners.clear();
        Ok(())
    }

    /// True if the component has at least one property listener.
    #[must_use]
    pub fn has_property_listener(&self, id: ComponentId) -> bool {
        self.get(id).is_some_and(|c| c.has_property_listener())
    }

    /// Copy of the property listeners in registration order.
    pub fn property_listeners(
        &self,
        id: ComponentId,
    ) -> TreeResult<Vec<Rc<dyn PropertyListener>>> {
        Ok(self.component(id)?.property_listeners.snapshot())
    }

    /// Delivers a property event to the listeners of `event.source`.
    pub fn process_property_event(&mut self, event: &PropertyEvent) -> usize {
        let Some(target) = self.get(event.source) else {
            return 0;
        };

        let listeners = target.property_listeners.snapshot();
        trace!(source = %event.source, name = event.name, listeners = listeners.len(), "dispatching property event");
        for listener in &listeners {
            listener.property_changed(self, event);
        }
        listeners.len()
    }

    /// Publishes a property change when `old` and `new` differ.
    ///
    /// Widgets use this for their own properties; the tree's setters use it
    /// for theirs. Returns the number of listeners notified.
    pub fn fire_property_change(
        &mut self,
        id: ComponentId,
        name: &'static str,
        old: PropertyValue,
        new: PropertyValue,
    ) -> usize {
        if old == new || !self.has_property_listener(id) {
            return 0;
        }
        self.process_property_event(&PropertyEvent {
            source: id,
            name,
            old,
            new,
        })
    }

    /// Enables or disables user input on a component.
    pub fn set_enabled(&mut self, id: ComponentId, enabled: bool) -> TreeResult<()> {
        let component = self.component_mut(id)?;
        if component.is_enabled() == enabled {
            return Ok(());
        }
        component.state.flags.assign(ComponentFlags::ENABLED, enabled);
        self.fire_property_change(
            id,
            property::ENABLED,
            PropertyValue::Bool(!enabled),
            PropertyValue::Bool(enabled),
        );
        Ok(())
    }

    /// Shows or hides a component and, structurally, its subtree.
    pub fn set_visible(&mut self, id: ComponentId, visible: bool) -> TreeResult<()> {
        let component = self.component_mut(id)?;
        if component.is_visible() == visible {
            return Ok(());
        }
        component.state.flags.assign(ComponentFlags::VISIBLE, visible);
        if let Some(parent) = component.parent {
            self.invalidate(parent)?;
        }
        self.fire_property_change(
            id,
            property::VISIBLE,
            PropertyValue::Bool(!visible),
            PropertyValue::Bool(visible),
        );
        Ok(())
    }

    // ------------------------------------------------------------------
    // Interpolators
    // ------------------------------------------------------------------

    /// Registers an interpolator, polled by [`ComponentTree::update_component`].
    pub fn add_interpolator(
        &mut self,
        id: ComponentId,
        interpolator: Rc<dyn Interpolator>,
    ) -> TreeResult<()> {
        self.component_mut(id)?.interpolators.add(interpolator);
        Ok(())
    }

    /// Unregisters an interpolator. Returns false if it was not registered.
    pub fn remove_interpolator(
        &mut self,
        id: ComponentId,
        interpolator: &Rc<dyn Interpolator>,
    ) -> TreeResult<bool> {
        Ok(self.component_mut(id)?.interpolators.remove(interpolator))
    }

    /// Unregisters every interpolator.
    pub fn remove_interpolators(&mut self, id: ComponentId) -> TreeResult<()> {
        self.component_mut(id)?.interpolators.clear();
        Ok(())
    }

    /// Advances one component by `dt` seconds.
    ///
    /// Runs the widget's own update hook, then each registered
    /// interpolator. Interpolators that report themselves finished are
    /// unregistered afterwards.
    pub fn update_component(&mut self, id: ComponentId, dt: f32) -> TreeResult<()> {
        let node = self.node_mut(id)?;
        node.widget.update(&mut node.component, dt);
        let interpolators = node.component.interpolators.snapshot();

        for interpolator in &interpolators {
            interpolator.update(self, id, dt);
        }

        if let Ok(component) = self.component_mut(id) {
            for interpolator in interpolators.iter().filter(|i| i.is_finished()) {
                component.interpolators.remove(interpolator);
            }
        }
        Ok(())
    }

    /// Advances every component reachable from the roots.
    pub fn update_tree(&mut self, dt: f32) {
        let ids: Vec<ComponentId> = self.iter_dfs().collect();
        for id in ids {
            // Components destroyed by an earlier update are skipped.
            let _ = self.update_component(id, dt);
        }
    }

    /// One tick of the frame driver: update, validate, then paint every root.
    pub fn frame(&mut self, dt: f32, surface: &mut dyn Surface) {
        self.update_tree(dt);
        self.validate_tree();
        for &root in self.roots() {
            self.paint(root, surface);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use super::*;
    use crate::geometry::Point;
    use crate::input::{Key, MouseButton};
    use crate::widget::Panel;

    #[derive(Default)]
    struct Recorder {
        pressed: Cell<u32>,
        released: Cell<u32>,
    }

    impl MouseListener for Recorder {
        fn mouse_pressed(&self, _tree: &mut ComponentTree, _event: &MouseEvent) {
            self.pressed.set(self.pressed.get() + 1);
        }

        fn mouse_released(&self, _tree: &mut ComponentTree, _event: &MouseEvent) {
            self.released.set(self.released.get() + 1);
        }
    }

    #[derive(Default)]
    struct Keys {
        typed: RefCell<String>,
    }

    impl KeyListener for Keys {
        fn key_typed(&self, _tree: &mut ComponentTree, event: &KeyEvent) {
            if let Some(c) = event.character {
                self.typed.borrow_mut().push(c);
            }
        }
    }

    fn press(id: ComponentId) -> MouseEvent {
        MouseEvent::pressed(id, MouseButton::Left, Point::new(1, 1))
    }

    #[test]
    fn test_mouse_listener_round_trip() {
        let mut tree = ComponentTree::new();
        let leaf = tree.create(Panel::new());
        let recorder = Rc::new(Recorder::default());
        let listener: Rc<dyn MouseListener> = recorder.clone();

        tree.add_mouse_listener(leaf, listener.clone()).unwrap();
        assert!(tree.has_mouse_listener(leaf));
        assert_eq!(tree.process_mouse_event(&press(leaf)), 1);

        assert!(tree.remove_mouse_listener(leaf, &listener).unwrap());
        assert!(!tree.has_mouse_listener(leaf));
        assert_eq!(tree.process_mouse_event(&press(leaf)), 0);
        assert_eq!(recorder.pressed.get(), 1);
    }

    #[test]
    fn test_disabled_component_ignores_pointer() {
        let mut tree = ComponentTree::new();
        let leaf = tree.create(Panel::new());
        let recorder = Rc::new(Recorder::default());
        tree.add_mouse_listener(leaf, recorder.clone()).unwrap();
        tree.set_enabled(leaf, false).unwrap();

        tree.process_mouse_event(&press(leaf));

        assert_eq!(recorder.pressed.get(), 0);
    }

    #[test]
    fn test_key_events_require_focus() {
        let mut tree = ComponentTree::new();
        let leaf = tree.create(Panel::new());
        let keys = Rc::new(Keys::default());
        tree.add_key_listener(leaf, keys.clone()).unwrap();

        tree.process_key_event(&KeyEvent::typed(leaf, 'a'));
        tree.set_focus(leaf, true).unwrap();
        tree.process_key_event(&KeyEvent::typed(leaf, 'b'));
        tree.process_key_event(&KeyEvent::key(leaf, KeyEventKind::Pressed, Key::Enter));

        assert_eq!(keys.typed.borrow().as_str(), "b");
    }

    #[test]
    fn test_set_focus_notifies_once() {
        struct Counter(Cell<i32>);
        impl FocusListener for Counter {
            fn focus_gained(&self, _tree: &mut ComponentTree, _event: &FocusEvent) {
                self.0.set(self.0.get() + 1);
            }
            fn focus_lost(&self, _tree: &mut ComponentTree, _event: &FocusEvent) {
                self.0.set(self.0.get() - 10);
            }
        }

        let mut tree = ComponentTree::new();
        let leaf = tree.create(Panel::new());
        let counter = Rc::new(Counter(Cell::new(0)));
        tree.add_focus_listener(leaf, counter.clone()).unwrap();

        tree.set_focus(leaf, true).unwrap();
        tree.set_focus(leaf, true).unwrap();
        assert_eq!(counter.0.get(), 1);

        tree.set_focus(leaf, false).unwrap();
        assert_eq!(counter.0.get(), -9);
    }

    #[test]
    fn test_property_events_carry_old_and_new() {
        let mut tree = ComponentTree::new();
        let leaf = tree.create(Panel::new());
        let seen: Rc<RefCell<Vec<PropertyEvent>>> = Rc::default();
        let sink = Rc::clone(&seen);
        tree.add_property_listener(
            leaf,
            Rc::new(move |_: &mut ComponentTree, event: &PropertyEvent| {
                sink.borrow_mut().push(event.clone());
            }),
        )
        .unwrap();

        tree.set_enabled(leaf, false).unwrap();
        tree.set_enabled(leaf, false).unwrap();

        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].name, property::ENABLED);
        assert_eq!(seen[0].old, PropertyValue::Bool(true));
        assert_eq!(seen[0].new, PropertyValue::Bool(false));
    }

    #[test]
    fn test_registry_queries_do_not_deliver() {
        let mut tree = ComponentTree::new();
        let leaf = tree.create(Panel::new());
        let recorder = Rc::new(Recorder::default());
        tree.add_mouse_listener(leaf, recorder.clone()).unwrap();

        assert_eq!(tree.mouse_listeners(leaf).unwrap().len(), 1);
        tree.remove_mouse_listeners(leaf).unwrap();

        assert_eq!(recorder.pressed.get(), 0);
        assert_eq!(recorder.released.get(), 0);
        assert!(!tree.has_mouse_listener(leaf));
    }
}
