//! Push buttons and check boxes.
//!
//! A button is a leaf whose input handling is an ordinary listener: it
//! registers [`ButtonInput`] on its own pointer and focus channels when
//! created through [`Button::create`].

use std::rc::{Rc, Weak};

use super::{Component, ComponentId, ComponentTree, Widget};
use crate::error::TreeResult;
use crate::event::{property, FocusEvent, FocusListener, MouseEvent, MouseListener, PropertyValue};
use crate::geometry::{Dimension, Point, Rect};
use crate::icon::Icon;
use crate::input::MouseButton;
use crate::render::Surface;

/// Horizontal placement of a button's icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HorizontalAlignment {
    /// Against the left inset.
    Left,
    /// Centered.
    #[default]
    Center,
    /// Against the right inset.
    Right,
}

/// A clickable leaf with a label, optional icons and a selected state.
#[derive(Debug, Clone)]
pub struct Button {
    text: String,
    selected: bool,
    /// Check box behavior: each press flips the selection.
    toggle: bool,
    content_area_filled: bool,
    focus_painted: bool,
    permanent_focus: bool,
    alignment: HorizontalAlignment,
    default_icon: Option<Weak<dyn Icon>>,
    selected_icon: Option<Weak<dyn Icon>>,
    trigger: MouseButton,
    theme_name: &'static str,
}

impl Button {
    /// Creates a push button widget.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            selected: false,
            toggle: false,
            content_area_filled: true,
            focus_painted: true,
            permanent_focus: true,
            alignment: HorizontalAlignment::Center,
            default_icon: None,
            selected_icon: None,
            trigger: MouseButton::Right,
            theme_name: "Button",
        }
    }

    /// Creates a check box widget: a toggling button themed as `"CheckBox"`.
    #[must_use]
    pub fn check_box(text: impl Into<String>) -> Self {
        Self {
            toggle: true,
            theme_name: "CheckBox",
            ..Self::new(text)
        }
    }

    /// Adds a push button to the tree and wires up its input handling.
    pub fn create(tree: &mut ComponentTree, text: impl Into<String>) -> ComponentId {
        Self::create_with(tree, Self::new(text))
    }

    /// Adds a check box to the tree and wires up its input handling.
    pub fn create_check_box(tree: &mut ComponentTree, text: impl Into<String>) -> ComponentId {
        Self::create_with(tree, Self::check_box(text))
    }

    /// Adds a configured button to the tree and wires up its input handling.
    pub fn create_with(tree: &mut ComponentTree, button: Self) -> ComponentId {
        let id = tree.create(button);
        Self::attach_input(tree, id);
        id
    }

    fn attach_input(tree: &mut ComponentTree, id: ComponentId) {
        let input = Rc::new(ButtonInput);
        let _ = tree.add_mouse_listener(id, input.clone());
        let _ = tree.add_focus_listener(id, input);
    }

    /// Returns the label.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Changes the label.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// True while pressed, or while checked for check boxes.
    #[must_use]
    pub const fn is_selected(&self) -> bool {
        self.selected
    }

    /// True for check boxes.
    #[must_use]
    pub const fn is_toggle(&self) -> bool {
        self.toggle
    }

    /// Whether the background is filled behind the content.
    #[must_use]
    pub const fn is_content_area_filled(&self) -> bool {
        self.content_area_filled
    }

    /// Turns background filling on or off.
    pub fn set_content_area_filled(&mut self, filled: bool) {
        self.content_area_filled = filled;
    }

    /// Whether a focus outline is drawn while focused.
    #[must_use]
    pub const fn is_focus_painted(&self) -> bool {
        self.focus_painted
    }

    /// Turns the focus outline on or off.
    pub fn set_focus_painted(&mut self, painted: bool) {
        self.focus_painted = painted;
    }

    /// Controls whether focus cycling may stop here. Compound widgets turn
    /// this off for their internal buttons.
    pub fn set_permanent_focus(&mut self, permanent: bool) {
        self.permanent_focus = permanent;
    }

    /// Returns the icon alignment.
    #[must_use]
    pub const fn horizontal_alignment(&self) -> HorizontalAlignment {
        self.alignment
    }

    /// Changes the icon alignment.
    pub fn set_horizontal_alignment(&mut self, alignment: HorizontalAlignment) {
        self.alignment = alignment;
    }

    /// Icon shown while not selected. The button does not keep it alive.
    pub fn set_default_icon(&mut self, icon: Option<&Rc<dyn Icon>>) {
        self.default_icon = icon.map(Rc::downgrade);
    }

    /// Icon shown while selected. The button does not keep it alive.
    pub fn set_selected_icon(&mut self, icon: Option<&Rc<dyn Icon>>) {
        self.selected_icon = icon.map(Rc::downgrade);
    }

    /// The default icon, if its owner is still alive.
    #[must_use]
    pub fn default_icon(&self) -> Option<Rc<dyn Icon>> {
        self.default_icon.as_ref().and_then(Weak::upgrade)
    }

    /// The selected icon, if its owner is still alive.
    #[must_use]
    pub fn selected_icon(&self) -> Option<Rc<dyn Icon>> {
        self.selected_icon.as_ref().and_then(Weak::upgrade)
    }

    /// The icon for the current state. Falls back to the default icon when
    /// no selected icon is set.
    #[must_use]
    pub fn current_icon(&self) -> Option<Rc<dyn Icon>> {
        if self.selected {
            self.selected_icon().or_else(|| self.default_icon())
        } else {
            self.default_icon()
        }
    }

    /// The pointer button that presses this button.
    #[must_use]
    pub const fn trigger_button(&self) -> MouseButton {
        self.trigger
    }

    /// Changes the pointer button that presses this button.
    pub fn set_trigger_button(&mut self, button: MouseButton) {
        self.trigger = button;
    }

    /// Changes the selected state and publishes [`property::SELECTED`].
    pub fn set_selected(tree: &mut ComponentTree, id: ComponentId, selected: bool) -> TreeResult<()> {
        let button = tree.widget_checked_mut::<Self>(id)?;
        if button.selected == selected {
            return Ok(());
        }
        button.selected = selected;
        tree.fire_property_change(
            id,
            property::SELECTED,
            PropertyValue::Bool(!selected),
            PropertyValue::Bool(selected),
        );
        Ok(())
    }

    fn icon_origin(&self, component: &Component, icon: &dyn Icon) -> (i32, i32) {
        let inner = Rect::from_parts(Point::ORIGIN, component.size()).inset(component.insets());
        let x = match self.alignment {
            HorizontalAlignment::Left => inner.x,
            HorizontalAlignment::Center => inner.x + (inner.width - icon.icon_width()) / 2,
            HorizontalAlignment::Right => inner.right() - icon.icon_width(),
        };
        let y = inner.y + (inner.height - icon.icon_height()) / 2;
        (x, y)
    }
}

impl Widget for Button {
    fn theme_name(&self) -> &'static str {
        self.theme_name
    }

    fn paint_component(&self, component: &Component, surface: &mut dyn Surface) {
        if self.content_area_filled {
            component.fill_background(surface);
        }
        if let Some(icon) = self.current_icon() {
            let (x, y) = self.icon_origin(component, icon.as_ref());
            icon.paint(component, surface, x, y);
        }
        if self.focus_painted && component.has_focus() {
            if let Some(foreground) = component.foreground() {
                let size = component.size();
                surface.set_paint(&foreground);
                surface.draw_line(2, 2, size.width - 3, 2);
                surface.draw_line(2, size.height - 3, size.width - 3, size.height - 3);
                surface.draw_line(2, 2, 2, size.height - 3);
                surface.draw_line(size.width - 3, 2, size.width - 3, size.height - 3);
            }
        }
    }

    fn preferred_size(&self, component: &Component) -> Dimension {
        let icon = [self.default_icon(), self.selected_icon()]
            .into_iter()
            .flatten()
            .fold(Dimension::ZERO, |acc, icon| {
                Dimension::new(acc.width.max(icon.icon_width()), acc.height.max(icon.icon_height()))
            });
        icon.expand(component.insets())
    }

    fn can_hold_permanent_focus(&self) -> bool {
        self.permanent_focus
    }

    fn attach_behavior(&self, tree: &mut ComponentTree, id: ComponentId) {
        Self::attach_input(tree, id);
    }
}

/// Pointer and focus handling shared by every button.
///
/// A press with the trigger button selects a push button and a release
/// deselects it; check boxes flip on each press. Losing focus cancels a
/// push button's press.
#[derive(Debug, Clone, Copy, Default)]
pub struct ButtonInput;

impl MouseListener for ButtonInput {
    fn mouse_pressed(&self, tree: &mut ComponentTree, event: &MouseEvent) {
        let Some(button) = tree.widget::<Button>(event.source) else {
            return;
        };
        if event.button != button.trigger {
            return;
        }
        let selected = if button.toggle { !button.selected } else { true };
        let _ = Button::set_selected(tree, event.source, selected);
    }

    fn mouse_released(&self, tree: &mut ComponentTree, event: &MouseEvent) {
        let Some(button) = tree.widget::<Button>(event.source) else {
            return;
        };
        if event.button != button.trigger || button.toggle {
            return;
        }
        let _ = Button::set_selected(tree, event.source, false);
    }
}

impl FocusListener for ButtonInput {
    fn focus_lost(&self, tree: &mut ComponentTree, event: &FocusEvent) {
        if tree.widget::<Button>(event.source).is_some_and(|b| !b.toggle) {
            let _ = Button::set_selected(tree, event.source, false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(id: ComponentId, button: MouseButton) -> MouseEvent {
        MouseEvent::pressed(id, button, Point::ORIGIN)
    }

    fn release(id: ComponentId, button: MouseButton) -> MouseEvent {
        MouseEvent::released(id, button, Point::ORIGIN)
    }

    #[test]
    fn test_push_button_selects_while_pressed() {
        let mut tree = ComponentTree::new();
        let id = Button::create(&mut tree, "OK");

        tree.process_mouse_event(&press(id, MouseButton::Right));
        assert!(tree.widget::<Button>(id).unwrap().is_selected());

        tree.process_mouse_event(&release(id, MouseButton::Right));
        assert!(!tree.widget::<Button>(id).unwrap().is_selected());
    }

    #[test]
    fn test_other_buttons_are_ignored() {
        let mut tree = ComponentTree::new();
        let id = Button::create(&mut tree, "OK");

        tree.process_mouse_event(&press(id, MouseButton::Middle));

        assert!(!tree.widget::<Button>(id).unwrap().is_selected());
    }

    #[test]
    fn test_check_box_toggles_on_press() {
        let mut tree = ComponentTree::new();
        let id = Button::create_check_box(&mut tree, "Remember me");
        assert_eq!(tree.component(id).unwrap().theme_name(), "CheckBox");

        tree.process_mouse_event(&press(id, MouseButton::Right));
        tree.process_mouse_event(&release(id, MouseButton::Right));
        assert!(tree.widget::<Button>(id).unwrap().is_selected());

        tree.process_mouse_event(&press(id, MouseButton::Right));
        assert!(!tree.widget::<Button>(id).unwrap().is_selected());
    }

    #[test]
    fn test_focus_loss_cancels_press() {
        let mut tree = ComponentTree::new();
        let id = Button::create(&mut tree, "OK");
        tree.set_focus(id, true).unwrap();
        tree.process_mouse_event(&press(id, MouseButton::Right));

        tree.set_focus(id, false).unwrap();

        assert!(!tree.widget::<Button>(id).unwrap().is_selected());
    }

    #[test]
    fn test_set_selected_on_wrong_widget_fails() {
        let mut tree = ComponentTree::new();
        let panel = tree.create(crate::widget::Panel::new());

        assert!(Button::set_selected(&mut tree, panel, true).is_err());
    }

    #[test]
    fn test_duplicate_reacts_to_its_own_presses() {
        let mut tree = ComponentTree::new();
        let id = Button::create(&mut tree, "OK");
        struct Idle;
        impl MouseListener for Idle {}
        let user: Rc<dyn MouseListener> = Rc::new(Idle);
        tree.add_mouse_listener(id, Rc::clone(&user)).unwrap();

        let copy = tree.duplicate(id).unwrap();
        tree.process_mouse_event(&press(copy, MouseButton::Right));

        assert!(tree.widget::<Button>(copy).unwrap().is_selected());
        assert!(!tree.widget::<Button>(id).unwrap().is_selected());
        assert!(!tree.remove_mouse_listener(copy, &user).unwrap());
    }
}
