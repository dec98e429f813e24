//! The bundled look for buttons and check boxes.

use std::rc::Rc;

use super::ThemeDelegate;
use crate::border::BevelBorder;
use crate::event::{property, PropertyEvent, PropertyListener, PropertyValue};
use crate::icon::Icon;
use crate::render::Surface;
use crate::style::{Color, Paint};
use crate::widget::{Button, Component, ComponentId, ComponentTree, HorizontalAlignment};

/// Gray face, black text and a bevel that sinks while pressed.
#[derive(Debug)]
pub struct ButtonTheme {
    face: Rc<Paint>,
    text: Rc<Paint>,
    press_bevel: Rc<PressBevel>,
}

impl ButtonTheme {
    /// Creates the theme with its default paints.
    #[must_use]
    pub fn new() -> Self {
        Self::with_paints(Paint::Solid(Color::GRAY), Paint::Solid(Color::BLACK))
    }

    /// Creates the theme with the given face and text paints.
    #[must_use]
    pub fn with_paints(face: Paint, text: Paint) -> Self {
        Self {
            face: Rc::new(face),
            text: Rc::new(text),
            press_bevel: Rc::new(PressBevel),
        }
    }

    fn press_listener(&self) -> Rc<dyn PropertyListener> {
        Rc::clone(&self.press_bevel) as Rc<dyn PropertyListener>
    }
}

impl Default for ButtonTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl ThemeDelegate for ButtonTheme {
    fn install_theme(&self, tree: &mut ComponentTree, id: ComponentId) {
        let _ = tree.set_background(id, Some(&self.face));
        let _ = tree.set_foreground(id, Some(&self.text));
        let pressed = tree.widget::<Button>(id).is_some_and(Button::is_selected);
        let _ = tree.set_border(id, Some(Box::new(bevel_for(pressed))));
        let _ = tree.set_border_painted(id, true);
        if let Some(button) = tree.widget_mut::<Button>(id) {
            button.set_content_area_filled(true);
            button.set_horizontal_alignment(HorizontalAlignment::Center);
        }
        let _ = tree.add_property_listener(id, self.press_listener());
    }

    fn deinstall_theme(&self, tree: &mut ComponentTree, id: ComponentId) {
        let _ = tree.remove_property_listener(id, &self.press_listener());
        let _ = tree.set_border(id, None);
        let _ = tree.set_background(id, None);
        let _ = tree.set_foreground(id, None);
    }
}

/// Swaps the bevel direction as the button is pressed and released.
#[derive(Debug)]
struct PressBevel;

impl PropertyListener for PressBevel {
    fn property_changed(&self, tree: &mut ComponentTree, event: &PropertyEvent) {
        if event.name != property::SELECTED {
            return;
        }
        let pressed = event.new == PropertyValue::Bool(true);
        let _ = tree.set_border(event.source, Some(Box::new(bevel_for(pressed))));
    }
}

fn bevel_for(pressed: bool) -> BevelBorder {
    if pressed {
        BevelBorder::lowered()
    } else {
        BevelBorder::raised()
    }
}

/// A check box: the button theme without a filled face or border, and a
/// square icon that shows a cross while selected.
#[derive(Debug)]
pub struct CheckBoxTheme {
    button: ButtonTheme,
    default_icon: Rc<dyn Icon>,
    selected_icon: Rc<dyn Icon>,
}

impl CheckBoxTheme {
    /// Creates the theme with its own pair of icons.
    #[must_use]
    pub fn new() -> Self {
        Self {
            button: ButtonTheme::new(),
            default_icon: Rc::new(CheckBoxIcon::new(false)),
            selected_icon: Rc::new(CheckBoxIcon::new(true)),
        }
    }
}

impl Default for CheckBoxTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl ThemeDelegate for CheckBoxTheme {
    fn install_theme(&self, tree: &mut ComponentTree, id: ComponentId) {
        self.button.install_theme(tree, id);
        if let Some(button) = tree.widget_mut::<Button>(id) {
            button.set_content_area_filled(false);
            button.set_default_icon(Some(&self.default_icon));
            button.set_selected_icon(Some(&self.selected_icon));
            button.set_horizontal_alignment(HorizontalAlignment::Left);
        }
        let _ = tree.set_border_painted(id, false);
    }

    fn deinstall_theme(&self, tree: &mut ComponentTree, id: ComponentId) {
        if let Some(button) = tree.widget_mut::<Button>(id) {
            button.set_default_icon(None);
            button.set_selected_icon(None);
        }
        self.button.deinstall_theme(tree, id);
    }
}

/// The square box of a check box.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckBoxIcon {
    checked: bool,
    frame: Paint,
    face: Paint,
}

impl CheckBoxIcon {
    /// Side length of the icon.
    pub const SIZE: i32 = 20;

    const SPACING: i32 = 4;
    const FRAME: i32 = 1;

    /// Creates an empty (`false`) or crossed (`true`) box.
    #[must_use]
    pub fn new(checked: bool) -> Self {
        Self {
            checked,
            frame: Paint::Solid(Color::BLACK),
            face: Paint::Solid(Color::WHITE),
        }
    }

    /// True for the crossed variant.
    #[must_use]
    pub const fn is_checked(&self) -> bool {
        self.checked
    }
}

impl Icon for CheckBoxIcon {
    fn paint(&self, _component: &Component, surface: &mut dyn Surface, x: i32, y: i32) {
        let outer = Self::SIZE - 2 * Self::SPACING;
        let inner = outer - 2 * Self::FRAME;
        let (left, top) = (x + Self::SPACING + Self::FRAME, y + Self::SPACING + Self::FRAME);

        surface.set_paint(&self.frame);
        surface.fill_rect(x + Self::SPACING, y + Self::SPACING, outer, outer);
        surface.set_paint(&self.face);
        surface.fill_rect(left, top, inner, inner);

        if self.checked {
            surface.set_paint(&self.frame);
            surface.set_line_width(2.0);
            surface.draw_line(left, top, left + inner, top + inner);
            surface.draw_line(left + inner, top, left, top + inner);
            surface.set_line_width(1.0);
        }
    }

    fn icon_width(&self) -> i32 {
        Self::SIZE
    }

    fn icon_height(&self) -> i32 {
        Self::SIZE
    }
}
