//! Plain building blocks.

use super::{Component, Widget};
use crate::geometry::Dimension;
use crate::render::Surface;

/// A container that only paints its background.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Panel;

impl Panel {
    /// Creates a panel widget.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Widget for Panel {
    fn theme_name(&self) -> &'static str {
        "Panel"
    }
}

/// An invisible leaf that takes up a fixed amount of space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Spacer {
    size: Dimension,
}

impl Spacer {
    /// Creates a spacer of the given size.
    #[must_use]
    pub const fn new(width: i32, height: i32) -> Self {
        Self {
            size: Dimension::new(width, height),
        }
    }
}

impl Widget for Spacer {
    fn theme_name(&self) -> &'static str {
        "Spacer"
    }

    fn paint_component(&self, _component: &Component, _surface: &mut dyn Surface) {}

    fn preferred_size(&self, component: &Component) -> Dimension {
        self.size.clamped().expand(component.insets())
    }

    fn can_hold_permanent_focus(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::ComponentTree;

    #[test]
    fn test_spacer_reports_its_size() {
        let mut tree = ComponentTree::new();
        let spacer = tree.create(Spacer::new(12, 7));

        assert_eq!(tree.preferred_size(spacer).unwrap(), Dimension::new(12, 7));
        assert!(!tree.widget_dyn(spacer).unwrap().can_hold_permanent_focus());
    }

    #[test]
    fn test_panel_theme_name() {
        let mut tree = ComponentTree::new();
        let panel = tree.create_container(Panel::new());

        assert_eq!(tree.component(panel).unwrap().theme_name(), "Panel");
        assert!(tree.widget::<Panel>(panel).is_some());
        assert!(tree.widget::<Spacer>(panel).is_none());
    }
}
