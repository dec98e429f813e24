//! Theme installation, appearance setters and the paint traversal.

use std::rc::Rc;

use tracing::{debug, trace};

use super::{Component, ComponentFlags, ComponentId, ComponentTree};
use crate::border::Border;
use crate::error::TreeResult;
use crate::event::{property, PropertyValue};
use crate::render::{Surface, Transform};
use crate::style::{Color, Paint};
use crate::theme::ThemeDelegate;

impl ComponentTree {
    // ------------------------------------------------------------------
    // Theme
    // ------------------------------------------------------------------

    /// Replaces the theme delegate of a component.
    ///
    /// The previous delegate, if it is still alive, is deinstalled first.
    /// The component keeps only a weak reference; the caller (usually a
    /// [`crate::ThemeRegistry`]) owns the delegate.
    pub fn set_theme(&mut self, id: ComponentId, theme: Rc<dyn ThemeDelegate>) -> TreeResult<()> {
        let previous = self.component(id)?.theme();
        if let Some(previous) = previous {
            previous.deinstall_theme(self, id);
        }
        self.component_mut(id)?.theme = Some(Rc::downgrade(&theme));
        theme.install_theme(self, id);
        debug!(%id, theme = ?theme, "theme installed");
        Ok(())
    }

    /// Deinstalls and forgets the current theme delegate.
    pub fn clear_theme(&mut self, id: ComponentId) -> TreeResult<()> {
        let previous = self.component(id)?.theme();
        if let Some(previous) = previous {
            previous.deinstall_theme(self, id);
        }
        self.component_mut(id)?.theme = None;
        Ok(())
    }

    /// Runs deinstall and install again on the current delegate.
    ///
    /// Does nothing when no delegate is installed.
    pub fn reset_theme(&mut self, id: ComponentId) -> TreeResult<()> {
        let Some(theme) = self.component(id)?.theme() else {
            return Ok(());
        };
        theme.deinstall_theme(self, id);
        theme.install_theme(self, id);
        Ok(())
    }

    /// Sets the key used to look up this component's theme delegate.
    ///
    /// Installs nothing by itself.
    pub fn set_theme_name(&mut self, id: ComponentId, name: &str) -> TreeResult<()> {
        let component = self.component_mut(id)?;
        if component.state.theme_name == name {
            return Ok(());
        }
        let old = std::mem::replace(&mut component.state.theme_name, name.to_owned());
        self.fire_property_change(
            id,
            property::THEME_NAME,
            PropertyValue::Text(old),
            PropertyValue::Text(name.to_owned()),
        );
        Ok(())
    }

    // ------------------------------------------------------------------
    // Appearance
    // ------------------------------------------------------------------

    /// Sets the foreground paint. The component does not keep it alive.
    pub fn set_foreground(&mut self, id: ComponentId, paint: Option<&Rc<Paint>>) -> TreeResult<()> {
        self.component_mut(id)?.state.foreground = paint.map(Rc::downgrade);
        Ok(())
    }

    /// Sets the background paint. The component does not keep it alive.
    pub fn set_background(&mut self, id: ComponentId, paint: Option<&Rc<Paint>>) -> TreeResult<()> {
        self.component_mut(id)?.state.background = paint.map(Rc::downgrade);
        Ok(())
    }

    /// Attaches or detaches the border.
    ///
    /// Attaching overwrites the insets with the border's insets, discarding
    /// any set by hand. Detaching leaves the insets as they are.
    pub fn set_border(&mut self, id: ComponentId, border: Option<Box<dyn Border>>) -> TreeResult<()> {
        let component = self.component_mut(id)?;
        if let Some(border) = &border {
            component.state.insets = border.border_insets();
        }
        component.state.border = border;
        self.invalidate(id)
    }

    /// Mutable access to the attached border, for themes that restyle it
    /// in place.
    pub fn border_mut(&mut self, id: ComponentId) -> TreeResult<Option<&mut (dyn Border + 'static)>> {
        Ok(self.component_mut(id)?.state.border.as_deref_mut())
    }

    /// Turns border painting on or off without detaching the border.
    pub fn set_border_painted(&mut self, id: ComponentId, painted: bool) -> TreeResult<()> {
        let component = self.component_mut(id)?;
        if component.is_border_painted() == painted {
            return Ok(());
        }
        component.state.flags.assign(ComponentFlags::BORDER_PAINTED, painted);
        self.fire_property_change(
            id,
            property::BORDER_PAINTED,
            PropertyValue::Bool(!painted),
            PropertyValue::Bool(painted),
        );
        Ok(())
    }

    /// Sets the opacity of a component and its subtree, clamped to `[0, 1]`.
    pub fn set_transparency(&mut self, id: ComponentId, transparency: f32) -> TreeResult<()> {
        let transparency = if transparency.is_nan() {
            1.0
        } else {
            transparency.clamp(0.0, 1.0)
        };
        let component = self.component_mut(id)?;
        let old = component.state.transparency;
        if old == transparency {
            return Ok(());
        }
        component.state.transparency = transparency;
        self.fire_property_change(
            id,
            property::TRANSPARENCY,
            PropertyValue::Float(old),
            PropertyValue::Float(transparency),
        );
        Ok(())
    }

    /// Sets the rotation in degrees of a component and its subtree.
    pub fn set_rotation(&mut self, id: ComponentId, degrees: f32) -> TreeResult<()> {
        let degrees = if degrees.is_finite() { degrees } else { 0.0 };
        let component = self.component_mut(id)?;
        let old = component.state.rotation;
        if old == degrees {
            return Ok(());
        }
        component.state.rotation = degrees;
        self.fire_property_change(
            id,
            property::ROTATION,
            PropertyValue::Float(old),
            PropertyValue::Float(degrees),
        );
        Ok(())
    }

    // ------------------------------------------------------------------
    // Painting
    // ------------------------------------------------------------------

    /// Paints a component and its subtree.
    ///
    /// Invisible components are skipped along with everything below them.
    /// Each component paints in its own local space: content first, then
    /// the border, then children in paint order.
    pub fn paint(&self, id: ComponentId, surface: &mut dyn Surface) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        let component = &node.component;
        if !component.is_visible() {
            return;
        }
        trace!(%id, "paint");

        surface.push_transform(local_transform(component));
        node.widget.paint_component(component, surface);
        paint_border(component, surface);
        if component.is_container() {
            for child in self.paint_order(id).unwrap_or_default() {
                self.paint(child, surface);
            }
        }
        surface.pop_transform();
    }

    /// Picking pass: paints each visible component's silhouette in its
    /// [`ComponentTree::selection_color`].
    pub fn paint_selection(&self, id: ComponentId, surface: &mut dyn Surface) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        let component = &node.component;
        if !component.is_visible() {
            return;
        }

        surface.push_transform(local_transform(component));
        node.widget
            .paint_selection_component(component, surface, Self::selection_color(id));
        if component.is_container() {
            for child in self.paint_order(id).unwrap_or_default() {
                self.paint_selection(child, surface);
            }
        }
        surface.pop_transform();
    }

    /// Color that identifies a component in the picking pass.
    ///
    /// The low 24 bits of the id map to RGB; id 0 is never allocated so
    /// black means "nothing".
    #[must_use]
    pub fn selection_color(id: ComponentId) -> Color {
        let raw = id.raw() & 0x00FF_FFFF;
        Color::rgb8((raw >> 16) as u8, (raw >> 8) as u8, raw as u8)
    }

    /// Resolves a color read back from the picking pass.
    #[must_use]
    pub fn component_for_selection_color(&self, color: Color) -> Option<ComponentId> {
        let [r, g, b, _] = color.to_rgba8();
        let raw = (u64::from(r) << 16) | (u64::from(g) << 8) | u64::from(b);
        let id = ComponentId::new(raw);
        self.contains(id).then_some(id)
    }
}

fn local_transform(component: &Component) -> Transform {
    Transform::new(
        component.location(),
        component.rotation(),
        component.transparency(),
    )
}

fn paint_border(component: &Component, surface: &mut dyn Surface) {
    if !component.is_border_painted() {
        return;
    }
    if let Some(border) = component.border() {
        let size = component.size();
        border.paint_border(component, surface, 0, 0, size.width, size.height);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::border::{EmptyBorder, LineBorder};
    use crate::geometry::{Insets, Rect};
    use crate::render::{CommandBuffer, RenderCommand};
    use crate::widget::Panel;

    #[derive(Debug, Default)]
    struct CountingTheme {
        installs: Cell<u32>,
        deinstalls: Cell<u32>,
    }

    impl ThemeDelegate for CountingTheme {
        fn install_theme(&self, tree: &mut ComponentTree, id: ComponentId) {
            self.installs.set(self.installs.get() + 1);
            let _ = tree.set_border_painted(id, false);
        }

        fn deinstall_theme(&self, tree: &mut ComponentTree, id: ComponentId) {
            self.deinstalls.set(self.deinstalls.get() + 1);
            let _ = tree.set_border_painted(id, true);
        }
    }

    #[test]
    fn test_set_theme_deinstalls_previous() {
        let mut tree = ComponentTree::new();
        let leaf = tree.create(Panel::new());
        let first = Rc::new(CountingTheme::default());
        let second = Rc::new(CountingTheme::default());

        tree.set_theme(leaf, first.clone()).unwrap();
        tree.set_theme(leaf, second.clone()).unwrap();

        assert_eq!(first.installs.get(), 1);
        assert_eq!(first.deinstalls.get(), 1);
        assert_eq!(second.installs.get(), 1);
        assert_eq!(second.deinstalls.get(), 0);
    }

    #[test]
    fn test_reset_theme_without_theme_is_noop() {
        let mut tree = ComponentTree::new();
        let leaf = tree.create(Panel::new());

        tree.reset_theme(leaf).unwrap();

        assert!(tree.component(leaf).unwrap().theme().is_none());
        assert!(tree.component(leaf).unwrap().is_border_painted());
    }

    #[test]
    fn test_border_overwrites_insets_and_detach_keeps_them() {
        let mut tree = ComponentTree::new();
        let leaf = tree.create(Panel::new());
        tree.set_insets(leaf, Insets::uniform(9)).unwrap();

        tree.set_border(leaf, Some(Box::new(EmptyBorder::new(Insets::new(1, 2, 3, 4)))))
            .unwrap();
        assert_eq!(tree.component(leaf).unwrap().insets(), Insets::new(1, 2, 3, 4));

        tree.set_border(leaf, None).unwrap();
        assert_eq!(tree.component(leaf).unwrap().insets(), Insets::new(1, 2, 3, 4));
        assert!(!tree.component(leaf).unwrap().has_border());
    }

    #[test]
    fn test_invisible_subtree_is_not_painted() {
        let mut tree = ComponentTree::new();
        let root = tree.create_root(Panel::new());
        let child = tree.create(Panel::new());
        tree.add_child(root, child).unwrap();
        let paint = Rc::new(Paint::Solid(Color::WHITE));
        tree.set_background(child, Some(&paint)).unwrap();
        tree.set_visible(root, false).unwrap();

        let mut buffer = CommandBuffer::new();
        tree.paint(root, &mut buffer);

        assert_eq!(buffer.command_count(), 0);
    }

    #[test]
    fn test_border_painted_flag_gates_border() {
        let mut tree = ComponentTree::new();
        let leaf = tree.create(Panel::new());
        tree.set_bounds(leaf, Rect::new(0, 0, 10, 10)).unwrap();
        tree.set_border(leaf, Some(Box::new(LineBorder::new(Color::BLACK, 1))))
            .unwrap();

        let mut buffer = CommandBuffer::new();
        tree.paint(leaf, &mut buffer);
        assert_eq!(buffer.fills().len(), 4);

        tree.set_border_painted(leaf, false).unwrap();
        let mut buffer = CommandBuffer::new();
        tree.paint(leaf, &mut buffer);
        assert!(buffer.fills().is_empty());
    }

    #[test]
    fn test_children_paint_in_local_space() {
        let mut tree = ComponentTree::new();
        let root = tree.create_root(Panel::new());
        let child = tree.create(Panel::new());
        tree.add_child(root, child).unwrap();
        tree.set_bounds(root, Rect::new(10, 10, 100, 100)).unwrap();
        tree.set_bounds(child, Rect::new(5, 5, 20, 20)).unwrap();
        let paint = Rc::new(Paint::Solid(Color::WHITE));
        tree.set_background(child, Some(&paint)).unwrap();

        let mut buffer = CommandBuffer::new();
        tree.paint(root, &mut buffer);

        assert_eq!(buffer.fills(), vec![Rect::new(15, 15, 20, 20)]);
        assert_eq!(
            buffer.commands().last(),
            Some(&RenderCommand::PopTransform)
        );
    }

    #[test]
    fn test_selection_color_round_trip() {
        let mut tree = ComponentTree::new();
        let leaf = tree.create(Panel::new());

        let color = ComponentTree::selection_color(leaf);

        assert_eq!(tree.component_for_selection_color(color), Some(leaf));
        assert_eq!(tree.component_for_selection_color(Color::BLACK), None);
    }

    #[test]
    fn test_transparency_is_clamped() {
        let mut tree = ComponentTree::new();
        let leaf = tree.create(Panel::new());

        tree.set_transparency(leaf, 3.0).unwrap();
        assert!((tree.component(leaf).unwrap().transparency() - 1.0).abs() < f32::EPSILON);

        tree.set_transparency(leaf, -1.0).unwrap();
        assert!(tree.component(leaf).unwrap().transparency().abs() < f32::EPSILON);
    }
}
