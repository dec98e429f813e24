//! Component tree: node storage, structure and geometry.
//!
//! Nodes live in an arena keyed by [`ComponentId`]. Parent links are ids;
//! child lists belong to container roles. Every structural change goes
//! through [`ComponentTree::set_parent`], which keeps both sides of the
//! link consistent in one step.

use std::collections::HashMap;

use tracing::trace;

use super::{Component, ComponentFlags, ComponentId, Depth, Role, Widget};
use crate::error::{TreeError, TreeResult};
use crate::event::{property, PropertyValue};
use crate::geometry::{Dimension, Point, Rect};

/// A component together with the widget that gives it behavior.
///
/// Kept as two fields so paint and update can borrow them separately.
pub(crate) struct Node {
    pub(crate) component: Component,
    pub(crate) widget: Box<dyn Widget>,
}

/// Owns every component of a user interface.
pub struct ComponentTree {
    /// Nodes indexed by ID.
    pub(crate) nodes: HashMap<ComponentId, Node>,
    /// Root container IDs, in creation order.
    roots: Vec<ComponentId>,
    /// ID counter for generating unique IDs.
    next_id: u64,
}

impl ComponentTree {
    /// Creates a new empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: HashMap::with_capacity(256),
            roots: Vec::with_capacity(16),
            next_id: 1,
        }
    }

    fn next_id(&mut self) -> ComponentId {
        let id = ComponentId::new(self.next_id);
        self.next_id += 1;
        id
    }

    fn insert(&mut self, widget: Box<dyn Widget>, role: Role) -> ComponentId {
        let id = self.next_id();
        let component = Component::new(id, role, widget.theme_name());
        self.nodes.insert(id, Node { component, widget });
        if role == Role::RootContainer {
            self.roots.push(id);
        }
        trace!(%id, ?role, "component created");
        id
    }

    /// Creates a detached leaf component.
    pub fn create<W: Widget + 'static>(&mut self, widget: W) -> ComponentId {
        self.insert(Box::new(widget), Role::Leaf)
    }

    /// Creates a detached container.
    pub fn create_container<W: Widget + 'static>(&mut self, widget: W) -> ComponentId {
        self.insert(Box::new(widget), Role::Container)
    }

    /// Creates a root container. Roots are painted and validated by
    /// [`ComponentTree::frame`] and can never be given a parent.
    pub fn create_root<W: Widget + 'static>(&mut self, widget: W) -> ComponentId {
        self.insert(Box::new(widget), Role::RootContainer)
    }

    /// Number of live components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the tree holds no components.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns true if the id names a live component.
    #[must_use]
    pub fn contains(&self, id: ComponentId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Gets a component by ID.
    #[must_use]
    pub fn get(&self, id: ComponentId) -> Option<&Component> {
        self.nodes.get(&id).map(|node| &node.component)
    }

    /// Gets a component by ID, reporting unknown ids as an error.
    pub fn component(&self, id: ComponentId) -> TreeResult<&Component> {
        self.get(id).ok_or(TreeError::UnknownComponent(id))
    }

    pub(crate) fn component_mut(&mut self, id: ComponentId) -> TreeResult<&mut Component> {
        self.nodes
            .get_mut(&id)
            .map(|node| &mut node.component)
            .ok_or(TreeError::UnknownComponent(id))
    }

    pub(crate) fn node(&self, id: ComponentId) -> TreeResult<&Node> {
        self.nodes.get(&id).ok_or(TreeError::UnknownComponent(id))
    }

    pub(crate) fn node_mut(&mut self, id: ComponentId) -> TreeResult<&mut Node> {
        self.nodes
            .get_mut(&id)
            .ok_or(TreeError::UnknownComponent(id))
    }

    /// Returns the widget of a component if it has type `W`.
    #[must_use]
    pub fn widget<W: Widget + 'static>(&self, id: ComponentId) -> Option<&W> {
        let widget: &dyn Widget = self.nodes.get(&id)?.widget.as_ref();
        widget.as_any().downcast_ref::<W>()
    }

    /// Returns the widget of a component mutably if it has type `W`.
    ///
    /// Changing widget state this way does not invalidate the component.
    pub fn widget_mut<W: Widget + 'static>(&mut self, id: ComponentId) -> Option<&mut W> {
        let widget: &mut dyn Widget = self.nodes.get_mut(&id)?.widget.as_mut();
        widget.as_any_mut().downcast_mut::<W>()
    }

    /// Like [`ComponentTree::widget`], but reports why the lookup failed.
    pub fn widget_checked<W: Widget + 'static>(&self, id: ComponentId) -> TreeResult<&W> {
        self.component(id)?;
        self.widget::<W>(id).ok_or(TreeError::WrongWidget {
            id,
            expected: std::any::type_name::<W>(),
        })
    }

    /// Like [`ComponentTree::widget_mut`], but reports why the lookup failed.
    pub fn widget_checked_mut<W: Widget + 'static>(&mut self, id: ComponentId) -> TreeResult<&mut W> {
        self.component(id)?;
        self.widget_mut::<W>(id).ok_or(TreeError::WrongWidget {
            id,
            expected: std::any::type_name::<W>(),
        })
    }

    /// Returns the widget of a component without knowing its type.
    #[must_use]
    pub fn widget_dyn(&self, id: ComponentId) -> Option<&dyn Widget> {
        self.nodes.get(&id).map(|node| node.widget.as_ref())
    }

    /// Returns all root containers.
    #[must_use]
    pub fn roots(&self) -> &[ComponentId] {
        &self.roots
    }

    // ------------------------------------------------------------------
    // Structure
    // ------------------------------------------------------------------

    /// Returns the parent of a component.
    pub fn parent(&self, id: ComponentId) -> TreeResult<Option<ComponentId>> {
        Ok(self.component(id)?.parent)
    }

    /// Returns the children of a component, empty for leaves.
    pub fn children(&self, id: ComponentId) -> TreeResult<&[ComponentId]> {
        Ok(self.component(id)?.children())
    }

    /// True if the component exists and is a container or root container.
    #[must_use]
    pub fn is_container(&self, id: ComponentId) -> bool {
        self.get(id).is_some_and(Component::is_container)
    }

    /// True if the component exists and is a root container.
    #[must_use]
    pub fn is_root_container(&self, id: ComponentId) -> bool {
        self.get(id).is_some_and(Component::is_root_container)
    }

    /// True if `ancestor` appears on the parent chain of `id`.
    #[must_use]
    pub fn is_ancestor(&self, ancestor: ComponentId, id: ComponentId) -> bool {
        let mut current = self.get(id).and_then(Component::parent);
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.get(parent).and_then(Component::parent);
        }
        false
    }

    /// Moves `child` under `parent`, or detaches it with `None`.
    ///
    /// The child is unlinked from its previous container, appended to the
    /// new one, and both containers are invalidated. Attaching a component
    /// under itself or one of its descendants is rejected.
    pub fn set_parent(&mut self, child: ComponentId, parent: Option<ComponentId>) -> TreeResult<()> {
        let current = self.component(child)?;
        let old_parent = current.parent;

        if let Some(new_parent) = parent {
            if current.is_root_container() {
                return Err(TreeError::RootCannotBeChild(child));
            }
            if !self.component(new_parent)?.is_container() {
                return Err(TreeError::NotAContainer(new_parent));
            }
            if new_parent == child || self.is_ancestor(child, new_parent) {
                return Err(TreeError::WouldCreateCycle {
                    parent: new_parent,
                    child,
                });
            }
        }

        if old_parent == parent {
            return Ok(());
        }

        if let Some(old) = old_parent {
            if let Ok(container) = self.component_mut(old) {
                container.children.retain(|&c| c != child);
            }
            if let Some(layout) = self.get(old).and_then(Component::layout) {
                layout.remove_component(child);
            }
            self.invalidate(old)?;
        }

        self.component_mut(child)?.parent = parent;

        if let Some(new_parent) = parent {
            self.component_mut(new_parent)?.children.push(child);
        }
        self.invalidate(child)?;

        trace!(%child, ?old_parent, ?parent, "component reparented");
        Ok(())
    }

    /// Appends `child` to `parent`. See [`ComponentTree::set_parent`].
    pub fn add_child(&mut self, parent: ComponentId, child: ComponentId) -> TreeResult<()> {
        self.set_parent(child, Some(parent))
    }

    /// Detaches `child` from `parent` without destroying it.
    pub fn remove_child(&mut self, parent: ComponentId, child: ComponentId) -> TreeResult<()> {
        if self.component(child)?.parent != Some(parent) {
            return Err(TreeError::NotAChild { parent, child });
        }
        self.set_parent(child, None)
    }

    /// Destroys a component and, for containers, all of its children.
    ///
    /// The component is unlinked from its parent first; the parent itself
    /// is never destroyed.
    pub fn destroy(&mut self, id: ComponentId) -> TreeResult<()> {
        let parent = self.component(id)?.parent;
        if let Some(parent) = parent {
            self.set_parent(id, None)?;
            trace!(%id, %parent, "destroying attached component");
        }
        self.destroy_subtree(id);
        Ok(())
    }

    fn destroy_subtree(&mut self, id: ComponentId) {
        let Some(node) = self.nodes.remove(&id) else {
            return;
        };
        for child in node.component.children {
            self.destroy_subtree(child);
        }
        self.roots.retain(|&r| r != id);
    }

    // ------------------------------------------------------------------
    // Geometry
    // ------------------------------------------------------------------

    /// Returns the bounds of a component in parent coordinates.
    pub fn bounds(&self, id: ComponentId) -> TreeResult<Rect> {
        Ok(self.component(id)?.bounds())
    }

    /// Sets the bounds of a component in parent coordinates.
    ///
    /// Negative sizes are clamped to zero. The component is always
    /// invalidated; [`property::BOUNDS`] is only published on a real change.
    pub fn set_bounds(&mut self, id: ComponentId, bounds: Rect) -> TreeResult<()> {
        let bounds = Rect::from_parts(bounds.location(), bounds.size().clamped());
        let component = self.component_mut(id)?;
        let old = std::mem::replace(&mut component.state.bounds, bounds);
        self.invalidate(id)?;
        if old == bounds {
            return Ok(());
        }
        self.fire_property_change(
            id,
            property::BOUNDS,
            PropertyValue::Rect(old),
            PropertyValue::Rect(bounds),
        );
        Ok(())
    }

    /// Returns the location of a component in parent coordinates.
    pub fn location(&self, id: ComponentId) -> TreeResult<Point> {
        Ok(self.component(id)?.location())
    }

    /// Moves a component, keeping its size.
    pub fn set_location(&mut self, id: ComponentId, location: Point) -> TreeResult<()> {
        let size = self.component(id)?.size();
        self.set_bounds(id, Rect::from_parts(location, size))
    }

    /// Returns the size of a component.
    pub fn size(&self, id: ComponentId) -> TreeResult<Dimension> {
        Ok(self.component(id)?.size())
    }

    /// Resizes a component, keeping its location.
    pub fn set_size(&mut self, id: ComponentId, size: Dimension) -> TreeResult<()> {
        let location = self.component(id)?.location();
        self.set_bounds(id, Rect::from_parts(location, size))
    }

    /// Location of a component relative to the top of its tree.
    ///
    /// Sums the locations along the parent chain; the topmost component
    /// contributes its own location as the base.
    pub fn location_on_screen(&self, id: ComponentId) -> TreeResult<Point> {
        let component = self.component(id)?;
        let mut location = component.location();
        let mut current = component.parent;
        while let Some(parent) = current {
            let ancestor = self.component(parent)?;
            location = location + ancestor.location();
            current = ancestor.parent;
        }
        Ok(location)
    }

    /// Returns the stacking depth of a component.
    pub fn depth(&self, id: ComponentId) -> TreeResult<Depth> {
        Ok(self.component(id)?.depth())
    }

    /// Changes the stacking depth of a component among its siblings.
    pub fn set_depth(&mut self, id: ComponentId, depth: Depth) -> TreeResult<()> {
        let component = self.component_mut(id)?;
        let old = component.state.depth;
        if old == depth {
            return Ok(());
        }
        component.state.depth = depth;
        self.fire_property_change(
            id,
            property::DEPTH,
            PropertyValue::Depth(old),
            PropertyValue::Depth(depth),
        );
        Ok(())
    }

    /// Children of a container in paint order.
    ///
    /// Sorted by [`Depth::stacking_order`]; siblings of equal depth keep
    /// their insertion order.
    pub fn paint_order(&self, id: ComponentId) -> TreeResult<Vec<ComponentId>> {
        let mut order = self.component(id)?.children.clone();
        order.sort_by_key(|child| {
            self.get(*child)
                .map_or(0, |component| component.depth().stacking_order())
        });
        Ok(order)
    }

    // ------------------------------------------------------------------
    // Traversal
    // ------------------------------------------------------------------

    /// Returns all component IDs reachable from the roots, depth-first.
    pub fn iter_dfs(&self) -> impl Iterator<Item = ComponentId> + '_ {
        ComponentDfsIterator {
            tree: self,
            stack: self.roots.iter().rev().copied().collect(),
        }
    }

    /// Returns `id` and all of its descendants, depth-first.
    pub fn descendants(&self, id: ComponentId) -> impl Iterator<Item = ComponentId> + '_ {
        let stack = if self.contains(id) { vec![id] } else { Vec::new() };
        ComponentDfsIterator { tree: self, stack }
    }

    /// True if the component and all of its ancestors are visible.
    #[must_use]
    pub fn is_showing(&self, id: ComponentId) -> bool {
        let mut current = Some(id);
        while let Some(next) = current {
            match self.get(next) {
                Some(component) if component.is_visible() => current = component.parent,
                _ => return false,
            }
        }
        true
    }

    // ------------------------------------------------------------------
    // Copying
    // ------------------------------------------------------------------

    /// Creates a detached copy of a component and, for containers, of its
    /// whole subtree.
    ///
    /// Geometry, flags, paints, theme name and widget state are copied and
    /// the border is deep-copied. Listeners, interpolators and the theme
    /// reference start empty apart from what each widget re-attaches through
    /// [`Widget::attach_behavior`]. The copy has no parent and is neither
    /// focused nor valid.
    pub fn duplicate(&mut self, id: ComponentId) -> TreeResult<ComponentId> {
        self.component(id)?;
        Ok(self.duplicate_node(id, None))
    }

    fn duplicate_node(&mut self, id: ComponentId, parent: Option<ComponentId>) -> ComponentId {
        let Some(source) = self.nodes.get(&id) else {
            return id;
        };
        let role = source.component.role;
        let state = source.component.state.detached_copy();
        let layout = source.component.layout.clone();
        let children = source.component.children.clone();
        let widget = source.widget.clone_widget();
        let template = widget.clone_widget();

        let copy = self.insert(widget, role);
        if let Ok(component) = self.component_mut(copy) {
            component.state = state;
            component.layout = layout.clone();
            component.parent = parent;
        }

        for child in children {
            if !self.contains(child) {
                continue;
            }
            let child_copy = self.duplicate_node(child, Some(copy));
            if let Ok(component) = self.component_mut(copy) {
                component.children.push(child_copy);
            }
            if let Some(layout) = &layout {
                layout.component_duplicated(child, child_copy);
            }
        }
        template.attach_behavior(self, copy);
        copy
    }

    /// Copies geometry and appearance from `source` onto `target`.
    ///
    /// Links, listeners, theme reference, widget state and the focus flag
    /// of `target` are left alone; `target` becomes invalid.
    pub fn assign(&mut self, target: ComponentId, source: ComponentId) -> TreeResult<()> {
        let state = self.component(source)?.state.detached_copy();
        let component = self.component_mut(target)?;
        if target == source {
            return Ok(());
        }
        let focused = component.has_focus();
        component.state = state;
        component.state.flags.assign(ComponentFlags::FOCUSED, focused);
        component.preferred_size_cache = None;
        self.invalidate(target)
    }

    /// Exchanges geometry and appearance between two components.
    ///
    /// Each component keeps its own links, listeners, theme reference and
    /// focus flag; both become invalid.
    pub fn swap_state(&mut self, a: ComponentId, b: ComponentId) -> TreeResult<()> {
        self.component(b)?;
        if a == b {
            return Ok(());
        }
        let mut first = self.nodes.remove(&a).ok_or(TreeError::UnknownComponent(a))?;
        if let Some(second) = self.nodes.get_mut(&b) {
            let first_focused = first.component.has_focus();
            let second_focused = second.component.has_focus();
            std::mem::swap(&mut first.component.state, &mut second.component.state);
            first.component.state.flags.assign(ComponentFlags::FOCUSED, first_focused);
            second.component.state.flags.assign(ComponentFlags::FOCUSED, second_focused);
            second.component.preferred_size_cache = None;
        }
        first.component.preferred_size_cache = None;
        self.nodes.insert(a, first);
        self.invalidate(a)?;
        self.invalidate(b)
    }
}

impl Default for ComponentTree {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ComponentTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentTree")
            .field("len", &self.nodes.len())
            .field("roots", &self.roots)
            .field("next_id", &self.next_id)
            .finish()
    }
}

/// Depth-first iterator over the component tree.
struct ComponentDfsIterator<'a> {
    tree: &'a ComponentTree,
    stack: Vec<ComponentId>,
}

impl Iterator for ComponentDfsIterator<'_> {
    type Item = ComponentId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;

        // Push children in reverse order so they're processed left-to-right
        if let Some(component) = self.tree.get(id) {
            for &child in component.children.iter().rev() {
                self.stack.push(child);
            }
        }

        Some(id)
    }
}
