//! Lazy validation and cached preferred sizes.
//!
//! Each component carries its own validity flag. A container is only
//! effectively valid when its own flag and every descendant's flag are set.
//! Invalidation walks up the parent chain so that the containers whose
//! layout depends on the changed component are laid out again on the next
//! [`ComponentTree::validate_tree`]. Since every ancestor is cleared, a
//! component whose own flag is set never has an invalid descendant, and the
//! validation pass prunes on the own flag alone.

use std::rc::Rc;

use tracing::{debug, warn};

use super::{ComponentFlags, ComponentId, ComponentTree};
use crate::error::{TreeError, TreeResult};
use crate::geometry::{Dimension, Insets};
use crate::layout::LayoutManager;

impl ComponentTree {
    /// Marks a component and its ancestors as needing layout.
    ///
    /// Also drops the component's cached preferred size.
    pub fn invalidate(&mut self, id: ComponentId) -> TreeResult<()> {
        let component = self.component_mut(id)?;
        component.state.flags.clear(ComponentFlags::VALID);
        component.preferred_size_cache = None;

        let mut current = component.parent;
        while let Some(parent) = current {
            let Ok(ancestor) = self.component_mut(parent) else {
                break;
            };
            ancestor.state.flags.clear(ComponentFlags::VALID);
            ancestor.preferred_size_cache = None;
            current = ancestor.parent;
        }
        Ok(())
    }

    /// Effective validity: the component's own flag and all of its
    /// descendants' flags. Unknown ids are never valid.
    #[must_use]
    pub fn is_valid(&self, id: ComponentId) -> bool {
        let Some(component) = self.get(id) else {
            return false;
        };
        component.is_self_valid() && component.children.iter().all(|&c| self.is_valid(c))
    }

    /// Lays out and validates a component and its subtree.
    ///
    /// Does nothing if the component is already valid. A container whose
    /// own flag is cleared runs its layout manager first; a failing layout
    /// manager is logged and its children keep their previous bounds.
    pub fn validate(&mut self, id: ComponentId) -> TreeResult<()> {
        let component = self.component(id)?;
        if component.is_self_valid() {
            return Ok(());
        }

        if let Some(layout) = component.layout() {
            debug!(%id, "laying out container");
            if let Err(error) = layout.layout_container(self, id) {
                warn!(%id, %error, "layout failed; keeping previous child bounds");
            }
        }

        let children = self.component(id)?.children.clone();
        for child in children {
            if self.contains(child) {
                self.validate(child)?;
            }
        }

        self.component_mut(id)?.state.flags.set(ComponentFlags::VALID);
        Ok(())
    }

    /// Validates every root container. Meant to run once per frame before
    /// painting.
    pub fn validate_tree(&mut self) {
        let roots = self.roots().to_vec();
        for root in roots {
            if let Err(error) = self.validate(root) {
                warn!(%root, %error, "validation aborted");
            }
        }
    }

    /// Returns the size the component would like to have.
    ///
    /// An explicit hint always wins. Otherwise the cached value is returned
    /// while the component is valid; an invalid component recomputes it
    /// from its layout manager or, failing that, its widget.
    pub fn preferred_size(&mut self, id: ComponentId) -> TreeResult<Dimension> {
        let component = self.component(id)?;
        if let Some(hint) = component.preferred_size_hint() {
            return Ok(hint);
        }
        if let Some(cached) = component.preferred_size_cache {
            if component.is_self_valid() {
                return Ok(cached);
            }
        }

        let layout = component.layout().filter(|_| component.is_container());
        let from_layout = match layout {
            Some(layout) => layout.preferred_layout_size(self, id),
            None => None,
        };
        let size = match from_layout {
            Some(size) => size,
            None => {
                let node = self.node(id)?;
                node.widget.preferred_size(&node.component)
            }
        };

        self.component_mut(id)?.preferred_size_cache = Some(size);
        Ok(size)
    }

    /// Sets or clears an explicit preferred size.
    pub fn set_preferred_size(&mut self, id: ComponentId, size: Option<Dimension>) -> TreeResult<()> {
        self.component_mut(id)?.state.preferred_size_hint = size.map(Dimension::clamped);
        self.invalidate(id)
    }

    /// Attaches a layout manager to a container.
    pub fn set_layout(&mut self, id: ComponentId, layout: Rc<dyn LayoutManager>) -> TreeResult<()> {
        let component = self.component_mut(id)?;
        if !component.is_container() {
            return Err(TreeError::NotAContainer(id));
        }
        component.layout = Some(layout);
        self.invalidate(id)
    }

    /// Detaches the layout manager; children keep their current bounds.
    pub fn remove_layout(&mut self, id: ComponentId) -> TreeResult<()> {
        self.component_mut(id)?.layout = None;
        self.invalidate(id)
    }

    /// Sets the insets. Replaced wholesale by the next attached border.
    pub fn set_insets(&mut self, id: ComponentId, insets: Insets) -> TreeResult<()> {
        let component = self.component_mut(id)?;
        if component.state.insets == insets {
            return Ok(());
        }
        component.state.insets = insets;
        self.invalidate(id)
    }
}
