//! Keyboard focus ownership.
//!
//! The tree only stores a focus flag per component. [`FocusManager`] keeps
//! at most one owner inside its scope: the previous owner always loses
//! focus before the new one gains it, so focus listeners observe the
//! `lost` event first.

use tracing::trace;

use crate::error::TreeResult;
use crate::widget::{ComponentId, ComponentTree};

/// Tracks the focus owner within one subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusManager {
    scope: ComponentId,
    owner: Option<ComponentId>,
}

impl FocusManager {
    /// Creates a manager for `scope` and everything below it.
    #[must_use]
    pub const fn new(scope: ComponentId) -> Self {
        Self { scope, owner: None }
    }

    /// The subtree this manager is responsible for.
    #[must_use]
    pub const fn scope(&self) -> ComponentId {
        self.scope
    }

    /// The current focus owner.
    #[must_use]
    pub const fn owner(&self) -> Option<ComponentId> {
        self.owner
    }

    /// True if `id` may receive focus: inside the scope, showing and
    /// enabled. Focus traversal additionally skips transient holders.
    #[must_use]
    pub fn can_focus(&self, tree: &ComponentTree, id: ComponentId) -> bool {
        (id == self.scope || tree.is_ancestor(self.scope, id))
            && tree.is_showing(id)
            && tree.get(id).is_some_and(|component| component.is_enabled())
    }

    fn is_traversable(&self, tree: &ComponentTree, id: ComponentId) -> bool {
        self.can_focus(tree, id)
            && tree
                .widget_dyn(id)
                .is_some_and(|widget| widget.can_hold_permanent_focus())
    }

    /// Moves focus to `id`.
    ///
    /// Returns false, changing nothing, if `id` cannot take focus.
    pub fn request_focus(&mut self, tree: &mut ComponentTree, id: ComponentId) -> TreeResult<bool> {
        tree.component(id)?;
        if !self.can_focus(tree, id) {
            return Ok(false);
        }
        if self.owner == Some(id) && tree.component(id)?.has_focus() {
            return Ok(true);
        }
        self.clear_focus(tree);
        tree.set_focus(id, true)?;
        self.owner = Some(id);
        trace!(%id, "focus owner changed");
        Ok(true)
    }

    /// Takes focus away from the current owner, if any.
    pub fn clear_focus(&mut self, tree: &mut ComponentTree) {
        if let Some(previous) = self.owner.take() {
            // The owner may have been destroyed since it gained focus.
            let _ = tree.set_focus(previous, false);
        }
    }

    /// Components focus traversal visits, in tree order.
    #[must_use]
    pub fn focus_order(&self, tree: &ComponentTree) -> Vec<ComponentId> {
        tree.descendants(self.scope)
            .filter(|&id| self.is_traversable(tree, id))
            .collect()
    }

    /// Moves focus to the next traversable component, wrapping around.
    pub fn focus_next(&mut self, tree: &mut ComponentTree) -> TreeResult<Option<ComponentId>> {
        self.cycle(tree, true)
    }

    /// Moves focus to the previous traversable component, wrapping around.
    pub fn focus_previous(&mut self, tree: &mut ComponentTree) -> TreeResult<Option<ComponentId>> {
        self.cycle(tree, false)
    }

    fn cycle(&mut self, tree: &mut ComponentTree, forward: bool) -> TreeResult<Option<ComponentId>> {
        let order = self.focus_order(tree);
        if order.is_empty() {
            return Ok(None);
        }
        let current = self
            .owner
            .and_then(|owner| order.iter().position(|&id| id == owner));
        let next = match (current, forward) {
            (Some(index), true) => (index + 1) % order.len(),
            (Some(index), false) => (index + order.len() - 1) % order.len(),
            (None, true) => 0,
            (None, false) => order.len() - 1,
        };
        let target = order[next];
        self.request_focus(tree, target)?;
        Ok(Some(target))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::event::{FocusEvent, FocusEventKind, FocusListener};
    use crate::widget::{Button, Panel, Spacer};

    fn form(tree: &mut ComponentTree) -> (ComponentId, Vec<ComponentId>) {
        let root = tree.create_root(Panel::new());
        let fields: Vec<ComponentId> = (0..3).map(|i| Button::create(tree, format!("b{i}"))).collect();
        for &field in &fields {
            tree.add_child(root, field).unwrap();
        }
        (root, fields)
    }

    #[derive(Default)]
    struct Journal(RefCell<Vec<(ComponentId, FocusEventKind)>>);

    impl FocusListener for Journal {
        fn focus_gained(&self, _tree: &mut ComponentTree, event: &FocusEvent) {
            self.0.borrow_mut().push((event.source, event.kind));
        }

        fn focus_lost(&self, _tree: &mut ComponentTree, event: &FocusEvent) {
            self.0.borrow_mut().push((event.source, event.kind));
        }
    }

    #[test]
    fn test_previous_owner_loses_focus_first() {
        let mut tree = ComponentTree::new();
        let (root, fields) = form(&mut tree);
        let journal = Rc::new(Journal::default());
        for &field in &fields {
            tree.add_focus_listener(field, journal.clone()).unwrap();
        }
        let mut focus = FocusManager::new(root);

        focus.request_focus(&mut tree, fields[0]).unwrap();
        focus.request_focus(&mut tree, fields[1]).unwrap();

        assert_eq!(
            *journal.0.borrow(),
            vec![
                (fields[0], FocusEventKind::Gained),
                (fields[0], FocusEventKind::Lost),
                (fields[1], FocusEventKind::Gained),
            ]
        );
        let focused: Vec<_> = fields
            .iter()
            .filter(|&&id| tree.component(id).unwrap().has_focus())
            .collect();
        assert_eq!(focused, vec![&fields[1]]);
    }

    #[test]
    fn test_cycle_skips_disabled_hidden_and_transient() {
        let mut tree = ComponentTree::new();
        let (root, fields) = form(&mut tree);
        let spacer = tree.create(Spacer::new(4, 4));
        tree.add_child(root, spacer).unwrap();
        tree.set_enabled(fields[1], false).unwrap();
        let mut focus = FocusManager::new(root);

        assert_eq!(focus.focus_next(&mut tree).unwrap(), Some(root));
        assert_eq!(focus.focus_next(&mut tree).unwrap(), Some(fields[0]));
        assert_eq!(focus.focus_next(&mut tree).unwrap(), Some(fields[2]));
        assert_eq!(focus.focus_next(&mut tree).unwrap(), Some(root));

        tree.set_visible(fields[2], false).unwrap();
        assert_eq!(focus.focus_previous(&mut tree).unwrap(), Some(fields[0]));
    }

    #[test]
    fn test_request_outside_scope_is_refused() {
        let mut tree = ComponentTree::new();
        let (root, _) = form(&mut tree);
        let stranger = Button::create(&mut tree, "elsewhere");
        let mut focus = FocusManager::new(root);

        assert!(!focus.request_focus(&mut tree, stranger).unwrap());
        assert_eq!(focus.owner(), None);
    }

    #[test]
    fn test_destroyed_owner_is_forgotten() {
        let mut tree = ComponentTree::new();
        let (root, fields) = form(&mut tree);
        let mut focus = FocusManager::new(root);
        focus.request_focus(&mut tree, fields[0]).unwrap();

        tree.destroy(fields[0]).unwrap();
        focus.clear_focus(&mut tree);

        assert_eq!(focus.owner(), None);
    }
}
