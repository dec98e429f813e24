//! A scroller flanked by step buttons.
//!
//! The scrollbar is an ordinary container whose children are, in order,
//! the decrement button, the [`Scroller`] and the increment button. It
//! keeps no child ids of its own, so copies made with
//! [`ComponentTree::duplicate`] find their parts the same way.

use std::rc::Rc;

use super::{Button, ComponentId, ComponentTree, Scroller, Widget};
use crate::animation::Interpolator;
use crate::error::{TreeError, TreeResult};
use crate::event::{ChangeListener, MouseEvent, MouseListener};
use crate::geometry::Dimension;
use crate::layout::{BorderLayout, Direction, Region};

const DECREMENT: usize = 0;
const SCROLLER: usize = 1;
const INCREMENT: usize = 2;

/// Container widget of a scrollbar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scrollbar {
    /// Value units per second while a step button is held.
    step: f32,
    /// Signed rate applied on each tick; zero while no button is held.
    change_by: f32,
}

impl Scrollbar {
    /// Fraction of the range covered per second while a button is held.
    pub const DEFAULT_STEP_FRACTION: f32 = 0.25;

    /// Builds a complete scrollbar and returns the container.
    pub fn create(
        tree: &mut ComponentTree,
        min: f32,
        max: f32,
        value: f32,
        orientation: Direction,
    ) -> TreeResult<ComponentId> {
        let scroller = Scroller::new(min, max, value, orientation);
        let step = (scroller.maximum() - scroller.minimum()) * Self::DEFAULT_STEP_FRACTION;
        let id = tree.create_container(Self {
            step,
            change_by: 0.0,
        });

        let decrement = Self::create_step_button(tree, "-")?;
        let scroller = Scroller::create(tree, scroller);
        let increment = Self::create_step_button(tree, "+")?;
        for part in [decrement, scroller, increment] {
            tree.add_child(id, part)?;
        }

        Self::install_layout(tree, id, orientation)?;
        Self::attach_repeat(tree, id)?;
        Ok(id)
    }

    fn create_step_button(tree: &mut ComponentTree, text: &str) -> TreeResult<ComponentId> {
        let mut button = Button::new(text);
        button.set_permanent_focus(false);
        let id = Button::create_with(tree, button);
        tree.set_preferred_size(id, Some(Dimension::new(Scroller::BREADTH, Scroller::BREADTH)))?;
        Ok(id)
    }

    /// Wires the step buttons to the hold-to-scroll interpolator.
    fn attach_repeat(tree: &mut ComponentTree, id: ComponentId) -> TreeResult<()> {
        let input = Rc::new(ScrollbarInput);
        for index in [DECREMENT, INCREMENT] {
            let button = Self::part(tree, id, index)?;
            tree.add_mouse_listener(button, input.clone())?;
        }
        tree.add_interpolator(id, Rc::new(ScrollRepeat))
    }

    fn install_layout(tree: &mut ComponentTree, id: ComponentId, orientation: Direction) -> TreeResult<()> {
        let layout = Rc::new(BorderLayout::new());
        let (before, after) = match orientation {
            Direction::Horizontal => (Region::West, Region::East),
            Direction::Vertical => (Region::North, Region::South),
        };
        layout.place(Self::part(tree, id, DECREMENT)?, before);
        layout.place(Self::part(tree, id, SCROLLER)?, Region::Center);
        layout.place(Self::part(tree, id, INCREMENT)?, after);
        tree.set_layout(id, layout)
    }

    fn part(tree: &ComponentTree, id: ComponentId, index: usize) -> TreeResult<ComponentId> {
        tree.widget_checked::<Self>(id)?;
        tree.children(id)?
            .get(index)
            .copied()
            .ok_or(TreeError::WrongWidget {
                id,
                expected: "Scrollbar",
            })
    }

    /// The button that lowers the value.
    pub fn decrement_button(tree: &ComponentTree, id: ComponentId) -> TreeResult<ComponentId> {
        Self::part(tree, id, DECREMENT)
    }

    /// The button that raises the value.
    pub fn increment_button(tree: &ComponentTree, id: ComponentId) -> TreeResult<ComponentId> {
        Self::part(tree, id, INCREMENT)
    }

    /// The embedded scroller.
    pub fn scroller(tree: &ComponentTree, id: ComponentId) -> TreeResult<ComponentId> {
        Self::part(tree, id, SCROLLER)
    }

    fn scroller_widget(tree: &ComponentTree, id: ComponentId) -> TreeResult<&Scroller> {
        tree.widget_checked::<Scroller>(Self::scroller(tree, id)?)
    }

    fn scroller_widget_mut(tree: &mut ComponentTree, id: ComponentId) -> TreeResult<&mut Scroller> {
        let scroller = Self::scroller(tree, id)?;
        tree.widget_checked_mut::<Scroller>(scroller)
    }

    /// Value units per second applied while a step button is held.
    #[must_use]
    pub const fn step(&self) -> f32 {
        self.step
    }

    /// Changes the hold rate. Negative rates are treated as their magnitude.
    pub fn set_step(&mut self, step: f32) {
        self.step = if step.is_finite() { step.abs() } else { 0.0 };
    }

    /// Current value.
    pub fn value(tree: &ComponentTree, id: ComponentId) -> TreeResult<f32> {
        Ok(Self::scroller_widget(tree, id)?.value())
    }

    /// Sets the value, clamped into the range.
    pub fn set_value(tree: &mut ComponentTree, id: ComponentId, value: f32) -> TreeResult<()> {
        let scroller = Self::scroller(tree, id)?;
        Scroller::set_value(tree, scroller, value)
    }

    /// Lower bound.
    pub fn minimum(tree: &ComponentTree, id: ComponentId) -> TreeResult<f32> {
        Ok(Self::scroller_widget(tree, id)?.minimum())
    }

    /// Changes the lower bound.
    pub fn set_minimum(tree: &mut ComponentTree, id: ComponentId, min: f32) -> TreeResult<()> {
        let scroller = Self::scroller(tree, id)?;
        Scroller::set_minimum(tree, scroller, min)
    }

    /// Upper bound.
    pub fn maximum(tree: &ComponentTree, id: ComponentId) -> TreeResult<f32> {
        Ok(Self::scroller_widget(tree, id)?.maximum())
    }

    /// Changes the upper bound.
    pub fn set_maximum(tree: &mut ComponentTree, id: ComponentId, max: f32) -> TreeResult<()> {
        let scroller = Self::scroller(tree, id)?;
        Scroller::set_maximum(tree, scroller, max)
    }

    /// Track direction.
    pub fn orientation(tree: &ComponentTree, id: ComponentId) -> TreeResult<Direction> {
        Ok(Self::scroller_widget(tree, id)?.orientation())
    }

    /// Changes the track direction and moves the buttons to match.
    pub fn set_orientation(tree: &mut ComponentTree, id: ComponentId, orientation: Direction) -> TreeResult<()> {
        let scroller = Self::scroller(tree, id)?;
        tree.widget_checked_mut::<Scroller>(scroller)?
            .set_orientation(orientation);
        tree.invalidate(scroller)?;
        Self::install_layout(tree, id, orientation)
    }

    /// True while the value is being changed by the user.
    pub fn is_adjusting(tree: &ComponentTree, id: ComponentId) -> TreeResult<bool> {
        Ok(Self::scroller_widget(tree, id)?.is_adjusting())
    }

    /// Marks the start or end of a user adjustment.
    pub fn set_adjusting(tree: &mut ComponentTree, id: ComponentId, adjusting: bool) -> TreeResult<()> {
        Self::scroller_widget_mut(tree, id)?.set_adjusting(adjusting);
        Ok(())
    }

    /// Thumb length in percent of the track.
    pub fn thumb_size(tree: &ComponentTree, id: ComponentId) -> TreeResult<i32> {
        Ok(Self::scroller_widget(tree, id)?.thumb_size())
    }

    /// Sets the thumb length, clamped to `0..=100` percent.
    pub fn set_thumb_size(tree: &mut ComponentTree, id: ComponentId, percentage: i32) -> TreeResult<()> {
        Self::scroller_widget_mut(tree, id)?.set_thumb_size(percentage);
        Ok(())
    }

    /// Registers a listener on the embedded scroller.
    pub fn add_change_listener(
        tree: &mut ComponentTree,
        id: ComponentId,
        listener: Rc<dyn ChangeListener>,
    ) -> TreeResult<()> {
        let scroller = Self::scroller(tree, id)?;
        Scroller::add_change_listener(tree, scroller, listener)
    }

    /// Unregisters a listener from the embedded scroller.
    pub fn remove_change_listener(
        tree: &mut ComponentTree,
        id: ComponentId,
        listener: &Rc<dyn ChangeListener>,
    ) -> TreeResult<bool> {
        let scroller = Self::scroller(tree, id)?;
        Scroller::remove_change_listener(tree, scroller, listener)
    }
}

impl Widget for Scrollbar {
    fn theme_name(&self) -> &'static str {
        "Scrollbar"
    }

    fn attach_behavior(&self, tree: &mut ComponentTree, id: ComponentId) {
        // A copy starts out with no button held.
        if let Some(bar) = tree.widget_mut::<Self>(id) {
            bar.change_by = 0.0;
        }
        let _ = Self::attach_repeat(tree, id);
    }
}

/// Starts and stops the hold-to-scroll motion from the step buttons.
#[derive(Debug, Clone, Copy, Default)]
struct ScrollbarInput;

impl ScrollbarInput {
    fn hold(tree: &mut ComponentTree, event: &MouseEvent, held: bool) {
        let triggered = tree
            .widget::<Button>(event.source)
            .is_some_and(|button| button.trigger_button() == event.button);
        if !triggered {
            return;
        }
        let Ok(Some(bar)) = tree.parent(event.source) else {
            return;
        };
        let direction = if Scrollbar::increment_button(tree, bar) == Ok(event.source) {
            1.0
        } else if Scrollbar::decrement_button(tree, bar) == Ok(event.source) {
            -1.0
        } else {
            return;
        };
        let Some(scrollbar) = tree.widget_mut::<Scrollbar>(bar) else {
            return;
        };
        scrollbar.change_by = if held { direction * scrollbar.step } else { 0.0 };
        let _ = Scrollbar::set_adjusting(tree, bar, held);
    }
}

impl MouseListener for ScrollbarInput {
    fn mouse_pressed(&self, tree: &mut ComponentTree, event: &MouseEvent) {
        Self::hold(tree, event, true);
    }

    fn mouse_released(&self, tree: &mut ComponentTree, event: &MouseEvent) {
        Self::hold(tree, event, false);
    }
}

/// Applies the held rate to the scroller on every tick.
#[derive(Debug, Clone, Copy, Default)]
struct ScrollRepeat;

impl Interpolator for ScrollRepeat {
    fn update(&self, tree: &mut ComponentTree, target: ComponentId, dt: f32) {
        let Some(change_by) = tree.widget::<Scrollbar>(target).map(|bar| bar.change_by) else {
            return;
        };
        if change_by.abs() <= f32::EPSILON {
            return;
        }
        let Ok(value) = Scrollbar::value(tree, target) else {
            return;
        };
        let _ = Scrollbar::set_value(tree, target, value + change_by * dt);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::event::ChangeEvent;
    use crate::geometry::{Point, Rect};
    use crate::input::MouseButton;

    fn bar(tree: &mut ComponentTree, orientation: Direction) -> ComponentId {
        Scrollbar::create(tree, 0.0, 8.0, 0.0, orientation).unwrap()
    }

    #[test]
    fn test_horizontal_parts_are_laid_out_left_to_right() {
        let mut tree = ComponentTree::new();
        let id = bar(&mut tree, Direction::Horizontal);
        tree.set_bounds(id, Rect::new(0, 0, 100, 16)).unwrap();

        tree.validate(id).unwrap();

        let decrement = Scrollbar::decrement_button(&tree, id).unwrap();
        let scroller = Scrollbar::scroller(&tree, id).unwrap();
        let increment = Scrollbar::increment_button(&tree, id).unwrap();
        assert_eq!(tree.bounds(decrement).unwrap(), Rect::new(0, 0, 16, 16));
        assert_eq!(tree.bounds(scroller).unwrap(), Rect::new(16, 0, 68, 16));
        assert_eq!(tree.bounds(increment).unwrap(), Rect::new(84, 0, 16, 16));
    }

    #[test]
    fn test_orientation_change_moves_buttons() {
        let mut tree = ComponentTree::new();
        let id = bar(&mut tree, Direction::Horizontal);
        tree.set_bounds(id, Rect::new(0, 0, 16, 100)).unwrap();

        Scrollbar::set_orientation(&mut tree, id, Direction::Vertical).unwrap();
        tree.validate(id).unwrap();

        let increment = Scrollbar::increment_button(&tree, id).unwrap();
        assert_eq!(tree.bounds(increment).unwrap(), Rect::new(0, 84, 16, 16));
        assert_eq!(Scrollbar::orientation(&tree, id).unwrap(), Direction::Vertical);
    }

    #[test]
    fn test_holding_increment_scrolls_until_release() {
        let mut tree = ComponentTree::new();
        let id = bar(&mut tree, Direction::Horizontal);
        let increment = Scrollbar::increment_button(&tree, id).unwrap();

        tree.process_mouse_event(&MouseEvent::pressed(increment, MouseButton::Right, Point::ORIGIN));
        assert!(Scrollbar::is_adjusting(&tree, id).unwrap());
        tree.update_component(id, 0.5).unwrap();
        tree.update_component(id, 0.5).unwrap();
        assert!((Scrollbar::value(&tree, id).unwrap() - 2.0).abs() < f32::EPSILON);

        tree.process_mouse_event(&MouseEvent::released(increment, MouseButton::Right, Point::ORIGIN));
        tree.update_component(id, 0.5).unwrap();
        assert!((Scrollbar::value(&tree, id).unwrap() - 2.0).abs() < f32::EPSILON);
        assert!(!Scrollbar::is_adjusting(&tree, id).unwrap());
    }

    #[test]
    fn test_decrement_stops_at_minimum() {
        let mut tree = ComponentTree::new();
        let id = bar(&mut tree, Direction::Horizontal);
        Scrollbar::set_value(&mut tree, id, 1.0).unwrap();
        let decrement = Scrollbar::decrement_button(&tree, id).unwrap();

        tree.process_mouse_event(&MouseEvent::pressed(decrement, MouseButton::Right, Point::ORIGIN));
        tree.update_component(id, 0.5).unwrap();
        tree.update_component(id, 0.5).unwrap();

        assert!(Scrollbar::value(&tree, id).unwrap().abs() < f32::EPSILON);
    }

    #[test]
    fn test_change_listeners_see_clamped_values() {
        let mut tree = ComponentTree::new();
        let id = bar(&mut tree, Direction::Vertical);
        let seen = Rc::new(Cell::new(0));
        let counter = Rc::clone(&seen);
        Scrollbar::add_change_listener(
            &mut tree,
            id,
            Rc::new(move |_: &mut ComponentTree, _: &ChangeEvent| counter.set(counter.get() + 1)),
        )
        .unwrap();

        Scrollbar::set_value(&mut tree, id, 100.0).unwrap();

        assert_eq!(seen.get(), 1);
        assert!((Scrollbar::value(&tree, id).unwrap() - 8.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_step_buttons_are_skipped_by_focus_cycling() {
        let mut tree = ComponentTree::new();
        let id = bar(&mut tree, Direction::Horizontal);
        let increment = Scrollbar::increment_button(&tree, id).unwrap();

        assert!(!tree.widget_dyn(increment).unwrap().can_hold_permanent_focus());
    }

    #[test]
    fn test_duplicate_keeps_part_order_and_scrolls() {
        let mut tree = ComponentTree::new();
        let id = bar(&mut tree, Direction::Horizontal);
        Scrollbar::set_value(&mut tree, id, 3.0).unwrap();

        let copy = tree.duplicate(id).unwrap();

        assert!((Scrollbar::value(&tree, copy).unwrap() - 3.0).abs() < f32::EPSILON);
        assert_ne!(Scrollbar::scroller(&tree, copy).unwrap(), Scrollbar::scroller(&tree, id).unwrap());
        assert_eq!(tree.component(copy).unwrap().interpolator_count(), 1);

        let increment = Scrollbar::increment_button(&tree, copy).unwrap();
        tree.process_mouse_event(&MouseEvent::pressed(increment, MouseButton::Right, Point::ORIGIN));
        tree.update_component(copy, 0.5).unwrap();
        tree.update_component(copy, 0.5).unwrap();

        assert!((Scrollbar::value(&tree, copy).unwrap() - 5.0).abs() < f32::EPSILON);
        assert!((Scrollbar::value(&tree, id).unwrap() - 3.0).abs() < f32::EPSILON);
        assert!(tree.widget::<Button>(increment).unwrap().is_selected());
    }

    #[test]
    fn test_duplicate_while_held_starts_idle() {
        let mut tree = ComponentTree::new();
        let id = bar(&mut tree, Direction::Horizontal);
        let increment = Scrollbar::increment_button(&tree, id).unwrap();
        tree.process_mouse_event(&MouseEvent::pressed(increment, MouseButton::Right, Point::ORIGIN));

        let copy = tree.duplicate(id).unwrap();
        tree.update_component(copy, 1.0).unwrap();

        assert!(Scrollbar::value(&tree, copy).unwrap().abs() < f32::EPSILON);
    }

    #[test]
    fn test_parts_of_a_leaf_are_rejected() {
        let mut tree = ComponentTree::new();
        let button = Button::create(&mut tree, "x");

        assert!(matches!(
            Scrollbar::scroller(&tree, button),
            Err(TreeError::WrongWidget { .. })
        ));
    }
}
