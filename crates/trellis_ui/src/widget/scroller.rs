//! The sliding thumb of a scrollbar.

use std::rc::Rc;

use super::{Component, ComponentId, ComponentTree, Widget};
use crate::error::TreeResult;
use crate::event::{
    property, ChangeEvent, ChangeListener, ListenerList, MouseEvent, MouseListener, PropertyValue,
};
use crate::geometry::{Dimension, Point, Rect};
use crate::layout::Direction;
use crate::render::Surface;

/// A bounded value shown as a thumb on a track.
#[derive(Debug)]
pub struct Scroller {
    min: f32,
    max: f32,
    value: f32,
    orientation: Direction,
    /// Thumb length as a percentage of the track.
    thumb_size: i32,
    adjusting: bool,
    change_listeners: ListenerList<dyn ChangeListener>,
}

impl Clone for Scroller {
    /// Copies the range. Change listeners are not copied.
    fn clone(&self) -> Self {
        Self {
            change_listeners: ListenerList::new(),
            ..*self
        }
    }
}

impl Scroller {
    /// Default thumb length, in percent of the track.
    pub const DEFAULT_THUMB_SIZE: i32 = 20;

    /// Thickness across the track.
    pub const BREADTH: i32 = 16;

    /// Creates a scroller. A reversed range is swapped and the value is
    /// clamped into it.
    #[must_use]
    pub fn new(min: f32, max: f32, value: f32, orientation: Direction) -> Self {
        let (min, max) = if max < min { (max, min) } else { (min, max) };
        Self {
            min,
            max,
            value: value.clamp(min, max),
            orientation,
            thumb_size: Self::DEFAULT_THUMB_SIZE,
            adjusting: false,
            change_listeners: ListenerList::new(),
        }
    }

    /// Adds a scroller to the tree and wires up pointer dragging.
    pub fn create(tree: &mut ComponentTree, scroller: Self) -> ComponentId {
        let id = tree.create(scroller);
        let _ = tree.add_mouse_listener(id, Rc::new(ScrollerInput));
        id
    }

    /// Lower bound.
    #[must_use]
    pub const fn minimum(&self) -> f32 {
        self.min
    }

    /// Upper bound.
    #[must_use]
    pub const fn maximum(&self) -> f32 {
        self.max
    }

    /// Current value, always within `[minimum, maximum]`.
    #[must_use]
    pub const fn value(&self) -> f32 {
        self.value
    }

    /// Track direction.
    #[must_use]
    pub const fn orientation(&self) -> Direction {
        self.orientation
    }

    /// Changes the track direction.
    pub fn set_orientation(&mut self, orientation: Direction) {
        self.orientation = orientation;
    }

    /// True while the user is dragging the thumb.
    #[must_use]
    pub const fn is_adjusting(&self) -> bool {
        self.adjusting
    }

    /// Marks the start or end of a drag.
    pub fn set_adjusting(&mut self, adjusting: bool) {
        self.adjusting = adjusting;
    }

    /// Thumb length in percent of the track.
    #[must_use]
    pub const fn thumb_size(&self) -> i32 {
        self.thumb_size
    }

    /// Sets the thumb length, clamped to `0..=100` percent.
    pub fn set_thumb_size(&mut self, percentage: i32) {
        self.thumb_size = percentage.clamp(0, 100);
    }

    /// Position of the value within the range, in `[0, 1]`.
    #[must_use]
    pub fn fraction(&self) -> f32 {
        let span = self.max - self.min;
        if span <= 0.0 {
            0.0
        } else {
            (self.value - self.min) / span
        }
    }

    /// Registers a listener notified whenever the value changes.
    pub fn add_change_listener(
        tree: &mut ComponentTree,
        id: ComponentId,
        listener: Rc<dyn ChangeListener>,
    ) -> TreeResult<()> {
        tree.widget_checked_mut::<Self>(id)?.change_listeners.add(listener);
        Ok(())
    }

    /// Unregisters a change listener. Returns false if it was not registered.
    pub fn remove_change_listener(
        tree: &mut ComponentTree,
        id: ComponentId,
        listener: &Rc<dyn ChangeListener>,
    ) -> TreeResult<bool> {
        Ok(tree
            .widget_checked_mut::<Self>(id)?
            .change_listeners
            .remove(listener))
    }

    /// Notifies change listeners, against a snapshot like every other channel.
    pub fn fire_state_changed(tree: &mut ComponentTree, id: ComponentId) -> TreeResult<usize> {
        let listeners = tree.widget_checked::<Self>(id)?.change_listeners.snapshot();
        let event = ChangeEvent { source: id };
        for listener in &listeners {
            listener.state_changed(tree, &event);
        }
        Ok(listeners.len())
    }

    /// Sets the value, clamped into the range.
    ///
    /// A real change notifies change listeners and publishes
    /// [`property::VALUE`].
    pub fn set_value(tree: &mut ComponentTree, id: ComponentId, value: f32) -> TreeResult<()> {
        let scroller = tree.widget_checked_mut::<Self>(id)?;
        let value = if value.is_nan() {
            scroller.value
        } else {
            value.clamp(scroller.min, scroller.max)
        };
        let old = scroller.value;
        if (old - value).abs() <= f32::EPSILON {
            return Ok(());
        }
        scroller.value = value;
        Self::fire_state_changed(tree, id)?;
        tree.fire_property_change(
            id,
            property::VALUE,
            PropertyValue::Float(old),
            PropertyValue::Float(value),
        );
        Ok(())
    }

    /// Changes the lower bound; the value is pulled back into range.
    pub fn set_minimum(tree: &mut ComponentTree, id: ComponentId, min: f32) -> TreeResult<()> {
        let scroller = tree.widget_checked_mut::<Self>(id)?;
        scroller.min = min;
        scroller.max = scroller.max.max(min);
        let value = scroller.value;
        Self::clamp_after_range_change(tree, id, value)
    }

    /// Changes the upper bound; the value is pulled back into range.
    pub fn set_maximum(tree: &mut ComponentTree, id: ComponentId, max: f32) -> TreeResult<()> {
        let scroller = tree.widget_checked_mut::<Self>(id)?;
        scroller.max = max;
        scroller.min = scroller.min.min(max);
        let value = scroller.value;
        Self::clamp_after_range_change(tree, id, value)
    }

    fn clamp_after_range_change(tree: &mut ComponentTree, id: ComponentId, value: f32) -> TreeResult<()> {
        Self::set_value(tree, id, value)?;
        tree.invalidate(id)
    }

    /// Thumb rectangle in the scroller's local space.
    #[must_use]
    pub fn thumb_bounds(&self, component: &Component) -> Rect {
        let track = Rect::from_parts(Point::ORIGIN, component.size()).inset(component.insets());
        let fraction = self.fraction();
        match self.orientation {
            Direction::Horizontal => {
                let length = track.width * self.thumb_size / 100;
                let offset = ((track.width - length) as f32 * fraction).round() as i32;
                Rect::new(track.x + offset, track.y, length, track.height)
            }
            Direction::Vertical => {
                let length = track.height * self.thumb_size / 100;
                let offset = ((track.height - length) as f32 * fraction).round() as i32;
                Rect::new(track.x, track.y + offset, track.width, length)
            }
        }
    }

    /// Value under a point in the scroller's local space.
    #[must_use]
    pub fn value_at(&self, component: &Component, position: Point) -> f32 {
        let track = Rect::from_parts(Point::ORIGIN, component.size()).inset(component.insets());
        let (along, extent) = match self.orientation {
            Direction::Horizontal => (position.x - track.x, track.width),
            Direction::Vertical => (position.y - track.y, track.height),
        };
        if extent <= 0 {
            return self.min;
        }
        let fraction = (along as f32 / extent as f32).clamp(0.0, 1.0);
        self.min + (self.max - self.min) * fraction
    }
}

impl Widget for Scroller {
    fn theme_name(&self) -> &'static str {
        "Scroller"
    }

    fn paint_component(&self, component: &Component, surface: &mut dyn Surface) {
        component.fill_background(surface);
        if let Some(foreground) = component.foreground() {
            let thumb = self.thumb_bounds(component);
            surface.set_paint(&foreground);
            surface.fill_rect(thumb.x, thumb.y, thumb.width, thumb.height);
        }
    }

    fn preferred_size(&self, component: &Component) -> Dimension {
        let track = match self.orientation {
            Direction::Horizontal => Dimension::new(Self::BREADTH * 3, Self::BREADTH),
            Direction::Vertical => Dimension::new(Self::BREADTH, Self::BREADTH * 3),
        };
        track.expand(component.insets())
    }

    fn attach_behavior(&self, tree: &mut ComponentTree, id: ComponentId) {
        let _ = tree.add_mouse_listener(id, Rc::new(ScrollerInput));
    }
}

/// Pointer handling for [`Scroller`]: press or drag moves the value to the
/// pointer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScrollerInput;

impl ScrollerInput {
    fn track(tree: &mut ComponentTree, event: &MouseEvent) {
        let Ok(component) = tree.component(event.source) else {
            return;
        };
        let Some(scroller) = tree.widget::<Scroller>(event.source) else {
            return;
        };
        let value = scroller.value_at(component, event.position);
        let _ = Scroller::set_value(tree, event.source, value);
    }
}

impl MouseListener for ScrollerInput {
    fn mouse_pressed(&self, tree: &mut ComponentTree, event: &MouseEvent) {
        if let Some(scroller) = tree.widget_mut::<Scroller>(event.source) {
            scroller.set_adjusting(true);
        }
        Self::track(tree, event);
    }

    fn mouse_dragged(&self, tree: &mut ComponentTree, event: &MouseEvent) {
        Self::track(tree, event);
    }

    fn mouse_released(&self, tree: &mut ComponentTree, event: &MouseEvent) {
        if let Some(scroller) = tree.widget_mut::<Scroller>(event.source) {
            scroller.set_adjusting(false);
        }
    }
}
