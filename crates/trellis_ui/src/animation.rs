//! Time-based motion.
//!
//! Interpolators are registered per component and polled from
//! [`ComponentTree::update_component`] once per tick. They change the
//! component through the tree's public setters, so every step publishes
//! the usual property notifications.

use std::cell::RefCell;

use crate::geometry::Point;
use crate::widget::{ComponentId, ComponentTree};

/// Per-tick hook attached to a component.
pub trait Interpolator {
    /// Advances by `dt` seconds and applies the result to `target`.
    fn update(&self, tree: &mut ComponentTree, target: ComponentId, dt: f32);

    /// Finished interpolators are unregistered after the tick they finish in.
    fn is_finished(&self) -> bool {
        false
    }
}

impl<F> Interpolator for F
where
    F: Fn(&mut ComponentTree, ComponentId, f32),
{
    fn update(&self, tree: &mut ComponentTree, target: ComponentId, dt: f32) {
        self(tree, target, dt);
    }
}

/// Shape of a tween's progress curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// Constant speed.
    Linear,
    /// Fast start, settles into the end value.
    #[default]
    ExponentialOut,
    /// Slow start, accelerates into the end value.
    ExponentialIn,
    /// Slow at both ends.
    ExponentialInOut,
    /// Jumps straight to the end value.
    Instant,
}

impl Easing {
    /// Maps linear progress in `[0, 1]` to eased progress. Both ends are exact.
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        if self == Self::Instant || t >= 1.0 {
            return 1.0;
        }
        if t <= 0.0 {
            return 0.0;
        }
        let exp2 = |x: f32| 2.0_f32.powf(x);
        match self {
            Self::Linear => t,
            Self::ExponentialOut => 1.0 - exp2(-10.0 * t),
            Self::ExponentialIn => exp2(10.0 * t - 10.0),
            Self::ExponentialInOut if t < 0.5 => exp2(20.0 * t - 10.0) * 0.5,
            Self::ExponentialInOut => 1.0 - exp2(10.0 - 20.0 * t) * 0.5,
            Self::Instant => 1.0,
        }
    }
}

/// A scalar moving from one value to another over a fixed duration.
#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    from: f32,
    to: f32,
    elapsed: f32,
    duration: f32,
    easing: Easing,
}

impl Tween {
    /// A tween taking `duration` seconds. Negative durations count as zero.
    #[must_use]
    pub fn new(from: f32, to: f32, duration: f32, easing: Easing) -> Self {
        Self {
            from,
            to,
            elapsed: 0.0,
            duration: duration.max(0.0),
            easing,
        }
    }

    /// Value at the current time.
    #[must_use]
    pub fn value(&self) -> f32 {
        if self.is_finished() {
            return self.to;
        }
        self.from + (self.to - self.from) * self.easing.apply(self.elapsed / self.duration)
    }

    /// Start value.
    #[must_use]
    pub fn start(&self) -> f32 {
        self.from
    }

    /// End value.
    #[must_use]
    pub fn end(&self) -> f32 {
        self.to
    }

    /// True once the full duration has elapsed.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Moves time forward by `dt` seconds. Time never runs backwards.
    pub fn advance(&mut self, dt: f32) {
        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.duration);
    }
}

/// Animates a component's transparency.
#[derive(Debug)]
pub struct FadeInterpolator {
    tween: RefCell<Tween>,
}

impl FadeInterpolator {
    /// Fades from `from` to `to` over `duration` seconds.
    #[must_use]
    pub fn new(from: f32, to: f32, duration: f32, easing: Easing) -> Self {
        Self {
            tween: RefCell::new(Tween::new(from, to, duration, easing)),
        }
    }

    /// Fully transparent to opaque.
    #[must_use]
    pub fn fade_in(duration: f32) -> Self {
        Self::new(0.0, 1.0, duration, Easing::ExponentialOut)
    }

    /// Opaque to fully transparent.
    #[must_use]
    pub fn fade_out(duration: f32) -> Self {
        Self::new(1.0, 0.0, duration, Easing::ExponentialOut)
    }
}

impl Interpolator for FadeInterpolator {
    fn update(&self, tree: &mut ComponentTree, target: ComponentId, dt: f32) {
        let value = {
            let mut tween = self.tween.borrow_mut();
            tween.advance(dt);
            tween.value()
        };
        // Destroyed targets stop receiving values.
        let _ = tree.set_transparency(target, value);
    }

    fn is_finished(&self) -> bool {
        self.tween.borrow().is_finished()
    }
}

/// Animates a component's location along a straight line.
#[derive(Debug)]
pub struct SlideInterpolator {
    from: Point,
    to: Point,
    progress: RefCell<Tween>,
}

impl SlideInterpolator {
    /// Slides from `from` to `to` over `duration` seconds.
    #[must_use]
    pub fn new(from: Point, to: Point, duration: f32, easing: Easing) -> Self {
        Self {
            from,
            to,
            progress: RefCell::new(Tween::new(0.0, 1.0, duration, easing)),
        }
    }

    fn position(&self, t: f32) -> Point {
        let lerp = |a: i32, b: i32| (a as f32 + (b - a) as f32 * t).round() as i32;
        Point::new(lerp(self.from.x, self.to.x), lerp(self.from.y, self.to.y))
    }
}

impl Interpolator for SlideInterpolator {
    fn update(&self, tree: &mut ComponentTree, target: ComponentId, dt: f32) {
        let t = {
            let mut progress = self.progress.borrow_mut();
            progress.advance(dt);
            progress.value()
        };
        let _ = tree.set_location(target, self.position(t));
    }

    fn is_finished(&self) -> bool {
        self.progress.borrow().is_finished()
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::widget::Panel;

    #[test]
    fn test_easing_endpoints_are_exact() {
        for easing in [
            Easing::Linear,
            Easing::ExponentialOut,
            Easing::ExponentialIn,
            Easing::ExponentialInOut,
        ] {
            assert_eq!(easing.apply(0.0), 0.0, "{easing:?}");
            assert_eq!(easing.apply(1.0), 1.0, "{easing:?}");
        }
        assert_eq!(Easing::Instant.apply(0.0), 1.0);
        assert!(Easing::ExponentialOut.apply(0.3) > 0.8);
        assert!(Easing::ExponentialIn.apply(0.3) < 0.05);
    }

    #[test]
    fn test_tween_ends_on_target() {
        let mut tween = Tween::new(10.0, 20.0, 0.5, Easing::Linear);
        tween.advance(0.25);
        assert_eq!(tween.value(), 15.0);
        assert!(!tween.is_finished());

        tween.advance(1.0);
        assert!(tween.is_finished());
        assert_eq!(tween.value(), 20.0);
    }

    #[test]
    fn test_zero_duration_is_finished_immediately() {
        let tween = Tween::new(0.0, 5.0, -1.0, Easing::Linear);
        assert!(tween.is_finished());
        assert_eq!(tween.value(), 5.0);
    }

    #[test]
    fn test_fade_drives_transparency_and_unregisters() {
        let mut tree = ComponentTree::new();
        let root = tree.create_root(Panel::new());
        tree.add_interpolator(root, Rc::new(FadeInterpolator::new(1.0, 0.0, 0.5, Easing::Linear)))
            .unwrap();

        tree.update_component(root, 0.25).unwrap();
        assert_eq!(tree.component(root).unwrap().transparency(), 0.5);
        assert_eq!(tree.component(root).unwrap().interpolator_count(), 1);

        tree.update_component(root, 0.25).unwrap();
        assert_eq!(tree.component(root).unwrap().transparency(), 0.0);
        assert_eq!(tree.component(root).unwrap().interpolator_count(), 0);
    }

    #[test]
    fn test_slide_moves_location() {
        let mut tree = ComponentTree::new();
        let root = tree.create_root(Panel::new());
        let slide = SlideInterpolator::new(
            Point::new(0, 0),
            Point::new(40, 20),
            1.0,
            Easing::Linear,
        );
        tree.add_interpolator(root, Rc::new(slide)).unwrap();

        tree.update_component(root, 0.5).unwrap();
        assert_eq!(tree.location(root).unwrap(), Point::new(20, 10));

        tree.update_component(root, 0.5).unwrap();
        assert_eq!(tree.location(root).unwrap(), Point::new(40, 20));
        assert_eq!(tree.component(root).unwrap().interpolator_count(), 0);
    }
}
