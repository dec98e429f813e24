//! Borders.
//!
//! A component owns at most one border. Attaching one overwrites the
//! component's insets with [`Border::border_insets`]; see
//! [`crate::ComponentTree::set_border`].

use std::fmt;

use crate::geometry::Insets;
use crate::render::Surface;
use crate::style::{Color, Paint};
use crate::widget::Component;

/// A decoration painted around a component's content.
pub trait Border: BorderClone + fmt::Debug {
    /// Paints the border inside the given local rectangle.
    fn paint_border(
        &self,
        component: &Component,
        surface: &mut dyn Surface,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    );

    /// Space this border needs inside the component's bounds.
    fn border_insets(&self) -> Insets;
}

/// Deep copy support for boxed borders.
pub trait BorderClone {
    /// Returns an independent copy of this border.
    fn clone_border(&self) -> Box<dyn Border>;
}

impl<T> BorderClone for T
where
    T: Border + Clone + 'static,
{
    fn clone_border(&self) -> Box<dyn Border> {
        Box::new(self.clone())
    }
}

impl Clone for Box<dyn Border> {
    fn clone(&self) -> Self {
        self.as_ref().clone_border()
    }
}

/// A border that only reserves space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyBorder {
    insets: Insets,
}

impl EmptyBorder {
    /// Creates a border reserving the given insets.
    #[must_use]
    pub const fn new(insets: Insets) -> Self {
        Self { insets }
    }
}

impl Border for EmptyBorder {
    fn paint_border(&self, _: &Component, _: &mut dyn Surface, _: i32, _: i32, _: i32, _: i32) {}

    fn border_insets(&self) -> Insets {
        self.insets
    }
}

/// A solid frame of fixed thickness.
#[derive(Debug, Clone, PartialEq)]
pub struct LineBorder {
    paint: Paint,
    thickness: i32,
}

impl LineBorder {
    /// Creates a line border.
    #[must_use]
    pub fn new(color: Color, thickness: i32) -> Self {
        Self {
            paint: Paint::Solid(color),
            thickness: thickness.max(0),
        }
    }

    /// Returns the frame thickness.
    #[must_use]
    pub const fn thickness(&self) -> i32 {
        self.thickness
    }
}

impl Border for LineBorder {
    fn paint_border(
        &self,
        _component: &Component,
        surface: &mut dyn Surface,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) {
        let t = self.thickness;
        if t == 0 {
            return;
        }
        surface.set_paint(&self.paint);
        surface.fill_rect(x, y, width, t);
        surface.fill_rect(x, y + height - t, width, t);
        surface.fill_rect(x, y + t, t, height - 2 * t);
        surface.fill_rect(x + width - t, y + t, t, height - 2 * t);
    }

    fn border_insets(&self) -> Insets {
        Insets::uniform(self.thickness)
    }
}

/// Bevel direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Bevel {
    /// Looks pushed out (an unpressed control).
    #[default]
    Raised,
    /// Looks pushed in (a pressed control).
    Lowered,
}

/// Classic two-tone bevel.
#[derive(Debug, Clone, PartialEq)]
pub struct BevelBorder {
    bevel: Bevel,
    highlight: Paint,
    shadow: Paint,
}

impl BevelBorder {
    /// Bevel thickness in pixels.
    pub const THICKNESS: i32 = 2;

    /// Creates a bevel with the default light/dark tones.
    #[must_use]
    pub fn new(bevel: Bevel) -> Self {
        Self {
            bevel,
            highlight: Paint::Solid(Color::WHITE),
            shadow: Paint::Solid(Color::DARK_GRAY),
        }
    }

    /// A raised bevel.
    #[must_use]
    pub fn raised() -> Self {
        Self::new(Bevel::Raised)
    }

    /// A lowered bevel.
    #[must_use]
    pub fn lowered() -> Self {
        Self::new(Bevel::Lowered)
    }

    /// Overrides the highlight and shadow colors.
    #[must_use]
    pub fn with_colors(mut self, highlight: Color, shadow: Color) -> Self {
        self.highlight = Paint::Solid(highlight);
        self.shadow = Paint::Solid(shadow);
        self
    }

    /// Returns the bevel direction.
    #[must_use]
    pub const fn bevel(&self) -> Bevel {
        self.bevel
    }

    /// Changes the bevel direction.
    pub fn set_bevel(&mut self, bevel: Bevel) {
        self.bevel = bevel;
    }
}

impl Border for BevelBorder {
    fn paint_border(
        &self,
        _component: &Component,
        surface: &mut dyn Surface,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) {
        // Raised: light on top/left, dark on bottom/right. Lowered swaps them.
        let (top_left, bottom_right) = match self.bevel {
            Bevel::Raised => (&self.highlight, &self.shadow),
            Bevel::Lowered => (&self.shadow, &self.highlight),
        };
        let right = x + width - 1;
        let bottom = y + height - 1;

        surface.set_line_width(1.0);
        surface.set_paint(top_left);
        for i in 0..Self::THICKNESS {
            surface.draw_line(x + i, y + i, right - i, y + i);
            surface.draw_line(x + i, y + i, x + i, bottom - i);
        }
        surface.set_paint(bottom_right);
        for i in 0..Self::THICKNESS {
            surface.draw_line(x + i, bottom - i, right - i, bottom - i);
            surface.draw_line(right - i, y + i, right - i, bottom - i);
        }
    }

    fn border_insets(&self) -> Insets {
        Insets::uniform(Self::THICKNESS)
    }
}
