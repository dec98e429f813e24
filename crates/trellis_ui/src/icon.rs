//! Fixed-size images painted by widgets.

use std::fmt;

use crate::geometry::Dimension;
use crate::render::Surface;
use crate::widget::Component;

/// A fixed-size picture.
pub trait Icon: fmt::Debug {
    /// Paints the icon with its top-left corner at `(x, y)` in local space.
    fn paint(&self, component: &Component, surface: &mut dyn Surface, x: i32, y: i32);

    /// Width in pixels.
    fn icon_width(&self) -> i32;

    /// Height in pixels.
    fn icon_height(&self) -> i32;

    /// Width and height together.
    fn icon_size(&self) -> Dimension {
        Dimension::new(self.icon_width(), self.icon_height())
    }
}
