//! Components and the tree that owns them.
//!
//! [`ComponentTree`] is split over several files by concern: structure and
//! geometry in `tree`, lazy layout in `validation`, event channels in
//! `dispatch`, themes and painting in `presentation`. The remaining files
//! are concrete widgets.

mod button;
mod core;
mod dispatch;
mod panel;
mod presentation;
mod scrollbar;
mod scroller;
mod tree;
mod validation;

pub use self::button::{Button, ButtonInput, HorizontalAlignment};
pub use self::core::{Component, ComponentFlags, ComponentId, Depth, Role, Widget, WidgetBase};
pub use self::panel::{Panel, Spacer};
pub use self::scrollbar::Scrollbar;
pub use self::scroller::{Scroller, ScrollerInput};
pub use self::tree::ComponentTree;
