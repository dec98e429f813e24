//! # Trellis UI
//!
//! Retained-mode component tree for immediate, per-frame painting:
//! - Arena of components with checked parent/child links
//! - Lazy layout: invalidate on change, lay out once per frame
//! - Typed listener channels delivered against snapshots
//! - Theme delegates that style components through public setters
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        FRAME PIPELINE                        │
//! ├──────────────────────────────────────────────────────────────┤
//! │  Resolved Input → Listeners → Interpolators → Validate → Paint│
//! │        ↓              ↓             ↓            ↓        ↓   │
//! │   process_*()    mutate tree   update_tree   layouts  Surface │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Hit-testing, platform input and rasterization live outside this crate.
//! Events arrive with their target already resolved, and painting goes
//! through the [`Surface`] trait.
//!
//! ## Example
//!
//! ```
//! use std::rc::Rc;
//! use trellis_ui::{
//!     Button, CommandBuffer, ComponentTree, FlowLayout, FocusManager, Panel, Rect,
//!     ThemeRegistry,
//! };
//!
//! let themes = ThemeRegistry::basic();
//! let mut tree = ComponentTree::new();
//! let root = tree.create_root(Panel::new());
//! tree.set_layout(root, Rc::new(FlowLayout::horizontal())).unwrap();
//! tree.set_bounds(root, Rect::new(0, 0, 320, 40)).unwrap();
//!
//! let ok = Button::create(&mut tree, "OK");
//! tree.add_child(root, ok).unwrap();
//! themes.apply_recursive(&mut tree, root).unwrap();
//!
//! let mut focus = FocusManager::new(root);
//! focus.request_focus(&mut tree, ok).unwrap();
//!
//! let mut surface = CommandBuffer::new();
//! tree.frame(1.0 / 60.0, &mut surface);
//! assert!(tree.is_valid(root));
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod animation;
pub mod border;
pub mod error;
pub mod event;
pub mod focus;
pub mod geometry;
pub mod icon;
pub mod input;
pub mod layout;
pub mod render;
pub mod style;
pub mod theme;
pub mod widget;

pub use animation::{Easing, FadeInterpolator, Interpolator, SlideInterpolator, Tween};
pub use border::{BevelBorder, Border, EmptyBorder, LineBorder};
pub use error::{LayoutError, ThemeError, TreeError, TreeResult};
pub use event::{
    ChangeEvent, ChangeListener, FocusEvent, FocusListener, KeyEvent, KeyListener, MouseEvent,
    MouseListener, PropertyEvent, PropertyListener, PropertyValue,
};
pub use focus::FocusManager;
pub use geometry::{Dimension, Insets, Point, Rect};
pub use icon::Icon;
pub use input::{Key, Modifiers, MouseButton};
pub use layout::{BorderLayout, Direction, FlowLayout, LayoutManager, Region};
pub use render::{CommandBuffer, RenderCommand, Surface, Transform};
pub use style::{Color, Paint};
pub use theme::{ThemeConfig, ThemeDelegate, ThemeRegistry};
pub use widget::{
    Button, Component, ComponentFlags, ComponentId, ComponentTree, Depth, Panel, Role, Scrollbar,
    Scroller, Spacer, Widget,
};
