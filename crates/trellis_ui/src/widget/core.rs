//! Core component types and the widget capability trait.

use std::any::Any;
use std::fmt;
use std::rc::{Rc, Weak};

use super::ComponentTree;
use crate::animation::Interpolator;
use crate::border::Border;
use crate::event::{FocusListener, KeyListener, ListenerList, MouseListener, PropertyListener};
use crate::geometry::{Dimension, Insets, Point, Rect};
use crate::layout::LayoutManager;
use crate::render::Surface;
use crate::style::{Color, Paint};
use crate::theme::ThemeDelegate;

/// Unique identifier for a component. Never reused within a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ComponentId(pub u64);

impl ComponentId {
    /// Creates a new component ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Component state flags (bitfield).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentFlags(u32);

impl ComponentFlags {
    /// Component is painted.
    pub const VISIBLE: u32 = 1 << 0;
    /// Component accepts user input.
    pub const ENABLED: u32 = 1 << 1;
    /// Component is the focus owner of its scope.
    pub const FOCUSED: u32 = 1 << 2;
    /// Cached layout results may be trusted.
    pub const VALID: u32 = 1 << 3;
    /// The attached border, if any, is painted.
    pub const BORDER_PAINTED: u32 = 1 << 4;

    /// Flags of a freshly constructed component. Note: not valid.
    pub const DEFAULT: Self = Self(Self::VISIBLE | Self::ENABLED | Self::BORDER_PAINTED);

    /// Creates new flags with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self::DEFAULT
    }

    /// Returns true if the flag is set.
    #[inline]
    #[must_use]
    pub const fn has(self, flag: u32) -> bool {
        (self.0 & flag) != 0
    }

    /// Sets a flag.
    #[inline]
    pub fn set(&mut self, flag: u32) {
        self.0 |= flag;
    }

    /// Clears a flag.
    #[inline]
    pub fn clear(&mut self, flag: u32) {
        self.0 &= !flag;
    }

    /// Sets or clears a flag.
    #[inline]
    pub fn assign(&mut self, flag: u32, on: bool) {
        if on {
            self.set(flag);
        } else {
            self.clear(flag);
        }
    }
}

impl Default for ComponentFlags {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Stacking class among siblings.
///
/// Siblings paint in ascending [`Depth::stacking_order`], so popups land on
/// top of normal components regardless of insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Depth {
    /// Ordinary components.
    #[default]
    Normal,
    /// Modal components in the normal layer.
    NormalModal,
    /// Popups such as menus.
    Popup,
    /// Modal popups such as dialogs.
    PopupModal,
}

impl Depth {
    /// All depths, bottom to top.
    pub const ALL: [Self; 4] = [
        Self::Normal,
        Self::NormalModal,
        Self::Popup,
        Self::PopupModal,
    ];

    /// Paint priority. Higher values are painted later and so appear on top.
    #[must_use]
    pub const fn stacking_order(self) -> u8 {
        match self {
            Self::Normal => 0,
            Self::NormalModal => 1,
            Self::Popup => 2,
            Self::PopupModal => 3,
        }
    }

    /// Legacy depth code (8, 4, 2, 1). Lower codes sit on top.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Normal => 8,
            Self::NormalModal => 4,
            Self::Popup => 2,
            Self::PopupModal => 1,
        }
    }

    /// Parses a legacy depth code.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            8 => Some(Self::Normal),
            4 => Some(Self::NormalModal),
            2 => Some(Self::Popup),
            1 => Some(Self::PopupModal),
            _ => None,
        }
    }
}

/// Structural role of a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Has no children.
    Leaf,
    /// Owns children and participates in layout.
    Container,
    /// A container at the top of the tree; never has a parent.
    RootContainer,
}

impl Role {
    /// Returns true for both container roles.
    #[must_use]
    pub const fn is_container(self) -> bool {
        matches!(self, Self::Container | Self::RootContainer)
    }
}

/// Per-widget behavior layered on top of a component.
///
/// The tree owns geometry, flags and listeners; a widget supplies what is
/// specific to its kind: painting, sizing and focus policy. Widgets reach
/// their own state through [`crate::ComponentTree::widget`] and
/// [`crate::ComponentTree::widget_mut`].
pub trait Widget: WidgetBase + fmt::Debug {
    /// Theme name given to new components of this kind.
    fn theme_name(&self) -> &'static str {
        "Component"
    }

    /// Paints the component's content in local coordinates.
    fn paint_component(&self, component: &Component, surface: &mut dyn Surface) {
        component.fill_background(surface);
    }

    /// Paints the picking silhouette in the given selection color.
    fn paint_selection_component(
        &self,
        component: &Component,
        surface: &mut dyn Surface,
        color: Color,
    ) {
        let size = component.size();
        surface.set_paint(&Paint::Solid(color));
        surface.fill_rect(0, 0, size.width, size.height);
    }

    /// Size this widget would like, computed while the component is invalid.
    ///
    /// Must be free of side effects; the tree caches the result.
    fn preferred_size(&self, component: &Component) -> Dimension {
        component.insets().minimum_size()
    }

    /// Whether a focus manager may park permanent focus here.
    fn can_hold_permanent_focus(&self) -> bool {
        true
    }

    /// Per-tick hook for time based motion.
    fn update(&mut self, _component: &mut Component, _dt: f32) {}

    /// Registers the listeners and interpolators this widget drives itself
    /// with on component `id`.
    ///
    /// Runs once for components built by the widget's own constructor and
    /// again for every copy made by [`ComponentTree::duplicate`], after the
    /// copy's children exist. Listeners added by anyone else are not
    /// carried over to copies.
    fn attach_behavior(&self, _tree: &mut ComponentTree, _id: ComponentId) {}
}

/// Object plumbing every widget gets for free from `Clone + 'static`.
pub trait WidgetBase {
    /// Returns an independent copy of this widget.
    fn clone_widget(&self) -> Box<dyn Widget>;

    /// Upcast for downcasting to the concrete widget type.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for downcasting to the concrete widget type.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T> WidgetBase for T
where
    T: Widget + Clone + 'static,
{
    fn clone_widget(&self) -> Box<dyn Widget> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Geometry and appearance state: the part of a component that copies.
#[derive(Debug, Clone)]
pub(crate) struct VisualState {
    pub(crate) bounds: Rect,
    pub(crate) insets: Insets,
    pub(crate) border: Option<Box<dyn Border>>,
    pub(crate) foreground: Option<Weak<Paint>>,
    pub(crate) background: Option<Weak<Paint>>,
    pub(crate) flags: ComponentFlags,
    pub(crate) depth: Depth,
    pub(crate) theme_name: String,
    pub(crate) transparency: f32,
    pub(crate) rotation: f32,
    pub(crate) preferred_size_hint: Option<Dimension>,
}

impl VisualState {
    fn new(theme_name: &str) -> Self {
        Self {
            bounds: Rect::ZERO,
            insets: Insets::ZERO,
            border: None,
            foreground: None,
            background: None,
            flags: ComponentFlags::DEFAULT,
            depth: Depth::Normal,
            theme_name: theme_name.to_owned(),
            transparency: 1.0,
            rotation: 0.0,
            preferred_size_hint: None,
        }
    }

    /// Copy for a different node: deep border, shared paints, not focused,
    /// not valid.
    pub(crate) fn detached_copy(&self) -> Self {
        let mut copy = self.clone();
        copy.flags.clear(ComponentFlags::FOCUSED);
        copy.flags.clear(ComponentFlags::VALID);
        copy
    }
}

/// A node of the component tree.
pub struct Component {
    pub(crate) id: ComponentId,
    pub(crate) role: Role,
    pub(crate) parent: Option<ComponentId>,
    pub(crate) children: Vec<ComponentId>,
    pub(crate) layout: Option<Rc<dyn LayoutManager>>,
    pub(crate) state: VisualState,
    pub(crate) preferred_size_cache: Option<Dimension>,
    pub(crate) theme: Option<Weak<dyn ThemeDelegate>>,
    pub(crate) mouse_listeners: ListenerList<dyn MouseListener>,
    pub(crate) key_listeners: ListenerList<dyn KeyListener>,
    pub(crate) focus_listeners: ListenerList<dyn FocusListener>,
    pub(crate) property_listeners: ListenerList<dyn PropertyListener>,
    pub(crate) interpolators: ListenerList<dyn Interpolator>,
}

impl Component {
    pub(crate) fn new(id: ComponentId, role: Role, theme_name: &str) -> Self {
        Self {
            id,
            role,
            parent: None,
            children: Vec::new(),
            layout: None,
            state: VisualState::new(theme_name),
            preferred_size_cache: None,
            theme: None,
            mouse_listeners: ListenerList::new(),
            key_listeners: ListenerList::new(),
            focus_listeners: ListenerList::new(),
            property_listeners: ListenerList::new(),
            interpolators: ListenerList::new(),
        }
    }

    /// Returns the component's id.
    #[must_use]
    pub const fn id(&self) -> ComponentId {
        self.id
    }

    /// Returns the structural role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// True for containers and root containers.
    #[must_use]
    pub const fn is_container(&self) -> bool {
        self.role.is_container()
    }

    /// True only for root containers.
    #[must_use]
    pub const fn is_root_container(&self) -> bool {
        matches!(self.role, Role::RootContainer)
    }

    /// The owning container, `None` for roots and detached components.
    #[must_use]
    pub const fn parent(&self) -> Option<ComponentId> {
        self.parent
    }

    /// Children in insertion order. Always empty for leaves.
    #[must_use]
    pub fn children(&self) -> &[ComponentId] {
        &self.children
    }

    /// Bounds in parent coordinates.
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        self.state.bounds
    }

    /// Location in parent coordinates.
    #[must_use]
    pub const fn location(&self) -> Point {
        self.state.bounds.location()
    }

    /// Width and height.
    #[must_use]
    pub const fn size(&self) -> Dimension {
        self.state.bounds.size()
    }

    /// Space reserved for the border and padding.
    #[must_use]
    pub const fn insets(&self) -> Insets {
        self.state.insets
    }

    /// The attached border.
    #[must_use]
    pub fn border(&self) -> Option<&dyn Border> {
        self.state.border.as_deref()
    }

    /// True if a border is attached.
    #[must_use]
    pub const fn has_border(&self) -> bool {
        self.state.border.is_some()
    }

    /// The foreground paint, if its owner is still alive.
    #[must_use]
    pub fn foreground(&self) -> Option<Rc<Paint>> {
        self.state.foreground.as_ref().and_then(Weak::upgrade)
    }

    /// The background paint, if its owner is still alive.
    #[must_use]
    pub fn background(&self) -> Option<Rc<Paint>> {
        self.state.background.as_ref().and_then(Weak::upgrade)
    }

    /// True if the component is painted.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.state.flags.has(ComponentFlags::VISIBLE)
    }

    /// True if the component accepts user input.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.state.flags.has(ComponentFlags::ENABLED)
    }

    /// True if the component is the focus owner of its scope.
    #[must_use]
    pub const fn has_focus(&self) -> bool {
        self.state.flags.has(ComponentFlags::FOCUSED)
    }

    /// True if an attached border is painted.
    #[must_use]
    pub const fn is_border_painted(&self) -> bool {
        self.state.flags.has(ComponentFlags::BORDER_PAINTED)
    }

    /// This node's own validity flag, ignoring descendants.
    ///
    /// See [`crate::ComponentTree::is_valid`] for effective validity.
    #[must_use]
    pub const fn is_self_valid(&self) -> bool {
        self.state.flags.has(ComponentFlags::VALID)
    }

    /// Raw state flags.
    #[must_use]
    pub const fn flags(&self) -> ComponentFlags {
        self.state.flags
    }

    /// Stacking class among siblings.
    #[must_use]
    pub const fn depth(&self) -> Depth {
        self.state.depth
    }

    /// Key used to resolve the theme delegate.
    #[must_use]
    pub fn theme_name(&self) -> &str {
        &self.state.theme_name
    }

    /// The installed theme delegate, if its owner is still alive.
    #[must_use]
    pub fn theme(&self) -> Option<Rc<dyn ThemeDelegate>> {
        self.theme.as_ref().and_then(Weak::upgrade)
    }

    /// Opacity applied to this component and its descendants.
    #[must_use]
    pub const fn transparency(&self) -> f32 {
        self.state.transparency
    }

    /// Clockwise rotation in degrees applied to this component and its descendants.
    #[must_use]
    pub const fn rotation(&self) -> f32 {
        self.state.rotation
    }

    /// Explicit size hint set by the application.
    #[must_use]
    pub const fn preferred_size_hint(&self) -> Option<Dimension> {
        self.state.preferred_size_hint
    }

    /// The attached layout manager, for containers.
    #[must_use]
    pub fn layout(&self) -> Option<Rc<dyn LayoutManager>> {
        self.layout.clone()
    }

    /// True if any mouse listener is registered.
    #[must_use]
    pub fn has_mouse_listener(&self) -> bool {
        !self.mouse_listeners.is_empty()
    }

    /// True if any key listener is registered.
    #[must_use]
    pub fn has_key_listener(&self) -> bool {
        !self.key_listeners.is_empty()
    }

    /// True if any focus listener is registered.
    #[must_use]
    pub fn has_focus_listener(&self) -> bool {
        !self.focus_listeners.is_empty()
    }

    /// True if any property listener is registered.
    #[must_use]
    pub fn has_property_listener(&self) -> bool {
        !self.property_listeners.is_empty()
    }

    /// Number of registered interpolators.
    #[must_use]
    pub fn interpolator_count(&self) -> usize {
        self.interpolators.len()
    }

    /// Fills the local bounds with the background paint, if there is one.
    pub fn fill_background(&self, surface: &mut dyn Surface) {
        if let Some(background) = self.background() {
            let size = self.size();
            surface.set_paint(&background);
            surface.fill_rect(0, 0, size.width, size.height);
        }
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("id", &self.id)
            .field("role", &self.role)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("state", &self.state)
            .field("has_theme", &self.theme.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_component_defaults() {
        let component = Component::new(ComponentId::new(1), Role::Leaf, "Component");

        assert!(component.is_visible());
        assert!(component.is_enabled());
        assert!(!component.has_focus());
        assert!(!component.is_self_valid());
        assert_eq!(component.depth(), Depth::Normal);
        assert!((component.transparency() - 1.0).abs() < f32::EPSILON);
        assert!(component.rotation().abs() < f32::EPSILON);
        assert!(component.parent().is_none());
    }

    #[test]
    fn test_depth_codes_round_trip() {
        for depth in Depth::ALL {
            assert_eq!(Depth::from_code(depth.code()), Some(depth));
        }
        assert_eq!(Depth::from_code(3), None);
    }

    #[test]
    fn test_stacking_order_is_strictly_increasing() {
        let orders: Vec<_> = Depth::ALL.iter().map(|d| d.stacking_order()).collect();
        assert!(orders.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_detached_copy_drops_focus_and_validity() {
        let mut state = VisualState::new("Button");
        state.flags.set(ComponentFlags::FOCUSED);
        state.flags.set(ComponentFlags::VALID);

        let copy = state.detached_copy();
        assert!(!copy.flags.has(ComponentFlags::FOCUSED));
        assert!(!copy.flags.has(ComponentFlags::VALID));
        assert_eq!(copy.theme_name, "Button");
    }
}
