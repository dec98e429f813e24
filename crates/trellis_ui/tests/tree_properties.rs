//! # Component Tree Verification Tests
//!
//! End-to-end checks of the tree's contracts through the public API:
//!
//! 1. **Validation**: invalidate/validate and bounds round trips
//! 2. **Dispatch**: listener removal and snapshot delivery
//! 3. **Focus**: at most one owner at a time
//! 4. **Presentation**: theme idempotence, border insets, depth ordering,
//!    paint lifetime and configured themes
//!
//! Run with: cargo test --test tree_properties

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use trellis_ui::{
    BevelBorder, Border, Button, Color, CommandBuffer, ComponentId, ComponentTree, Depth,
    Dimension, EmptyBorder, FadeInterpolator, FlowLayout, FocusManager, Insets, LineBorder,
    MouseButton, MouseEvent, MouseListener, Paint, Panel, Point, Rect, RenderCommand,
    ThemeRegistry,
};

fn root_with_children(tree: &mut ComponentTree, count: usize) -> (ComponentId, Vec<ComponentId>) {
    let root = tree.create_root(Panel::new());
    let children = (0..count)
        .map(|_| {
            let child = tree.create_container(Panel::new());
            tree.add_child(root, child).unwrap();
            child
        })
        .collect();
    (root, children)
}

// ============================================================================
// VALIDATION
// ============================================================================

#[test]
fn invalidate_then_validate_restores_validity() {
    let mut tree = ComponentTree::new();
    let (root, children) = root_with_children(&mut tree, 3);
    tree.set_layout(root, Rc::new(FlowLayout::vertical())).unwrap();
    tree.validate_tree();

    for id in std::iter::once(root).chain(children.iter().copied()) {
        tree.invalidate(id).unwrap();
        assert!(!tree.is_valid(id));
        assert!(!tree.is_valid(root), "ancestors see the change");

        tree.validate(root).unwrap();
        assert!(tree.is_valid(id));
        assert!(tree.is_valid(root));
    }
}

#[test]
fn set_bounds_round_trips_and_invalidates() {
    let mut tree = ComponentTree::new();
    let (root, children) = root_with_children(&mut tree, 1);
    let child = children[0];
    let samples = [
        Rect::new(0, 0, 0, 0),
        Rect::new(-5, 7, 10, 3),
        Rect::new(100, 200, 640, 480),
        Rect::new(3, 3, 1, 0),
    ];

    for bounds in samples {
        tree.validate(root).unwrap();
        tree.set_bounds(child, bounds).unwrap();

        assert_eq!(tree.bounds(child).unwrap(), bounds);
        assert!(!tree.is_valid(child));
    }
}

#[test]
fn negative_sizes_are_clamped() {
    let mut tree = ComponentTree::new();
    let panel = tree.create(Panel::new());

    tree.set_bounds(panel, Rect::new(1, 2, -10, 5)).unwrap();

    assert_eq!(tree.size(panel).unwrap(), Dimension::new(0, 5));
}

// ============================================================================
// DISPATCH
// ============================================================================

#[derive(Default)]
struct Counter(Cell<usize>);

impl MouseListener for Counter {
    fn mouse_pressed(&self, _tree: &mut ComponentTree, _event: &MouseEvent) {
        self.0.set(self.0.get() + 1);
    }
}

#[test]
fn removed_listener_is_never_invoked() {
    let mut tree = ComponentTree::new();
    let panel = tree.create(Panel::new());
    let counter = Rc::new(Counter::default());
    let listener: Rc<dyn MouseListener> = counter.clone();

    tree.add_mouse_listener(panel, Rc::clone(&listener)).unwrap();
    assert!(tree.remove_mouse_listener(panel, &listener).unwrap());

    assert!(!tree.has_mouse_listener(panel));
    tree.process_mouse_event(&MouseEvent::pressed(panel, MouseButton::Left, Point::ORIGIN));
    assert_eq!(counter.0.get(), 0);
}

/// Removes a victim listener from its own component while handling a press.
struct Remover {
    victim: RefCell<Option<Rc<dyn MouseListener>>>,
    calls: Cell<usize>,
}

impl MouseListener for Remover {
    fn mouse_pressed(&self, tree: &mut ComponentTree, event: &MouseEvent) {
        self.calls.set(self.calls.get() + 1);
        if let Some(victim) = self.victim.borrow_mut().take() {
            tree.remove_mouse_listener(event.source, &victim).unwrap();
        }
    }
}

#[test]
fn removal_during_dispatch_does_not_skip_or_repeat() {
    let mut tree = ComponentTree::new();
    let panel = tree.create(Panel::new());
    let before = Rc::new(Counter::default());
    let after = Rc::new(Counter::default());
    let after_dyn: Rc<dyn MouseListener> = after.clone();
    let remover = Rc::new(Remover {
        victim: RefCell::new(Some(Rc::clone(&after_dyn))),
        calls: Cell::new(0),
    });

    tree.add_mouse_listener(panel, before.clone()).unwrap();
    tree.add_mouse_listener(panel, remover.clone()).unwrap();
    tree.add_mouse_listener(panel, after_dyn).unwrap();

    let press = MouseEvent::pressed(panel, MouseButton::Left, Point::ORIGIN);
    assert_eq!(tree.process_mouse_event(&press), 3);
    assert_eq!((before.0.get(), remover.calls.get(), after.0.get()), (1, 1, 1));

    assert_eq!(tree.process_mouse_event(&press), 2);
    assert_eq!((before.0.get(), remover.calls.get(), after.0.get()), (2, 2, 1));
}

/// Registers a newcomer on its own component while handling a press.
struct Recruiter {
    newcomer: RefCell<Option<Rc<dyn MouseListener>>>,
}

impl MouseListener for Recruiter {
    fn mouse_pressed(&self, tree: &mut ComponentTree, event: &MouseEvent) {
        if let Some(newcomer) = self.newcomer.borrow_mut().take() {
            tree.add_mouse_listener(event.source, newcomer).unwrap();
        }
    }
}

#[test]
fn listener_added_during_dispatch_waits_for_next_event() {
    let mut tree = ComponentTree::new();
    let panel = tree.create(Panel::new());
    let newcomer = Rc::new(Counter::default());
    let pending: Rc<dyn MouseListener> = newcomer.clone();
    let recruiter = Rc::new(Recruiter {
        newcomer: RefCell::new(Some(pending)),
    });
    tree.add_mouse_listener(panel, recruiter).unwrap();

    let press = MouseEvent::pressed(panel, MouseButton::Left, Point::ORIGIN);
    assert_eq!(tree.process_mouse_event(&press), 1);
    assert_eq!(newcomer.0.get(), 0);

    assert_eq!(tree.process_mouse_event(&press), 2);
    assert_eq!(newcomer.0.get(), 1);
}

// ============================================================================
// FOCUS
// ============================================================================

#[test]
fn focus_is_never_held_by_two_siblings() {
    let mut tree = ComponentTree::new();
    let (root, children) = root_with_children(&mut tree, 2);
    let (a, b) = (children[0], children[1]);
    let overlap = Rc::new(Cell::new(false));
    for id in [a, b] {
        let seen = Rc::clone(&overlap);
        tree.add_property_listener(
            id,
            Rc::new(move |tree: &mut ComponentTree, _: &trellis_ui::PropertyEvent| {
                let both = [a, b]
                    .iter()
                    .all(|&id| tree.component(id).is_ok_and(|c| c.has_focus()));
                if both {
                    seen.set(true);
                }
            }),
        )
        .unwrap();
    }

    tree.set_focus(a, true).unwrap();
    assert!(tree.component(a).unwrap().has_focus());
    assert!(!tree.component(b).unwrap().has_focus());

    tree.set_focus(a, false).unwrap();
    tree.set_focus(b, true).unwrap();
    assert!(!overlap.get());

    let mut focus = FocusManager::new(root);
    focus.request_focus(&mut tree, a).unwrap();
    assert!(!tree.component(b).unwrap().has_focus());
    assert!(!overlap.get());
}

// ============================================================================
// PRESENTATION
// ============================================================================

#[test]
fn reset_theme_is_idempotent() {
    let registry = ThemeRegistry::basic();
    let mut tree = ComponentTree::new();
    let check = Button::create_check_box(&mut tree, "Remember");
    registry.apply(&mut tree, check).unwrap();

    tree.reset_theme(check).unwrap();
    let once = format!("{:?}", tree.component(check).unwrap());
    let widget_once = format!("{:?}", tree.widget::<Button>(check).unwrap());
    tree.reset_theme(check).unwrap();
    let twice = format!("{:?}", tree.component(check).unwrap());
    let widget_twice = format!("{:?}", tree.widget::<Button>(check).unwrap());

    assert_eq!(once, twice);
    assert_eq!(widget_once, widget_twice);
}

#[test]
fn border_sets_insets_and_detaching_keeps_them() {
    let mut tree = ComponentTree::new();
    let panel = tree.create_container(Panel::new());
    let borders: Vec<Box<dyn Border>> = vec![
        Box::new(LineBorder::new(Color::BLACK, 3)),
        Box::new(BevelBorder::lowered()),
        Box::new(EmptyBorder::new(Insets::new(1, 2, 3, 4))),
    ];

    for border in borders {
        let expected = border.border_insets();
        tree.set_border(panel, Some(border)).unwrap();
        assert_eq!(tree.component(panel).unwrap().insets(), expected);

        tree.set_border(panel, None).unwrap();
        assert_eq!(tree.component(panel).unwrap().insets(), expected);
    }
}

#[test]
fn popup_sibling_is_painted_last() {
    let mut tree = ComponentTree::new();
    let (root, children) = root_with_children(&mut tree, 2);
    let normal = Rc::new(Paint::Solid(Color::WHITE));
    let popup = Rc::new(Paint::Solid(Color::BLACK));
    for &child in &children {
        tree.set_bounds(child, Rect::new(0, 0, 10, 10)).unwrap();
    }
    // Inserted first, still painted on top.
    tree.set_depth(children[0], Depth::Popup).unwrap();
    tree.set_background(children[0], Some(&popup)).unwrap();
    tree.set_background(children[1], Some(&normal)).unwrap();

    let mut surface = CommandBuffer::new();
    tree.paint(root, &mut surface);

    let paints: Vec<&Paint> = surface
        .commands()
        .iter()
        .filter_map(|command| match command {
            RenderCommand::SetPaint(paint) => Some(paint),
            _ => None,
        })
        .collect();
    assert_eq!(paints, vec![normal.as_ref(), popup.as_ref()]);
}

#[test]
fn dropped_paint_degrades_to_no_fill() {
    let mut tree = ComponentTree::new();
    let panel = tree.create_root(Panel::new());
    tree.set_bounds(panel, Rect::new(0, 0, 8, 8)).unwrap();
    {
        let paint = Rc::new(Paint::Solid(Color::GRAY));
        tree.set_background(panel, Some(&paint)).unwrap();
        assert!(tree.component(panel).unwrap().background().is_some());

        let mut surface = CommandBuffer::new();
        tree.paint(panel, &mut surface);
        assert_eq!(surface.fills().len(), 1);
    }

    assert!(tree.component(panel).unwrap().background().is_none());
    let mut surface = CommandBuffer::new();
    tree.paint(panel, &mut surface);
    assert!(surface.fills().is_empty());
}

#[test]
fn configured_theme_styles_the_tree() {
    let source = r##"
        [palette]
        window = "#202020"
        accent = "#ff8000"

        [components.Panel]
        background = "window"
        border = "bevel-raised"

        [components.Button]
        background = "accent"
        foreground = "window"
        border = "line"
    "##;
    let registry = ThemeRegistry::from_toml_str(source).unwrap();
    let mut tree = ComponentTree::new();
    let root = tree.create_root(Panel::new());
    let button = Button::create(&mut tree, "Go");
    tree.add_child(root, button).unwrap();

    assert_eq!(registry.apply_recursive(&mut tree, root).unwrap(), 2);

    assert_eq!(
        tree.component(root).unwrap().insets(),
        Insets::uniform(BevelBorder::THICKNESS)
    );
    assert_eq!(
        tree.component(button).unwrap().background().as_deref(),
        registry.paint("accent").as_deref()
    );
}

#[test]
fn frame_runs_interpolators_then_paints() {
    let mut tree = ComponentTree::new();
    let root = tree.create_root(Panel::new());
    tree.set_bounds(root, Rect::new(0, 0, 4, 4)).unwrap();
    tree.add_interpolator(root, Rc::new(FadeInterpolator::fade_out(0.5)))
        .unwrap();
    let paint = Rc::new(Paint::Solid(Color::WHITE));
    tree.set_background(root, Some(&paint)).unwrap();

    let mut surface = CommandBuffer::new();
    for _ in 0..4 {
        surface.begin_frame();
        tree.frame(0.25, &mut surface);
    }

    assert_eq!(tree.component(root).unwrap().interpolator_count(), 0);
    assert!(tree.component(root).unwrap().transparency().abs() < f32::EPSILON);
    assert!(tree.is_valid(root));
    assert_eq!(surface.fills().len(), 1);
}
