//! Drawing sink consumed by the paint traversal.
//!
//! The tree only ever writes to a [`Surface`]; it never reads pixels back.
//! [`CommandBuffer`] is a recording surface that a backend can replay, and
//! the one the tests inspect.

use crate::geometry::{Point, Rect};
use crate::style::Paint;

/// Local transform pushed for each painted component.
///
/// Translation is in parent pixels, rotation in clockwise degrees, and
/// alpha multiplies into everything painted underneath it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Offset of the local origin.
    pub translate: Point,
    /// Clockwise rotation in degrees.
    pub rotation: f32,
    /// Opacity multiplier (0-1).
    pub alpha: f32,
}

impl Transform {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        translate: Point::ORIGIN,
        rotation: 0.0,
        alpha: 1.0,
    };

    /// Creates a new transform.
    #[must_use]
    pub const fn new(translate: Point, rotation: f32, alpha: f32) -> Self {
        Self {
            translate,
            rotation,
            alpha,
        }
    }

    /// Composes a child transform onto this one.
    #[must_use]
    pub fn then(&self, local: &Self) -> Self {
        Self {
            translate: self.translate + local.translate,
            rotation: self.rotation + local.rotation,
            alpha: self.alpha * local.alpha,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// An append-only drawing sink.
pub trait Surface {
    /// Fills a rectangle in local coordinates with the current paint.
    fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32);

    /// Draws a line in local coordinates with the current paint and width.
    fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32);

    /// Selects the paint used by subsequent fills and lines.
    fn set_paint(&mut self, paint: &Paint);

    /// Selects the line width used by subsequent lines.
    fn set_line_width(&mut self, width: f32);

    /// Enters a component's local space.
    fn push_transform(&mut self, _transform: Transform) {}

    /// Leaves the most recently entered local space.
    fn pop_transform(&mut self) {}
}

/// A recorded drawing command, in screen coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    /// Paint selection.
    SetPaint(Paint),
    /// Line width selection.
    SetLineWidth(f32),
    /// Filled rectangle.
    FillRect {
        /// Bounds after translation.
        bounds: Rect,
        /// Accumulated opacity.
        alpha: f32,
    },
    /// Line segment.
    Line {
        /// Start point after translation.
        from: Point,
        /// End point after translation.
        to: Point,
        /// Accumulated opacity.
        alpha: f32,
    },
    /// Entered a local space; carries the accumulated transform.
    PushTransform(Transform),
    /// Left a local space.
    PopTransform,
}

/// Surface that records commands for later replay.
#[derive(Debug, Default)]
pub struct CommandBuffer {
    /// All commands from the frame.
    commands: Vec<RenderCommand>,
    /// Accumulated transforms.
    transform_stack: Vec<Transform>,
}

impl CommandBuffer {
    /// Creates a new empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            commands: Vec::with_capacity(1024),
            transform_stack: Vec::with_capacity(16),
        }
    }

    /// Begins a new frame.
    pub fn begin_frame(&mut self) {
        self.commands.clear();
        self.transform_stack.clear();
    }

    /// Returns the accumulated transform.
    #[must_use]
    pub fn current_transform(&self) -> Transform {
        self.transform_stack
            .last()
            .copied()
            .unwrap_or(Transform::IDENTITY)
    }

    /// Returns the recorded commands.
    #[must_use]
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Ends the frame and hands the recorded commands to the caller.
    pub fn end_frame(&mut self) -> Vec<RenderCommand> {
        self.transform_stack.clear();
        std::mem::take(&mut self.commands)
    }

    /// Returns the filled rectangles in recording order.
    #[must_use]
    pub fn fills(&self) -> Vec<Rect> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                RenderCommand::FillRect { bounds, .. } => Some(*bounds),
                _ => None,
            })
            .collect()
    }

    /// Returns the total command count.
    #[must_use]
    pub fn command_count(&self) -> usize {
        self.commands.len()
    }
}

impl Surface for CommandBuffer {
    fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32) {
        let transform = self.current_transform();
        let origin = transform.translate;
        self.commands.push(RenderCommand::FillRect {
            bounds: Rect::new(origin.x + x, origin.y + y, width, height),
            alpha: transform.alpha,
        });
    }

    fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        let transform = self.current_transform();
        let origin = transform.translate;
        self.commands.push(RenderCommand::Line {
            from: origin + Point::new(x1, y1),
            to: origin + Point::new(x2, y2),
            alpha: transform.alpha,
        });
    }

    fn set_paint(&mut self, paint: &Paint) {
        self.commands.push(RenderCommand::SetPaint(paint.clone()));
    }

    fn set_line_width(&mut self, width: f32) {
        self.commands.push(RenderCommand::SetLineWidth(width));
    }

    fn push_transform(&mut self, transform: Transform) {
        let combined = self.current_transform().then(&transform);
        self.transform_stack.push(combined);
        self.commands.push(RenderCommand::PushTransform(combined));
    }

    fn pop_transform(&mut self) {
        self.transform_stack.pop();
        self.commands.push(RenderCommand::PopTransform);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Color;

    #[test]
    fn test_buffer_frame() {
        let mut buffer = CommandBuffer::new();

        buffer.begin_frame();
        buffer.set_paint(&Paint::Solid(Color::WHITE));
        buffer.fill_rect(0, 0, 100, 50);

        assert_eq!(buffer.command_count(), 2);
        let commands = buffer.end_frame();
        assert_eq!(commands.len(), 2);
        assert_eq!(buffer.command_count(), 0);
    }

    #[test]
    fn test_transform_stack_accumulates() {
        let mut buffer = CommandBuffer::new();

        buffer.push_transform(Transform::new(Point::new(10, 10), 0.0, 0.5));
        buffer.push_transform(Transform::new(Point::new(5, 0), 90.0, 0.5));
        buffer.fill_rect(1, 1, 2, 2);

        let current = buffer.current_transform();
        assert_eq!(current.translate, Point::new(15, 10));
        assert!((current.alpha - 0.25).abs() < f32::EPSILON);
        assert_eq!(buffer.fills(), vec![Rect::new(16, 11, 2, 2)]);

        buffer.pop_transform();
        buffer.pop_transform();
        assert_eq!(buffer.current_transform(), Transform::IDENTITY);
    }
}
