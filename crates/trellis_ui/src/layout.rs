//! Layout managers for positioning children inside containers.
//!
//! A layout manager runs only while its container is invalid, from inside
//! [`ComponentTree::validate`]. It assigns child bounds through the tree's
//! public setters and may ask children for their preferred size.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;

use crate::error::LayoutError;
use crate::geometry::{Dimension, Insets, Point, Rect};
use crate::widget::{Component, ComponentId, ComponentTree};

/// Assigns bounds to the children of a container.
pub trait LayoutManager: fmt::Debug {
    /// Lays out the children of `container`.
    ///
    /// On error, children that were not reached keep their previous bounds.
    fn layout_container(
        &self,
        tree: &mut ComponentTree,
        container: ComponentId,
    ) -> Result<(), LayoutError>;

    /// Size the container would like given its children, or `None` to
    /// fall back to the container widget's own sizing policy.
    fn preferred_layout_size(
        &self,
        _tree: &mut ComponentTree,
        _container: ComponentId,
    ) -> Option<Dimension> {
        None
    }

    /// A child left the container.
    fn remove_component(&self, _child: ComponentId) {}

    /// A child was copied along with its container.
    fn component_duplicated(&self, _original: ComponentId, _copy: ComponentId) {}
}

/// Visible children of a container together with their preferred sizes.
fn visible_children(
    tree: &mut ComponentTree,
    container: ComponentId,
) -> Result<Vec<(ComponentId, Dimension)>, LayoutError> {
    let children: Vec<ComponentId> = tree
        .get(container)
        .ok_or(LayoutError::MissingContainer(container))?
        .children()
        .iter()
        .copied()
        .filter(|child| tree.get(*child).is_some_and(Component::is_visible))
        .collect();

    Ok(children
        .into_iter()
        .map(|child| {
            let size = tree.preferred_size(child).unwrap_or(Dimension::ZERO);
            (child, size)
        })
        .collect())
}

/// Area inside the container's insets, in the container's own coordinates.
fn interior(
    tree: &ComponentTree,
    container: ComponentId,
) -> Result<(Rect, Insets), LayoutError> {
    let component = tree
        .get(container)
        .ok_or(LayoutError::MissingContainer(container))?;
    let local = Rect::from_parts(Point::ORIGIN, component.size());
    Ok((local.inset(component.insets()), component.insets()))
}

fn place_all(
    tree: &mut ComponentTree,
    container: ComponentId,
    placements: impl IntoIterator<Item = (ComponentId, Rect)>,
) -> Result<(), LayoutError> {
    let mut missed = 0;
    for (child, bounds) in placements {
        if tree.set_bounds(child, bounds).is_err() {
            missed += 1;
        }
    }
    if missed > 0 {
        return Err(LayoutError::Unplaced {
            container,
            count: missed,
        });
    }
    Ok(())
}

/// Layout direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Horizontal (left to right).
    #[default]
    Horizontal,
    /// Vertical (top to bottom).
    Vertical,
}

/// Layout alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    /// Align to start (left/top).
    #[default]
    Start,
    /// Align to center.
    Center,
    /// Align to end (right/bottom).
    End,
    /// Stretch to fill available space.
    Stretch,
}

/// Places children one after another along a single axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowLayout {
    /// Current layout direction.
    pub direction: Direction,
    /// Main axis alignment.
    pub main_alignment: Alignment,
    /// Cross axis alignment.
    pub cross_alignment: Alignment,
    /// Gap between elements.
    pub gap: i32,
    /// Padding inside the container's insets.
    pub padding: i32,
}

impl Default for FlowLayout {
    fn default() -> Self {
        Self {
            direction: Direction::Horizontal,
            main_alignment: Alignment::Start,
            cross_alignment: Alignment::Start,
            gap: 4,
            padding: 0,
        }
    }
}

impl FlowLayout {
    /// Creates a horizontal layout.
    #[must_use]
    pub fn horizontal() -> Self {
        Self {
            direction: Direction::Horizontal,
            ..Default::default()
        }
    }

    /// Creates a vertical layout.
    #[must_use]
    pub fn vertical() -> Self {
        Self {
            direction: Direction::Vertical,
            ..Default::default()
        }
    }

    /// Sets the gap between elements.
    #[must_use]
    pub const fn with_gap(mut self, gap: i32) -> Self {
        self.gap = gap;
        self
    }

    /// Sets padding around content.
    #[must_use]
    pub const fn with_padding(mut self, padding: i32) -> Self {
        self.padding = padding;
        self
    }

    /// Sets main axis alignment.
    #[must_use]
    pub const fn align_main(mut self, alignment: Alignment) -> Self {
        self.main_alignment = alignment;
        self
    }

    /// Sets cross axis alignment.
    #[must_use]
    pub const fn align_cross(mut self, alignment: Alignment) -> Self {
        self.cross_alignment = alignment;
        self
    }

    /// Lays out a list of sizes within the given bounds.
    ///
    /// Returns the bounds for each element.
    #[must_use]
    pub fn arrange(&self, bounds: Rect, sizes: &[Dimension]) -> Vec<Rect> {
        if sizes.is_empty() {
            return Vec::new();
        }

        let content = bounds.shrink(self.padding);
        let total_gap = self.gap * (sizes.len() as i32 - 1);
        let mut results = Vec::with_capacity(sizes.len());

        match self.direction {
            Direction::Horizontal => {
                let total_width: i32 = sizes.iter().map(|s| s.width).sum();
                let mut x = match self.main_alignment {
                    Alignment::Start | Alignment::Stretch => content.x,
                    Alignment::Center => content.x + (content.width - total_width - total_gap) / 2,
                    Alignment::End => content.right() - total_width - total_gap,
                };

                for size in sizes {
                    let (y, height) = match self.cross_alignment {
                        Alignment::Start => (content.y, size.height),
                        Alignment::Center => {
                            (content.y + (content.height - size.height) / 2, size.height)
                        }
                        Alignment::End => (content.bottom() - size.height, size.height),
                        Alignment::Stretch => (content.y, content.height),
                    };
                    results.push(Rect::new(x, y, size.width, height));
                    x += size.width + self.gap;
                }
            }
            Direction::Vertical => {
                let total_height: i32 = sizes.iter().map(|s| s.height).sum();
                let mut y = match self.main_alignment {
                    Alignment::Start | Alignment::Stretch => content.y,
                    Alignment::Center => {
                        content.y + (content.height - total_height - total_gap) / 2
                    }
                    Alignment::End => content.bottom() - total_height - total_gap,
                };

                for size in sizes {
                    let (x, width) = match self.cross_alignment {
                        Alignment::Start => (content.x, size.width),
                        Alignment::Center => {
                            (content.x + (content.width - size.width) / 2, size.width)
                        }
                        Alignment::End => (content.right() - size.width, size.width),
                        Alignment::Stretch => (content.x, content.width),
                    };
                    results.push(Rect::new(x, y, width, size.height));
                    y += size.height + self.gap;
                }
            }
        }

        results
    }
}

impl LayoutManager for FlowLayout {
    fn layout_container(
        &self,
        tree: &mut ComponentTree,
        container: ComponentId,
    ) -> Result<(), LayoutError> {
        let (area, _) = interior(tree, container)?;
        let children = visible_children(tree, container)?;
        let sizes: Vec<Dimension> = children.iter().map(|(_, size)| *size).collect();
        let placements = self.arrange(area, &sizes);

        place_all(
            tree,
            container,
            children.iter().map(|(child, _)| *child).zip(placements),
        )
    }

    fn preferred_layout_size(
        &self,
        tree: &mut ComponentTree,
        container: ComponentId,
    ) -> Option<Dimension> {
        let (_, insets) = interior(tree, container).ok()?;
        let children = visible_children(tree, container).ok()?;
        let gaps = self.gap * (children.len().max(1) as i32 - 1);

        let content = match self.direction {
            Direction::Horizontal => Dimension::new(
                children.iter().map(|(_, s)| s.width).sum::<i32>() + gaps,
                children.iter().map(|(_, s)| s.height).max().unwrap_or(0),
            ),
            Direction::Vertical => Dimension::new(
                children.iter().map(|(_, s)| s.width).max().unwrap_or(0),
                children.iter().map(|(_, s)| s.height).sum::<i32>() + gaps,
            ),
        };
        let padded = Dimension::new(
            content.width + 2 * self.padding,
            content.height + 2 * self.padding,
        );
        Some(padded.expand(insets))
    }
}

/// Areas of a [`BorderLayout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    /// Full width strip along the top.
    North,
    /// Full width strip along the bottom.
    South,
    /// Strip along the right edge, between north and south.
    East,
    /// Strip along the left edge, between north and south.
    West,
    /// Everything that is left.
    Center,
}

/// Places up to five children along the edges and in the middle.
///
/// Children must be assigned a region with [`BorderLayout::place`]; the
/// first child placed in a region wins. Children without a region are
/// reported as unplaced and keep their previous bounds.
#[derive(Debug, Default)]
pub struct BorderLayout {
    hgap: i32,
    vgap: i32,
    regions: RefCell<HashMap<ComponentId, Region>>,
}

impl BorderLayout {
    /// Creates a border layout without gaps.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a border layout with horizontal and vertical gaps.
    #[must_use]
    pub fn with_gaps(hgap: i32, vgap: i32) -> Self {
        Self {
            hgap,
            vgap,
            regions: RefCell::default(),
        }
    }

    /// Assigns a child to a region.
    pub fn place(&self, child: ComponentId, region: Region) {
        self.regions.borrow_mut().insert(child, region);
    }

    /// Returns the region a child was assigned to.
    #[must_use]
    pub fn region_of(&self, child: ComponentId) -> Option<Region> {
        self.regions.borrow().get(&child).copied()
    }

    fn by_region(
        &self,
        children: &[(ComponentId, Dimension)],
    ) -> (HashMap<Region, (ComponentId, Dimension)>, usize) {
        let regions = self.regions.borrow();
        let mut assigned = HashMap::new();
        let mut unplaced = 0;
        for &(child, size) in children {
            match regions.get(&child) {
                Some(region) => {
                    assigned.entry(*region).or_insert((child, size));
                }
                None => unplaced += 1,
            }
        }
        (assigned, unplaced)
    }
}

impl LayoutManager for BorderLayout {
    fn layout_container(
        &self,
        tree: &mut ComponentTree,
        container: ComponentId,
    ) -> Result<(), LayoutError> {
        let (area, _) = interior(tree, container)?;
        let children = visible_children(tree, container)?;
        let (assigned, unplaced) = self.by_region(&children);

        let mut top = area.y;
        let mut bottom = area.bottom();
        let mut left = area.x;
        let mut right = area.right();
        let mut placements = Vec::with_capacity(assigned.len());

        if let Some(&(child, size)) = assigned.get(&Region::North) {
            placements.push((child, Rect::new(left, top, right - left, size.height)));
            top += size.height + self.vgap;
        }
        if let Some(&(child, size)) = assigned.get(&Region::South) {
            placements.push((
                child,
                Rect::new(left, bottom - size.height, right - left, size.height),
            ));
            bottom -= size.height + self.vgap;
        }
        if let Some(&(child, size)) = assigned.get(&Region::East) {
            placements.push((
                child,
                Rect::new(right - size.width, top, size.width, bottom - top),
            ));
            right -= size.width + self.hgap;
        }
        if let Some(&(child, size)) = assigned.get(&Region::West) {
            placements.push((child, Rect::new(left, top, size.width, bottom - top)));
            left += size.width + self.hgap;
        }
        if let Some(&(child, _)) = assigned.get(&Region::Center) {
            placements.push((child, Rect::new(left, top, right - left, bottom - top)));
        }

        place_all(tree, container, placements)?;
        if unplaced > 0 {
            return Err(LayoutError::Unplaced {
                container,
                count: unplaced,
            });
        }
        Ok(())
    }

    fn preferred_layout_size(
        &self,
        tree: &mut ComponentTree,
        container: ComponentId,
    ) -> Option<Dimension> {
        let (_, insets) = interior(tree, container).ok()?;
        let children = visible_children(tree, container).ok()?;
        let (assigned, _) = self.by_region(&children);
        let size_of = |region| assigned.get(&region).map(|(_, size)| *size);

        let mut width = 0;
        let mut height = 0;
        let mut middle_height = 0;
        for region in [Region::West, Region::Center, Region::East] {
            if let Some(size) = size_of(region) {
                if width > 0 {
                    width += self.hgap;
                }
                width += size.width;
                middle_height = middle_height.max(size.height);
            }
        }
        height += middle_height;
        for region in [Region::North, Region::South] {
            if let Some(size) = size_of(region) {
                width = width.max(size.width);
                if height > 0 {
                    height += self.vgap;
                }
                height += size.height;
            }
        }

        Some(Dimension::new(width, height).expand(insets))
    }

    fn remove_component(&self, child: ComponentId) {
        self.regions.borrow_mut().remove(&child);
    }

    fn component_duplicated(&self, original: ComponentId, copy: ComponentId) {
        if let Some(region) = self.region_of(original) {
            self.place(copy, region);
        }
    }
}
