//! # Error Types
//!
//! A rejected call leaves the tree as it was. Out-of-range values are
//! clamped rather than reported.

use thiserror::Error;

use crate::widget::ComponentId;

/// Errors reported by structural and state operations on the tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// The id does not name a live component.
    #[error("component not found: {0}")]
    UnknownComponent(ComponentId),

    /// The operation needs a container but got a leaf.
    #[error("component {0} is not a container")]
    NotAContainer(ComponentId),

    /// The child is not attached to the given parent.
    #[error("component {child} is not a child of {parent}")]
    NotAChild {
        /// The container that was expected to own the child.
        parent: ComponentId,
        /// The component that was expected to be a child.
        child: ComponentId,
    },

    /// Reparenting would make a component its own ancestor.
    #[error("attaching {child} under {parent} would create a cycle")]
    WouldCreateCycle {
        /// The proposed parent.
        parent: ComponentId,
        /// The component being attached.
        child: ComponentId,
    },

    /// Root containers always sit at the top of the tree.
    #[error("root container {0} cannot be given a parent")]
    RootCannotBeChild(ComponentId),

    /// The component exists but its widget has a different type.
    #[error("component {id} is not a {expected}")]
    WrongWidget {
        /// The component that was looked up.
        id: ComponentId,
        /// Name of the expected widget type.
        expected: &'static str,
    },
}

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, TreeError>;

/// Errors reported by layout managers.
///
/// A failed layout leaves the affected children at their previous bounds;
/// validation of the rest of the tree continues.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// The container disappeared before it could be laid out.
    #[error("layout target not found: {0}")]
    MissingContainer(ComponentId),

    /// Some children could not be assigned a place.
    #[error("{count} children of {container} were left unplaced")]
    Unplaced {
        /// The container being laid out.
        container: ComponentId,
        /// Number of children without a place.
        count: usize,
    },
}

/// Errors raised while loading theme configuration.
#[derive(Error, Debug)]
pub enum ThemeError {
    /// The TOML source could not be parsed.
    #[error("invalid theme configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A component entry references a palette entry that does not exist.
    #[error("unknown palette entry: {0}")]
    UnknownPaint(String),

    /// A palette entry is not a `#RRGGBB` or `#RRGGBBAA` literal.
    #[error("invalid color literal for {name}: {literal}")]
    InvalidColor {
        /// Palette entry name.
        name: String,
        /// The rejected literal.
        literal: String,
    },
}
