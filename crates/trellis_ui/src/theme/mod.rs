//! # Themes
//!
//! A theme delegate owns the look of one kind of widget. The tree never
//! inspects a delegate's concrete type: it only calls
//! [`ThemeDelegate::install_theme`] and [`ThemeDelegate::deinstall_theme`],
//! and the delegate configures the component through the tree's public
//! setters.
//!
//! Delegates and paints are owned by a [`ThemeRegistry`]; components keep
//! weak references to both. Dropping the registry leaves components with
//! no installed theme and no paints, which paint as bare geometry.
//!
//! ```text
//! ThemeRegistry ──owns──▶ Rc<dyn ThemeDelegate>, Rc<Paint>
//!       │                          ▲
//!       └─apply(tree, id)          │ Weak
//!              └─▶ theme_name ─────┘
//! ```

mod basic;
mod config;

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use tracing::debug;

pub use basic::{ButtonTheme, CheckBoxIcon, CheckBoxTheme};
pub use config::{BorderKind, ComponentStyle, PaletteTheme, ThemeConfig};

use crate::error::{ThemeError, TreeResult};
use crate::style::{Color, Paint};
use crate::widget::{ComponentId, ComponentTree};

/// Presentation policy for one kind of widget.
pub trait ThemeDelegate: fmt::Debug {
    /// Applies this theme's appearance to a component.
    fn install_theme(&self, tree: &mut ComponentTree, id: ComponentId);

    /// Removes whatever [`ThemeDelegate::install_theme`] set up.
    fn deinstall_theme(&self, tree: &mut ComponentTree, id: ComponentId);
}

/// Owns theme delegates and shared paints, keyed by name.
#[derive(Debug, Default)]
pub struct ThemeRegistry {
    delegates: HashMap<String, Rc<dyn ThemeDelegate>>,
    paints: HashMap<String, Rc<Paint>>,
}

impl ThemeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the bundled button and check box themes.
    #[must_use]
    pub fn basic() -> Self {
        let mut registry = Self::new();
        registry.register("Button", Rc::new(ButtonTheme::new()));
        registry.register("CheckBox", Rc::new(CheckBoxTheme::new()));
        registry
    }

    /// Builds a registry from a parsed configuration.
    pub fn from_config(config: &ThemeConfig) -> Result<Self, ThemeError> {
        let mut registry = Self::new();
        for (name, literal) in &config.palette {
            let color = Color::parse_hex(literal).ok_or_else(|| ThemeError::InvalidColor {
                name: name.clone(),
                literal: literal.clone(),
            })?;
            registry.register_paint(name, Paint::Solid(color));
        }
        for (theme_name, style) in &config.components {
            let theme = PaletteTheme::from_style(style, &registry)?;
            registry.register(theme_name, Rc::new(theme));
        }
        debug!(
            paints = registry.paints.len(),
            themes = registry.delegates.len(),
            "theme registry loaded"
        );
        Ok(registry)
    }

    /// Parses TOML and builds a registry from it.
    pub fn from_toml_str(source: &str) -> Result<Self, ThemeError> {
        Self::from_config(&ThemeConfig::from_toml_str(source)?)
    }

    /// Registers a delegate under a theme name, returning the one it replaces.
    pub fn register(
        &mut self,
        theme_name: impl Into<String>,
        delegate: Rc<dyn ThemeDelegate>,
    ) -> Option<Rc<dyn ThemeDelegate>> {
        self.delegates.insert(theme_name.into(), delegate)
    }

    /// Looks up the delegate for a theme name.
    #[must_use]
    pub fn get(&self, theme_name: &str) -> Option<Rc<dyn ThemeDelegate>> {
        self.delegates.get(theme_name).cloned()
    }

    /// Number of registered delegates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.delegates.len()
    }

    /// True if no delegate is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.delegates.is_empty()
    }

    /// Stores a named paint and returns the owning handle.
    pub fn register_paint(&mut self, name: impl Into<String>, paint: Paint) -> Rc<Paint> {
        let paint = Rc::new(paint);
        self.paints.insert(name.into(), Rc::clone(&paint));
        paint
    }

    /// Looks up a named paint.
    #[must_use]
    pub fn paint(&self, name: &str) -> Option<Rc<Paint>> {
        self.paints.get(name).cloned()
    }

    /// Installs the delegate matching the component's theme name.
    ///
    /// Returns false, leaving the component untouched, when no delegate is
    /// registered for that name.
    pub fn apply(&self, tree: &mut ComponentTree, id: ComponentId) -> TreeResult<bool> {
        let theme_name = tree.component(id)?.theme_name().to_owned();
        let Some(delegate) = self.get(&theme_name) else {
            debug!(%id, theme_name = %theme_name, "no theme registered");
            return Ok(false);
        };
        tree.set_theme(id, delegate)?;
        Ok(true)
    }

    /// Applies themes to a component and all of its descendants. Returns
    /// how many components received a theme.
    pub fn apply_recursive(&self, tree: &mut ComponentTree, id: ComponentId) -> TreeResult<usize> {
        tree.component(id)?;
        let ids: Vec<ComponentId> = tree.descendants(id).collect();
        let mut applied = 0;
        for id in ids {
            if self.apply(tree, id)? {
                applied += 1;
            }
        }
        Ok(applied)
    }
}
