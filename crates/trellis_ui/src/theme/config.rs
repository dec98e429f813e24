//! Themes described in TOML.
//!
//! ```toml
//! [palette]
//! face = "#c0c0c0"
//! ink = "#101010"
//!
//! [components.Button]
//! background = "face"
//! foreground = "ink"
//! border = "bevel-raised"
//!
//! [components.Panel]
//! background = "face"
//! border = "line"
//! border_painted = false
//! ```

use std::collections::BTreeMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::{ThemeDelegate, ThemeRegistry};
use crate::border::{BevelBorder, Border, LineBorder};
use crate::error::ThemeError;
use crate::style::{Color, Paint};
use crate::widget::{ComponentId, ComponentTree};

/// Root of a theme file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeConfig {
    /// Named colors as `#RRGGBB` or `#RRGGBBAA`.
    #[serde(default)]
    pub palette: BTreeMap<String, String>,
    /// Styles keyed by theme name.
    #[serde(default)]
    pub components: BTreeMap<String, ComponentStyle>,
}

impl ThemeConfig {
    /// Parses a theme file.
    pub fn from_toml_str(source: &str) -> Result<Self, ThemeError> {
        Ok(toml::from_str(source)?)
    }
}

/// Appearance of one kind of widget.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComponentStyle {
    /// Palette entry for the background.
    pub background: Option<String>,
    /// Palette entry for the foreground.
    pub foreground: Option<String>,
    /// Border to attach.
    #[serde(default)]
    pub border: BorderKind,
    /// Overrides whether the border is painted.
    pub border_painted: Option<bool>,
}

/// Borders a theme file can name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BorderKind {
    /// Leave the border alone.
    #[default]
    None,
    /// One pixel in the foreground color.
    Line,
    /// [`BevelBorder::raised`].
    BevelRaised,
    /// [`BevelBorder::lowered`].
    BevelLowered,
}

impl BorderKind {
    fn build(self, line_color: Color) -> Option<Box<dyn Border>> {
        match self {
            Self::None => None,
            Self::Line => Some(Box::new(LineBorder::new(line_color, 1))),
            Self::BevelRaised => Some(Box::new(BevelBorder::raised())),
            Self::BevelLowered => Some(Box::new(BevelBorder::lowered())),
        }
    }
}

/// A theme assembled from a [`ComponentStyle`] and registry paints.
#[derive(Debug, Clone)]
pub struct PaletteTheme {
    background: Option<Rc<Paint>>,
    foreground: Option<Rc<Paint>>,
    border: BorderKind,
    border_painted: Option<bool>,
}

impl PaletteTheme {
    /// Resolves the palette references of a style against a registry.
    pub fn from_style(style: &ComponentStyle, registry: &ThemeRegistry) -> Result<Self, ThemeError> {
        let lookup = |name: &Option<String>| -> Result<Option<Rc<Paint>>, ThemeError> {
            name.as_deref()
                .map(|name| registry.paint(name).ok_or_else(|| ThemeError::UnknownPaint(name.to_owned())))
                .transpose()
        };
        Ok(Self {
            background: lookup(&style.background)?,
            foreground: lookup(&style.foreground)?,
            border: style.border,
            border_painted: style.border_painted,
        })
    }

    fn line_color(&self) -> Color {
        self.foreground
            .as_deref()
            .map_or(Color::BLACK, |paint| paint.color_at(0.0))
    }
}

impl ThemeDelegate for PaletteTheme {
    fn install_theme(&self, tree: &mut ComponentTree, id: ComponentId) {
        if let Some(background) = &self.background {
            let _ = tree.set_background(id, Some(background));
        }
        if let Some(foreground) = &self.foreground {
            let _ = tree.set_foreground(id, Some(foreground));
        }
        if let Some(border) = self.border.build(self.line_color()) {
            let _ = tree.set_border(id, Some(border));
        }
        if let Some(painted) = self.border_painted {
            let _ = tree.set_border_painted(id, painted);
        }
    }

    fn deinstall_theme(&self, tree: &mut ComponentTree, id: ComponentId) {
        if self.background.is_some() {
            let _ = tree.set_background(id, None);
        }
        if self.foreground.is_some() {
            let _ = tree.set_foreground(id, None);
        }
        if self.border != BorderKind::None {
            let _ = tree.set_border(id, None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::Panel;

    const THEME: &str = r##"
        [palette]
        face = "#c0c0c0"
        ink = "#101010"

        [components.Panel]
        background = "face"
        foreground = "ink"
        border = "line"
        border_painted = false
    "##;

    #[test]
    fn test_parse_config() {
        let config = ThemeConfig::from_toml_str(THEME).unwrap();

        assert_eq!(config.palette.len(), 2);
        let panel = &config.components["Panel"];
        assert_eq!(panel.border, BorderKind::Line);
        assert_eq!(panel.border_painted, Some(false));
    }

    #[test]
    fn test_palette_theme_applies_style() {
        let registry = ThemeRegistry::from_toml_str(THEME).unwrap();
        let mut tree = ComponentTree::new();
        let panel = tree.create_container(Panel::new());

        assert!(registry.apply(&mut tree, panel).unwrap());

        let component = tree.component(panel).unwrap();
        assert_eq!(
            component.background().as_deref(),
            Some(&Paint::Solid(Color::rgb8(0xc0, 0xc0, 0xc0)))
        );
        assert!(component.has_border());
        assert!(!component.is_border_painted());
        assert_eq!(component.insets().top, 1);
    }

    #[test]
    fn test_unknown_palette_entry_is_rejected() {
        let source = r#"
            [components.Button]
            background = "missing"
        "#;

        let err = ThemeRegistry::from_toml_str(source).unwrap_err();
        assert!(matches!(err, ThemeError::UnknownPaint(name) if name == "missing"));
    }

    #[test]
    fn test_bad_color_is_rejected() {
        let source = r#"
            [palette]
            face = "grey"
        "#;

        let err = ThemeRegistry::from_toml_str(source).unwrap_err();
        assert!(matches!(err, ThemeError::InvalidColor { .. }));
    }

    #[test]
    fn test_malformed_toml_is_a_parse_error() {
        let err = ThemeConfig::from_toml_str("[palette").unwrap_err();
        assert!(matches!(err, ThemeError::Parse(_)));
    }
}
