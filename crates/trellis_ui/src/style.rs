//! Colors and paint strategies.
//!
//! Components never own their paints. A theme or the application keeps the
//! `Rc<Paint>` alive and the component holds a weak reference to it; see
//! [`crate::ComponentTree::set_background`].

/// Straight-alpha color with channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red.
    pub r: f32,
    /// Green.
    pub g: f32,
    /// Blue.
    pub b: f32,
    /// Opacity.
    pub a: f32,
}

impl Color {
    /// Fully transparent.
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgba(0.0, 0.0, 0.0, 1.0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);
    /// Mid gray, the default control face.
    pub const GRAY: Self = Self::rgba(0.75, 0.75, 0.75, 1.0);
    /// Dark gray, used for shadows.
    pub const DARK_GRAY: Self = Self::rgba(0.25, 0.25, 0.25, 1.0);

    /// Color from normalized channels.
    #[must_use]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from 8-bit channels.
    #[must_use]
    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgba8([r, g, b, u8::MAX])
    }

    /// Color from 8-bit channels in `[r, g, b, a]` order.
    #[must_use]
    pub fn rgba8(channels: [u8; 4]) -> Self {
        let [r, g, b, a] = channels.map(|c| f32::from(c) / 255.0);
        Self { r, g, b, a }
    }

    /// Parses `#RRGGBB` or `#RRGGBBAA`. The `#` is optional.
    #[must_use]
    pub fn parse_hex(literal: &str) -> Option<Self> {
        let digits = literal.trim().trim_start_matches('#');
        if !matches!(digits.len(), 6 | 8) || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let mut channels = [u8::MAX; 4];
        for (slot, pair) in channels.iter_mut().zip(digits.as_bytes().chunks(2)) {
            let pair = std::str::from_utf8(pair).ok()?;
            *slot = u8::from_str_radix(pair, 16).ok()?;
        }
        Some(Self::rgba8(channels))
    }

    /// Mixes towards `other`; `t = 0` is `self`, `t = 1` is `other`.
    #[must_use]
    pub fn mix(self, other: Self, t: f32) -> Self {
        let channel = |from: f32, to: f32| from + (to - from) * t;
        Self {
            r: channel(self.r, other.r),
            g: channel(self.g, other.g),
            b: channel(self.b, other.b),
            a: channel(self.a, other.a),
        }
    }

    /// 8-bit channels, rounded to nearest.
    #[must_use]
    pub fn to_rgba8(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a].map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// A fill strategy handed to a [`crate::Surface`].
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    /// A single color.
    Solid(Color),
    /// A two-stop linear gradient across the filled area.
    Gradient {
        /// Color at the start edge.
        start: Color,
        /// Color at the end edge.
        end: Color,
        /// Runs top to bottom when true, left to right otherwise.
        vertical: bool,
    },
}

impl Paint {
    /// Returns the color at a normalized position along the paint.
    #[must_use]
    pub fn color_at(&self, t: f32) -> Color {
        match self {
            Self::Solid(color) => *color,
            Self::Gradient { start, end, .. } => start.mix(*end, t.clamp(0.0, 1.0)),
        }
    }
}

impl From<Color> for Paint {
    fn from(color: Color) -> Self {
        Self::Solid(color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mix_halfway() {
        let mid = Color::BLACK.mix(Color::WHITE, 0.5);
        assert_eq!(mid, Color::rgba(0.5, 0.5, 0.5, 1.0));
    }

    #[test]
    fn test_parse_hex() {
        let red = Color::parse_hex("#ff0000").unwrap();
        assert_eq!(red.to_rgba8(), [255, 0, 0, 255]);

        let translucent = Color::parse_hex("00ff0080").unwrap();
        assert_eq!(translucent.to_rgba8(), [0, 255, 0, 128]);

        assert!(Color::parse_hex("#12345").is_none());
        assert!(Color::parse_hex("#gg0000").is_none());
    }

    #[test]
    fn test_gradient_endpoints() {
        let paint = Paint::Gradient {
            start: Color::BLACK,
            end: Color::WHITE,
            vertical: true,
        };
        assert_eq!(paint.color_at(0.0), Color::BLACK);
        assert_eq!(paint.color_at(2.0), Color::WHITE);
    }
}
