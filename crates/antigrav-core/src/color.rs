//! Particle colors and the palette they are drawn from.

use std::fmt;
use std::str::FromStr;

use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when parsing colors or building a palette.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// The string is not of the form `#RRGGBB`.
    #[error("invalid color {0:?}, expected #RRGGBB")]
    InvalidHex(String),

    /// A palette needs at least one color.
    #[error("palette must contain at least one color")]
    EmptyPalette,
}

/// A 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl FromStr for Rgb {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ColorError::InvalidHex(s.to_string());

        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| invalid())
        };

        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl TryFrom<String> for Rgb {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl From<Rgb> for Color {
    fn from(color: Rgb) -> Self {
        Color::Rgb(color.r, color.g, color.b)
    }
}

/// A non-empty set of colors particles pick from at spawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Rgb>", into = "Vec<Rgb>")]
pub struct Palette(Vec<Rgb>);

impl Palette {
    /// Blue, red, yellow, green.
    pub const DEFAULT: [Rgb; 4] = [
        Rgb::new(0x42, 0x85, 0xF4),
        Rgb::new(0xEA, 0x43, 0x35),
        Rgb::new(0xFB, 0xBC, 0x05),
        Rgb::new(0x34, 0xA8, 0x53),
    ];

    /// Build a palette, rejecting an empty color list.
    pub fn new(colors: Vec<Rgb>) -> Result<Self, ColorError> {
        if colors.is_empty() {
            return Err(ColorError::EmptyPalette);
        }
        Ok(Self(colors))
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// A palette is never empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Color at `index`, wrapping around the palette length.
    pub fn get(&self, index: usize) -> Rgb {
        self.0[index % self.0.len()]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self(Self::DEFAULT.to_vec())
    }
}

impl TryFrom<Vec<Rgb>> for Palette {
    type Error = ColorError;

    fn try_from(colors: Vec<Rgb>) -> Result<Self, Self::Error> {
        Self::new(colors)
    }
}

impl From<Palette> for Vec<Rgb> {
    fn from(palette: Palette) -> Self {
        palette.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!("#4285F4".parse::<Rgb>(), Ok(Rgb::new(0x42, 0x85, 0xF4)));
        assert_eq!("#ea4335".parse::<Rgb>(), Ok(Rgb::new(0xEA, 0x43, 0x35)));
        assert!("4285F4".parse::<Rgb>().is_err());
        assert!("#4285F".parse::<Rgb>().is_err());
        assert!("#GG0000".parse::<Rgb>().is_err());
    }

    #[test]
    fn test_display_round_trips_uppercase() {
        let color: Rgb = "#fbbc05".parse().unwrap();
        assert_eq!(color.to_string(), "#FBBC05");
    }

    #[test]
    fn test_into_ratatui_color() {
        assert_eq!(Color::from(Rgb::new(1, 2, 3)), Color::Rgb(1, 2, 3));
    }

    #[test]
    fn test_palette_rejects_empty() {
        assert_eq!(Palette::new(Vec::new()), Err(ColorError::EmptyPalette));
    }

    #[test]
    fn test_palette_get_wraps() {
        let palette = Palette::default();
        assert_eq!(palette.len(), 4);
        assert_eq!(palette.get(4), palette.get(0));
        assert_eq!(palette.get(1), Rgb::new(0xEA, 0x43, 0x35));
    }
}
