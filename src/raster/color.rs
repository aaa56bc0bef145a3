//! Solid fill colors.

use image::Rgba;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// An RGBA8 color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA`.
    pub fn from_hex(hex: &str) -> Result<Self, Error> {
        let digits = hex
            .strip_prefix('#')
            .ok_or_else(|| Error::invalid_color(hex, "must start with '#'"))?;

        if !digits.is_ascii() {
            return Err(Error::invalid_color(hex, "contains non-ASCII characters"));
        }

        let component = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| Error::invalid_color(hex, "invalid hex digit"))
        };

        match digits.len() {
            3 => {
                // #RGB: each digit is doubled, 0xF -> 0xFF
                let r = component(0..1)?;
                let g = component(1..2)?;
                let b = component(2..3)?;
                Ok(Color::rgb(r * 17, g * 17, b * 17))
            }
            6 => Ok(Color::rgb(component(0..2)?, component(2..4)?, component(4..6)?)),
            8 => Ok(Color::rgba(
                component(0..2)?,
                component(2..4)?,
                component(4..6)?,
                component(6..8)?,
            )),
            n => Err(Error::invalid_color(
                hex,
                format!("expected 3, 6 or 8 hex digits, got {}", n),
            )),
        }
    }

    pub fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, self.a])
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

impl From<Color> for Rgba<u8> {
    fn from(c: Color) -> Self {
        c.to_rgba()
    }
}

impl From<Rgba<u8>> for Color {
    fn from(p: Rgba<u8>) -> Self {
        Color::rgba(p[0], p[1], p[2], p[3])
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::from_hex(s.trim())
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            write!(
                f,
                "#{:02X}{:02X}{:02X}{:02X}",
                self.r, self.g, self.b, self.a
            )
        }
    }
}
