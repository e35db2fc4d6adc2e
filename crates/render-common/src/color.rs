//! RGBA color with a `#RRGGBB` / `#RRGGBBAA` hex codec.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RenderError;

/// An RGBA color with normalized channels in `[0, 1]`.
///
/// Colors serialize as hex strings, so palette files can list them the way
/// designers write them (`"#02111D"`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    r: f64,
    g: f64,
    b: f64,
    a: f64,
}

impl Color {
    pub const BLACK: Color = Color { r: 0.0, g: 0.0, b: 0.0, a: 1.0 };
    pub const WHITE: Color = Color { r: 1.0, g: 1.0, b: 1.0, a: 1.0 };
    pub const GREEN: Color = Color { r: 0.0, g: 1.0, b: 0.0, a: 1.0 };
    pub const CLEAR: Color = Color { r: 0.0, g: 0.0, b: 0.0, a: 0.0 };

    /// Create a color, clamping every channel into `[0, 1]`.
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self {
            r: clamp_channel(r),
            g: clamp_channel(g),
            b: clamp_channel(b),
            a: clamp_channel(a),
        }
    }

    /// Opaque color from normalized channels.
    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self::new(r, g, b, 1.0)
    }

    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
            a: a as f64 / 255.0,
        }
    }

    pub fn red(&self) -> f64 {
        self.r
    }

    pub fn green(&self) -> f64 {
        self.g
    }

    pub fn blue(&self) -> f64 {
        self.b
    }

    pub fn alpha(&self) -> f64 {
        self.a
    }

    /// Channels as an `(r, g, b, a)` tuple.
    pub fn components(&self) -> (f64, f64, f64, f64) {
        (self.r, self.g, self.b, self.a)
    }

    /// Channels rounded to the nearest 8-bit value.
    pub fn to_rgba8(&self) -> [u8; 4] {
        [
            channel_to_u8(self.r),
            channel_to_u8(self.g),
            channel_to_u8(self.b),
            channel_to_u8(self.a),
        ]
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA` (case-insensitive).
    ///
    /// Returns `None` for a missing `#`, any length other than 6 or 8 digits,
    /// or any non-hex character.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }

        let value = u32::from_str_radix(digits, 16).ok()?;
        match digits.len() {
            6 => Some(Self::from_rgba8(
                (value >> 16) as u8,
                (value >> 8) as u8,
                value as u8,
                255,
            )),
            8 => Some(Self::from_rgba8(
                (value >> 24) as u8,
                (value >> 16) as u8,
                (value >> 8) as u8,
                value as u8,
            )),
            _ => None,
        }
    }

    /// Lowercase hex form; the alpha pair is omitted when alpha is exactly 1.0.
    pub fn to_hex(&self) -> String {
        let [r, g, b, a] = self.to_rgba8();
        if self.a == 1.0 {
            format!("#{:02x}{:02x}{:02x}", r, g, b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", r, g, b, a)
        }
    }

    /// Channel-wise `self * (1 - t) + other * t`, alpha included.
    pub fn lerp(&self, other: &Color, t: f64) -> Color {
        let inv = 1.0 - t;
        Color::new(
            self.r * inv + other.r * t,
            self.g * inv + other.g * t,
            self.b * inv + other.b * t,
            self.a * inv + other.a * t,
        )
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

fn clamp_channel(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

fn channel_to_u8(value: f64) -> u8 {
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}

impl From<(f64, f64, f64)> for Color {
    fn from((r, g, b): (f64, f64, f64)) -> Self {
        Color::rgb(r, g, b)
    }
}

impl From<(f64, f64, f64, f64)> for Color {
    fn from((r, g, b, a): (f64, f64, f64, f64)) -> Self {
        Color::new(r, g, b, a)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::from_hex(s.trim()).ok_or_else(|| RenderError::InvalidColor(s.to_string()))
    }
}

impl TryFrom<String> for Color {
    type Error = RenderError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex_six_digits() {
        let color = Color::from_hex("#FF5500").unwrap();
        assert_eq!(color.to_rgba8(), [255, 85, 0, 255]);
        assert_eq!(color.alpha(), 1.0);
    }

    #[test]
    fn test_from_hex_rejects_sign_prefix() {
        // from_str_radix alone would accept a leading '+'
        assert!(Color::from_hex("#+fffff").is_none());
        assert!(Color::from_hex("#+fffffff").is_none());
    }

    #[test]
    fn test_new_clamps() {
        let color = Color::new(1.5, -0.2, f64::NAN, 0.5);
        assert_eq!(color.components(), (1.0, 0.0, 0.0, 0.5));
    }
}
