use serde::{Deserialize, Serialize};
use std::fmt;

/// Weight of the channel-range term in [`Color::distance_sq`].
pub const SATURATION_WEIGHT: f64 = 0.8;

/// An opaque 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build from a packed `0xRRGGBB` literal.
    pub const fn from_u32(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as u8,
            g: ((hex >> 8) & 0xff) as u8,
            b: (hex & 0xff) as u8,
        }
    }

    /// Parse `#rrggbb` (the `#` is optional, case insensitive).
    /// Anything else yields black.
    pub fn from_hex(text: &str) -> Self {
        let digits = text.strip_prefix('#').unwrap_or(text);
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Self::BLACK;
        }
        match u32::from_str_radix(digits, 16) {
            Ok(v) => Self::from_u32(v),
            Err(_) => Self::BLACK,
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Channel range (max - min), not HSL saturation.
    pub fn saturation(self) -> i32 {
        let max = self.r.max(self.g).max(self.b);
        let min = self.r.min(self.g).min(self.b);
        (max - min) as i32
    }

    /// Squared RGB distance plus the weighted squared saturation difference.
    pub fn distance_sq(self, other: Color) -> f64 {
        let dr = self.r as i32 - other.r as i32;
        let dg = self.g as i32 - other.g as i32;
        let db = self.b as i32 - other.b as i32;
        let rgb = dr * dr + dg * dg + db * db;

        let ds = self.saturation() - other.saturation();
        rgb as f64 + (ds * ds) as f64 * SATURATION_WEIGHT
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
