//! Hue type for particle and link strokes.
//!
//! The field draws with two fixed hues at varying alpha. [`Srgb`] holds the
//! hue; alpha travels separately with each draw call so a particle's opacity
//! never has to be baked into a color value.

use crate::error::FieldError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// 8-bit sRGB color.
///
/// Serializes as a `"#rrggbb"` hex string so configs stay hand-editable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Srgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Srgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `"#fe8019"` or `"fe8019"` (case insensitive).
    pub fn from_hex(hex: &str) -> Result<Srgb, FieldError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(FieldError::InvalidColor(format!(
                "expected 6 hex digits, got {hex:?}"
            )));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|e| FieldError::InvalidColor(format!("{hex:?}: {e}")))
        };
        Ok(Srgb {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// CSS `rgba(...)` string, as a 2D canvas fill or stroke style expects.
    ///
    /// Alpha is clamped to `[0, 1]`.
    pub fn css_rgba(self, alpha: f64) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            self.r,
            self.g,
            self.b,
            alpha.clamp(0.0, 1.0)
        )
    }
}

impl Serialize for Srgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Srgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Srgb::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
