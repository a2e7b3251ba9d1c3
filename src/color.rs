//! RGB colors for galaxy gradients.
//!
//! Colors are plain linear RGB triples with channels in `[0, 1]`. They can be
//! written as `"#rrggbb"` strings or as `[r, g, b]` arrays in JSON payloads.

use crate::error::ParameterError;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// An RGB color with channels in `[0, 1]`.
///
/// The range is not enforced by the constructor; parameter setters validate
/// colors before accepting them (see [`Color::validate`]).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ColorRepr", into = "[f32; 3]")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);

    /// Create a color from raw channels.
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Parse a `"#rrggbb"` (or `"rrggbb"`) hex string.
    pub fn from_hex(hex: &str) -> Result<Self, ParameterError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ParameterError::InvalidHex(hex.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map(|v| v as f32 / 255.0)
                .map_err(|_| ParameterError::InvalidHex(hex.to_string()))
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Format as `"#rrggbb"`, rounding each channel to 8 bits.
    pub fn to_hex(&self) -> String {
        let byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", byte(self.r), byte(self.g), byte(self.b))
    }

    /// Check that every channel is finite and within `[0, 1]`.
    pub fn validate(&self, key: &'static str) -> Result<(), ParameterError> {
        for channel in [self.r, self.g, self.b] {
            if !channel.is_finite() || !(0.0..=1.0).contains(&channel) {
                return Err(ParameterError::ColorOutOfRange { key, channel });
            }
        }
        Ok(())
    }

    /// Per-channel linear interpolation towards `other`.
    ///
    /// `t = 0` returns `self`, `t = 1` returns `other`.
    #[inline]
    pub fn lerp(self, other: Color, t: f32) -> Color {
        Color::from(Vec3::from(self).lerp(Vec3::from(other), t))
    }
}

impl From<Color> for Vec3 {
    fn from(c: Color) -> Self {
        Vec3::new(c.r, c.g, c.b)
    }
}

impl From<Vec3> for Color {
    fn from(v: Vec3) -> Self {
        Color::new(v.x, v.y, v.z)
    }
}

impl From<Color> for [f32; 3] {
    fn from(c: Color) -> Self {
        [c.r, c.g, c.b]
    }
}

/// Accepted JSON shapes for a color.
#[derive(Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Hex(String),
    Rgb([f32; 3]),
}

impl TryFrom<ColorRepr> for Color {
    type Error = ParameterError;

    fn try_from(repr: ColorRepr) -> Result<Self, Self::Error> {
        match repr {
            ColorRepr::Hex(s) => Color::from_hex(&s),
            ColorRepr::Rgb([r, g, b]) => Ok(Color::new(r, g, b)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        let c = Color::from_hex("#ff6030").unwrap();
        assert!((c.r - 1.0).abs() < 1e-6);
        assert!((c.g - 0x60 as f32 / 255.0).abs() < 1e-6);
        assert!((c.b - 0x30 as f32 / 255.0).abs() < 1e-6);
        assert_eq!(c.to_hex(), "#ff6030");
    }

    #[test]
    fn test_from_hex_rejects_garbage() {
        assert!(Color::from_hex("#ff60").is_err());
        assert!(Color::from_hex("#gg6030").is_err());
        assert!(Color::from_hex("#ff603é").is_err());
        // Sign prefixes are not hex digits
        assert_eq!(
            Color::from_hex("#+f+f+f"),
            Err(ParameterError::InvalidHex("#+f+f+f".into()))
        );
        assert!(Color::from_hex("+fff00").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(Color::new(0.0, 0.5, 1.0).validate("c").is_ok());
        assert!(Color::new(1.2, 0.5, 1.0).validate("c").is_err());
        assert!(Color::new(f32::NAN, 0.5, 1.0).validate("c").is_err());
    }

    #[test]
    fn test_lerp_endpoints() {
        let a = Color::new(1.0, 0.0, 0.0);
        let b = Color::new(0.0, 0.0, 1.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        let mid = a.lerp(b, 0.5);
        assert!((mid.r - 0.5).abs() < 1e-6 && (mid.b - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_deserialize_both_shapes() {
        let hex: Color = serde_json::from_str("\"#1b3984\"").unwrap();
        assert_eq!(hex.to_hex(), "#1b3984");
        let rgb: Color = serde_json::from_str("[0.25, 0.5, 0.75]").unwrap();
        assert_eq!(rgb, Color::new(0.25, 0.5, 0.75));
    }
}
