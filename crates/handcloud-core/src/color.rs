//! Shared particle color.

use crate::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// RGB color applied to every particle, channels in [0, 1].
///
/// Serialized as a `#rrggbb` string so it round-trips through the color picker
/// and configuration files unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ParticleColor {
    /// Red channel
    pub r: f32,
    /// Green channel
    pub g: f32,
    /// Blue channel
    pub b: f32,
}

impl ParticleColor {
    /// The default cyan
    pub const DEFAULT_HEX: u32 = 0x00d4ff;

    /// Build from a packed `0xRRGGBB` value
    pub fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
        }
    }

    /// Packed `0xRRGGBB` value
    pub fn to_hex(&self) -> u32 {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }

    /// Channels as an array, as stored in the particle buffer
    pub fn to_array(&self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl Default for ParticleColor {
    fn default() -> Self {
        Self::from_hex(Self::DEFAULT_HEX)
    }
}

impl fmt::Display for ParticleColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.to_hex())
    }
}

impl FromStr for ParticleColor {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix('#')
            .or_else(|| trimmed.strip_prefix("0x"))
            .unwrap_or(trimmed);

        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(CoreError::InvalidColor(s.to_string()));
        }

        u32::from_str_radix(digits, 16)
            .map(Self::from_hex)
            .map_err(|_| CoreError::InvalidColor(s.to_string()))
    }
}

impl TryFrom<String> for ParticleColor {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ParticleColor> for String {
    fn from(color: ParticleColor) -> Self {
        color.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_color() {
        let color = ParticleColor::default();
        assert_eq!(color.r, 0.0);
        assert!((color.g - 212.0 / 255.0).abs() < 1e-6);
        assert_eq!(color.b, 1.0);
        assert_eq!(color.to_string(), "#00d4ff");
    }

    #[test]
    fn test_parse_variants() {
        let a: ParticleColor = "#FF0066".parse().unwrap();
        let b: ParticleColor = "ff0066".parse().unwrap();
        let c: ParticleColor = "0xff0066".parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(a.to_hex(), 0xff0066);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("#12345".parse::<ParticleColor>().is_err());
        assert!("#gggggg".parse::<ParticleColor>().is_err());
        assert!("".parse::<ParticleColor>().is_err());
    }

    #[test]
    fn test_serde_as_hex_string() {
        let color = ParticleColor::from_hex(0x4caf50);
        let json = serde_json::to_string(&color).unwrap();
        assert_eq!(json, "\"#4caf50\"");
        let back: ParticleColor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, color);
    }
}
