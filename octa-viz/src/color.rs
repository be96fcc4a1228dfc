use alloc::format;
use alloc::string::String;

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
#[allow(unused_imports)]
use micromath::F32Ext;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A 24-bit RGB color that serializes as `#rrggbb`, the format the control
/// panel edits and the settings store persists.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HexColor(pub Rgb888);

impl HexColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self(Rgb888::new(r, g, b))
    }

    pub fn parse(text: &str) -> Result<Self, &'static str> {
        let digits = text
            .strip_prefix('#')
            .ok_or("color must start with '#'")?;
        if digits.len() != 6 {
            return Err("color must be six hex digits");
        }
        let channel = |range: core::ops::Range<usize>| {
            digits
                .get(range)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or("invalid hex digit in color")
        };
        Ok(Self(Rgb888::new(
            channel(0..2)?,
            channel(2..4)?,
            channel(4..6)?,
        )))
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0.r(), self.0.g(), self.0.b())
    }
}

impl Serialize for HexColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for HexColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(D::Error::custom)
    }
}

/// Linear interpolation between two colors, `t` clamped to `[0, 1]`.
pub fn lerp(from: Rgb888, to: Rgb888, t: f32) -> Rgb888 {
    let t = t.clamp(0.0, 1.0);
    let channel = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
    Rgb888::new(
        channel(from.r(), to.r()),
        channel(from.g(), to.g()),
        channel(from.b(), to.b()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_format_round_trip() {
        let color = HexColor::parse("#c5203f").unwrap();
        assert_eq!(color, HexColor::rgb(0xc5, 0x20, 0x3f));
        assert_eq!(color.to_hex(), "#c5203f");
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(HexColor::parse("c5203f").is_err());
        assert!(HexColor::parse("#c5203").is_err());
        assert!(HexColor::parse("#c5203g").is_err());
        assert!(HexColor::parse("#c5203f00").is_err());
    }

    #[test]
    fn test_serde_uses_hex_strings() {
        let color = HexColor::rgb(0x1e, 0x1e, 0x1e);
        let json = serde_json::to_string(&color).unwrap();
        assert_eq!(json, "\"#1e1e1e\"");
        let back: HexColor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, color);
    }

    #[test]
    fn test_lerp_endpoints_and_midpoint() {
        let a = Rgb888::new(0, 0, 0);
        let b = Rgb888::new(200, 100, 50);
        assert_eq!(lerp(a, b, 0.0), a);
        assert_eq!(lerp(a, b, 1.0), b);
        assert_eq!(lerp(a, b, 0.5), Rgb888::new(100, 50, 25));
        // Out-of-range factors clamp instead of overshooting.
        assert_eq!(lerp(a, b, 2.0), b);
    }
}
