use serde::{Deserialize, Serialize};
use std::fmt;

/// A color string as it appears in a scheme file.
///
/// The value is stored verbatim (minus any `#` the Base16 parser removed).
/// No length or digit validation happens at construction time; decoding into
/// channels is done on demand by [`HexColor::to_rgba`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HexColor(String);

/// An 8-bit-per-channel color decoded from a [`HexColor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl HexColor {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode the color into channels.
    ///
    /// Accepts 3-digit (`rgb`), 6-digit (`rrggbb`) and 8-digit (`aarrggbb`)
    /// forms, with or without a leading `#`. Returns `None` for anything else.
    pub fn to_rgba(&self) -> Option<Rgba> {
        let hex = self.0.trim_start_matches('#');
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }

        let value = u32::from_str_radix(hex, 16).ok()?;
        let channel = |shift: u32| ((value >> shift) & 0xFF) as u8;

        match hex.len() {
            3 => {
                let nibble = |shift: u32| (((value >> shift) & 0xF) * 17) as u8;
                Some(Rgba {
                    r: nibble(8),
                    g: nibble(4),
                    b: nibble(0),
                    a: 0xFF,
                })
            }
            6 => Some(Rgba {
                r: channel(16),
                g: channel(8),
                b: channel(0),
                a: 0xFF,
            }),
            8 => Some(Rgba {
                a: channel(24),
                r: channel(16),
                g: channel(8),
                b: channel(0),
            }),
            _ => None,
        }
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for HexColor {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for HexColor {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for HexColor {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Rgba {
    /// Channels as floats in `0.0..=1.0`, in `(r, g, b, a)` order.
    pub fn to_unit(self) -> (f64, f64, f64, f64) {
        (
            f64::from(self.r) / 255.0,
            f64::from(self.g) / 255.0,
            f64::from(self.b) / 255.0,
            f64::from(self.a) / 255.0,
        )
    }
}
