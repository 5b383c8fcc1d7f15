//! Theme records and the small value types they are built from.
//!
//! Both theme families keep their palette as a fixed-size array indexed by
//! the `baseXX` slot number. Equality and hashing of a theme only look at
//! `(name, author)`; see [`Base16Theme`] for details.

mod base16;
mod base24;
mod color;

pub use base16::{BASE16_KEYS, Base16Theme, Role};
pub use base24::{BASE24_KEYS, Base24Theme};
pub use color::{HexColor, Rgba};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a scheme is designed for a light or a dark background.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Light,
    #[default]
    Dark,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Light => "light",
            Variant::Dark => "dark",
        }
    }

    /// Parse the `variant` field of a scheme file. Only the exact lowercase
    /// spellings are recognised.
    pub fn from_scheme_value(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Variant::Light),
            "dark" => Some(Variant::Dark),
            _ => None,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two palette families published by the scheme repository.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[serde(rename_all = "lowercase")]
pub enum ThemeFamily {
    Base16,
    Base24,
}

impl ThemeFamily {
    /// Directory name of the family inside the scheme repository.
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeFamily::Base16 => "base16",
            ThemeFamily::Base24 => "base24",
        }
    }

    pub fn color_count(&self) -> usize {
        match self {
            ThemeFamily::Base16 => BASE16_KEYS.len(),
            ThemeFamily::Base24 => BASE24_KEYS.len(),
        }
    }
}

impl fmt::Display for ThemeFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ThemeFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "base16" => Ok(ThemeFamily::Base16),
            "base24" => Ok(ThemeFamily::Base24),
            other => Err(format!("unknown theme family '{other}'")),
        }
    }
}

/// A theme of either family, as returned by the family-generic loader calls.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ThemeRecord {
    Base16(Base16Theme),
    Base24(Base24Theme),
}

impl ThemeRecord {
    pub fn name(&self) -> &str {
        match self {
            ThemeRecord::Base16(theme) => theme.name(),
            ThemeRecord::Base24(theme) => theme.name(),
        }
    }

    pub fn author(&self) -> &str {
        match self {
            ThemeRecord::Base16(theme) => theme.author(),
            ThemeRecord::Base24(theme) => theme.author(),
        }
    }

    pub fn family(&self) -> ThemeFamily {
        match self {
            ThemeRecord::Base16(_) => ThemeFamily::Base16,
            ThemeRecord::Base24(_) => ThemeFamily::Base24,
        }
    }

    pub fn colors(&self) -> &[HexColor] {
        match self {
            ThemeRecord::Base16(theme) => theme.colors(),
            ThemeRecord::Base24(theme) => theme.colors(),
        }
    }

    pub fn into_base16(self) -> Option<Base16Theme> {
        match self {
            ThemeRecord::Base16(theme) => Some(theme),
            ThemeRecord::Base24(_) => None,
        }
    }

    pub fn into_base24(self) -> Option<Base24Theme> {
        match self {
            ThemeRecord::Base24(theme) => Some(theme),
            ThemeRecord::Base16(_) => None,
        }
    }
}

impl From<Base16Theme> for ThemeRecord {
    fn from(theme: Base16Theme) -> Self {
        ThemeRecord::Base16(theme)
    }
}

impl From<Base24Theme> for ThemeRecord {
    fn from(theme: Base24Theme) -> Self {
        ThemeRecord::Base24(theme)
    }
}

/// Anything that can be ordered by its display name.
///
/// The concurrent loader uses this to sort its merged results.
pub trait Named {
    fn name(&self) -> &str;
}

impl Named for Base16Theme {
    fn name(&self) -> &str {
        Base16Theme::name(self)
    }
}

impl Named for Base24Theme {
    fn name(&self) -> &str {
        Base24Theme::name(self)
    }
}

impl Named for ThemeRecord {
    fn name(&self) -> &str {
        ThemeRecord::name(self)
    }
}
