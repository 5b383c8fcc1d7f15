use super::{HexColor, Variant};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use uuid::Uuid;

/// Scheme-file keys of the 16 palette slots, in slot order.
pub const BASE16_KEYS: [&str; 16] = [
    "base00", "base01", "base02", "base03", "base04", "base05", "base06", "base07", "base08",
    "base09", "base0A", "base0B", "base0C", "base0D", "base0E", "base0F",
];

/// Semantic role of each Base16 slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    Background,
    BackgroundAlt,
    Selection,
    Comment,
    ForegroundAlt,
    Foreground,
    ForegroundLight,
    BackgroundLight,
    Red,
    Orange,
    Yellow,
    Green,
    Cyan,
    Blue,
    Purple,
    Brown,
}

impl Role {
    /// All roles in slot order, so `Role::ALL[i].index() == i`.
    pub const ALL: [Role; 16] = [
        Role::Background,
        Role::BackgroundAlt,
        Role::Selection,
        Role::Comment,
        Role::ForegroundAlt,
        Role::Foreground,
        Role::ForegroundLight,
        Role::BackgroundLight,
        Role::Red,
        Role::Orange,
        Role::Yellow,
        Role::Green,
        Role::Cyan,
        Role::Blue,
        Role::Purple,
        Role::Brown,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Role::Background => "background",
            Role::BackgroundAlt => "backgroundAlt",
            Role::Selection => "selection",
            Role::Comment => "comment",
            Role::ForegroundAlt => "foregroundAlt",
            Role::Foreground => "foreground",
            Role::ForegroundLight => "foregroundLight",
            Role::BackgroundLight => "backgroundLight",
            Role::Red => "red",
            Role::Orange => "orange",
            Role::Yellow => "yellow",
            Role::Green => "green",
            Role::Cyan => "cyan",
            Role::Blue => "blue",
            Role::Purple => "purple",
            Role::Brown => "brown",
        }
    }

    pub fn from_name(name: &str) -> Option<Role> {
        Role::ALL.into_iter().find(|role| role.name() == name)
    }
}

/// A Base16 color scheme.
///
/// Two themes are equal (and hash equally) when their `name` and `author`
/// match, regardless of palette or variant. Sets and maps keyed by
/// `Base16Theme` therefore treat re-coloured copies of a scheme as the same
/// entry.
///
/// The `id` is generated per instance and is not persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(into = "StoredBase16", try_from = "StoredBase16")]
pub struct Base16Theme {
    id: Uuid,
    name: String,
    author: String,
    variant: Variant,
    colors: [HexColor; 16],
}

static DEFAULT_DARK: Lazy<Base16Theme> = Lazy::new(|| {
    Base16Theme::from_hex(
        "Default Dark",
        "TintedThemes",
        Variant::Dark,
        [
            "181818", "282828", "383838", "585858", "b8b8b8", "d8d8d8", "e8e8e8", "f8f8f8",
            "ab4642", "dc9656", "f7ca88", "a1b56c", "86c1b9", "7cafc2", "ba8baf", "a16946",
        ],
    )
});

static DEFAULT_LIGHT: Lazy<Base16Theme> = Lazy::new(|| {
    Base16Theme::from_hex(
        "Default Light",
        "TintedThemes",
        Variant::Light,
        [
            "f8f8f8", "e8e8e8", "d8d8d8", "b8b8b8", "585858", "383838", "282828", "181818",
            "ab4642", "dc9656", "f7ca88", "a1b56c", "86c1b9", "7cafc2", "ba8baf", "a16946",
        ],
    )
});

impl Base16Theme {
    pub fn new(
        name: impl Into<String>,
        author: impl Into<String>,
        variant: Variant,
        colors: [HexColor; 16],
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            author: author.into(),
            variant,
            colors,
        }
    }

    /// Convenience constructor from string literals.
    pub fn from_hex(
        name: impl Into<String>,
        author: impl Into<String>,
        variant: Variant,
        colors: [&str; 16],
    ) -> Self {
        Self::new(name, author, variant, colors.map(HexColor::from))
    }

    /// Built-in dark fallback scheme.
    pub fn default_dark() -> &'static Base16Theme {
        &DEFAULT_DARK
    }

    /// Built-in light fallback scheme.
    pub fn default_light() -> &'static Base16Theme {
        &DEFAULT_LIGHT
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn is_light(&self) -> bool {
        self.variant == Variant::Light
    }

    pub fn is_dark(&self) -> bool {
        self.variant == Variant::Dark
    }

    /// All 16 colors in slot order.
    pub fn colors(&self) -> &[HexColor; 16] {
        &self.colors
    }

    /// Color of slot `index` (0..=15).
    pub fn color_at(&self, index: usize) -> Option<&HexColor> {
        self.colors.get(index)
    }

    pub fn role(&self, role: Role) -> &HexColor {
        &self.colors[role.index()]
    }

    /// Look up a color by its camelCase role name, e.g. `"backgroundAlt"`.
    pub fn color_for_role_name(&self, name: &str) -> Option<&HexColor> {
        Role::from_name(name).map(|role| self.role(role))
    }

    /// Role name to color for all 16 roles.
    pub fn semantic_colors(&self) -> BTreeMap<&'static str, &HexColor> {
        Role::ALL
            .into_iter()
            .map(|role| (role.name(), self.role(role)))
            .collect()
    }

    pub fn background(&self) -> &HexColor {
        self.role(Role::Background)
    }

    pub fn foreground(&self) -> &HexColor {
        self.role(Role::Foreground)
    }

    pub fn selection(&self) -> &HexColor {
        self.role(Role::Selection)
    }

    pub fn comment(&self) -> &HexColor {
        self.role(Role::Comment)
    }

    pub fn error(&self) -> &HexColor {
        self.role(Role::Red)
    }

    pub fn warning(&self) -> &HexColor {
        self.role(Role::Orange)
    }

    pub fn success(&self) -> &HexColor {
        self.role(Role::Green)
    }

    pub fn link(&self) -> &HexColor {
        self.role(Role::Blue)
    }
}

impl PartialEq for Base16Theme {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.author == other.author
    }
}

impl Eq for Base16Theme {}

impl Hash for Base16Theme {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.author.hash(state);
    }
}

/// On-disk shape of a [`Base16Theme`]: one named field per palette slot.
#[derive(Serialize, Deserialize)]
struct StoredBase16 {
    name: String,
    author: String,
    #[serde(default)]
    variant: Variant,
    #[serde(flatten)]
    palette: BTreeMap<String, HexColor>,
}

impl From<Base16Theme> for StoredBase16 {
    fn from(theme: Base16Theme) -> Self {
        let palette = BASE16_KEYS
            .iter()
            .map(|key| key.to_string())
            .zip(theme.colors)
            .collect();

        Self {
            name: theme.name,
            author: theme.author,
            variant: theme.variant,
            palette,
        }
    }
}

impl TryFrom<StoredBase16> for Base16Theme {
    type Error = String;

    fn try_from(mut stored: StoredBase16) -> Result<Self, Self::Error> {
        let mut colors = Vec::with_capacity(BASE16_KEYS.len());
        for key in BASE16_KEYS {
            let color = stored
                .palette
                .remove(key)
                .ok_or_else(|| format!("missing color {key} for theme '{}'", stored.name))?;
            colors.push(color);
        }

        let colors: [HexColor; 16] = colors
            .try_into()
            .map_err(|_| "palette must have exactly 16 colors".to_string())?;

        Ok(Base16Theme::new(
            stored.name,
            stored.author,
            stored.variant,
            colors,
        ))
    }
}
