use super::{Base16Theme, HexColor, Variant};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use uuid::Uuid;

/// Scheme-file keys of the 24 palette slots, in slot order.
pub const BASE24_KEYS: [&str; 24] = [
    "base00", "base01", "base02", "base03", "base04", "base05", "base06", "base07", "base08",
    "base09", "base0A", "base0B", "base0C", "base0D", "base0E", "base0F", "base10", "base11",
    "base12", "base13", "base14", "base15", "base16", "base17",
];

/// A Base24 color scheme: the 16 Base16 slots plus 8 extension slots.
///
/// Carries no variant. Equality and hashing follow [`Base16Theme`]: only
/// `(name, author)` are compared.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(into = "StoredBase24", try_from = "StoredBase24")]
pub struct Base24Theme {
    id: Uuid,
    name: String,
    author: String,
    colors: [HexColor; 24],
}

impl Base24Theme {
    pub fn new(name: impl Into<String>, author: impl Into<String>, colors: [HexColor; 24]) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            author: author.into(),
            colors,
        }
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

    /// All 24 colors in slot order.
    pub fn colors(&self) -> &[HexColor; 24] {
        &self.colors
    }

    /// The 8 extension slots (`base10`..`base17`).
    pub fn extension_colors(&self) -> &[HexColor] {
        &self.colors[16..]
    }

    /// Color of slot `index` (0..=23).
    pub fn color_at(&self, index: usize) -> Option<&HexColor> {
        self.colors.get(index)
    }

    /// Lossy conversion: keeps name, author and the first 16 colors. The
    /// extension colors are dropped and the variant falls back to the
    /// default.
    pub fn as_base16_theme(&self) -> Base16Theme {
        let colors: [HexColor; 16] = std::array::from_fn(|i| self.colors[i].clone());
        Base16Theme::new(
            self.name.clone(),
            self.author.clone(),
            Variant::default(),
            colors,
        )
    }
}

impl PartialEq for Base24Theme {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.author == other.author
    }
}

impl Eq for Base24Theme {}

impl Hash for Base24Theme {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.author.hash(state);
    }
}

#[derive(Serialize, Deserialize)]
struct StoredBase24 {
    name: String,
    author: String,
    #[serde(flatten)]
    palette: BTreeMap<String, HexColor>,
}

impl From<Base24Theme> for StoredBase24 {
    fn from(theme: Base24Theme) -> Self {
        let palette = BASE24_KEYS
            .iter()
            .map(|key| key.to_string())
            .zip(theme.colors)
            .collect();

        Self {
            name: theme.name,
            author: theme.author,
            palette,
        }
    }
}

impl TryFrom<StoredBase24> for Base24Theme {
    type Error = String;

    fn try_from(mut stored: StoredBase24) -> Result<Self, Self::Error> {
        let mut colors = Vec::with_capacity(BASE24_KEYS.len());
        for key in BASE24_KEYS {
            let color = stored
                .palette
                .remove(key)
                .ok_or_else(|| format!("missing color {key} for theme '{}'", stored.name))?;
            colors.push(color);
        }

        let colors: [HexColor; 24] = colors
            .try_into()
            .map_err(|_| "palette must have exactly 24 colors".to_string())?;

        Ok(Base24Theme::new(stored.name, stored.author, colors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(name: &str) -> Base24Theme {
        let colors = std::array::from_fn(|i| HexColor::new(format!("{:02x}{:02x}{:02x}", i, i, i)));
        Base24Theme::new(name, "Test Author", colors)
    }

    #[test]
    fn test_color_access() {
        let theme = numbered("Test");
        assert_eq!(theme.colors().len(), 24);
        assert_eq!(theme.color_at(0).unwrap().as_str(), "000000");
        assert_eq!(theme.color_at(23).unwrap().as_str(), "171717");
        assert!(theme.color_at(24).is_none());
        assert_eq!(theme.extension_colors().len(), 8);
        assert_eq!(theme.extension_colors()[0].as_str(), "101010");
    }

    #[test]
    fn test_as_base16_theme_drops_extension_slots() {
        let theme = numbered("Test Base24");
        let converted = theme.as_base16_theme();

        assert_eq!(converted.name(), theme.name());
        assert_eq!(converted.author(), theme.author());
        assert_eq!(converted.colors().len(), 16);
        assert_eq!(&converted.colors()[..], &theme.colors()[..16]);
        assert_eq!(converted.variant(), Variant::Dark);
    }

    #[test]
    fn test_equality_uses_name_and_author_only() {
        let a = numbered("Same");
        let mut colors = a.colors().clone();
        colors[3] = HexColor::new("ffffff");
        let b = Base24Theme::new("Same", "Test Author", colors);

        assert_eq!(a, b);
        assert_ne!(a, numbered("Other"));
    }

    #[test]
    fn test_serialized_form_round_trips() {
        let theme = numbered("Stored");
        let json = serde_json::to_string(&theme).unwrap();
        assert!(json.contains("\"base17\":\"171717\""));

        let restored: Base24Theme = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.colors(), theme.colors());
    }
}
