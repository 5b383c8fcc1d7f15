//! Scheme file parsing.
//!
//! Scheme files are YAML documents. Two layouts exist for Base16: the older
//! flat one with `base00`..`base0F` at the top level, and the newer one that
//! nests them under `palette`. Base24 files are only read in the flat
//! layout, use `scheme` instead of `name` for the title, and keep their
//! color strings untouched; Base16 colors lose a single leading `#`.

use crate::common::ParseError;
use crate::model::{
    BASE16_KEYS, BASE24_KEYS, Base16Theme, Base24Theme, HexColor, ThemeFamily, ThemeRecord,
    Variant,
};
use serde_yaml::{Mapping, Value};

const PALETTE_KEY: &str = "palette";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HashPrefix {
    Strip,
    Keep,
}

/// Parse a Base16 scheme file. `identifier` names the file in error
/// messages; the theme's own name comes from the document.
pub fn parse_base16(raw: &str, identifier: &str) -> Result<Base16Theme, ParseError> {
    let document = decode_document(raw, identifier)?;
    base16_from_mapping(&document, identifier)
}

/// Parse a Base24 scheme file.
pub fn parse_base24(raw: &str, identifier: &str) -> Result<Base24Theme, ParseError> {
    let document = decode_document(raw, identifier)?;
    base24_from_mapping(&document, identifier)
}

/// Parse with the parser matching `family`.
pub fn parse_theme(
    family: ThemeFamily,
    raw: &str,
    identifier: &str,
) -> Result<ThemeRecord, ParseError> {
    match family {
        ThemeFamily::Base16 => parse_base16(raw, identifier).map(ThemeRecord::from),
        ThemeFamily::Base24 => parse_base24(raw, identifier).map(ThemeRecord::from),
    }
}

/// Build a Base16 theme from an already decoded document.
pub fn base16_from_mapping(
    document: &Mapping,
    identifier: &str,
) -> Result<Base16Theme, ParseError> {
    let name = required_str(document, "name", identifier)?;
    let author = required_str(document, "author", identifier)?;
    let variant = match document.get("variant").and_then(Value::as_str) {
        None => Variant::default(),
        Some(value) => Variant::from_scheme_value(value).unwrap_or_else(|| {
            log::warn!(
                "Unknown variant '{value}' in theme {identifier}, treating it as {}",
                Variant::default()
            );
            Variant::default()
        }),
    };

    let color_source = document
        .get(PALETTE_KEY)
        .and_then(Value::as_mapping)
        .unwrap_or(document);
    let colors = read_colors(color_source, &BASE16_KEYS, identifier, HashPrefix::Strip)?;

    Ok(Base16Theme::new(name, author, variant, colors))
}

/// Build a Base24 theme from an already decoded document.
pub fn base24_from_mapping(
    document: &Mapping,
    identifier: &str,
) -> Result<Base24Theme, ParseError> {
    let name = required_str(document, "scheme", identifier)?;
    let author = required_str(document, "author", identifier)?;
    let colors = read_colors(document, &BASE24_KEYS, identifier, HashPrefix::Keep)?;

    Ok(Base24Theme::new(name, author, colors))
}

fn decode_document(raw: &str, identifier: &str) -> Result<Mapping, ParseError> {
    let value: Value = serde_yaml::from_str(raw).map_err(|e| ParseError::Syntax {
        theme: identifier.to_string(),
        reason: e.to_string(),
    })?;

    match value {
        Value::Mapping(mapping) => Ok(mapping),
        _ => Err(ParseError::NotAMapping {
            theme: identifier.to_string(),
        }),
    }
}

fn required_str<'a>(
    document: &'a Mapping,
    field: &'static str,
    identifier: &str,
) -> Result<&'a str, ParseError> {
    document
        .get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| ParseError::MissingField {
            theme: identifier.to_string(),
            field,
        })
}

fn read_colors<const N: usize>(
    source: &Mapping,
    keys: &[&'static str; N],
    identifier: &str,
    prefix: HashPrefix,
) -> Result<[HexColor; N], ParseError> {
    let mut colors: [HexColor; N] = std::array::from_fn(|_| HexColor::new(String::new()));

    for (slot, key) in colors.iter_mut().zip(keys.iter().copied()) {
        let value = source
            .get(key)
            .and_then(Value::as_str)
            .ok_or_else(|| ParseError::MissingColor {
                theme: identifier.to_string(),
                key,
            })?;

        *slot = match prefix {
            HashPrefix::Strip => HexColor::new(value.strip_prefix('#').unwrap_or(value)),
            HashPrefix::Keep => HexColor::new(value),
        };
    }

    Ok(colors)
}
