//! Rendering of command results as plain text or JSON.

use chrono::{DateTime, Utc};
use loader::model::{BASE16_KEYS, BASE24_KEYS};
use loader::{Base16Theme, Base24Theme, CacheState, ThemeRecord};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Text,
    Json,
}

pub fn base16_list(themes: &[Base16Theme], format: Format) -> serde_json::Result<String> {
    match format {
        Format::Json => serde_json::to_string_pretty(themes),
        Format::Text => Ok(themes
            .iter()
            .map(|t| format!("{:<40} {:<6} {}\n", t.name(), t.variant(), t.author()))
            .collect()),
    }
}

pub fn base24_list(themes: &[Base24Theme], format: Format) -> serde_json::Result<String> {
    match format {
        Format::Json => serde_json::to_string_pretty(themes),
        Format::Text => Ok(themes
            .iter()
            .map(|t| format!("{:<40} {}\n", t.name(), t.author()))
            .collect()),
    }
}

pub fn theme_details(record: &ThemeRecord, format: Format) -> serde_json::Result<String> {
    if format == Format::Json {
        return match record {
            ThemeRecord::Base16(theme) => serde_json::to_string_pretty(theme),
            ThemeRecord::Base24(theme) => serde_json::to_string_pretty(theme),
        };
    }

    let mut out = format!(
        "{} ({})\nauthor: {}\n",
        record.name(),
        record.family(),
        record.author()
    );
    if let ThemeRecord::Base16(theme) = record {
        out.push_str(&format!("variant: {}\n", theme.variant()));
    }

    let keys: &[&str] = match record {
        ThemeRecord::Base16(_) => &BASE16_KEYS,
        ThemeRecord::Base24(_) => &BASE24_KEYS,
    };
    for (key, color) in keys.iter().zip(record.colors()) {
        out.push_str(&format!("{key}: {color}\n"));
    }
    Ok(out)
}

#[derive(Serialize)]
struct StateReport<'a> {
    state: &'a str,
    last_refresh: Option<DateTime<Utc>>,
    themes: usize,
}

pub fn cache_state(
    state: CacheState,
    last_refresh: Option<DateTime<Utc>>,
    themes: usize,
    format: Format,
) -> serde_json::Result<String> {
    let label = match state {
        CacheState::Empty => "empty",
        CacheState::Fresh => "fresh",
        CacheState::Stale => "stale",
    };

    match format {
        Format::Json => serde_json::to_string_pretty(&StateReport {
            state: label,
            last_refresh,
            themes,
        }),
        Format::Text => {
            let refreshed = last_refresh
                .map(|at| at.to_rfc3339())
                .unwrap_or_else(|| "never".to_string());
            Ok(format!(
                "cache: {label}\nlast refresh: {refreshed}\nthemes: {themes}\n"
            ))
        }
    }
}
