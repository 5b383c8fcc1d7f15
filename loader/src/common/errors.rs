use std::path::PathBuf;
use thiserror::Error;

/// Failures while turning scheme text into a theme record.
///
/// A parse error is always about one scheme file; the loader drops the
/// affected theme and keeps going.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The text is not valid YAML.
    #[error("Invalid scheme file '{theme}': {reason}")]
    Syntax { theme: String, reason: String },

    /// The document decoded, but its root is not a mapping.
    #[error("Scheme file '{theme}' is not a key/value mapping")]
    NotAMapping { theme: String },

    /// A required top-level string field is absent or not a string.
    #[error("Missing field '{field}' in theme '{theme}'")]
    MissingField { theme: String, field: &'static str },

    /// A palette key is absent or its value is not a string.
    #[error("Missing color '{key}' in theme '{theme}'")]
    MissingColor { theme: String, key: &'static str },
}

/// Failures talking to the remote scheme catalog.
///
/// # Error Categories
///
/// - [`Network`] - transport failure, no usable response
/// - [`Api`] - the listing endpoint answered with an error
/// - [`Decode`] - the listing body did not have the expected shape
///
/// [`Network`]: CatalogError::Network
/// [`Api`]: CatalogError::Api
/// [`Decode`]: CatalogError::Decode
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Network request to {url} failed: {reason}")]
    Network { url: String, reason: String },

    #[error("Catalog API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Failed to decode catalog listing: {reason}")]
    Decode { reason: String },

    #[error("Failed to create HTTP client: {reason}")]
    ClientCreation { reason: String },
}

/// Why a single theme could not be loaded.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The worker task running the fetch panicked or was cancelled.
    #[error("Load task for '{identifier}' did not complete: {reason}")]
    Task { identifier: String, reason: String },
}

/// Failures of the on-disk snapshot and timestamp slot.
///
/// These never reach callers of the theme manager: a failed read is
/// treated as an empty cache and a failed write is logged. They exist so
/// the store can report precisely what went wrong.
#[derive(Debug, Error)]
pub enum CacheError {
    /// No application cache directory could be determined.
    #[error("Unable to determine cache directory")]
    NoCacheDirectory,

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The file exists but its contents do not match the expected schema.
    #[error("Corrupt cache file {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    #[error("Failed to serialize cache contents: {reason}")]
    Serialize { reason: String },
}

/// Errors surfaced by the public theme manager.
///
/// Only the listing phase can fail a whole operation; individual theme
/// failures are absorbed by the loader and cache failures are absorbed by
/// the snapshot store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ThemeError {
    #[error("Failed to list {family} themes: {source}")]
    Listing {
        family: crate::model::ThemeFamily,
        #[source]
        source: CatalogError,
    },

    #[error(transparent)]
    Load(#[from] LoadError),

    /// The manager could not be constructed from its configuration.
    #[error("Failed to set up theme manager: {0}")]
    Setup(String),
}

impl ThemeError {
    /// The underlying catalog error, when the failure came from the catalog.
    pub fn catalog_error(&self) -> Option<&CatalogError> {
        match self {
            ThemeError::Listing { source, .. } => Some(source),
            ThemeError::Load(LoadError::Catalog(source)) => Some(source),
            ThemeError::Load(_) | ThemeError::Setup(_) => None,
        }
    }
}

/// Result type for manager operations.
pub type ThemeResult<T> = Result<T, ThemeError>;
