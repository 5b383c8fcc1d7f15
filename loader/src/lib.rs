//! # Tinted Loader
//!
//! Loads Base16 and Base24 color schemes from the tinted-theming catalog,
//! parses them into typed theme records and keeps a 24-hour on-disk snapshot
//! of the Base16 catalog so repeated loads avoid the network.
//!
//! ## Modules
//!
//! - [`cache`] - Snapshot store, staleness rules and clocks
//! - [`catalog`] - Remote catalog abstraction and the GitHub-backed client
//! - [`common`] - Error types and request rate limiting
//! - [`config`] - Loader configuration and defaults
//! - [`fetcher`] - Concurrent fetch-and-parse of many schemes
//! - [`manager`] - The cache-aware entry point, [`ThemeManager`]
//! - [`model`] - Theme records, colors and variants
//! - [`parser`] - Scheme YAML to theme record conversion
//! - [`taskpool`] - Bounded task pool used for fan-out

pub mod cache;
pub mod catalog;
pub mod common;
pub mod config;
pub mod fetcher;
pub mod manager;
pub mod model;
pub mod parser;
pub mod taskpool;

pub use cache::{CacheState, Clock, ManualClock, SnapshotStore, SystemClock};
pub use catalog::{GitHubCatalog, ThemeCatalog};
pub use common::{CacheError, CatalogError, LoadError, ParseError, ThemeError, ThemeResult};
pub use config::LoaderConfig;
pub use fetcher::{ConcurrentLoader, LoadReport};
pub use manager::ThemeManager;
pub use model::{Base16Theme, Base24Theme, HexColor, ThemeFamily, ThemeRecord, Variant};
