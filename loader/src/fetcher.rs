//! Concurrent fetch-and-parse of many schemes.
//!
//! Each identifier becomes one job on a bounded [`TaskPool`]: download the
//! file, then parse it with the family's parser. Outcomes are merged on the
//! calling task into a [`LoadReport`], which keeps successes and failures
//! apart. The plain `load_many*` calls return only the successes, sorted by
//! name.

use crate::catalog::ThemeCatalog;
use crate::common::{LoadError, ParseError};
use crate::config::DEFAULT_MAX_CONCURRENT_FETCHES;
use crate::model::{Base16Theme, Base24Theme, Named, ThemeFamily, ThemeRecord};
use crate::parser;
use crate::taskpool::TaskPool;
use std::sync::Arc;

pub type ParseFn<T> = fn(&str, &str) -> Result<T, ParseError>;

/// Outcome of loading a batch of schemes.
#[derive(Debug)]
pub struct LoadReport<T> {
    /// Successfully parsed themes, sorted by name.
    pub themes: Vec<T>,
    /// Identifier and reason for every scheme that was dropped.
    pub failures: Vec<(String, LoadError)>,
}

impl<T> LoadReport<T> {
    pub fn into_themes(self) -> Vec<T> {
        self.themes
    }

    pub fn requested(&self) -> usize {
        self.themes.len() + self.failures.len()
    }
}

/// Loads schemes from a [`ThemeCatalog`] with bounded concurrency.
#[derive(Clone)]
pub struct ConcurrentLoader {
    catalog: Arc<dyn ThemeCatalog>,
    max_concurrency: usize,
}

impl ConcurrentLoader {
    pub fn new(catalog: Arc<dyn ThemeCatalog>) -> Self {
        Self::with_concurrency(catalog, DEFAULT_MAX_CONCURRENT_FETCHES)
    }

    pub fn with_concurrency(catalog: Arc<dyn ThemeCatalog>, max_concurrency: usize) -> Self {
        Self {
            catalog,
            max_concurrency: max_concurrency.max(1),
        }
    }

    pub fn catalog(&self) -> &Arc<dyn ThemeCatalog> {
        &self.catalog
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Fetch and parse one scheme of either family.
    pub async fn load_one(
        &self,
        family: ThemeFamily,
        identifier: &str,
    ) -> Result<ThemeRecord, LoadError> {
        match family {
            ThemeFamily::Base16 => self.load_base16(identifier).await.map(ThemeRecord::from),
            ThemeFamily::Base24 => self.load_base24(identifier).await.map(ThemeRecord::from),
        }
    }

    pub async fn load_base16(&self, identifier: &str) -> Result<Base16Theme, LoadError> {
        fetch_and_parse(
            self.catalog.clone(),
            ThemeFamily::Base16,
            identifier.to_string(),
            parser::parse_base16,
        )
        .await
    }

    pub async fn load_base24(&self, identifier: &str) -> Result<Base24Theme, LoadError> {
        fetch_and_parse(
            self.catalog.clone(),
            ThemeFamily::Base24,
            identifier.to_string(),
            parser::parse_base24,
        )
        .await
    }

    /// Load many schemes of either family; failures are dropped.
    pub async fn load_many(&self, family: ThemeFamily, identifiers: &[String]) -> Vec<ThemeRecord> {
        match family {
            ThemeFamily::Base16 => self
                .load_many_base16(identifiers)
                .await
                .into_iter()
                .map(ThemeRecord::from)
                .collect(),
            ThemeFamily::Base24 => self
                .load_many_base24(identifiers)
                .await
                .into_iter()
                .map(ThemeRecord::from)
                .collect(),
        }
    }

    pub async fn load_many_base16(&self, identifiers: &[String]) -> Vec<Base16Theme> {
        self.load_report(ThemeFamily::Base16, identifiers, parser::parse_base16)
            .await
            .into_themes()
    }

    pub async fn load_many_base24(&self, identifiers: &[String]) -> Vec<Base24Theme> {
        self.load_report(ThemeFamily::Base24, identifiers, parser::parse_base24)
            .await
            .into_themes()
    }

    /// Load many schemes and report both successes and failures.
    pub async fn load_report<T>(
        &self,
        family: ThemeFamily,
        identifiers: &[String],
        parse: ParseFn<T>,
    ) -> LoadReport<T>
    where
        T: Named + Send + 'static,
    {
        log::info!(
            "Loading {} {family} themes ({} at a time)",
            identifiers.len(),
            self.max_concurrency
        );

        let pool = TaskPool::new(self.max_concurrency);
        let jobs = identifiers.iter().map(|identifier| {
            let job = fetch_and_parse(self.catalog.clone(), family, identifier.clone(), parse);
            (identifier.clone(), job)
        });
        let outcomes = pool.run_keyed(jobs).await;

        let mut themes = Vec::with_capacity(outcomes.len());
        let mut failures = Vec::new();
        for (identifier, outcome) in outcomes {
            let result = outcome.unwrap_or_else(|failure| {
                Err(LoadError::Task {
                    identifier: identifier.clone(),
                    reason: failure.to_string(),
                })
            });

            match result {
                Ok(theme) => {
                    log::debug!("Loaded theme {identifier}");
                    themes.push(theme);
                }
                Err(error) => {
                    log::warn!("Dropping theme {identifier}: {error}");
                    failures.push((identifier, error));
                }
            }
        }

        themes.sort_by(|a, b| a.name().cmp(b.name()));

        log::info!(
            "Completed loading: {} out of {} {family} themes",
            themes.len(),
            identifiers.len()
        );

        LoadReport { themes, failures }
    }
}

async fn fetch_and_parse<T>(
    catalog: Arc<dyn ThemeCatalog>,
    family: ThemeFamily,
    identifier: String,
    parse: ParseFn<T>,
) -> Result<T, LoadError> {
    let raw = catalog.fetch_raw(family, &identifier).await?;
    Ok(parse(&raw, &identifier)?)
}
