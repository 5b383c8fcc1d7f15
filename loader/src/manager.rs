use crate::cache::{CacheState, Clock, SnapshotStore, SystemClock};
use crate::catalog::{GitHubCatalog, ThemeCatalog};
use crate::common::{ThemeError, ThemeResult};
use crate::config::LoaderConfig;
use crate::fetcher::ConcurrentLoader;
use crate::model::{Base16Theme, Base24Theme, ThemeFamily, ThemeRecord};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Entry point for loading schemes.
///
/// Owns the catalog, the concurrent loader and the snapshot store. Base16
/// loads go through the snapshot: [`load_all`] answers from disk while the
/// snapshot is fresh and refreshes it from the catalog otherwise. Base24 and
/// per-identifier loads always hit the catalog.
///
/// Refreshes on one manager are serialized, so concurrent callers never
/// interleave the read-decide-fetch-write sequence.
///
/// [`load_all`]: ThemeManager::load_all
pub struct ThemeManager {
    catalog: Arc<dyn ThemeCatalog>,
    loader: ConcurrentLoader,
    store: SnapshotStore,
    clock: Arc<dyn Clock>,
    refresh_lock: Mutex<()>,
}

impl ThemeManager {
    pub fn new(catalog: Arc<dyn ThemeCatalog>, store: SnapshotStore) -> Self {
        Self {
            loader: ConcurrentLoader::new(catalog.clone()),
            catalog,
            store,
            clock: Arc::new(SystemClock),
            refresh_lock: Mutex::new(()),
        }
    }

    /// Manager backed by [`GitHubCatalog`] and the configured (or default)
    /// cache directory.
    pub fn from_config(config: &LoaderConfig) -> ThemeResult<Self> {
        let catalog = GitHubCatalog::from_config(config)
            .map_err(|e| ThemeError::Setup(e.to_string()))?;

        let store = match config.cache_dir() {
            Some(dir) => SnapshotStore::new(dir.clone()),
            None => SnapshotStore::default_location()
                .map_err(|e| ThemeError::Setup(e.to_string()))?,
        };

        Ok(Self::new(Arc::new(catalog), store)
            .with_max_concurrency(config.max_concurrent_fetches()))
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.loader = ConcurrentLoader::with_concurrency(self.catalog.clone(), max_concurrency);
        self
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    pub fn loader(&self) -> &ConcurrentLoader {
        &self.loader
    }

    /// All Base16 schemes, from the snapshot when it is fresh.
    ///
    /// # Errors
    ///
    /// Only when the snapshot is empty or stale and the catalog listing
    /// fails. Individual schemes that fail to load are left out.
    pub async fn load_all(&self) -> ThemeResult<Vec<Base16Theme>> {
        let _guard = self.refresh_lock.lock().await;

        if let Some(themes) = self.store.fresh_snapshot(self.clock.now()) {
            log::info!("Loaded {} themes from cache", themes.len());
            return Ok(themes);
        }

        log::info!("Theme cache expired or missing, fetching themes from network");
        self.refresh_locked().await
    }

    /// Refetch the Base16 catalog regardless of snapshot age.
    pub async fn force_refresh(&self) -> ThemeResult<Vec<Base16Theme>> {
        let _guard = self.refresh_lock.lock().await;
        log::info!("Force refreshing themes from network");
        self.refresh_locked().await
    }

    /// The persisted snapshot without any network access. Empty when the
    /// snapshot is missing or unreadable.
    pub fn cached_snapshot(&self) -> Vec<Base16Theme> {
        self.store.snapshot_or_empty()
    }

    pub fn cache_state(&self) -> CacheState {
        self.store.state(self.clock.now())
    }

    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        self.store.last_refresh().ok().flatten()
    }

    /// Base16 schemes whose variant is light.
    pub async fn load_light_themes(&self) -> ThemeResult<Vec<Base16Theme>> {
        let themes = self.load_all().await?;
        Ok(themes.into_iter().filter(Base16Theme::is_light).collect())
    }

    /// Base16 schemes whose variant is dark.
    pub async fn load_dark_themes(&self) -> ThemeResult<Vec<Base16Theme>> {
        let themes = self.load_all().await?;
        Ok(themes.into_iter().filter(Base16Theme::is_dark).collect())
    }

    /// All Base24 schemes, straight from the catalog. Not cached.
    pub async fn load_all_base24(&self) -> ThemeResult<Vec<Base24Theme>> {
        let identifiers = self.list(ThemeFamily::Base24).await?;
        Ok(self.loader.load_many_base24(&identifiers).await)
    }

    /// One scheme of either family.
    pub async fn load_one(&self, family: ThemeFamily, identifier: &str) -> ThemeResult<ThemeRecord> {
        Ok(self.loader.load_one(family, identifier).await?)
    }

    pub async fn load_base16_theme(&self, identifier: &str) -> ThemeResult<Base16Theme> {
        Ok(self.loader.load_base16(identifier).await?)
    }

    pub async fn load_base24_theme(&self, identifier: &str) -> ThemeResult<Base24Theme> {
        Ok(self.loader.load_base24(identifier).await?)
    }

    /// Many schemes of either family; the ones that fail are left out.
    pub async fn load_many(&self, family: ThemeFamily, identifiers: &[String]) -> Vec<ThemeRecord> {
        self.loader.load_many(family, identifiers).await
    }

    pub async fn load_many_base16(&self, identifiers: &[String]) -> Vec<Base16Theme> {
        self.loader.load_many_base16(identifiers).await
    }

    pub async fn load_many_base24(&self, identifiers: &[String]) -> Vec<Base24Theme> {
        self.loader.load_many_base24(identifiers).await
    }

    async fn list(&self, family: ThemeFamily) -> ThemeResult<Vec<String>> {
        self.catalog
            .list_theme_ids(family)
            .await
            .map_err(|source| ThemeError::Listing { family, source })
    }

    // Caller must hold `refresh_lock`.
    async fn refresh_locked(&self) -> ThemeResult<Vec<Base16Theme>> {
        let identifiers = self.list(ThemeFamily::Base16).await?;
        log::info!("Fetched {} theme names from catalog", identifiers.len());

        let themes = self.loader.load_many_base16(&identifiers).await;

        match self.store.write_snapshot(&themes, self.clock.now()) {
            Ok(()) => log::info!("Cached {} themes for future use", themes.len()),
            Err(e) => log::warn!("Failed to save themes to cache: {e}"),
        }

        Ok(themes)
    }
}
