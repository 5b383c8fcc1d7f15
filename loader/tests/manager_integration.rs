use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use claims::{assert_err, assert_ok};
use loader::cache::{CacheState, ManualClock, SnapshotStore};
use loader::catalog::ThemeCatalog;
use loader::common::CatalogError;
use loader::manager::ThemeManager;
use loader::model::{BASE16_KEYS, BASE24_KEYS, ThemeFamily};
use std::collections::HashSet;
use std::fs;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

mod catalog_helpers {
    use super::*;

    /// Base16 scheme document with every slot set to `color`.
    pub fn base16_doc(name: &str, variant: &str, color: &str) -> String {
        let mut doc = format!("system: base16\nname: {name}\nauthor: Test Author\nvariant: {variant}\npalette:\n");
        for key in BASE16_KEYS {
            doc.push_str(&format!("  {key}: \"#{color}\"\n"));
        }
        doc
    }

    /// Base24 scheme document, flat layout.
    pub fn base24_doc(scheme: &str) -> String {
        let mut doc = format!("scheme: {scheme}\nauthor: Test Author\n");
        for key in BASE24_KEYS {
            doc.push_str(&format!("{key}: \"112233\"\n"));
        }
        doc
    }

    /// In-memory catalog that counts every call it receives.
    #[derive(Default)]
    pub struct MockCatalog {
        pub base16: Vec<(String, String)>,
        pub base24: Vec<(String, String)>,
        pub listing_error: Option<CatalogError>,
        pub listings: AtomicUsize,
        pub downloads: AtomicUsize,
    }

    impl MockCatalog {
        pub fn with_base16(themes: Vec<(&str, String)>) -> Self {
            Self {
                base16: themes
                    .into_iter()
                    .map(|(id, doc)| (id.to_string(), doc))
                    .collect(),
                ..Default::default()
            }
        }

        pub fn network_calls(&self) -> usize {
            self.listings.load(Ordering::SeqCst) + self.downloads.load(Ordering::SeqCst)
        }

        fn entries(&self, family: ThemeFamily) -> &[(String, String)] {
            match family {
                ThemeFamily::Base16 => &self.base16,
                ThemeFamily::Base24 => &self.base24,
            }
        }
    }

    #[async_trait]
    impl ThemeCatalog for MockCatalog {
        async fn list_theme_ids(&self, family: ThemeFamily) -> Result<Vec<String>, CatalogError> {
            self.listings.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            if let Some(err) = &self.listing_error {
                return Err(err.clone());
            }
            Ok(self.entries(family).iter().map(|(id, _)| id.clone()).collect())
        }

        async fn fetch_raw(
            &self,
            family: ThemeFamily,
            identifier: &str,
        ) -> Result<String, CatalogError> {
            self.downloads.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            self.entries(family)
                .iter()
                .find(|(id, _)| id == identifier)
                .map(|(_, doc)| doc.clone())
                .ok_or_else(|| CatalogError::Network {
                    url: identifier.to_string(),
                    reason: "404 Not Found".to_string(),
                })
        }
    }

    pub fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 9, 30, 0).unwrap()
    }

    pub fn manager(catalog: Arc<MockCatalog>, dir: &TempDir) -> (ThemeManager, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(start()));
        let manager = ThemeManager::new(catalog, SnapshotStore::new(dir.path().join("cache")))
            .with_clock(clock.clone());
        (manager, clock)
    }
}

use catalog_helpers::*;

mod snapshot_lifecycle {
    use super::*;

    #[tokio::test]
    async fn test_refresh_then_cached_within_window() {
        let dir = TempDir::new().unwrap();
        let catalog = Arc::new(MockCatalog::with_base16(vec![
            ("ocean", base16_doc("Ocean", "dark", "112233")),
            ("paper", base16_doc("Paper", "light", "eeeeee")),
        ]));
        let (manager, clock) = manager(catalog.clone(), &dir);

        let refreshed = assert_ok!(manager.force_refresh().await);
        assert_eq!(refreshed.len(), 2);
        let calls_after_refresh = catalog.network_calls();
        assert_eq!(calls_after_refresh, 3);

        clock.advance(Duration::hours(23));
        let cached = assert_ok!(manager.load_all().await);

        assert_eq!(catalog.network_calls(), calls_after_refresh);
        assert_eq!(cached, refreshed);
        assert_eq!(cached[0].colors()[0].as_str(), "112233");
    }

    #[tokio::test]
    async fn test_stale_snapshot_is_refetched() {
        let dir = TempDir::new().unwrap();
        let catalog = Arc::new(MockCatalog::with_base16(vec![(
            "ocean",
            base16_doc("Ocean", "dark", "112233"),
        )]));
        let (manager, clock) = manager(catalog.clone(), &dir);

        assert_ok!(manager.load_all().await);
        assert_eq!(catalog.listings.load(Ordering::SeqCst), 1);

        clock.advance(Duration::hours(25));
        assert_eq!(manager.cache_state(), CacheState::Stale);

        assert_ok!(manager.load_all().await);
        assert_eq!(catalog.listings.load(Ordering::SeqCst), 2);
        assert_eq!(manager.cache_state(), CacheState::Fresh);
        assert_eq!(manager.last_refresh(), Some(start() + Duration::hours(25)));
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_triggers_refresh() {
        let dir = TempDir::new().unwrap();
        let catalog = Arc::new(MockCatalog::with_base16(vec![(
            "ocean",
            base16_doc("Ocean", "dark", "112233"),
        )]));
        let (manager, _clock) = manager(catalog.clone(), &dir);

        assert_ok!(manager.force_refresh().await);
        fs::write(manager.store().snapshot_path(), "{ not json").unwrap();

        assert_eq!(manager.cache_state(), CacheState::Empty);
        assert!(manager.cached_snapshot().is_empty());

        let themes = assert_ok!(manager.load_all().await);
        assert_eq!(themes.len(), 1);
        assert_eq!(catalog.listings.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_cached_snapshot_never_touches_network() {
        let dir = TempDir::new().unwrap();
        let catalog = Arc::new(MockCatalog::with_base16(vec![(
            "ocean",
            base16_doc("Ocean", "dark", "112233"),
        )]));
        let (manager, clock) = manager(catalog.clone(), &dir);

        assert!(manager.cached_snapshot().is_empty());
        assert_ok!(manager.force_refresh().await);
        let calls = catalog.network_calls();

        clock.advance(Duration::days(30));
        assert_eq!(manager.cached_snapshot().len(), 1);
        assert_eq!(catalog.network_calls(), calls);
    }
}

mod failure_handling {
    use super::*;

    #[tokio::test]
    async fn test_listing_failure_propagates() {
        let dir = TempDir::new().unwrap();
        let catalog = Arc::new(MockCatalog {
            listing_error: Some(CatalogError::Api {
                status: 403,
                message: "API rate limit exceeded".to_string(),
            }),
            ..Default::default()
        });
        let (manager, _clock) = manager(catalog.clone(), &dir);

        let err = assert_err!(manager.load_all().await);
        assert_eq!(
            err.catalog_error(),
            Some(&CatalogError::Api {
                status: 403,
                message: "API rate limit exceeded".to_string(),
            })
        );
        assert_err!(manager.force_refresh().await);
        assert_err!(manager.load_all_base24().await);
        assert_eq!(manager.cache_state(), CacheState::Empty);
    }

    #[tokio::test]
    async fn test_item_failures_are_dropped_silently() {
        let dir = TempDir::new().unwrap();
        let catalog = Arc::new(MockCatalog::with_base16(vec![
            ("zeta", base16_doc("Zeta", "dark", "000000")),
            ("broken-yaml", "name: [unterminated".to_string()),
            ("alpha", base16_doc("Alpha", "light", "ffffff")),
            ("no-author", "name: Lonely\npalette: {}\n".to_string()),
            ("Mango", base16_doc("Mango", "dark", "ff8800")),
        ]));
        let (manager, _clock) = manager(catalog.clone(), &dir);

        let themes = assert_ok!(manager.load_all().await);
        let names: Vec<&str> = themes.iter().map(|t| t.name()).collect();

        assert_eq!(names, vec!["Alpha", "Mango", "Zeta"]);
        assert_eq!(manager.cached_snapshot().len(), 3);
    }

    #[tokio::test]
    async fn test_snapshot_write_failure_is_swallowed() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "not a directory").unwrap();

        let catalog = Arc::new(MockCatalog::with_base16(vec![(
            "ocean",
            base16_doc("Ocean", "dark", "fff"),
        )]));
        let clock = Arc::new(ManualClock::new(start()));
        let manager = ThemeManager::new(catalog.clone(), SnapshotStore::new(blocker.join("cache")))
            .with_clock(clock);

        let first = assert_ok!(manager.load_all().await);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].colors()[15].as_str(), "fff");
        assert_eq!(manager.cache_state(), CacheState::Empty);

        // Nothing was persisted, so the next call lists again.
        let second = assert_ok!(manager.load_all().await);
        assert_eq!(second, first);
        assert_eq!(catalog.listings.load(Ordering::SeqCst), 2);
        assert_eq!(manager.cache_state(), CacheState::Empty);
        assert!(manager.cached_snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_identifier_is_an_error() {
        let dir = TempDir::new().unwrap();
        let catalog = Arc::new(MockCatalog::default());
        let (manager, _clock) = manager(catalog, &dir);

        let err = assert_err!(manager.load_base16_theme("missing").await);
        assert!(matches!(
            err.catalog_error(),
            Some(CatalogError::Network { .. })
        ));
    }
}

mod families {
    use super::*;

    #[tokio::test]
    async fn test_base24_is_loaded_without_caching() {
        let dir = TempDir::new().unwrap();
        let catalog = Arc::new(MockCatalog {
            base24: vec![
                ("night".to_string(), base24_doc("Night")),
                ("dawn".to_string(), base24_doc("Dawn")),
            ],
            ..Default::default()
        });
        let (manager, _clock) = manager(catalog.clone(), &dir);

        let first = assert_ok!(manager.load_all_base24().await);
        let second = assert_ok!(manager.load_all_base24().await);

        assert_eq!(first.len(), 2);
        assert_eq!(first[0].name(), "Dawn");
        assert_eq!(first, second);
        assert_eq!(catalog.listings.load(Ordering::SeqCst), 2);
        assert_eq!(manager.cache_state(), CacheState::Empty);
    }

    #[tokio::test]
    async fn test_unrecognised_variant_is_filtered_as_dark() {
        let dir = TempDir::new().unwrap();
        let catalog = Arc::new(MockCatalog::with_base16(vec![
            ("paper", base16_doc("Paper", "light", "eeeeee")),
            ("capital", base16_doc("Capital", "Light", "dddddd")),
            ("dim", base16_doc("Dim", "dim", "333333")),
        ]));
        let (manager, _clock) = manager(catalog.clone(), &dir);

        let light = assert_ok!(manager.load_light_themes().await);
        let dark = assert_ok!(manager.load_dark_themes().await);

        let light: Vec<&str> = light.iter().map(|t| t.name()).collect();
        let dark: Vec<&str> = dark.iter().map(|t| t.name()).collect();
        assert_eq!(light, vec!["Paper"]);
        assert_eq!(dark, vec!["Capital", "Dim"]);
        assert_eq!(catalog.listings.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_load_many_by_family() {
        let dir = TempDir::new().unwrap();
        let catalog = Arc::new(MockCatalog {
            base16: vec![("ocean".to_string(), base16_doc("Ocean", "dark", "112233"))],
            base24: vec![("night".to_string(), base24_doc("Night"))],
            ..Default::default()
        });
        let (manager, _clock) = manager(catalog, &dir);

        let ids = vec!["night".to_string(), "absent".to_string()];
        let records = manager.load_many(ThemeFamily::Base24, &ids).await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].family(), ThemeFamily::Base24);

        let record = assert_ok!(manager.load_one(ThemeFamily::Base16, "ocean").await);
        assert_eq!(record.name(), "Ocean");
        assert_eq!(record.colors().len(), 16);
    }
}

mod concurrency {
    use super::*;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_callers_refresh_once() {
        let dir = TempDir::new().unwrap();
        let docs: Vec<(String, String)> = (0..20)
            .map(|i| (format!("theme-{i:02}"), base16_doc(&format!("Theme {i:02}"), "dark", "123456")))
            .collect();
        let catalog = Arc::new(MockCatalog {
            base16: docs,
            ..Default::default()
        });
        let (manager, _clock) = manager(catalog.clone(), &dir);
        let manager = Arc::new(manager);

        let calls = (0..8).map(|_| {
            let manager = manager.clone();
            async move { manager.load_all().await }
        });
        let results = futures::future::join_all(calls).await;

        for result in &results {
            let themes = result.as_ref().unwrap();
            assert_eq!(themes.len(), 20);
        }
        // The first caller refreshed; everyone after it found a fresh snapshot.
        assert_eq!(catalog.listings.load(Ordering::SeqCst), 1);
        assert_eq!(catalog.downloads.load(Ordering::SeqCst), 20);

        let unique: HashSet<_> = results[0].as_ref().unwrap().iter().cloned().collect();
        assert_eq!(unique.len(), 20);
    }
}
