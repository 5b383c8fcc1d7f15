use async_trait::async_trait;
use claims::{assert_err, assert_ok};
use loader::common::CatalogError;
use loader::model::BASE16_KEYS;
use loader::{SnapshotStore, ThemeCatalog, ThemeFamily, ThemeManager};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;
use tinted::commands::{Command, run};
use tinted::output::Format;

#[derive(Default)]
struct FixtureCatalog {
    listings: AtomicUsize,
    offline: bool,
}

fn scheme(name: &str, variant: &str) -> String {
    let mut doc = format!("name: \"{name}\"\nauthor: \"Fixture\"\nvariant: \"{variant}\"\n");
    for key in BASE16_KEYS {
        doc.push_str(&format!("{key}: \"#a1b2c3\"\n"));
    }
    doc
}

#[async_trait]
impl ThemeCatalog for FixtureCatalog {
    async fn list_theme_ids(&self, _family: ThemeFamily) -> Result<Vec<String>, CatalogError> {
        self.listings.fetch_add(1, Ordering::SeqCst);
        if self.offline {
            return Err(CatalogError::Network {
                url: "https://api.github.com".to_string(),
                reason: "connection refused".to_string(),
            });
        }
        Ok(vec!["solarized-light".to_string(), "monokai".to_string()])
    }

    async fn fetch_raw(&self, _family: ThemeFamily, identifier: &str) -> Result<String, CatalogError> {
        match identifier {
            "solarized-light" => Ok(scheme("Solarized Light", "light")),
            "monokai" => Ok(scheme("Monokai", "dark")),
            other => Err(CatalogError::Network {
                url: other.to_string(),
                reason: "404 Not Found".to_string(),
            }),
        }
    }
}

fn manager(catalog: Arc<FixtureCatalog>, dir: &TempDir) -> ThemeManager {
    ThemeManager::new(catalog, SnapshotStore::new(dir.path()))
}

async fn run_to_string(manager: &ThemeManager, command: Command, format: Format) -> String {
    let mut out = Vec::new();
    run(manager, &command, format, &mut out).await.unwrap();
    String::from_utf8(out).unwrap()
}

#[tokio::test]
async fn test_list_then_cached() {
    let dir = TempDir::new().unwrap();
    let catalog = Arc::new(FixtureCatalog::default());
    let manager = manager(catalog.clone(), &dir);

    let listed = run_to_string(
        &manager,
        Command::List {
            light: false,
            dark: false,
        },
        Format::Text,
    )
    .await;
    let names: Vec<&str> = listed
        .lines()
        .map(|line| line.split("  ").next().unwrap_or_default())
        .collect();
    assert_eq!(names, vec!["Monokai", "Solarized Light"]);

    let cached = run_to_string(&manager, Command::Cached, Format::Text).await;
    assert_eq!(cached, listed);
    assert_eq!(catalog.listings.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_list_light_only_as_json() {
    let dir = TempDir::new().unwrap();
    let manager = manager(Arc::new(FixtureCatalog::default()), &dir);

    let json = run_to_string(
        &manager,
        Command::List {
            light: true,
            dark: false,
        },
        Format::Json,
    )
    .await;
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value.as_array().map(Vec::len), Some(1));
    assert_eq!(value[0]["name"], "Solarized Light");
    assert_eq!(value[0]["base00"], "a1b2c3");
}

#[tokio::test]
async fn test_state_after_refresh() {
    let dir = TempDir::new().unwrap();
    let manager = manager(Arc::new(FixtureCatalog::default()), &dir);

    let before = run_to_string(&manager, Command::State, Format::Text).await;
    assert!(before.contains("cache: empty"));

    run_to_string(&manager, Command::Refresh, Format::Text).await;

    let after = run_to_string(&manager, Command::State, Format::Json).await;
    let value: serde_json::Value = serde_json::from_str(&after).unwrap();
    assert_eq!(value["state"], "fresh");
    assert_eq!(value["themes"], 2);
    assert!(value["last_refresh"].is_string());
}

#[tokio::test]
async fn test_show_and_offline_errors() {
    let dir = TempDir::new().unwrap();
    let catalog = Arc::new(FixtureCatalog {
        offline: true,
        ..Default::default()
    });
    let manager = manager(catalog, &dir);

    let details = run_to_string(
        &manager,
        Command::Show {
            identifier: "monokai".to_string(),
            family: ThemeFamily::Base16,
        },
        Format::Text,
    )
    .await;
    assert!(details.starts_with("Monokai (base16)"));
    assert!(details.contains("base0F: a1b2c3"));

    let mut out = Vec::new();
    let refresh = run(&manager, &Command::Refresh, Format::Text, &mut out).await;
    let err = assert_err!(refresh);
    assert!(err.to_string().contains("Failed to list base16 themes"));
    assert!(out.is_empty());

    let mut out = Vec::new();
    assert_ok!(run(&manager, &Command::Cached, Format::Text, &mut out).await);
    assert!(out.is_empty());
}
