use crate::common::CacheError;
use crate::config::default_cache_dir;
use crate::model::Base16Theme;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const SNAPSHOT_FILE_NAME: &str = "themes_cache.json";
pub const SETTINGS_FILE_NAME: &str = "settings.json";
pub const LAST_UPDATE_KEY: &str = "TintedThemes_LastUpdate";

/// How long a snapshot is trusted after it was written.
pub const CACHE_EXPIRY: Duration = Duration::from_secs(24 * 60 * 60);

/// Freshness of the persisted snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    /// No readable snapshot.
    Empty,
    /// Snapshot written no longer than [`CACHE_EXPIRY`] ago.
    Fresh,
    /// Snapshot older than [`CACHE_EXPIRY`], or with no recorded refresh time.
    Stale,
}

/// File-backed snapshot of the Base16 catalog.
///
/// Two files live in the cache directory: the snapshot itself (a JSON array
/// of themes) and a small JSON settings object holding the last refresh
/// instant under [`LAST_UPDATE_KEY`]. Files are replaced whole through a
/// temporary file and a rename.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store in the platform cache directory.
    pub fn default_location() -> Result<Self, CacheError> {
        default_cache_dir()
            .map(Self::new)
            .ok_or(CacheError::NoCacheDirectory)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.dir.join(SNAPSHOT_FILE_NAME)
    }

    pub fn settings_path(&self) -> PathBuf {
        self.dir.join(SETTINGS_FILE_NAME)
    }

    /// Read the snapshot. `Ok(None)` when no snapshot file exists.
    pub fn read_snapshot(&self) -> Result<Option<Vec<Base16Theme>>, CacheError> {
        let path = self.snapshot_path();
        if !path.exists() {
            return Ok(None);
        }

        let data = fs::read(&path).map_err(|source| CacheError::Read {
            path: path.clone(),
            source,
        })?;
        let themes = serde_json::from_slice(&data).map_err(|e| CacheError::Corrupt {
            path,
            reason: e.to_string(),
        })?;
        Ok(Some(themes))
    }

    /// Snapshot contents, or nothing when the file is missing or unreadable.
    pub fn snapshot_or_empty(&self) -> Vec<Base16Theme> {
        match self.read_snapshot() {
            Ok(Some(themes)) => themes,
            Ok(None) => {
                log::debug!("No theme cache file at {}", self.snapshot_path().display());
                Vec::new()
            }
            Err(e) => {
                log::warn!("Ignoring unreadable theme cache: {e}");
                Vec::new()
            }
        }
    }

    /// Time of the last successful snapshot write, if recorded.
    pub fn last_refresh(&self) -> Result<Option<DateTime<Utc>>, CacheError> {
        let settings = self.read_settings()?;
        let Some(value) = settings.get(LAST_UPDATE_KEY) else {
            return Ok(None);
        };

        serde_json::from_value(value.clone())
            .map(Some)
            .map_err(|e| CacheError::Corrupt {
                path: self.settings_path(),
                reason: e.to_string(),
            })
    }

    /// Replace the snapshot and record `refreshed_at` as the refresh time.
    ///
    /// The two files are written in order, not as one unit: the snapshot is
    /// renamed into place first and the timestamp follows. If the timestamp
    /// write fails, the new snapshot stays on disk under the previous
    /// timestamp (or none).
    pub fn write_snapshot(
        &self,
        themes: &[Base16Theme],
        refreshed_at: DateTime<Utc>,
    ) -> Result<(), CacheError> {
        fs::create_dir_all(&self.dir).map_err(|source| CacheError::Write {
            path: self.dir.clone(),
            source,
        })?;

        let data = serde_json::to_vec(themes).map_err(|e| CacheError::Serialize {
            reason: e.to_string(),
        })?;
        write_atomic(&self.snapshot_path(), &data)?;

        // A corrupt settings file is replaced rather than blocking the write.
        let mut settings = self.read_settings().unwrap_or_default();
        let timestamp = serde_json::to_value(refreshed_at).map_err(|e| CacheError::Serialize {
            reason: e.to_string(),
        })?;
        settings.insert(LAST_UPDATE_KEY.to_string(), timestamp);

        let data = serde_json::to_vec_pretty(&Value::Object(settings)).map_err(|e| {
            CacheError::Serialize {
                reason: e.to_string(),
            }
        })?;
        write_atomic(&self.settings_path(), &data)
    }

    /// Snapshot contents if the cache is [`CacheState::Fresh`] at `now`.
    pub fn fresh_snapshot(&self, now: DateTime<Utc>) -> Option<Vec<Base16Theme>> {
        let themes = match self.read_snapshot() {
            Ok(Some(themes)) => themes,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("Treating theme cache as empty: {e}");
                return None;
            }
        };

        self.is_fresh(now).then_some(themes)
    }

    pub fn state(&self, now: DateTime<Utc>) -> CacheState {
        match self.read_snapshot() {
            Ok(Some(_)) if self.is_fresh(now) => CacheState::Fresh,
            Ok(Some(_)) => CacheState::Stale,
            Ok(None) | Err(_) => CacheState::Empty,
        }
    }

    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        match self.last_refresh() {
            Ok(Some(refreshed_at)) => !is_expired(refreshed_at, now),
            Ok(None) => false,
            Err(e) => {
                log::warn!("Ignoring unreadable cache timestamp: {e}");
                false
            }
        }
    }

    fn read_settings(&self) -> Result<Map<String, Value>, CacheError> {
        let path = self.settings_path();
        if !path.exists() {
            return Ok(Map::new());
        }

        let data = fs::read(&path).map_err(|source| CacheError::Read {
            path: path.clone(),
            source,
        })?;
        match serde_json::from_slice(&data) {
            Ok(Value::Object(settings)) => Ok(settings),
            Ok(_) => Err(CacheError::Corrupt {
                path,
                reason: "settings file is not a JSON object".to_string(),
            }),
            Err(e) => Err(CacheError::Corrupt {
                path,
                reason: e.to_string(),
            }),
        }
    }
}

/// Whether a snapshot written at `refreshed_at` is past [`CACHE_EXPIRY`] at `now`.
pub fn is_expired(refreshed_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    match (now - refreshed_at).to_std() {
        Ok(age) => age > CACHE_EXPIRY,
        // Refresh time in the future: not expired.
        Err(_) => false,
    }
}

fn write_atomic(path: &Path, data: &[u8]) -> Result<(), CacheError> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, data).map_err(|source| CacheError::Write {
        path: tmp.clone(),
        source,
    })?;
    fs::rename(&tmp, path).map_err(|source| CacheError::Write {
        path: path.to_path_buf(),
        source,
    })
}
