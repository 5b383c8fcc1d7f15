use serde::Deserialize;
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.github.com/repos/tinted-theming/schemes/contents";
pub const DEFAULT_RAW_BASE_URL: &str =
    "https://raw.githubusercontent.com/tinted-theming/schemes/spec-0.11";
pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 16;

/// Name of the application directory under the platform cache directory.
pub const CACHE_DIR_NAME: &str = "tinted-themes";

/// Loader configuration. Every field is optional; accessors supply the
/// defaults so a partially filled config file still works.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct LoaderConfig {
    api_url: Option<String>,
    raw_base_url: Option<String>,
    max_concurrent_fetches: Option<usize>,
    requests_per_second: Option<u32>,
    request_burst: Option<u32>,
    request_timeout_secs: Option<u64>,
    user_agent: Option<String>,
    cache_dir: Option<PathBuf>,
}

impl LoaderConfig {
    pub fn api_url(&self) -> &str {
        self.api_url
            .as_deref()
            .unwrap_or(DEFAULT_API_URL)
            .trim_end_matches('/')
    }

    pub fn raw_base_url(&self) -> &str {
        self.raw_base_url
            .as_deref()
            .unwrap_or(DEFAULT_RAW_BASE_URL)
            .trim_end_matches('/')
    }

    /// Upper bound on simultaneous theme downloads, at least 1.
    pub fn max_concurrent_fetches(&self) -> usize {
        self.max_concurrent_fetches
            .unwrap_or(DEFAULT_MAX_CONCURRENT_FETCHES)
            .max(1)
    }

    /// Optional request pacing; `None` or `0` disables it.
    pub fn requests_per_second(&self) -> Option<NonZeroU32> {
        self.requests_per_second.and_then(NonZeroU32::new)
    }

    /// Requests allowed back to back before pacing applies. Defaults to
    /// `requests_per_second`.
    pub fn request_burst(&self) -> Option<NonZeroU32> {
        self.request_burst.and_then(NonZeroU32::new)
    }

    /// Per-request timeout. Unset means requests may wait indefinitely.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| format!("tinted-loader/{}", env!("CARGO_PKG_VERSION")))
    }

    /// Explicit cache directory override, if configured.
    pub fn cache_dir(&self) -> Option<&PathBuf> {
        self.cache_dir.as_ref()
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }

    pub fn with_raw_base_url(mut self, url: impl Into<String>) -> Self {
        self.raw_base_url = Some(url.into());
        self
    }

    pub fn with_max_concurrent_fetches(mut self, limit: usize) -> Self {
        self.max_concurrent_fetches = Some(limit);
        self
    }

    pub fn with_requests_per_second(mut self, rate: u32) -> Self {
        self.requests_per_second = Some(rate);
        self
    }

    pub fn with_request_burst(mut self, burst: u32) -> Self {
        self.request_burst = Some(burst);
        self
    }

    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = Some(secs);
        self
    }

    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }
}

/// Default application cache directory (`<platform cache dir>/tinted-themes`).
pub fn default_cache_dir() -> Option<PathBuf> {
    dirs::cache_dir().map(|mut path| {
        path.push(CACHE_DIR_NAME);
        path
    })
}
