//! Remote scheme catalog.
//!
//! The catalog answers two questions: which scheme files exist for a family
//! (a directory listing from the GitHub contents API) and what a given file
//! contains (a raw download). [`ThemeCatalog`] is the seam the loader and
//! the manager depend on; [`GitHubCatalog`] is the HTTP implementation.

use crate::common::{CatalogError, RateLimiter, RateLimiterConfig};
use crate::config::LoaderConfig;
use crate::model::ThemeFamily;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde::Deserialize;

/// File suffix of scheme files in the repository.
pub const THEME_FILE_SUFFIX: &str = ".yaml";

const GITHUB_JSON: &str = "application/vnd.github+json";

/// Source of scheme identifiers and scheme file contents.
#[async_trait]
pub trait ThemeCatalog: Send + Sync {
    /// Identifiers (file names without [`THEME_FILE_SUFFIX`]) of every scheme
    /// published for `family`.
    ///
    /// # Errors
    ///
    /// [`CatalogError::Network`] when no response was received,
    /// [`CatalogError::Api`] when the listing endpoint reported an error and
    /// [`CatalogError::Decode`] when the body has an unexpected shape.
    async fn list_theme_ids(&self, family: ThemeFamily) -> Result<Vec<String>, CatalogError>;

    /// Raw text of one scheme file. Not retried.
    async fn fetch_raw(&self, family: ThemeFamily, identifier: &str)
    -> Result<String, CatalogError>;
}

#[derive(Debug, Deserialize)]
struct ListingEntry {
    name: String,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Catalog backed by the GitHub contents API and raw file host.
#[derive(Debug, Clone)]
pub struct GitHubCatalog {
    client: reqwest::Client,
    api_url: String,
    raw_base_url: String,
    limiter: Option<RateLimiter>,
}

impl GitHubCatalog {
    /// Catalog pointing at the public tinted-theming repository.
    pub fn new() -> Result<Self, CatalogError> {
        Self::from_config(&LoaderConfig::default())
    }

    pub fn from_config(config: &LoaderConfig) -> Result<Self, CatalogError> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent());
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| CatalogError::ClientCreation {
                reason: e.to_string(),
            })?;

        let limiter = config
            .requests_per_second()
            .map(|rate| {
                RateLimiterConfig::new(rate)
                    .with_burst_size(config.request_burst())
                    .build()
            });

        Ok(Self {
            client,
            api_url: config.api_url().to_string(),
            raw_base_url: config.raw_base_url().to_string(),
            limiter,
        })
    }

    /// Directory listing URL for `family`.
    pub fn listing_url(&self, family: ThemeFamily) -> String {
        format!("{}/{}", self.api_url, family.as_str())
    }

    /// Raw download URL of one scheme file.
    pub fn theme_url(&self, family: ThemeFamily, identifier: &str) -> String {
        format!(
            "{}/{}/{}{}",
            self.raw_base_url,
            family.as_str(),
            urlencoding::encode(identifier),
            THEME_FILE_SUFFIX
        )
    }

    async fn pace(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.wait_until_ready().await;
        }
    }
}

#[async_trait]
impl ThemeCatalog for GitHubCatalog {
    async fn list_theme_ids(&self, family: ThemeFamily) -> Result<Vec<String>, CatalogError> {
        let url = self.listing_url(family);
        log::debug!("Requesting {family} theme listing from {url}");

        self.pace().await;
        let response = self
            .client
            .get(&url)
            .header(ACCEPT, GITHUB_JSON)
            .send()
            .await
            .map_err(|e| network_error(&url, e))?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| network_error(&url, e))?;

        let identifiers = decode_listing(status, &body)?;
        log::debug!("Listing for {family} returned {} themes", identifiers.len());
        Ok(identifiers)
    }

    async fn fetch_raw(
        &self,
        family: ThemeFamily,
        identifier: &str,
    ) -> Result<String, CatalogError> {
        let url = self.theme_url(family, identifier);

        self.pace().await;
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| network_error(&url, e))?;

        response.text().await.map_err(|e| network_error(&url, e))
    }
}

fn network_error(url: &str, error: reqwest::Error) -> CatalogError {
    CatalogError::Network {
        url: url.to_string(),
        reason: error.to_string(),
    }
}

/// Turn a listing response into scheme identifiers.
///
/// Non-success statuses become [`CatalogError::Api`], using the body's
/// `message` when it has one. A success status whose body is not a listing
/// is also checked for a `message` before the decode failure is reported.
pub fn decode_listing(status: u16, body: &str) -> Result<Vec<String>, CatalogError> {
    if !(200..300).contains(&status) {
        let message = api_error_message(body).unwrap_or_else(|| format!("HTTP {status}"));
        return Err(CatalogError::Api { status, message });
    }

    match serde_json::from_str::<Vec<ListingEntry>>(body) {
        Ok(entries) => Ok(entries
            .into_iter()
            .filter(|entry| entry.kind == "file")
            .filter_map(|entry| {
                entry
                    .name
                    .strip_suffix(THEME_FILE_SUFFIX)
                    .filter(|identifier| !identifier.is_empty())
                    .map(str::to_string)
            })
            .collect()),
        Err(decode_error) => match api_error_message(body) {
            Some(message) => Err(CatalogError::Api { status, message }),
            None => Err(CatalogError::Decode {
                reason: decode_error.to_string(),
            }),
        },
    }
}

fn api_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .map(|error| error.message)
}
