use config::{Config, Environment, File};
use loader::LoaderConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Prefix of environment overrides, e.g. `TINTED__LOGGING__LEVEL=debug`.
pub const ENV_PREFIX: &str = "TINTED";
pub const CONFIG_FILE_NAME: &str = "config.toml";
const APP_DIR_NAME: &str = "tinted";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unable to determine config directory")]
    NoConfigDirectory,

    #[error("Config file {path} does not exist")]
    MissingFile { path: PathBuf },

    #[error("Configuration loading failed: {0}")]
    Load(#[from] config::ConfigError),
}

/// Everything read from `config.toml` and the environment.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct AppConfig {
    #[serde(default)]
    logging: LoggingConfig,
    #[serde(default)]
    loader: LoaderConfig,
}

impl AppConfig {
    pub fn logging(&self) -> &LoggingConfig {
        &self.logging
    }

    pub fn loader(&self) -> &LoaderConfig {
        &self.loader
    }

    pub fn into_loader(self) -> LoaderConfig {
        self.loader
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct LoggingConfig {
    level: Option<String>,
    file: Option<String>,
}

impl LoggingConfig {
    pub fn level(&self) -> &str {
        self.level.as_deref().unwrap_or("info")
    }

    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }
}

/// Directory holding `config.toml`. Prefers `~/.config/tinted` on Unix.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    if cfg!(unix) {
        if let Some(home) = dirs::home_dir() {
            return Ok(home.join(".config").join(APP_DIR_NAME));
        }
    }

    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .ok_or(ConfigError::NoConfigDirectory)
}

pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load configuration from the standard location, a `.env` file and the
/// environment. A missing standard config file is not an error.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    dotenv::dotenv().ok();

    let file_source = match config_file_path() {
        Ok(path) => Some(File::from(path).required(false)),
        Err(e) => {
            log::debug!("Skipping config file: {e}");
            None
        }
    };
    build(file_source)
}

/// Load configuration from an explicitly named file plus the environment.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::MissingFile {
            path: path.to_path_buf(),
        });
    }

    dotenv::dotenv().ok();
    build(Some(File::from(path).required(true)))
}

fn build<S>(file_source: Option<S>) -> Result<AppConfig, ConfigError>
where
    S: config::Source + Send + Sync + 'static,
{
    let env_source = Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true);

    let mut builder = Config::builder();
    if let Some(file_source) = file_source {
        builder = builder.add_source(file_source);
    }
    // Environment entries override file values.
    let config = builder.add_source(env_source).build()?;

    Ok(config.try_deserialize::<AppConfig>()?)
}
