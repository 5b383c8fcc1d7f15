use crate::output::{self, Format};
use anyhow::Result;
use clap::{Parser, Subcommand};
use loader::{LoaderConfig, ThemeFamily, ThemeManager};
use std::io::Write;
use std::path::PathBuf;

/// Browse the tinted-theming Base16 and Base24 scheme catalog.
#[derive(Parser, Debug)]
#[command(name = "tinted", version, about)]
pub struct Cli {
    /// Config file to use instead of the standard location
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory for the theme snapshot
    #[arg(long, global = true, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Maximum number of schemes downloaded at once
    #[arg(short, long, global = true, value_name = "N")]
    pub jobs: Option<usize>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List Base16 schemes, from the snapshot when it is fresh
    List {
        /// Only light schemes
        #[arg(long, conflicts_with = "dark")]
        light: bool,
        /// Only dark schemes
        #[arg(long)]
        dark: bool,
    },
    /// Refetch the Base16 catalog and rewrite the snapshot
    Refresh,
    /// Print the snapshot without touching the network
    Cached,
    /// Show one scheme with all its colors
    Show {
        /// Scheme file name without the .yaml suffix
        identifier: String,
        #[arg(long, default_value = "base16")]
        family: ThemeFamily,
    },
    /// List Base24 schemes (never cached)
    Base24,
    /// Report snapshot freshness
    State,
}

impl Cli {
    pub fn format(&self) -> Format {
        if self.json { Format::Json } else { Format::Text }
    }

    /// Apply command-line overrides on top of the loaded configuration.
    pub fn apply_overrides(&self, mut config: LoaderConfig) -> LoaderConfig {
        if let Some(dir) = &self.cache_dir {
            config = config.with_cache_dir(dir.clone());
        }
        if let Some(jobs) = self.jobs {
            config = config.with_max_concurrent_fetches(jobs);
        }
        config
    }
}

/// Execute `command` and write its output to `out`.
pub async fn run<W: Write>(
    manager: &ThemeManager,
    command: &Command,
    format: Format,
    out: &mut W,
) -> Result<()> {
    let rendered = match command {
        Command::List { light, dark } => {
            let themes = match (light, dark) {
                (true, _) => manager.load_light_themes().await?,
                (_, true) => manager.load_dark_themes().await?,
                _ => manager.load_all().await?,
            };
            output::base16_list(&themes, format)?
        }
        Command::Refresh => {
            let themes = manager.force_refresh().await?;
            log::info!("Refreshed {} themes", themes.len());
            output::base16_list(&themes, format)?
        }
        Command::Cached => output::base16_list(&manager.cached_snapshot(), format)?,
        Command::Show { identifier, family } => {
            let record = manager.load_one(*family, identifier).await?;
            output::theme_details(&record, format)?
        }
        Command::Base24 => output::base24_list(&manager.load_all_base24().await?, format)?,
        Command::State => output::cache_state(
            manager.cache_state(),
            manager.last_refresh(),
            manager.cached_snapshot().len(),
            format,
        )?,
    };

    out.write_all(rendered.as_bytes())?;
    if format == Format::Json {
        writeln!(out)?;
    }
    Ok(())
}
