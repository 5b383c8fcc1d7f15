use anyhow::Context;
use clap::Parser;
use loader::ThemeManager;
use tinted::commands::{self, Cli};
use tinted::{config, logger};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let app_config = match &cli.config {
        Some(path) => config::load_config_from(path),
        None => config::load_config(),
    }
    .context("Failed to load configuration")?;

    let logging = match &cli.log_level {
        Some(level) => app_config.logging().clone().with_level(level.clone()),
        None => app_config.logging().clone(),
    };
    logger::setup_logger(&logging).context("Failed to initialize logger")?;

    let loader_config = cli.apply_overrides(app_config.into_loader());
    let manager = ThemeManager::from_config(&loader_config)?;
    log::debug!("Theme cache directory: {}", manager.store().dir().display());

    let mut stdout = std::io::stdout().lock();
    commands::run(&manager, &cli.command, cli.format(), &mut stdout).await
}
