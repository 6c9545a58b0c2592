use anyhow::{Context, Result};
use clap::Parser;
use log::{info, LevelFilter};

use crypto_tracker::cli::Cli;
use crypto_tracker::config::Config;
use crypto_tracker::driver::{Driver, TickOutcome};
use crypto_tracker::logging;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let level = if cli.debug { LevelFilter::Debug } else { LevelFilter::Info };
    logging::init(level, cli.log_file.as_deref()).context("Failed to initialize logging")?;

    info!("Starting crypto tracker...");

    let config = match &cli.config {
        Some(path) => {
            let config = Config::load(path)
                .with_context(|| format!("Configuration loading failed for {:?}", path))?;
            info!("Configuration loaded from {:?}", path);
            config
        }
        None => Config::default(),
    };

    if let Some(path) = &cli.write_config {
        config
            .save(path)
            .with_context(|| format!("Failed to write configuration to {:?}", path))?;
        info!("Configuration written to {:?}", path);
        return Ok(());
    }

    let mut driver = Driver::from_config(&config).context("Failed to build market data pipeline")?;
    info!(
        "Writing {} to {:?} every {}s",
        config.output.sheet_name,
        config.output.path,
        config.schedule.interval_secs
    );

    if cli.once {
        if let TickOutcome::NoData = driver.run_tick().await? {
            info!("No market data available this run");
        }
        return Ok(());
    }

    driver.run().await?;
    Ok(())
}
