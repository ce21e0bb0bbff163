//! vol-report
//!
//! Loads configuration, obtains a market snapshot, runs the volatility
//! engine and prints the result.

mod cli;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vol_engine::source::{
    DemoSnapshotSource, JsonFileSource, SnapshotOrigin, SnapshotSource, fetch_with_fallback,
};
use vol_engine::{EngineConfig, MarketSnapshot, VolatilityEngine, render_report};

use crate::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so JSON output stays clean
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = EngineConfig::from_env()?;
    if let Some(seed) = cli.seed {
        config.projection.seed = seed;
    }
    if let Some(paths) = cli.paths {
        config.projection.paths = paths;
    }
    if let Some(days) = cli.days {
        config.projection.days = days;
    }
    config.validate()?;

    let snapshot = load_snapshot(&cli).await?;
    let engine = VolatilityEngine::new(config);
    let analysis = engine.analyze(&snapshot)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        print!("{}", render_report(&analysis));
    }

    Ok(())
}

async fn load_snapshot(cli: &Cli) -> anyhow::Result<MarketSnapshot> {
    let demo = DemoSnapshotSource::new();

    let Some(path) = &cli.snapshot else {
        tracing::info!("No snapshot file given, using demo snapshot");
        return Ok(demo.fetch().await?);
    };

    let file = JsonFileSource::new(path);
    if !cli.fallback_demo {
        return Ok(file.fetch().await?);
    }

    let (snapshot, origin) = fetch_with_fallback(&file, &demo).await?;
    if origin == SnapshotOrigin::Fallback {
        tracing::warn!(path = %path.display(), "Report is based on the demo snapshot");
    }
    Ok(snapshot)
}
