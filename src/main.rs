mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Args;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = args.into_config()?;

    info!("Starting trade flow analysis with config: {:?}", config);

    let results = trade_flow_analyzer::run(&config)
        .context("trade flow analysis failed")?;

    info!("Trade flow analysis completed successfully!");
    for (name, table) in results.iter() {
        info!("{}: {} rows", name, table.num_rows());
    }
    if let Some(chart) = &config.chart {
        info!("Chart: {}", chart.display());
    }

    Ok(())
}
