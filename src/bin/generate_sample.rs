use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use trade_flow_analyzer::{write_parquet, SyntheticTradeFlow};

/// Write synthetic export and import trade records as Parquet inputs
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    #[arg(long, default_value = "5")]
    codes: usize,

    #[arg(long, default_value = "24")]
    months: u32,

    #[arg(long, default_value = "4")]
    rows_per_month: usize,

    /// Probability that a record has a zero dollar value
    #[arg(long, default_value = "0.05")]
    zero_probability: f64,

    #[arg(long, default_value = "42")]
    seed: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    std::fs::create_dir_all(&args.output_dir)?;

    let generator = SyntheticTradeFlow {
        codes: args.codes,
        months: args.months,
        rows_per_month: args.rows_per_month,
        zero_dollar_probability: args.zero_probability,
        ..Default::default()
    };

    // Distinct seeds so export and import series differ
    let outputs = [
        ("export_data.parquet", args.seed),
        ("import_data.parquet", args.seed.wrapping_add(1)),
    ];
    for (name, seed) in outputs {
        let path = args.output_dir.join(name);
        let batch = generator.generate(seed)?;
        write_parquet(&path, &batch).with_context(|| format!("writing {}", path.display()))?;
        info!("{}: {} records", path.display(), batch.num_rows());
    }

    Ok(())
}
