use anyhow::{Context, Result};
use arrow::array::Array;
use clap::Parser;
use std::collections::HashSet;
use std::path::PathBuf;
use trade_flow_analyzer::table::{f64_column, i64_column, utf8_column};
use trade_flow_analyzer::types::{
    DEFAULT_CODE_COLUMN, DOLLAR, MONTH, QUANTITY_COLUMNS, WEIGHT, YEAR,
};
use trade_flow_analyzer::{display_table, load_parquet};

/// Print the schema, a preview and sanity checks of a trade-record Parquet file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    file: PathBuf,

    #[arg(long, default_value = DEFAULT_CODE_COLUMN)]
    code_column: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let batch = load_parquet(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;

    println!("\n{}", "=".repeat(100));
    println!("Inspecting: {}", args.file.display());
    println!("{}", "=".repeat(100));
    for field in batch.schema().fields() {
        let nullable = if field.is_nullable() { " (nullable)" } else { "" };
        println!("  {:<24} {:?}{}", field.name(), field.data_type(), nullable);
    }
    println!("Total rows: {}", batch.num_rows());

    if batch.num_rows() == 0 {
        println!("No data found!");
        return Ok(());
    }

    display_table("PREVIEW", &batch)?;

    println!("\n{} SANITY CHECKS {}", "=".repeat(40), "=".repeat(40));

    let years = i64_column(&batch, YEAR)?;
    let months = i64_column(&batch, MONTH)?;
    let codes = utf8_column(&batch, &args.code_column)?;

    let bad_months = months.iter().flatten().filter(|m| !(1..=12).contains(m)).count();
    println!("✓ Months outside 1..=12: {}", bad_months);

    let periods: Vec<i64> = years
        .iter()
        .zip(months.iter())
        .filter_map(|(y, m)| Some(y? * 12 + m? - 1))
        .collect();
    if let (Some(first), Some(last)) = (periods.iter().min(), periods.iter().max()) {
        println!(
            "✓ Period span: {}-{:02} .. {}-{:02} ({} months)",
            first / 12,
            first % 12 + 1,
            last / 12,
            last % 12 + 1,
            last - first + 1
        );
    }

    let distinct: HashSet<&str> = codes.iter().flatten().collect();
    println!("✓ Distinct {} values: {}", args.code_column, distinct.len());
    println!("✓ Rows with null {}: {}", args.code_column, codes.null_count());

    for field in QUANTITY_COLUMNS {
        let column = f64_column(&batch, field)?;
        let values: Vec<f64> = column.iter().flatten().collect();
        let total: f64 = values.iter().sum();
        let zeros = values.iter().filter(|v| **v == 0.0).count();
        let negatives = values.iter().filter(|v| **v < 0.0).count();
        println!(
            "✓ {:<8} total {:>20.2}  nulls {:>6}  zeros {:>6}  negatives {:>6}",
            field,
            total,
            column.null_count(),
            zeros,
            negatives
        );
        if field == WEIGHT && negatives > 0 {
            println!("    WARNING: {} negative weights", negatives);
        }
        if field == DOLLAR && zeros > 0 {
            println!("    NOTE: {} zero dollar values will have no volatility", zeros);
        }
    }

    Ok(())
}
