use trade_flow_analyzer::types::{Config, DEFAULT_CODE_COLUMN, DEFAULT_VOLATILITY_NAME, DOLLAR};
use anyhow::{bail, Result};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Parquet file with export trade records
    #[arg(long, default_value = "export_data.parquet")]
    pub export_input: PathBuf,

    /// Parquet file with import trade records
    #[arg(long, default_value = "import_data.parquet")]
    pub import_input: PathBuf,

    #[arg(long, default_value = DEFAULT_CODE_COLUMN)]
    pub code_column: String,

    /// Column the volatility is derived from
    #[arg(long, default_value = DOLLAR)]
    pub volatility_column: String,

    #[arg(long, default_value = DEFAULT_VOLATILITY_NAME)]
    pub volatility_name: String,

    #[arg(long, default_value = "trade_analysis_results.xlsx")]
    pub output: PathBuf,

    #[arg(long, default_value = "trade_analysis_chart.svg")]
    pub chart: PathBuf,

    /// Skip chart rendering
    #[arg(long)]
    pub no_chart: bool,

    /// Fit the scaler on export data and reuse it for import data
    #[arg(long)]
    pub shared_scaler: bool,

    /// Print a preview of every result table
    #[arg(long)]
    pub preview: bool,
}

impl Args {
    pub fn into_config(self) -> Result<Config> {
        if self.code_column.is_empty() {
            bail!("--code-column must not be empty");
        }
        if self.volatility_name.is_empty() {
            bail!("--volatility-name must not be empty");
        }
        if self.volatility_name == self.code_column {
            bail!("--volatility-name would overwrite the category column `{}`", self.code_column);
        }

        Ok(Config {
            export_input: self.export_input,
            import_input: self.import_input,
            code_column: self.code_column,
            volatility_column: self.volatility_column,
            volatility_name: self.volatility_name,
            output: self.output,
            chart: (!self.no_chart).then_some(self.chart),
            shared_scaler: self.shared_scaler,
            preview: self.preview,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_config_defaults() {
        let config = Args::parse_from(["trade-flow-analyzer"]).into_config().unwrap();
        let defaults = Config::default();

        assert_eq!(config.export_input, defaults.export_input);
        assert_eq!(config.import_input, defaults.import_input);
        assert_eq!(config.code_column, "Code");
        assert_eq!(config.volatility_column, "dollar");
        assert_eq!(config.volatility_name, "Volatility");
        assert_eq!(config.output, defaults.output);
        assert_eq!(config.chart, defaults.chart);
        assert!(!config.shared_scaler);
    }

    #[test]
    fn test_flags() {
        let config = Args::parse_from([
            "trade-flow-analyzer",
            "--no-chart",
            "--shared-scaler",
            "--code-column",
            "HS",
            "--volatility-column",
            "rial",
        ])
        .into_config()
        .unwrap();

        assert_eq!(config.chart, None);
        assert!(config.shared_scaler);
        assert_eq!(config.code_column, "HS");
        assert_eq!(config.volatility_column, "rial");
    }

    #[test]
    fn test_volatility_name_cannot_replace_code_column() {
        let args = Args::parse_from(["trade-flow-analyzer", "--volatility-name", "Code"]);
        assert!(args.into_config().is_err());
    }
}
