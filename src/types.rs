use std::path::PathBuf;

pub const YEAR: &str = "year";
pub const MONTH: &str = "month";
pub const WEIGHT: &str = "weight";
pub const RIAL: &str = "rial";
pub const DOLLAR: &str = "dollar";

pub const DEFAULT_CODE_COLUMN: &str = "Code";
pub const DEFAULT_VOLATILITY_NAME: &str = "Volatility";

/// Summed quantities, in output column order
pub const QUANTITY_COLUMNS: [&str; 3] = [WEIGHT, RIAL, DOLLAR];

/// Scaled counterparts of `QUANTITY_COLUMNS`, same order
pub const SCALED_COLUMNS: [&str; 3] = ["weight_scaled", "rial_scaled", "dollar_scaled"];

pub const EXPORT_DATA_SHEET: &str = "Export Data";
pub const EXPORT_VOLATILITY_SHEET: &str = "Export Volatility";
pub const IMPORT_DATA_SHEET: &str = "Import Data";
pub const IMPORT_VOLATILITY_SHEET: &str = "Import Volatility";

/// Rows shown at each end of a table preview
pub const PREVIEW_ROWS: usize = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub export_input: PathBuf,
    pub import_input: PathBuf,
    pub code_column: String,
    pub volatility_column: String,
    pub volatility_name: String,
    pub output: PathBuf,
    pub chart: Option<PathBuf>,
    pub shared_scaler: bool,
    pub preview: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            export_input: PathBuf::from("export_data.parquet"),
            import_input: PathBuf::from("import_data.parquet"),
            code_column: DEFAULT_CODE_COLUMN.to_string(),
            volatility_column: DOLLAR.to_string(),
            volatility_name: DEFAULT_VOLATILITY_NAME.to_string(),
            output: PathBuf::from("trade_analysis_results.xlsx"),
            chart: Some(PathBuf::from("trade_analysis_chart.svg")),
            shared_scaler: false,
            preview: false,
        }
    }
}
