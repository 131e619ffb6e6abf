use crate::chart::{render_chart, PlotStyle, Series};
use crate::display::display_table;
use crate::error::Result;
use crate::output::{export_to_excel, ResultSet};
use crate::scaling::aggregate_and_scale;
use crate::sources::load_parquet;
use crate::types::{
    Config, EXPORT_DATA_SHEET, EXPORT_VOLATILITY_SHEET, IMPORT_DATA_SHEET, IMPORT_VOLATILITY_SHEET,
    MONTH,
};
use crate::volatility::{calculate_volatility, VolatilityOptions};
use plotters::style::BLUE;
use tracing::info;

/// Run the whole analysis: load both datasets, aggregate and scale them,
/// derive volatility, draw the export chart and write the spreadsheet.
/// Returns the exported result set.
pub fn run(config: &Config) -> Result<ResultSet> {
    let export_raw = load_parquet(&config.export_input)?;
    let import_raw = load_parquet(&config.import_input)?;

    let (export_scaled, export_scaler) =
        aggregate_and_scale(&export_raw, &config.code_column, None)?;
    let shared = config.shared_scaler.then_some(&export_scaler);
    if shared.is_some() {
        info!("Scaling import data with the export scaler");
    }
    let (import_scaled, _) = aggregate_and_scale(&import_raw, &config.code_column, shared)?;

    let options = VolatilityOptions {
        column: config.volatility_column.clone(),
        name: config.volatility_name.clone(),
        code_column: config.code_column.clone(),
    };
    // The deriver edits the scaled table in place; both sheets of a dataset share the result
    let export_volatility = calculate_volatility(export_scaled, &options)?;
    let import_volatility = calculate_volatility(import_scaled, &options)?;

    if let Some(chart_path) = &config.chart {
        let series = [Series {
            batch: &export_volatility,
            x: MONTH,
            y: "dollar_scaled",
            label: "Export (scaled)",
            plot_type: "line",
            style: PlotStyle {
                color: BLUE,
                ..Default::default()
            },
        }];
        render_chart(chart_path, "Trade flows", MONTH, "dollar_scaled", &series)?;
    }

    let results = ResultSet::new()
        .with(EXPORT_DATA_SHEET, export_volatility.clone())
        .with(EXPORT_VOLATILITY_SHEET, export_volatility)
        .with(IMPORT_DATA_SHEET, import_volatility.clone())
        .with(IMPORT_VOLATILITY_SHEET, import_volatility);

    if config.preview {
        for (name, table) in results.iter() {
            display_table(name, table)?;
        }
    }

    export_to_excel(&results, &config.output)?;
    Ok(results)
}
