pub mod aggregation;
pub mod chart;
pub mod display;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod scaling;
pub mod sources;
pub mod table;
pub mod types;
pub mod volatility;

// Re-exports for library users
pub use aggregation::aggregate;
pub use chart::{plot_data, render_chart, PlotStyle, PlotType, Series};
pub use display::display_table;
pub use error::{PipelineError, Result};
pub use output::{export_to_excel, ResultSet};
pub use pipeline::run;
pub use scaling::{aggregate_and_scale, scale, FieldRange, MinMaxScaler};
pub use sources::{load_parquet, write_parquet, SyntheticTradeFlow};
pub use types::Config;
pub use volatility::{calculate_volatility, VolatilityOptions};
