use crate::error::{PipelineError, Result};
use crate::table::f64_column;
use arrow::record_batch::RecordBatch;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use std::fmt;
use std::ops::Range;
use std::path::Path;
use tracing::{info, warn};

/// Chart size in pixels, a 10x6 figure at 100 dpi
pub const CHART_SIZE: (u32, u32) = (1000, 600);

/// Chart context with plain float axes on any backend
pub type Chart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotType {
    Line,
    Bar,
}

impl PlotType {
    pub fn parse(selector: &str) -> Option<Self> {
        match selector {
            "line" => Some(PlotType::Line),
            "bar" => Some(PlotType::Bar),
            _ => None,
        }
    }
}

impl fmt::Display for PlotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlotType::Line => write!(f, "line"),
            PlotType::Bar => write!(f, "bar"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PlotStyle {
    pub color: RGBColor,
    pub stroke_width: u32,
    /// Bar width in x-axis units
    pub bar_width: f64,
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            color: BLUE,
            stroke_width: 2,
            bar_width: 0.8,
        }
    }
}

/// One series of a chart rendered by [`render_chart`]
#[derive(Debug, Clone, Copy)]
pub struct Series<'a> {
    pub batch: &'a RecordBatch,
    pub x: &'a str,
    pub y: &'a str,
    pub label: &'a str,
    pub plot_type: &'a str,
    pub style: PlotStyle,
}

fn render_err(e: impl fmt::Display) -> PipelineError {
    PipelineError::Render(e.to_string())
}

/// (x, y) pairs of two numeric columns, skipping rows where either is missing
pub fn series_points(batch: &RecordBatch, x_col: &str, y_col: &str) -> Result<Vec<(f64, f64)>> {
    let xs = f64_column(batch, x_col)?;
    let ys = f64_column(batch, y_col)?;
    Ok(xs
        .iter()
        .zip(ys.iter())
        .filter_map(|(x, y)| Some((x?, y?)))
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .collect())
}

/// Draw `y_col` against `x_col` onto `chart` as a line or bar series with a
/// legend entry. An unrecognized `plot_type` draws nothing.
pub fn plot_data<DB: DrawingBackend>(
    chart: &mut Chart<'_, DB>,
    batch: &RecordBatch,
    x_col: &str,
    y_col: &str,
    label: &str,
    plot_type: &str,
    style: &PlotStyle,
) -> Result<()> {
    let Some(kind) = PlotType::parse(plot_type) else {
        warn!("Unknown plot type `{}`; series `{}` not drawn", plot_type, label);
        return Ok(());
    };

    let points = series_points(batch, x_col, y_col)?;
    let color = style.color;

    let annotation = match kind {
        PlotType::Line => {
            chart.draw_series(LineSeries::new(points, color.stroke_width(style.stroke_width)))
        }
        PlotType::Bar => {
            let half = style.bar_width / 2.0;
            chart.draw_series(points.into_iter().map(move |(x, y)| {
                Rectangle::new([(x - half, 0.0), (x + half, y)], color.filled())
            }))
        }
    }
    .map_err(render_err)?;

    annotation
        .label(label)
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    Ok(())
}

/// Axis ranges covering every series, with the y range always including 0
fn axis_ranges(series: &[Series<'_>]) -> Result<(Range<f64>, Range<f64>)> {
    let mut points = Vec::new();
    for s in series {
        points.extend(series_points(s.batch, s.x, s.y)?);
    }
    if points.is_empty() {
        return Ok((0.0..1.0, 0.0..1.0));
    }

    let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y_min, mut y_max) = (0.0f64, 0.0f64);
    for (x, y) in points {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    if y_max == y_min {
        y_max = y_min + 1.0;
    }
    let y_pad = (y_max - y_min) * 0.05;

    Ok(((x_min - 1.0)..(x_max + 1.0), (y_min - y_pad)..(y_max + y_pad)))
}

/// Render `series` into an SVG chart with mesh, axis labels and legend
pub fn render_chart(
    path: &Path,
    title: &str,
    x_desc: &str,
    y_desc: &str,
    series: &[Series<'_>],
) -> Result<()> {
    let (x_range, y_range) = axis_ranges(series)?;

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_range)
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .draw()
        .map_err(render_err)?;

    for s in series {
        plot_data(&mut chart, s.batch, s.x, s.y, s.label, s.plot_type, &s.style)?;
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(render_err)?;

    root.present().map_err(render_err)?;
    info!("Chart written to {}", path.display());
    Ok(())
}
