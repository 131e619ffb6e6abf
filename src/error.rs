use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Failures surfaced by the pipeline stages.
///
/// Numeric-domain problems (log of zero, flat scaling range) never show up
/// here: they are substituted with nulls or constants where they occur.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("missing column `{column}`")]
    MissingColumn { column: String },

    #[error("column `{column}` cannot be read as {expected}")]
    ColumnType { column: String, expected: &'static str },

    #[error("cannot fit scaler: field `{field}` has no values")]
    EmptyFit { field: &'static str },

    #[error("result set has no non-empty table to export")]
    NothingToExport,

    #[error("render failed: {0}")]
    Render(String),

    #[error("cannot open `{path}`: {source}")]
    Open {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Arrow(#[from] arrow::error::ArrowError),

    #[error(transparent)]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error(transparent)]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}
