use crate::error::{PipelineError, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type};
use arrow::record_batch::RecordBatch;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::path::Path;
use tracing::{debug, info};

/// Named tables destined for one sheet each, kept in insertion order
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    sheets: Vec<(String, RecordBatch)>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sheet; an existing sheet of the same name is replaced in place
    pub fn insert(&mut self, name: impl Into<String>, table: RecordBatch) {
        let name = name.into();
        match self.sheets.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = table,
            None => self.sheets.push((name, table)),
        }
    }

    pub fn with(mut self, name: impl Into<String>, table: RecordBatch) -> Self {
        self.insert(name, table);
        self
    }

    pub fn get(&self, name: &str) -> Option<&RecordBatch> {
        self.sheets
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, table)| table)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RecordBatch)> {
        self.sheets.iter().map(|(name, table)| (name.as_str(), table))
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}

/// Write every non-empty table of `results` to its own sheet of an xlsx file
/// at `path`: a bold header row with the column names, then one row per
/// record, no index column. Empty tables get no sheet.
///
/// Fails with [`PipelineError::NothingToExport`] before touching `path` when
/// no table has rows.
pub fn export_to_excel(results: &ResultSet, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();

    let sheets: Vec<(&str, &RecordBatch)> = results
        .iter()
        .filter(|(name, table)| {
            if table.num_rows() == 0 {
                debug!("Skipping empty sheet `{}`", name);
                return false;
            }
            true
        })
        .collect();

    if sheets.is_empty() {
        return Err(PipelineError::NothingToExport);
    }

    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    for (name, table) in &sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*name)?;
        write_table(worksheet, table, &header)?;
        debug!("Sheet `{}`: {} rows x {} columns", name, table.num_rows(), table.num_columns());
    }

    workbook.save(path)?;
    info!("Exported {} sheets to {}", sheets.len(), path.display());
    println!("Results saved to {}", path.display());
    Ok(())
}

fn write_table(worksheet: &mut Worksheet, table: &RecordBatch, header: &Format) -> Result<()> {
    let schema = table.schema();
    for (idx, field) in schema.fields().iter().enumerate() {
        let col = u16::try_from(idx).map_err(|_| {
            PipelineError::InvalidParameter(format!("too many columns to export: {}", idx))
        })?;
        worksheet.write_string_with_format(0, col, field.name(), header)?;
        write_column(worksheet, col, field.name(), table.column(idx))?;
    }
    Ok(())
}

/// Write one column below its header. Numbers stay numeric, nulls and NaN
/// become blank cells, infinities are written as `inf` / `-inf`.
fn write_column(worksheet: &mut Worksheet, col: u16, name: &str, array: &ArrayRef) -> Result<()> {
    let data_type = array.data_type();

    if data_type.is_numeric() {
        let values = cast(array, &DataType::Float64)?;
        for (idx, value) in values.as_primitive::<Float64Type>().iter().enumerate() {
            let row = data_row(idx)?;
            match value {
                Some(v) if v.is_finite() => {
                    worksheet.write_number(row, col, v)?;
                }
                Some(v) if v.is_infinite() => {
                    worksheet.write_string(row, col, if v > 0.0 { "inf" } else { "-inf" })?;
                }
                _ => {}
            }
        }
    } else if *data_type == DataType::Boolean {
        for (idx, value) in array.as_boolean().iter().enumerate() {
            if let Some(v) = value {
                worksheet.write_boolean(data_row(idx)?, col, v)?;
            }
        }
    } else {
        let values = cast(array, &DataType::Utf8).map_err(|_| PipelineError::ColumnType {
            column: name.to_string(),
            expected: "a spreadsheet cell type",
        })?;
        for (idx, value) in values.as_string::<i32>().iter().enumerate() {
            if let Some(v) = value {
                worksheet.write_string(data_row(idx)?, col, v)?;
            }
        }
    }
    Ok(())
}

/// Sheet row of the `idx`-th record, below the header
fn data_row(idx: usize) -> Result<u32> {
    u32::try_from(idx + 1)
        .map_err(|_| PipelineError::InvalidParameter(format!("too many rows to export: {}", idx)))
}
