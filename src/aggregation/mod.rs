use crate::error::Result;
use crate::table::{f64_column, i64_column, utf8_column};
use crate::types::{DOLLAR, MONTH, QUANTITY_COLUMNS, RIAL, WEIGHT, YEAR};
use arrow::array::{Array, ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Group raw trade records by (year, month, code) and sum weight, rial and
/// dollar within each group.
///
/// Output rows are ordered by the key tuple: year, then month, then code.
/// Null quantities are skipped by the sums; rows with a null key are dropped.
pub fn aggregate(batch: &RecordBatch, code_column: &str) -> Result<RecordBatch> {
    let years = i64_column(batch, YEAR)?;
    let months = i64_column(batch, MONTH)?;
    let codes = utf8_column(batch, code_column)?;
    let quantities = [
        f64_column(batch, WEIGHT)?,
        f64_column(batch, RIAL)?,
        f64_column(batch, DOLLAR)?,
    ];

    let mut groups: BTreeMap<(i64, i64, &str), [f64; 3]> = BTreeMap::new();
    let mut dropped = 0usize;

    for row in 0..batch.num_rows() {
        if years.is_null(row) || months.is_null(row) || codes.is_null(row) {
            dropped += 1;
            continue;
        }

        let key = (years.value(row), months.value(row), codes.value(row));
        let sums = groups.entry(key).or_insert([0.0; 3]);
        for (sum, column) in sums.iter_mut().zip(&quantities) {
            if column.is_valid(row) {
                *sum += column.value(row);
            }
        }
    }

    if dropped > 0 {
        debug!("Dropped {} rows with a null year, month or {}", dropped, code_column);
    }

    let mut out_years = Vec::with_capacity(groups.len());
    let mut out_months = Vec::with_capacity(groups.len());
    let mut out_codes = Vec::with_capacity(groups.len());
    let mut out_sums: [Vec<f64>; 3] = Default::default();

    for ((year, month, code), sums) in &groups {
        out_years.push(*year);
        out_months.push(*month);
        out_codes.push(*code);
        for (column, sum) in out_sums.iter_mut().zip(sums) {
            column.push(*sum);
        }
    }

    let mut fields = vec![
        Field::new(YEAR, DataType::Int64, false),
        Field::new(MONTH, DataType::Int64, false),
        Field::new(code_column, DataType::Utf8, false),
    ];
    fields.extend(QUANTITY_COLUMNS.iter().map(|name| Field::new(*name, DataType::Float64, false)));

    let mut columns: Vec<ArrayRef> = vec![
        Arc::new(Int64Array::from(out_years)),
        Arc::new(Int64Array::from(out_months)),
        Arc::new(StringArray::from(out_codes)),
    ];
    columns.extend(out_sums.into_iter().map(|sums| Arc::new(Float64Array::from(sums)) as ArrayRef));

    let aggregated = RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?;
    info!(
        "Aggregated {} records into {} (year, month, {}) groups",
        batch.num_rows(),
        aggregated.num_rows(),
        code_column
    );
    Ok(aggregated)
}
