//! Column access helpers over Arrow record batches.
//!
//! Input files come from other tools, so columns are looked up by name and
//! cast to the type a stage needs instead of trusting the stored type.

use crate::error::{PipelineError, Result};
use arrow::array::{Array, ArrayRef, AsArray, Float64Array, Int64Array, StringArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Field, FieldRef, Float64Type, Int64Type, Schema};
use arrow::record_batch::RecordBatch;
use std::sync::Arc;

/// Look up a column by name
pub fn column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a ArrayRef> {
    batch
        .column_by_name(name)
        .ok_or_else(|| PipelineError::MissingColumn { column: name.to_string() })
}

fn cast_column(
    batch: &RecordBatch,
    name: &str,
    to: &DataType,
    expected: &'static str,
) -> Result<ArrayRef> {
    let array = column(batch, name)?;
    cast(array, to).map_err(|_| PipelineError::ColumnType {
        column: name.to_string(),
        expected,
    })
}

pub fn f64_column(batch: &RecordBatch, name: &str) -> Result<Float64Array> {
    let array = cast_column(batch, name, &DataType::Float64, "float64")?;
    Ok(array.as_primitive::<Float64Type>().clone())
}

pub fn i64_column(batch: &RecordBatch, name: &str) -> Result<Int64Array> {
    let array = cast_column(batch, name, &DataType::Int64, "int64")?;
    Ok(array.as_primitive::<Int64Type>().clone())
}

pub fn utf8_column(batch: &RecordBatch, name: &str) -> Result<StringArray> {
    let array = cast_column(batch, name, &DataType::Utf8, "utf8")?;
    Ok(array.as_string::<i32>().clone())
}

/// Return `batch` with `array` stored under `name`: replaces an existing
/// column in place, otherwise appends it as the last column.
pub fn with_column(batch: &RecordBatch, name: &str, array: ArrayRef) -> Result<RecordBatch> {
    let schema = batch.schema();
    let mut fields: Vec<FieldRef> = schema.fields().iter().cloned().collect();
    let mut columns = batch.columns().to_vec();
    let field: FieldRef = Arc::new(Field::new(name, array.data_type().clone(), true));

    match schema.index_of(name) {
        Ok(idx) => {
            fields[idx] = field;
            columns[idx] = array;
        }
        Err(_) => {
            fields.push(field);
            columns.push(array);
        }
    }

    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?)
}

/// Values of a float column as options, nulls as `None`
pub fn optional_values(array: &Float64Array) -> Vec<Option<f64>> {
    (0..array.len())
        .map(|i| if array.is_null(i) { None } else { Some(array.value(i)) })
        .collect()
}
