use crate::error::Result;
use crate::table::{f64_column, optional_values, utf8_column, with_column};
use crate::types::{DEFAULT_CODE_COLUMN, DEFAULT_VOLATILITY_NAME, DOLLAR};
use arrow::array::{Array, ArrayRef, Float64Array};
use arrow::record_batch::RecordBatch;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolatilityOptions {
    /// Value column the log returns are taken over
    pub column: String,
    /// Name of the derived column
    pub name: String,
    /// Category column defining the groups
    pub code_column: String,
}

impl Default for VolatilityOptions {
    fn default() -> Self {
        Self {
            column: DOLLAR.to_string(),
            name: DEFAULT_VOLATILITY_NAME.to_string(),
            code_column: DEFAULT_CODE_COLUMN.to_string(),
        }
    }
}

/// Derive a per-category log-return column.
///
/// Zeros (and NaNs) in the value column become nulls, and the column is
/// stored back that way. Within each category, in row order,
/// `vol[i] = ln(v[i]) - ln(v[i - 1])`; the first row of every category, any
/// row touching a null, and any non-finite result are null. Rows with a null
/// category get a null volatility.
pub fn calculate_volatility(
    batch: RecordBatch,
    options: &VolatilityOptions,
) -> Result<RecordBatch> {
    let codes = utf8_column(&batch, &options.code_column)?;
    let values: Vec<Option<f64>> = optional_values(&f64_column(&batch, &options.column)?)
        .into_iter()
        .map(|v| v.filter(|v| *v != 0.0 && !v.is_nan()))
        .collect();

    // Row indices per category, in original order
    let mut groups: HashMap<&str, Vec<usize>> = HashMap::new();
    for row in 0..codes.len() {
        if codes.is_valid(row) {
            groups.entry(codes.value(row)).or_default().push(row);
        }
    }
    debug!(
        "Deriving {} over `{}` for {} {} groups",
        options.name,
        options.column,
        groups.len(),
        options.code_column
    );

    let mut volatility: Vec<Option<f64>> = vec![None; values.len()];
    for rows in groups.values() {
        for pair in rows.windows(2) {
            volatility[pair[1]] = log_return(values[pair[0]], values[pair[1]]);
        }
    }

    let source = Arc::new(Float64Array::from(values)) as ArrayRef;
    let batch = with_column(&batch, &options.column, source)?;
    with_column(&batch, &options.name, Arc::new(Float64Array::from(volatility)) as ArrayRef)
}

fn log_return(previous: Option<f64>, current: Option<f64>) -> Option<f64> {
    let diff = current?.ln() - previous?.ln();
    diff.is_finite().then_some(diff)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use arrow::array::StringArray;

    fn series(codes: Vec<Option<&str>>, dollars: Vec<Option<f64>>) -> RecordBatch {
        RecordBatch::try_from_iter(vec![
            ("Code", Arc::new(StringArray::from(codes)) as ArrayRef),
            ("dollar", Arc::new(Float64Array::from(dollars)) as ArrayRef),
        ])
        .unwrap()
    }

    fn volatility_of(batch: &RecordBatch) -> Vec<Option<f64>> {
        optional_values(&f64_column(batch, "Volatility").unwrap())
    }

    fn assert_close(actual: Option<f64>, expected: f64) {
        let actual = actual.expect("expected a defined volatility");
        assert!((actual - expected).abs() < 1e-12, "{} != {}", actual, expected);
    }

    #[test]
    fn test_log_returns_per_group() {
        let batch = series(
            vec![Some("A"), Some("B"), Some("A"), Some("B"), Some("A")],
            vec![Some(100.0), Some(10.0), Some(110.0), Some(5.0), Some(99.0)],
        );
        let out = calculate_volatility(batch, &VolatilityOptions::default()).unwrap();
        let vol = volatility_of(&out);

        assert_eq!(vol[0], None);
        assert_eq!(vol[1], None);
        assert_close(vol[2], 110f64.ln() - 100f64.ln());
        assert_close(vol[3], 5f64.ln() - 10f64.ln());
        assert_close(vol[4], 99f64.ln() - 110f64.ln());
    }

    #[test]
    fn test_zero_breaks_both_adjacent_returns() {
        let batch = series(
            vec![Some("A"), Some("A"), Some("A")],
            vec![Some(5.0), Some(0.0), Some(20.0)],
        );
        let out = calculate_volatility(batch, &VolatilityOptions::default()).unwrap();

        assert_eq!(volatility_of(&out), vec![None, None, None]);
        // the source column now holds a null where the zero was
        let dollars = optional_values(&f64_column(&out, "dollar").unwrap());
        assert_eq!(dollars, vec![Some(5.0), None, Some(20.0)]);
    }

    #[test]
    fn test_zero_only_affects_its_own_and_next_row() {
        let batch = series(
            vec![Some("A"); 5],
            vec![Some(1.0), Some(2.0), Some(0.0), Some(4.0), Some(8.0)],
        );
        let out = calculate_volatility(batch, &VolatilityOptions::default()).unwrap();
        let vol = volatility_of(&out);

        assert_eq!(vol[0], None);
        assert_close(vol[1], 2f64.ln());
        assert_eq!(vol[2], None);
        assert_eq!(vol[3], None);
        assert_close(vol[4], 2f64.ln());
    }

    #[test]
    fn test_negative_values_give_missing() {
        let batch = series(vec![Some("A"); 3], vec![Some(3.0), Some(-3.0), Some(6.0)]);
        let out = calculate_volatility(batch, &VolatilityOptions::default()).unwrap();
        assert_eq!(volatility_of(&out), vec![None, None, None]);
    }

    #[test]
    fn test_null_category_rows_are_missing() {
        let batch = series(
            vec![Some("A"), None, Some("A")],
            vec![Some(1.0), Some(2.0), Some(4.0)],
        );
        let out = calculate_volatility(batch, &VolatilityOptions::default()).unwrap();
        let vol = volatility_of(&out);

        assert_eq!(vol[1], None);
        assert_close(vol[2], 4f64.ln());
    }

    #[test]
    fn test_custom_names() {
        let batch = RecordBatch::try_from_iter(vec![
            ("HS", Arc::new(StringArray::from(vec!["87", "87"])) as ArrayRef),
            ("rial", Arc::new(Float64Array::from(vec![1.0, 10.0])) as ArrayRef),
        ])
        .unwrap();
        let options = VolatilityOptions {
            column: "rial".to_string(),
            name: "rial_log_return".to_string(),
            code_column: "HS".to_string(),
        };
        let out = calculate_volatility(batch, &options).unwrap();

        assert_eq!(out.schema().field(2).name(), "rial_log_return");
        let vol = optional_values(&f64_column(&out, "rial_log_return").unwrap());
        assert_eq!(vol[0], None);
        assert_close(vol[1], 10f64.ln());
    }

    #[test]
    fn test_missing_columns_fail() {
        let batch = series(vec![Some("A")], vec![Some(1.0)]);
        let options = VolatilityOptions {
            column: "weight".to_string(),
            ..Default::default()
        };
        let err = calculate_volatility(batch.clone(), &options).unwrap_err();
        assert!(matches!(err, PipelineError::MissingColumn { column } if column == "weight"));

        let options = VolatilityOptions {
            code_column: "HS".to_string(),
            ..Default::default()
        };
        assert!(calculate_volatility(batch, &options).is_err());
    }
}
