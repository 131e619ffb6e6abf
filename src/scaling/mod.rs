use crate::aggregation::aggregate;
use crate::error::{PipelineError, Result};
use crate::table::{f64_column, with_column};
use crate::types::{QUANTITY_COLUMNS, SCALED_COLUMNS};
use arrow::array::{ArrayRef, Float64Array};
use arrow::record_batch::RecordBatch;
use std::sync::Arc;
use tracing::{debug, info};

/// Observed range of one field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRange {
    pub min: f64,
    pub max: f64,
}

impl FieldRange {
    /// Map `value` onto [0, 1] relative to this range. A flat range
    /// (`max == min`) maps every value to 0.0.
    pub fn scale(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span == 0.0 {
            0.0
        } else {
            (value - self.min) / span
        }
    }
}

/// Min-max transform over weight, rial and dollar.
///
/// Fitted once with [`MinMaxScaler::fit`] and then applied to any number of
/// tables, so two datasets can share one scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinMaxScaler {
    ranges: [FieldRange; 3],
}

impl MinMaxScaler {
    pub fn new(weight: FieldRange, rial: FieldRange, dollar: FieldRange) -> Self {
        Self { ranges: [weight, rial, dollar] }
    }

    /// Fit per-field min and max over the non-null, non-NaN values of `batch`
    pub fn fit(batch: &RecordBatch) -> Result<Self> {
        let mut ranges = [FieldRange { min: 0.0, max: 0.0 }; 3];

        for (range, field) in ranges.iter_mut().zip(QUANTITY_COLUMNS) {
            let column = f64_column(batch, field)?;
            let mut observed: Option<FieldRange> = None;
            for value in column.iter().flatten().filter(|v| !v.is_nan()) {
                observed = Some(match observed {
                    Some(r) => FieldRange { min: r.min.min(value), max: r.max.max(value) },
                    None => FieldRange { min: value, max: value },
                });
            }
            *range = observed.ok_or(PipelineError::EmptyFit { field })?;
        }

        let scaler = Self { ranges };
        debug!("Fitted scaler: {:?}", scaler);
        Ok(scaler)
    }

    /// Range fitted for `field` (one of weight, rial, dollar)
    pub fn range(&self, field: &str) -> Option<FieldRange> {
        QUANTITY_COLUMNS
            .iter()
            .position(|name| *name == field)
            .map(|idx| self.ranges[idx])
    }

    /// Append `weight_scaled`, `rial_scaled` and `dollar_scaled` to `batch`.
    /// Values outside the fitted range land outside [0, 1]; nulls stay null.
    pub fn transform(&self, batch: &RecordBatch) -> Result<RecordBatch> {
        let mut out = batch.clone();
        let fields = QUANTITY_COLUMNS.iter().zip(SCALED_COLUMNS).zip(&self.ranges);
        for ((field, scaled_name), range) in fields {
            let column = f64_column(batch, field)?;
            let scaled: Float64Array = column
                .iter()
                .map(|v| v.filter(|v| !v.is_nan()).map(|v| range.scale(v)))
                .collect();
            out = with_column(&out, scaled_name, Arc::new(scaled) as ArrayRef)?;
        }
        Ok(out)
    }
}

/// Scale an aggregated table. With `scaler == None` a transform is fitted on
/// `batch`; otherwise the given transform is applied unchanged. Returns the
/// extended table together with the transform that was used.
pub fn scale(
    batch: &RecordBatch,
    scaler: Option<&MinMaxScaler>,
) -> Result<(RecordBatch, MinMaxScaler)> {
    let scaler = match scaler {
        Some(existing) => {
            debug!("Reusing provided scaler");
            *existing
        }
        None => MinMaxScaler::fit(batch)?,
    };
    let scaled = scaler.transform(batch)?;
    Ok((scaled, scaler))
}

/// Aggregate raw records by (year, month, code), then scale the sums
pub fn aggregate_and_scale(
    batch: &RecordBatch,
    code_column: &str,
    scaler: Option<&MinMaxScaler>,
) -> Result<(RecordBatch, MinMaxScaler)> {
    let aggregated = aggregate(batch, code_column)?;
    let (scaled, scaler) = scale(&aggregated, scaler)?;
    info!("Scaled {} aggregated rows", scaled.num_rows());
    Ok((scaled, scaler))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::optional_values;
    use crate::types::{DOLLAR, RIAL, WEIGHT};

    fn quantities(weight: Vec<f64>, rial: Vec<f64>, dollar: Vec<Option<f64>>) -> RecordBatch {
        RecordBatch::try_from_iter(vec![
            (WEIGHT, Arc::new(Float64Array::from(weight)) as ArrayRef),
            (RIAL, Arc::new(Float64Array::from(rial)) as ArrayRef),
            (DOLLAR, Arc::new(Float64Array::from(dollar)) as ArrayRef),
        ])
        .unwrap()
    }

    #[test]
    fn test_scaled_values_within_unit_range() {
        let batch = quantities(
            vec![10.0, 30.0, 20.0],
            vec![-5.0, 5.0, 15.0],
            vec![Some(2.0), Some(4.0), Some(3.0)],
        );
        let (scaled, scaler) = scale(&batch, None).unwrap();

        assert_eq!(scaler.range(WEIGHT), Some(FieldRange { min: 10.0, max: 30.0 }));
        assert_eq!(scaler.range(RIAL), Some(FieldRange { min: -5.0, max: 15.0 }));
        assert_eq!(scaler.range("Code"), None);

        let weight = f64_column(&scaled, "weight_scaled").unwrap();
        assert_eq!(weight.values().to_vec(), vec![0.0, 1.0, 0.5]);
        let rial = f64_column(&scaled, "rial_scaled").unwrap();
        assert_eq!(rial.values().to_vec(), vec![0.0, 0.5, 1.0]);
        for name in SCALED_COLUMNS {
            let column = f64_column(&scaled, name).unwrap();
            assert!(column.iter().flatten().all(|v| (0.0..=1.0).contains(&v)));
        }
    }

    #[test]
    fn test_scaled_columns_appended_in_order() {
        let batch = quantities(vec![1.0], vec![2.0], vec![Some(3.0)]);
        let (scaled, _) = scale(&batch, None).unwrap();
        let names: Vec<String> =
            scaled.schema().fields().iter().map(|f| f.name().clone()).collect();
        assert_eq!(
            names,
            vec!["weight", "rial", "dollar", "weight_scaled", "rial_scaled", "dollar_scaled"]
        );
    }

    #[test]
    fn test_flat_range_scales_to_zero() {
        let batch = quantities(vec![7.0, 7.0], vec![1.0, 2.0], vec![Some(3.0), Some(3.0)]);
        let (scaled, _) = scale(&batch, None).unwrap();

        let weight = f64_column(&scaled, "weight_scaled").unwrap();
        assert_eq!(weight.values().to_vec(), vec![0.0, 0.0]);
        let dollar = f64_column(&scaled, "dollar_scaled").unwrap();
        assert_eq!(dollar.values().to_vec(), vec![0.0, 0.0]);
    }

    #[test]
    fn test_reused_scaler_is_not_refitted() {
        let export = quantities(vec![0.0, 100.0], vec![0.0, 10.0], vec![Some(0.0), Some(50.0)]);
        let import = quantities(vec![50.0, 200.0], vec![5.0, 5.0], vec![Some(25.0), Some(100.0)]);

        let (_, fitted) = scale(&export, None).unwrap();
        let (scaled, reused) = scale(&import, Some(&fitted)).unwrap();

        assert_eq!(reused, fitted);
        let weight = f64_column(&scaled, "weight_scaled").unwrap();
        assert_eq!(weight.values().to_vec(), vec![0.5, 2.0]);
        let dollar = f64_column(&scaled, "dollar_scaled").unwrap();
        assert_eq!(dollar.values().to_vec(), vec![0.5, 2.0]);
    }

    #[test]
    fn test_nulls_ignored_when_fitting() {
        let batch = quantities(
            vec![1.0, 2.0, 3.0],
            vec![1.0, 2.0, 3.0],
            vec![None, Some(4.0), Some(8.0)],
        );
        let (scaled, scaler) = scale(&batch, None).unwrap();

        assert_eq!(scaler.range(DOLLAR), Some(FieldRange { min: 4.0, max: 8.0 }));
        let dollar = f64_column(&scaled, "dollar_scaled").unwrap();
        assert_eq!(optional_values(&dollar), vec![None, Some(0.0), Some(1.0)]);
    }

    #[test]
    fn test_fit_without_values_fails() {
        let batch = quantities(vec![1.0], vec![1.0], vec![None]);
        let err = MinMaxScaler::fit(&batch).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyFit { field: "dollar" }));
    }
}
