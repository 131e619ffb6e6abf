use crate::error::{PipelineError, Result};
use crate::types::{DEFAULT_CODE_COLUMN, DOLLAR, MONTH, RIAL, WEIGHT, YEAR};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::record_batch::RecordBatch;
use chrono::{Datelike, Months, NaiveDate};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::{Distribution, LogNormal, Normal};
use std::sync::Arc;
use tracing::info;

/// Generates raw trade-flow records shaped like customs data: several rows
/// per (month, code), log-normal weights and unit prices, dollar values
/// derived through a noisy exchange rate, and occasional zero dollar values.
#[derive(Debug, Clone)]
pub struct SyntheticTradeFlow {
    pub codes: usize,
    pub months: u32,
    pub rows_per_month: usize,
    pub start: NaiveDate,
    pub zero_dollar_probability: f64,
    pub rial_per_dollar: f64,
}

impl Default for SyntheticTradeFlow {
    fn default() -> Self {
        Self {
            codes: 5,
            months: 24,
            rows_per_month: 4,
            start: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or_default(),
            zero_dollar_probability: 0.05,
            rial_per_dollar: 42_000.0,
        }
    }
}

fn invalid(e: impl std::fmt::Display) -> PipelineError {
    PipelineError::InvalidParameter(e.to_string())
}

impl SyntheticTradeFlow {
    /// Category codes used by the generator, in generation order
    pub fn code_names(&self) -> Vec<String> {
        (0..self.codes).map(|i| format!("{:04}", 1001 + i * 97)).collect()
    }

    pub fn generate(&self, seed: u64) -> Result<RecordBatch> {
        if !(0.0..=1.0).contains(&self.zero_dollar_probability) {
            return Err(invalid(format!(
                "zero_dollar_probability must be within [0, 1], got {}",
                self.zero_dollar_probability
            )));
        }
        if self.rial_per_dollar <= 0.0 {
            return Err(invalid("rial_per_dollar must be positive"));
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let weight_dist = LogNormal::new(7.0, 0.8).map_err(invalid)?;
        let unit_price_dist = LogNormal::new(13.0, 0.3).map_err(invalid)?;
        let rate_noise = Normal::new(0.0, 0.03).map_err(invalid)?;

        let codes = self.code_names();
        // Per-code size factor so categories differ in magnitude
        let factors: Vec<f64> = codes.iter().map(|_| rng.gen_range(0.5..2.0)).collect();

        let capacity = self.codes * self.months as usize * self.rows_per_month;
        let mut years = Vec::with_capacity(capacity);
        let mut months = Vec::with_capacity(capacity);
        let mut code_column = Vec::with_capacity(capacity);
        let mut weights = Vec::with_capacity(capacity);
        let mut rials = Vec::with_capacity(capacity);
        let mut dollars = Vec::with_capacity(capacity);

        for offset in 0..self.months {
            let period = self
                .start
                .checked_add_months(Months::new(offset))
                .ok_or_else(|| invalid(format!("month offset {} out of calendar range", offset)))?;

            for (code, factor) in codes.iter().zip(&factors) {
                for _ in 0..self.rows_per_month {
                    let weight = weight_dist.sample(&mut rng) * factor;
                    let rial = weight * unit_price_dist.sample(&mut rng);
                    let rate = self.rial_per_dollar * (1.0 + rate_noise.sample(&mut rng));
                    let dollar = if rng.gen_bool(self.zero_dollar_probability) {
                        0.0
                    } else {
                        rial / rate
                    };

                    years.push(period.year() as i64);
                    months.push(period.month() as i64);
                    code_column.push(code.as_str());
                    weights.push(weight);
                    rials.push(rial);
                    dollars.push(dollar);
                }
            }
        }

        let batch = RecordBatch::try_from_iter(vec![
            (YEAR, Arc::new(Int64Array::from(years)) as ArrayRef),
            (MONTH, Arc::new(Int64Array::from(months)) as ArrayRef),
            (DEFAULT_CODE_COLUMN, Arc::new(StringArray::from(code_column)) as ArrayRef),
            (WEIGHT, Arc::new(Float64Array::from(weights)) as ArrayRef),
            (RIAL, Arc::new(Float64Array::from(rials)) as ArrayRef),
            (DOLLAR, Arc::new(Float64Array::from(dollars)) as ArrayRef),
        ])?;

        info!(
            "Generated {} synthetic trade records ({} codes x {} months)",
            batch.num_rows(),
            self.codes,
            self.months
        );
        Ok(batch)
    }
}
