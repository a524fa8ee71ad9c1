use crate::error::ForecastError;
use core_types::SalesRecord;

/// Weight given to the newest observation.
pub const SMOOTHING_FACTOR: f64 = 0.3;

/// Number of periods every forecast projects.
pub const FORECAST_HORIZON: usize = 5;

/// A flat projection: every period carries the same smoothed level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastResult {
    pub predictions: [f64; FORECAST_HORIZON],
}

impl ForecastResult {
    fn flat(level: f64) -> Self {
        Self {
            predictions: [level; FORECAST_HORIZON],
        }
    }

    /// The smoothed level the projection was built from.
    pub fn level(&self) -> f64 {
        self.predictions[0]
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.predictions.get(index).copied()
    }
}

/// Runs simple exponential smoothing over `series` and returns the final level.
///
/// The level starts at the first observation; each later observation `y`
/// updates it to `alpha * y + (1 - alpha) * level`. Returns `None` for an
/// empty series.
pub fn smooth(series: &[f64], alpha: f64) -> Option<f64> {
    let (first, rest) = series.split_first()?;

    let level = rest
        .iter()
        .fold(*first, |level, &value| alpha * value + (1.0 - alpha) * level);

    Some(level)
}

/// Forecasts the next `FORECAST_HORIZON` periods from an ordered sales history.
///
/// # Arguments
///
/// * `records` - The history, oldest first. Only the `sales` field is read.
///
/// # Returns
///
/// A `ForecastResult` whose entries all equal the final smoothed level, or
/// `ForecastError::EmptyInput` when there is nothing to smooth.
pub fn forecast(records: &[SalesRecord]) -> Result<ForecastResult, ForecastError> {
    let series: Vec<f64> = records.iter().map(|record| record.sales).collect();

    let level = smooth(&series, SMOOTHING_FACTOR).ok_or(ForecastError::EmptyInput)?;
    tracing::debug!(observations = series.len(), level, "Smoothed sales history.");

    Ok(ForecastResult::flat(level))
}
