//! Point accuracy metrics for the mean forecast of a path set.

use crate::error::{ForecastError, Result};

/// Accuracy of a point forecast against observations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointAccuracy {
    /// Mean Absolute Error
    pub mae: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
}

/// Calculate point accuracy between observed and predicted values.
///
/// # Arguments
/// * `actual` - Observed values
/// * `predicted` - Point forecasts, one per observation
pub fn point_accuracy(actual: &[f64], predicted: &[f64]) -> Result<PointAccuracy> {
    if actual.is_empty() || predicted.is_empty() {
        return Err(ForecastError::EmptyData);
    }

    if actual.len() != predicted.len() {
        return Err(ForecastError::DimensionMismatch {
            expected: actual.len(),
            got: predicted.len(),
        });
    }

    let n = actual.len() as f64;

    let mae: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).abs())
        .sum::<f64>()
        / n;

    let mse: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).powi(2))
        .sum::<f64>()
        / n;

    Ok(PointAccuracy {
        mae,
        rmse: mse.sqrt(),
    })
}
