//! Pinball (quantile) loss.

use crate::error::Result;
use crate::quantile::ProbabilityLevel;

/// Pinball loss of a quantile forecast, with the conventional factor of 2.
///
/// With the factor, the loss at `p = 0.5` equals the absolute error and the
/// average over all levels integrates to the CRPS.
///
/// # Example
/// ```
/// use pathcast::scoring::pinball_loss;
///
/// // 0.9 quantile forecast of 500, observed 450
/// let loss = pinball_loss(500.0, 450.0, 0.9).unwrap();
/// assert!((loss - 10.0).abs() < 1e-9);
/// ```
pub fn pinball_loss(forecast: f64, observed: f64, p: f64) -> Result<f64> {
    pinball_loss_with(forecast, observed, p, true)
}

/// Pinball loss with the factor of 2 applied only when `include_multiplier` is set.
///
/// Fails with `InvalidProbability` when `p` is outside (0, 1).
pub fn pinball_loss_with(
    forecast: f64,
    observed: f64,
    p: f64,
    include_multiplier: bool,
) -> Result<f64> {
    let p = ProbabilityLevel::new(p)?.value();
    Ok(raw_pinball(forecast, observed, p, multiplier(include_multiplier)))
}

pub(crate) fn multiplier(include: bool) -> f64 {
    if include {
        2.0
    } else {
        1.0
    }
}

/// Unchecked loss for levels already validated by a grid.
pub(crate) fn raw_pinball(forecast: f64, observed: f64, p: f64, multiplier: f64) -> f64 {
    if observed < forecast {
        multiplier * (1.0 - p) * (forecast - observed)
    } else {
        multiplier * p * (observed - forecast)
    }
}
