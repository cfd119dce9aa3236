//! Point forecast with an optional central prediction interval.

use crate::error::{ForecastError, Result};

/// A univariate forecast: point predictions and optional interval bounds.
///
/// Built from sample paths by [`SamplePathSet::to_forecast`], which takes the
/// per-step mean as the point forecast and empirical quantiles as bounds.
///
/// [`SamplePathSet::to_forecast`]: crate::core::SamplePathSet::to_forecast
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Forecast {
    /// Point predictions, one per step.
    point: Vec<f64>,
    /// Lower prediction interval bounds (optional)
    lower: Option<Vec<f64>>,
    /// Upper prediction interval bounds (optional)
    upper: Option<Vec<f64>>,
    /// Nominal coverage of the interval, e.g. 0.8.
    level: Option<f64>,
}

impl Forecast {
    /// Create an empty forecast.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a forecast from point predictions.
    pub fn from_values(values: Vec<f64>) -> Self {
        Self {
            point: values,
            ..Default::default()
        }
    }

    /// Create a forecast with a central prediction interval.
    ///
    /// All three series must have the same length and `level` must lie in (0, 1).
    pub fn from_values_with_intervals(
        values: Vec<f64>,
        lower: Vec<f64>,
        upper: Vec<f64>,
        level: f64,
    ) -> Result<Self> {
        if !(level > 0.0 && level < 1.0) {
            return Err(ForecastError::InvalidProbability(level));
        }
        for bound in [&lower, &upper] {
            if bound.len() != values.len() {
                return Err(ForecastError::DimensionMismatch {
                    expected: values.len(),
                    got: bound.len(),
                });
            }
        }
        Ok(Self {
            point: values,
            lower: Some(lower),
            upper: Some(upper),
            level: Some(level),
        })
    }

    /// Get the forecast horizon (number of steps).
    pub fn horizon(&self) -> usize {
        self.point.len()
    }

    /// Check if forecast is empty.
    pub fn is_empty(&self) -> bool {
        self.point.is_empty()
    }

    /// Get the point predictions.
    pub fn primary(&self) -> &[f64] {
        &self.point
    }

    /// Check if interval bounds are available.
    pub fn has_intervals(&self) -> bool {
        self.lower.is_some() && self.upper.is_some()
    }

    pub fn lower(&self) -> Option<&[f64]> {
        self.lower.as_deref()
    }

    pub fn upper(&self) -> Option<&[f64]> {
        self.upper.as_deref()
    }

    pub fn level(&self) -> Option<f64> {
        self.level
    }

    /// Proportion of observations falling inside the prediction interval.
    ///
    /// Returns `None` when the forecast carries no interval.
    pub fn coverage(&self, observations: &[f64]) -> Result<Option<f64>> {
        if observations.is_empty() {
            return Err(ForecastError::EmptyData);
        }
        if observations.len() != self.point.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: self.point.len(),
                got: observations.len(),
            });
        }

        let (lower, upper) = match (&self.lower, &self.upper) {
            (Some(l), Some(u)) => (l, u),
            _ => return Ok(None),
        };

        let inside = observations
            .iter()
            .zip(lower.iter().zip(upper.iter()))
            .filter(|(&y, (&lo, &up))| y >= lo && y <= up)
            .count();

        Ok(Some(inside as f64 / observations.len() as f64))
    }
}
