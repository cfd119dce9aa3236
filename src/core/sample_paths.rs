//! Simulated future trajectories of a single model.

use crate::core::Forecast;
use crate::error::{ForecastError, Result};
use crate::quantile::empirical_quantile;
use crate::utils::stats::{mean, sort_ascending};
use chrono::{DateTime, Utc};

/// A collection of equally long sample paths produced by one model.
///
/// Every path holds one value per horizon step. The set is validated on
/// construction and read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplePathSet {
    /// Model that produced the paths.
    name: String,
    /// Paths stored row-wise: paths[replicate][step]
    paths: Vec<Vec<f64>>,
    /// Number of steps in every path.
    horizon: usize,
    /// Optional calendar position of each step.
    timestamps: Option<Vec<DateTime<Utc>>>,
}

impl SamplePathSet {
    /// Create a path set, validating that it is non-empty, rectangular and finite.
    ///
    /// # Example
    /// ```
    /// use pathcast::core::SamplePathSet;
    ///
    /// let paths = vec![vec![1.0, 2.0], vec![1.5, 2.5], vec![0.5, 1.5]];
    /// let set = SamplePathSet::new("naive", paths).unwrap();
    ///
    /// assert_eq!(set.len(), 3);
    /// assert_eq!(set.horizon(), 2);
    /// ```
    pub fn new(name: impl Into<String>, paths: Vec<Vec<f64>>) -> Result<Self> {
        let horizon = match paths.first() {
            Some(first) if !first.is_empty() => first.len(),
            _ => return Err(ForecastError::EmptyData),
        };

        for (i, path) in paths.iter().enumerate() {
            if path.len() != horizon {
                return Err(ForecastError::IncompatibleHorizon {
                    expected: horizon,
                    got: path.len(),
                });
            }
            if let Some(step) = path.iter().position(|v| !v.is_finite()) {
                return Err(ForecastError::NonFiniteValue { path: i, step });
            }
        }

        Ok(Self {
            name: name.into(),
            paths,
            horizon,
            timestamps: None,
        })
    }

    /// Attach one strictly increasing timestamp per horizon step.
    pub fn with_timestamps(mut self, timestamps: Vec<DateTime<Utc>>) -> Result<Self> {
        if timestamps.len() != self.horizon {
            return Err(ForecastError::IncompatibleHorizon {
                expected: self.horizon,
                got: timestamps.len(),
            });
        }
        if timestamps.windows(2).any(|w| w[1] <= w[0]) {
            return Err(ForecastError::TimestampError(
                "timestamps must be strictly increasing".to_string(),
            ));
        }
        self.timestamps = Some(timestamps);
        Ok(self)
    }

    /// Same paths under a different model name.
    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of sample paths.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Always false; an empty set cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Number of steps in every path.
    pub fn horizon(&self) -> usize {
        self.horizon
    }

    pub fn paths(&self) -> &[Vec<f64>] {
        &self.paths
    }

    pub fn path(&self, index: usize) -> Result<&[f64]> {
        self.paths
            .get(index)
            .map(|p| p.as_slice())
            .ok_or(ForecastError::IndexOutOfBounds {
                index,
                size: self.paths.len(),
            })
    }

    pub fn timestamps(&self) -> Option<&[DateTime<Utc>]> {
        self.timestamps.as_deref()
    }

    /// Cross-section of all paths at one step, in path order.
    pub fn values_at(&self, step: usize) -> Result<Vec<f64>> {
        self.check_step(step)?;
        Ok(self.paths.iter().map(|p| p[step]).collect())
    }

    /// Cross-section at one step sorted ascending.
    pub fn sorted_values_at(&self, step: usize) -> Result<Vec<f64>> {
        let mut values = self.values_at(step)?;
        sort_ascending(&mut values);
        Ok(values)
    }

    /// Mean of all paths at one step.
    pub fn mean_at(&self, step: usize) -> Result<f64> {
        Ok(mean(&self.values_at(step)?))
    }

    /// Per-step mean across paths, i.e. the point forecast.
    pub fn means(&self) -> Vec<f64> {
        let n = self.paths.len() as f64;
        let mut sums = vec![0.0; self.horizon];
        for path in &self.paths {
            for (sum, v) in sums.iter_mut().zip(path.iter()) {
                *sum += v;
            }
        }
        sums.into_iter().map(|s| s / n).collect()
    }

    /// Mean point forecast with a central prediction interval at `level`.
    ///
    /// Bounds are the empirical `(1-level)/2` and `(1+level)/2` quantiles.
    pub fn to_forecast(&self, level: f64) -> Result<Forecast> {
        if !(level > 0.0 && level < 1.0) {
            return Err(ForecastError::InvalidProbability(level));
        }
        let alpha = (1.0 - level) / 2.0;

        let mut lower = Vec::with_capacity(self.horizon);
        let mut upper = Vec::with_capacity(self.horizon);
        for step in 0..self.horizon {
            let sorted = self.sorted_values_at(step)?;
            lower.push(empirical_quantile(&sorted, alpha));
            upper.push(empirical_quantile(&sorted, 1.0 - alpha));
        }

        Forecast::from_values_with_intervals(self.means(), lower, upper, level)
    }

    fn check_step(&self, step: usize) -> Result<()> {
        if step >= self.horizon {
            return Err(ForecastError::IndexOutOfBounds {
                index: step,
                size: self.horizon,
            });
        }
        Ok(())
    }
}
