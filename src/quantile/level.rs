//! Probability levels and grids of levels.

use crate::error::{ForecastError, Result};

/// Tolerance used when looking up a level by value.
pub(crate) const LEVEL_EPS: f64 = 1e-12;

/// A probability strictly inside (0, 1).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct ProbabilityLevel(f64);

impl ProbabilityLevel {
    /// Validate a probability level.
    ///
    /// # Example
    /// ```
    /// use pathcast::quantile::ProbabilityLevel;
    ///
    /// assert!(ProbabilityLevel::new(0.9).is_ok());
    /// assert!(ProbabilityLevel::new(1.0).is_err());
    /// ```
    pub fn new(p: f64) -> Result<Self> {
        if p > 0.0 && p < 1.0 {
            Ok(Self(p))
        } else {
            Err(ForecastError::InvalidProbability(p))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for ProbabilityLevel {
    type Error = ForecastError;

    fn try_from(p: f64) -> Result<Self> {
        Self::new(p)
    }
}

/// Sorted, de-duplicated set of probability levels.
///
/// Finer grids approximate the CRPS integral more closely at a higher cost.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityGrid {
    levels: Vec<f64>,
}

impl Default for ProbabilityGrid {
    fn default() -> Self {
        Self::deciles()
    }
}

impl ProbabilityGrid {
    /// Build a grid from arbitrary levels; order and duplicates are ignored.
    ///
    /// Levels closer than `1e-12` collapse into one, so averages over the
    /// grid (such as CRPS) weight each distinct level equally.
    pub fn from_levels(levels: &[f64]) -> Result<Self> {
        if levels.is_empty() {
            return Err(ForecastError::EmptyData);
        }
        let mut sorted = levels
            .iter()
            .map(|&p| ProbabilityLevel::new(p).map(ProbabilityLevel::value))
            .collect::<Result<Vec<f64>>>()?;
        sorted.sort_by(f64::total_cmp);
        sorted.dedup_by(|a, b| (*a - *b).abs() < LEVEL_EPS);
        Ok(Self { levels: sorted })
    }

    /// `n` evenly spaced levels `i / (n + 1)` for `i = 1..=n`.
    pub fn uniform(n: usize) -> Result<Self> {
        if n == 0 {
            return Err(ForecastError::InvalidParameter(
                "grid needs at least one level".to_string(),
            ));
        }
        let denom = (n + 1) as f64;
        Ok(Self {
            levels: (1..=n).map(|i| i as f64 / denom).collect(),
        })
    }

    /// 0.1, 0.2, ..., 0.9
    pub fn deciles() -> Self {
        Self {
            levels: (1..=9).map(|i| i as f64 / 10.0).collect(),
        }
    }

    /// 0.01, 0.02, ..., 0.99
    pub fn percentiles() -> Self {
        Self {
            levels: (1..=99).map(|i| i as f64 / 100.0).collect(),
        }
    }

    pub fn levels(&self) -> &[f64] {
        &self.levels
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Position of `p` in the grid, if present.
    pub fn position(&self, p: f64) -> Option<usize> {
        self.levels.iter().position(|l| (l - p).abs() < LEVEL_EPS)
    }
}
