//! Empirical quantile extraction from sample paths.

use crate::core::SamplePathSet;
use crate::error::{ForecastError, Result};
use crate::quantile::level::{ProbabilityGrid, LEVEL_EPS};

/// Empirical quantile of sorted data with linear interpolation.
///
/// Interpolates between order statistics at rank `p * (n - 1)`. Returns NaN
/// for empty input; `p` is clamped to [0, 1].
///
/// # Example
/// ```
/// use pathcast::quantile::empirical_quantile;
///
/// let sorted = [1.0, 2.0, 3.0, 4.0, 5.0];
/// assert_eq!(empirical_quantile(&sorted, 0.5), 3.0);
/// assert_eq!(empirical_quantile(&sorted, 0.125), 1.5);
/// ```
pub fn empirical_quantile(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return f64::NAN;
    }
    if n == 1 {
        return sorted[0];
    }

    let rank = p.clamp(0.0, 1.0) * (n - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    let frac = rank - lo as f64;

    let gap = sorted[hi] - sorted[lo];
    let value = if gap.is_finite() {
        sorted[lo] + frac * gap
    } else {
        // Extremes far enough apart overflow the difference.
        sorted[lo] * (1.0 - frac) + sorted[hi] * frac
    };

    // Clamp keeps rounding from stepping past the neighbouring order statistics.
    value.max(sorted[lo]).min(sorted[hi])
}

/// Quantile estimates for one horizon step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepQuantiles {
    step: usize,
    levels: Vec<f64>,
    values: Vec<f64>,
}

impl StepQuantiles {
    /// Horizon step the estimates belong to.
    pub fn step(&self) -> usize {
        self.step
    }

    /// Probability levels, ascending.
    pub fn levels(&self) -> &[f64] {
        &self.levels
    }

    /// Quantile values, aligned with [`levels`](Self::levels).
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Quantile at level `p`, if it was estimated.
    pub fn get(&self, p: f64) -> Option<f64> {
        self.levels
            .iter()
            .position(|l| (l - p).abs() < LEVEL_EPS)
            .map(|i| self.values[i])
    }

    /// `(level, value)` pairs in ascending level order.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.levels.iter().copied().zip(self.values.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// Quantile estimates for every step of one model's horizon.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantileForecast {
    model: String,
    steps: Vec<StepQuantiles>,
}

impl QuantileForecast {
    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn horizon(&self) -> usize {
        self.steps.len()
    }

    pub fn steps(&self) -> &[StepQuantiles] {
        &self.steps
    }

    pub fn at_step(&self, step: usize) -> Result<&StepQuantiles> {
        self.steps.get(step).ok_or(ForecastError::IndexOutOfBounds {
            index: step,
            size: self.steps.len(),
        })
    }

    /// Quantile at (step, level), if present.
    pub fn get(&self, step: usize, p: f64) -> Option<f64> {
        self.steps.get(step).and_then(|s| s.get(p))
    }

    /// The `p` quantile across all steps, e.g. the upper line of a fan chart.
    pub fn series(&self, p: f64) -> Option<Vec<f64>> {
        self.steps.iter().map(|s| s.get(p)).collect()
    }
}

/// Estimate quantiles of `paths` at `step` for the given probability levels.
///
/// Levels are sorted and de-duplicated in the result. Fails with
/// `InvalidProbability` if any level lies outside (0, 1), `EmptyData` if no
/// level is given, and `IndexOutOfBounds` if `step` is past the horizon.
///
/// # Example
/// ```
/// use pathcast::core::SamplePathSet;
/// use pathcast::quantile::estimate;
///
/// let paths: Vec<Vec<f64>> = (0..=10).map(|i| vec![i as f64]).collect();
/// let set = SamplePathSet::new("demo", paths).unwrap();
///
/// let q = estimate(&set, 0, &[0.9, 0.1]).unwrap();
/// assert_eq!(q.levels(), &[0.1, 0.9]);
/// assert_eq!(q.get(0.9), Some(9.0));
/// ```
pub fn estimate(paths: &SamplePathSet, step: usize, levels: &[f64]) -> Result<StepQuantiles> {
    let grid = ProbabilityGrid::from_levels(levels)?;
    estimate_on_grid(paths, step, &grid)
}

fn estimate_on_grid(
    paths: &SamplePathSet,
    step: usize,
    grid: &ProbabilityGrid,
) -> Result<StepQuantiles> {
    let sorted = paths.sorted_values_at(step)?;
    let values = grid
        .levels()
        .iter()
        .map(|&p| empirical_quantile(&sorted, p))
        .collect();

    Ok(StepQuantiles {
        step,
        levels: grid.levels().to_vec(),
        values,
    })
}

/// Estimates quantiles on a fixed probability grid.
#[derive(Debug, Clone, Default)]
pub struct QuantileEstimator {
    grid: ProbabilityGrid,
}

impl QuantileEstimator {
    pub fn new(grid: ProbabilityGrid) -> Self {
        Self { grid }
    }

    pub fn grid(&self) -> &ProbabilityGrid {
        &self.grid
    }

    /// Quantiles of one step on the configured grid.
    pub fn estimate_step(&self, paths: &SamplePathSet, step: usize) -> Result<StepQuantiles> {
        estimate_on_grid(paths, step, &self.grid)
    }

    /// Quantiles of every step on the configured grid.
    pub fn forecast(&self, paths: &SamplePathSet) -> Result<QuantileForecast> {
        let steps = (0..paths.horizon())
            .map(|step| self.estimate_step(paths, step))
            .collect::<Result<Vec<_>>>()?;

        tracing::trace!(
            model = paths.name(),
            horizon = steps.len(),
            levels = self.grid.len(),
            "estimated quantile forecast"
        );

        Ok(QuantileForecast {
            model: paths.name().to_string(),
            steps,
        })
    }
}
