//! Continuous Ranked Probability Score from sample paths.
//!
//! Two estimators are provided:
//! - the grid estimator averages pinball losses of empirical quantiles over a
//!   probability grid; denser grids approach the integral
//! - the exact estimator scores the empirical distribution of the samples
//!   directly via `E|X - y| - E|X - X'| / 2`

use crate::core::SamplePathSet;
use crate::error::{ForecastError, Result};
use crate::quantile::{empirical_quantile, ProbabilityGrid};
use crate::scoring::pinball::raw_pinball;
use crate::utils::stats::sort_ascending;

/// How CRPS is computed from a cross-section of samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CrpsMethod {
    /// Mean pinball loss over the configured probability grid.
    #[default]
    Grid,
    /// Exact CRPS of the empirical sample distribution.
    Exact,
}

/// CRPS of the path cross-section at `step`, averaged over `grid`.
///
/// Uses the pinball convention with the factor of 2, so a single-level grid
/// at 0.5 yields the absolute error of the median. Every grid level counts
/// once: a grid built from `[0.5, 0.5, 0.9]` holds two levels, so repeated
/// levels carry no extra weight.
///
/// # Example
/// ```
/// use pathcast::core::SamplePathSet;
/// use pathcast::quantile::ProbabilityGrid;
/// use pathcast::scoring::crps;
///
/// let paths: Vec<Vec<f64>> = (0..=10).map(|i| vec![i as f64]).collect();
/// let set = SamplePathSet::new("demo", paths).unwrap();
///
/// let median_only = ProbabilityGrid::from_levels(&[0.5]).unwrap();
/// assert_eq!(crps(&set, 0, 8.0, &median_only).unwrap(), 3.0);
/// ```
pub fn crps(
    paths: &SamplePathSet,
    step: usize,
    observed: f64,
    grid: &ProbabilityGrid,
) -> Result<f64> {
    check_observation(observed)?;
    let sorted = paths.sorted_values_at(step)?;
    Ok(grid_crps(&sorted, observed, grid, 2.0))
}

/// Exact CRPS of an unordered sample against an observation.
pub fn sample_crps(samples: &[f64], observed: f64) -> Result<f64> {
    if samples.is_empty() {
        return Err(ForecastError::EmptyData);
    }
    check_observation(observed)?;
    let mut sorted = samples.to_vec();
    sort_ascending(&mut sorted);
    Ok(sorted_sample_crps(&sorted, observed))
}

pub(crate) fn check_observation(observed: f64) -> Result<()> {
    if observed.is_finite() {
        Ok(())
    } else {
        Err(ForecastError::InvalidParameter(format!(
            "observation must be finite, got {observed}"
        )))
    }
}

pub(crate) fn grid_crps(
    sorted: &[f64],
    observed: f64,
    grid: &ProbabilityGrid,
    multiplier: f64,
) -> f64 {
    let total: f64 = grid
        .levels()
        .iter()
        .map(|&p| raw_pinball(empirical_quantile(sorted, p), observed, p, multiplier))
        .sum();
    total / grid.len() as f64
}

/// `E|X - y| - E|X - X'| / 2` for sorted samples, in O(n).
pub(crate) fn sorted_sample_crps(sorted: &[f64], observed: f64) -> f64 {
    let n = sorted.len() as f64;
    let abs_error: f64 = sorted.iter().map(|x| (x - observed).abs()).sum::<f64>() / n;

    // sum_{i,j} |x_i - x_j| = 2 * sum_k (2k - n + 1) x_(k)
    let spread: f64 = sorted
        .iter()
        .enumerate()
        .map(|(k, x)| (2.0 * k as f64 - n + 1.0) * x)
        .sum::<f64>()
        / (n * n);

    // Cancellation can leave a tiny negative value for point masses.
    (abs_error - spread).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn single_step(values: &[f64]) -> SamplePathSet {
        SamplePathSet::new("m", values.iter().map(|&v| vec![v]).collect()).unwrap()
    }

    #[test]
    fn median_grid_reduces_to_absolute_error() {
        let set = single_step(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let grid = ProbabilityGrid::from_levels(&[0.5]).unwrap();
        assert_relative_eq!(crps(&set, 0, 10.0, &grid).unwrap(), 7.0, epsilon = 1e-12);
        assert_relative_eq!(crps(&set, 0, 1.5, &grid).unwrap(), 1.5, epsilon = 1e-12);
    }

    #[test]
    fn decile_crps_is_mean_of_pinball_losses() {
        let set = single_step(&[0.0, 10.0]);
        let grid = ProbabilityGrid::deciles();
        // quantile at p is 10p; observed 5 splits the grid at 0.5
        let expected: f64 = grid
            .levels()
            .iter()
            .map(|&p| {
                let q = 10.0 * p;
                if 5.0 < q {
                    2.0 * (1.0 - p) * (q - 5.0)
                } else {
                    2.0 * p * (5.0 - q)
                }
            })
            .sum::<f64>()
            / 9.0;
        assert_relative_eq!(crps(&set, 0, 5.0, &grid).unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    fn point_mass_crps_is_absolute_error() {
        assert_relative_eq!(sample_crps(&[3.0], 7.0).unwrap(), 4.0, epsilon = 1e-12);
        assert_relative_eq!(sample_crps(&[3.0, 3.0, 3.0], 1.0).unwrap(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn point_mass_on_observation_is_never_negative() {
        for (x, n) in [(0.3, 5), (123.456, 5), (123.456, 40)] {
            let score = sample_crps(&vec![x; n], x).unwrap();
            assert!(score >= 0.0, "crps {score} for {n} samples at {x}");
            assert!(score < 1e-9);
        }
        assert!(sample_crps(&vec![1e10 + 0.1; 66], 1e10 + 0.1).unwrap() >= 0.0);
    }

    #[test]
    fn repeated_grid_levels_count_once() {
        let set = single_step(&[0.0, 2.0, 5.0, 9.0, 10.0]);
        let repeated = ProbabilityGrid::from_levels(&[0.5, 0.5, 0.9]).unwrap();
        let distinct = ProbabilityGrid::from_levels(&[0.5, 0.9]).unwrap();
        assert_eq!(repeated.len(), 2);
        assert_eq!(
            crps(&set, 0, 4.0, &repeated).unwrap(),
            crps(&set, 0, 4.0, &distinct).unwrap()
        );
    }

    #[test]
    fn exact_crps_matches_pairwise_definition() {
        let samples: [f64; 5] = [4.0, -1.0, 2.5, 7.0, 0.5];
        let y: f64 = 1.75;
        let n = samples.len() as f64;
        let term1: f64 = samples.iter().map(|x| (x - y).abs()).sum::<f64>() / n;
        let term2: f64 = samples
            .iter()
            .flat_map(|a| samples.iter().map(move |b| (a - b).abs()))
            .sum::<f64>()
            / (2.0 * n * n);
        assert_relative_eq!(
            sample_crps(&samples, y).unwrap(),
            term1 - term2,
            epsilon = 1e-12
        );
    }

    #[test]
    fn crps_rejects_bad_input() {
        let set = single_step(&[1.0, 2.0]);
        let grid = ProbabilityGrid::deciles();
        assert!(matches!(
            crps(&set, 0, f64::NAN, &grid),
            Err(ForecastError::InvalidParameter(_))
        ));
        assert!(matches!(
            crps(&set, 1, 1.0, &grid),
            Err(ForecastError::IndexOutOfBounds { .. })
        ));
        assert!(matches!(sample_crps(&[], 1.0), Err(ForecastError::EmptyData)));
    }
}
