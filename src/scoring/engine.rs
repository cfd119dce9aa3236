//! Configurable scoring of sample path forecasts against observations.

use crate::core::{SamplePathSet, SamplePathStore};
use crate::error::{ForecastError, Result};
use crate::quantile::{empirical_quantile, ProbabilityGrid};
use crate::scoring::crps::{check_observation, grid_crps, sorted_sample_crps, CrpsMethod};
use crate::scoring::pinball::{multiplier, pinball_loss_with, raw_pinball};
use crate::scoring::skill::skill_score;
use crate::utils::metrics::point_accuracy;
use crate::utils::stats::mean;

/// Configuration for CRPS and pinball scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringConfig {
    /// Probability levels for quantile scores and grid CRPS.
    pub grid: ProbabilityGrid,
    /// Apply the factor of 2 to pinball losses.
    pub include_multiplier: bool,
    /// CRPS estimator.
    pub crps_method: CrpsMethod,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            grid: ProbabilityGrid::deciles(),
            include_multiplier: true,
            crps_method: CrpsMethod::Grid,
        }
    }
}

impl ScoringConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different probability grid.
    pub fn with_grid(mut self, grid: ProbabilityGrid) -> Self {
        self.grid = grid;
        self
    }

    /// Toggle the factor of 2 on pinball losses.
    pub fn with_multiplier(mut self, include: bool) -> Self {
        self.include_multiplier = include;
        self
    }

    pub fn with_crps_method(mut self, method: CrpsMethod) -> Self {
        self.crps_method = method;
        self
    }
}

/// Pinball losses per step and level for one model.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantileScores {
    levels: Vec<f64>,
    /// scores[step][level]
    scores: Vec<Vec<f64>>,
}

impl QuantileScores {
    pub fn levels(&self) -> &[f64] {
        &self.levels
    }

    pub fn horizon(&self) -> usize {
        self.scores.len()
    }

    /// Scores of one step, aligned with [`levels`](Self::levels).
    pub fn at_step(&self, step: usize) -> Result<&[f64]> {
        self.scores
            .get(step)
            .map(|s| s.as_slice())
            .ok_or(ForecastError::IndexOutOfBounds {
                index: step,
                size: self.scores.len(),
            })
    }

    /// Score at (step, level), if the level is on the grid.
    pub fn get(&self, step: usize, p: f64) -> Option<f64> {
        let idx = self.levels.iter().position(|l| (l - p).abs() < 1e-12)?;
        self.scores.get(step).map(|s| s[idx])
    }

    /// Average score of each level over the horizon.
    pub fn by_level(&self) -> Vec<f64> {
        let n = self.scores.len() as f64;
        (0..self.levels.len())
            .map(|j| self.scores.iter().map(|row| row[j]).sum::<f64>() / n)
            .collect()
    }

    /// Grid CRPS of each step.
    pub fn by_step(&self) -> Vec<f64> {
        self.scores.iter().map(|row| mean(row)).collect()
    }
}

/// One row of an evaluation table.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelScore {
    pub model: String,
    /// CRPS averaged over the horizon.
    pub crps: f64,
    /// Percentage improvement in CRPS over the baseline.
    pub skill: f64,
    /// Accuracy of the per-step path mean.
    pub mae: f64,
    pub rmse: f64,
}

/// Scores of every model in a store, sorted by CRPS (best first).
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationReport {
    baseline: String,
    rows: Vec<ModelScore>,
}

impl EvaluationReport {
    pub fn baseline(&self) -> &str {
        &self.baseline
    }

    pub fn rows(&self) -> &[ModelScore] {
        &self.rows
    }

    /// Model with the lowest CRPS.
    pub fn best(&self) -> Option<&ModelScore> {
        self.rows.first()
    }

    pub fn get(&self, model: &str) -> Option<&ModelScore> {
        self.rows.iter().find(|r| r.model == model)
    }
}

/// Scores sample path forecasts with a fixed [`ScoringConfig`].
#[derive(Debug, Clone, Default)]
pub struct ScoreEngine {
    config: ScoringConfig,
}

impl ScoreEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Pinball loss under the configured multiplier convention.
    pub fn pinball_loss(&self, forecast: f64, observed: f64, p: f64) -> Result<f64> {
        pinball_loss_with(forecast, observed, p, self.config.include_multiplier)
    }

    /// CRPS of one step against its observation.
    ///
    /// The exact estimator is reported on the same scale as the grid
    /// estimator, so toggling the multiplier halves both.
    pub fn crps(&self, paths: &SamplePathSet, step: usize, observed: f64) -> Result<f64> {
        check_observation(observed)?;
        let sorted = paths.sorted_values_at(step)?;
        Ok(self.crps_sorted(&sorted, observed))
    }

    /// CRPS of every step; `observations` must cover the whole horizon.
    pub fn crps_by_step(&self, paths: &SamplePathSet, observations: &[f64]) -> Result<Vec<f64>> {
        check_alignment(paths, observations)?;
        observations
            .iter()
            .enumerate()
            .map(|(step, &y)| self.crps(paths, step, y))
            .collect()
    }

    /// CRPS averaged with equal weight over all steps.
    pub fn mean_crps(&self, paths: &SamplePathSet, observations: &[f64]) -> Result<f64> {
        Ok(mean(&self.crps_by_step(paths, observations)?))
    }

    pub fn skill_score(&self, model_crps: f64, baseline_crps: f64) -> Result<f64> {
        skill_score(model_crps, baseline_crps)
    }

    /// Pinball loss at every (step, level) of the configured grid.
    pub fn quantile_scores(
        &self,
        paths: &SamplePathSet,
        observations: &[f64],
    ) -> Result<QuantileScores> {
        check_alignment(paths, observations)?;
        let m = multiplier(self.config.include_multiplier);
        let levels = self.config.grid.levels();

        let mut scores = Vec::with_capacity(observations.len());
        for (step, &y) in observations.iter().enumerate() {
            check_observation(y)?;
            let sorted = paths.sorted_values_at(step)?;
            scores.push(
                levels
                    .iter()
                    .map(|&p| raw_pinball(empirical_quantile(&sorted, p), y, p, m))
                    .collect(),
            );
        }

        Ok(QuantileScores {
            levels: levels.to_vec(),
            scores,
        })
    }

    /// Score every model in `store` and compute skill against `baseline`.
    pub fn evaluate(
        &self,
        store: &SamplePathStore,
        observations: &[f64],
        baseline: &str,
    ) -> Result<EvaluationReport> {
        if store.is_empty() {
            return Err(ForecastError::EmptyData);
        }
        let baseline_crps = self.mean_crps(store.get(baseline)?, observations)?;

        let mut rows = Vec::with_capacity(store.len());
        for set in store.iter() {
            let crps = self.mean_crps(set, observations)?;
            let skill = skill_score(crps, baseline_crps)?;
            let accuracy = point_accuracy(observations, &set.means())?;

            tracing::debug!(
                model = set.name(),
                paths = set.len(),
                crps,
                skill,
                "scored model"
            );

            rows.push(ModelScore {
                model: set.name().to_string(),
                crps,
                skill,
                mae: accuracy.mae,
                rmse: accuracy.rmse,
            });
        }

        rows.sort_by(|a, b| a.crps.total_cmp(&b.crps));

        Ok(EvaluationReport {
            baseline: baseline.to_string(),
            rows,
        })
    }

    fn crps_sorted(&self, sorted: &[f64], observed: f64) -> f64 {
        let m = multiplier(self.config.include_multiplier);
        match self.config.crps_method {
            CrpsMethod::Grid => grid_crps(sorted, observed, &self.config.grid, m),
            CrpsMethod::Exact => sorted_sample_crps(sorted, observed) * m / 2.0,
        }
    }
}

fn check_alignment(paths: &SamplePathSet, observations: &[f64]) -> Result<()> {
    if observations.len() != paths.horizon() {
        return Err(ForecastError::DimensionMismatch {
            expected: paths.horizon(),
            got: observations.len(),
        });
    }
    Ok(())
}
