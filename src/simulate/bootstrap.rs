//! Random walk driven by resampled residuals.
//!
//! Innovations are drawn with replacement from a supplied residual series,
//! either one at a time or in contiguous blocks to keep short-range
//! autocorrelation, and accumulated from a starting level.

use crate::core::SamplePathSet;
use crate::error::{ForecastError, Result};
use crate::simulate::{check_dimensions, integrate, make_rng, Simulator};
use rand::prelude::*;

/// Configuration for bootstrap path simulation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BootstrapConfig {
    /// Block size for block bootstrap (None for residual bootstrap).
    pub block_size: Option<usize>,
    /// Random seed for reproducibility (None for random).
    pub seed: Option<u64>,
}

impl BootstrapConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use block bootstrap with specified block size.
    /// Preserves autocorrelation structure better than residual bootstrap.
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = Some(block_size);
        self
    }

    /// Set random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Random walk from `start` whose innovations are bootstrapped residuals.
#[derive(Debug, Clone)]
pub struct ResidualBootstrap {
    name: String,
    start: f64,
    drift: f64,
    residuals: Vec<f64>,
    config: BootstrapConfig,
}

impl ResidualBootstrap {
    /// Create a bootstrap simulator. NaN residuals are dropped.
    pub fn new(
        name: impl Into<String>,
        start: f64,
        residuals: &[f64],
        config: BootstrapConfig,
    ) -> Result<Self> {
        if !start.is_finite() {
            return Err(ForecastError::InvalidParameter(format!(
                "start must be finite, got {start}"
            )));
        }
        let supplied = residuals.len();
        let residuals: Vec<f64> = residuals.iter().copied().filter(|r| r.is_finite()).collect();
        if residuals.len() < supplied {
            tracing::warn!(
                dropped = supplied - residuals.len(),
                kept = residuals.len(),
                "ignoring non-finite residuals"
            );
        }
        if residuals.is_empty() {
            return Err(ForecastError::InvalidParameter(
                "no valid residuals for bootstrap".to_string(),
            ));
        }

        Ok(Self {
            name: name.into(),
            start,
            drift: 0.0,
            residuals,
            config,
        })
    }

    /// Add a deterministic change per step.
    pub fn with_drift(mut self, drift: f64) -> Self {
        self.drift = drift;
        self
    }

    pub fn residuals(&self) -> &[f64] {
        &self.residuals
    }
}

impl Simulator for ResidualBootstrap {
    fn simulate(&self, horizon: usize, n_paths: usize) -> Result<SamplePathSet> {
        check_dimensions(horizon, n_paths)?;
        let mut rng = make_rng(self.config.seed);

        let paths = (0..n_paths)
            .map(|_| {
                let innovations = match self.config.block_size {
                    Some(bs) => resample_blocks(&self.residuals, bs, horizon, &mut rng),
                    None => resample_residuals(&self.residuals, horizon, &mut rng),
                };
                integrate(self.start, self.drift, innovations.into_iter())
            })
            .collect();

        tracing::debug!(
            model = %self.name,
            horizon,
            n_paths,
            block_size = ?self.config.block_size,
            "simulated bootstrap paths"
        );

        SamplePathSet::new(self.name.clone(), paths)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Draw `len` residuals with replacement.
fn resample_residuals(residuals: &[f64], len: usize, rng: &mut impl Rng) -> Vec<f64> {
    let n = residuals.len();
    (0..len).map(|_| residuals[rng.gen_range(0..n)]).collect()
}

/// Draw `len` residuals as concatenated contiguous blocks.
fn resample_blocks(residuals: &[f64], block_size: usize, len: usize, rng: &mut impl Rng) -> Vec<f64> {
    let n = residuals.len();
    if block_size == 0 || block_size > n {
        return resample_residuals(residuals, len, rng);
    }

    let mut result = Vec::with_capacity(len);
    while result.len() < len {
        let start = rng.gen_range(0..=(n - block_size));
        let take = block_size.min(len - result.len());
        result.extend_from_slice(&residuals[start..start + take]);
    }
    result
}
