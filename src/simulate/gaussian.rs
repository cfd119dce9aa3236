//! Random walk with Gaussian innovations.

use crate::core::SamplePathSet;
use crate::error::{ForecastError, Result};
use crate::simulate::{check_dimensions, integrate, make_rng, Simulator};
use crate::utils::stats::{mean, std_dev};
use rand::distributions::Distribution;
use statrs::distribution::Normal;

/// Configuration for the Gaussian random walk.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianConfig {
    /// Standard deviation of the one-step innovations.
    pub sigma: f64,
    /// Deterministic change per step.
    pub drift: f64,
    /// Random seed for reproducibility (None for random).
    pub seed: Option<u64>,
}

impl Default for GaussianConfig {
    fn default() -> Self {
        Self {
            sigma: 1.0,
            drift: 0.0,
            seed: None,
        }
    }
}

impl GaussianConfig {
    /// Create a config with the given innovation standard deviation.
    pub fn new(sigma: f64) -> Self {
        Self {
            sigma,
            ..Default::default()
        }
    }

    pub fn with_drift(mut self, drift: f64) -> Self {
        self.drift = drift;
        self
    }

    /// Set random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// `y[h] = y[h-1] + drift + e[h]` with `e ~ N(0, sigma^2)`, starting at `start`.
#[derive(Debug, Clone)]
pub struct GaussianRandomWalk {
    name: String,
    start: f64,
    config: GaussianConfig,
    innovations: Normal,
}

impl GaussianRandomWalk {
    pub fn new(name: impl Into<String>, start: f64, config: GaussianConfig) -> Result<Self> {
        if !start.is_finite() {
            return Err(ForecastError::InvalidParameter(format!(
                "start must be finite, got {start}"
            )));
        }
        if !(config.sigma > 0.0 && config.sigma.is_finite()) || !config.drift.is_finite() {
            return Err(ForecastError::InvalidParameter(format!(
                "sigma must be positive and drift finite, got sigma={} drift={}",
                config.sigma, config.drift
            )));
        }
        let innovations = Normal::new(0.0, config.sigma)
            .map_err(|e| ForecastError::InvalidParameter(e.to_string()))?;

        Ok(Self {
            name: name.into(),
            start,
            config,
            innovations,
        })
    }

    /// Random walk continuing `history`, with drift and sigma taken from its
    /// first differences. Pass `with_drift = false` for a naive random walk.
    pub fn from_history(
        name: impl Into<String>,
        history: &[f64],
        with_drift: bool,
        seed: Option<u64>,
    ) -> Result<Self> {
        if history.len() < 3 {
            return Err(ForecastError::InvalidParameter(format!(
                "need at least 3 observations, got {}",
                history.len()
            )));
        }
        let diffs: Vec<f64> = history.windows(2).map(|w| w[1] - w[0]).collect();
        let drift = if with_drift { mean(&diffs) } else { 0.0 };
        let sigma = if with_drift {
            std_dev(&diffs)
        } else {
            (diffs.iter().map(|d| d * d).sum::<f64>() / diffs.len() as f64).sqrt()
        };

        let config = GaussianConfig {
            sigma,
            drift,
            seed,
        };
        Self::new(name, history[history.len() - 1], config)
    }

    pub fn config(&self) -> &GaussianConfig {
        &self.config
    }
}

impl Simulator for GaussianRandomWalk {
    fn simulate(&self, horizon: usize, n_paths: usize) -> Result<SamplePathSet> {
        check_dimensions(horizon, n_paths)?;
        let mut rng = make_rng(self.config.seed);

        let paths = (0..n_paths)
            .map(|_| {
                let draws: Vec<f64> = (0..horizon)
                    .map(|_| self.innovations.sample(&mut rng))
                    .collect();
                integrate(self.start, self.config.drift, draws.into_iter())
            })
            .collect();

        tracing::debug!(
            model = %self.name,
            horizon,
            n_paths,
            seed = ?self.config.seed,
            "simulated gaussian random walk"
        );

        SamplePathSet::new(self.name.clone(), paths)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn config_builder() {
        let config = GaussianConfig::new(2.5).with_drift(0.1).with_seed(7);
        assert_eq!(config.sigma, 2.5);
        assert_eq!(config.drift, 0.1);
        assert_eq!(config.seed, Some(7));
        assert!(GaussianConfig::default().seed.is_none());
    }

    #[test]
    fn rejects_bad_parameters() {
        assert!(GaussianRandomWalk::new("m", 0.0, GaussianConfig::new(0.0)).is_err());
        assert!(GaussianRandomWalk::new("m", f64::NAN, GaussianConfig::new(1.0)).is_err());
        assert!(GaussianRandomWalk::from_history("m", &[1.0, 2.0], true, None).is_err());
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let sim = GaussianRandomWalk::new("rw", 50.0, GaussianConfig::new(3.0).with_seed(42)).unwrap();
        let a = sim.simulate(12, 100).unwrap();
        let b = sim.simulate(12, 100).unwrap();
        assert_eq!(a, b);

        let other = GaussianRandomWalk::new("rw", 50.0, GaussianConfig::new(3.0).with_seed(43)).unwrap();
        assert_ne!(a, other.simulate(12, 100).unwrap());
    }

    #[test]
    fn spread_grows_with_horizon() {
        let sim = GaussianRandomWalk::new(
            "rw",
            100.0,
            GaussianConfig::new(1.0).with_drift(2.0).with_seed(1),
        )
        .unwrap();
        let set = sim.simulate(9, 4000).unwrap();

        // Mean follows the drift: 100 + 2h at step h-1.
        assert_relative_eq!(set.mean_at(0).unwrap(), 102.0, epsilon = 0.1);
        assert_relative_eq!(set.mean_at(8).unwrap(), 118.0, epsilon = 0.3);

        // Variance grows linearly: sd at step 9 is about 3.
        let sd_last = std_dev(&set.values_at(8).unwrap());
        let sd_first = std_dev(&set.values_at(0).unwrap());
        assert!(sd_last > 2.5 * sd_first);
    }

    #[test]
    fn from_history_estimates_drift() {
        let history: Vec<f64> = (0..20)
            .map(|i| 10.0 + 2.0 * i as f64 + if i % 2 == 0 { 0.5 } else { -0.5 })
            .collect();
        let sim = GaussianRandomWalk::from_history("drift", &history, true, Some(3)).unwrap();
        assert_relative_eq!(sim.config().drift, 37.0 / 19.0, epsilon = 1e-9);

        let naive = GaussianRandomWalk::from_history("naive", &history, false, Some(3)).unwrap();
        assert_eq!(naive.config().drift, 0.0);
        assert_eq!(naive.simulate(3, 5).unwrap().name(), "naive");
    }
}
