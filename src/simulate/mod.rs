//! Sample path generators.
//!
//! Scoring never draws random numbers itself; path sets come from a
//! [`Simulator`]. The simulators here are seeded at construction so every
//! run of an experiment yields the same paths.

mod bootstrap;
mod gaussian;

use crate::core::{SamplePathSet, SamplePathStore};
use crate::error::{ForecastError, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;

pub use bootstrap::{BootstrapConfig, ResidualBootstrap};
pub use gaussian::{GaussianConfig, GaussianRandomWalk};

/// Common interface for anything that produces sample paths.
///
/// This trait is object-safe and can be used with `Box<dyn Simulator>`.
pub trait Simulator {
    /// Simulate `n_paths` trajectories of `horizon` steps.
    fn simulate(&self, horizon: usize, n_paths: usize) -> Result<SamplePathSet>;

    /// Model name given to the simulated path set.
    fn name(&self) -> &str;
}

/// Type alias for boxed simulator trait objects.
pub type BoxedSimulator = Box<dyn Simulator>;

/// Run every simulator with the same horizon and path count.
///
/// # Example
/// ```
/// use pathcast::simulate::{
///     simulate_all, BoxedSimulator, GaussianConfig, GaussianRandomWalk,
/// };
///
/// let simulators: Vec<BoxedSimulator> = vec![
///     Box::new(GaussianRandomWalk::new("naive", 100.0, GaussianConfig::new(2.0).with_seed(1)).unwrap()),
///     Box::new(GaussianRandomWalk::new("drift", 100.0, GaussianConfig::new(2.0).with_drift(0.5).with_seed(2)).unwrap()),
/// ];
///
/// let store = simulate_all(&simulators, 12, 200).unwrap();
/// assert_eq!(store.len(), 2);
/// assert_eq!(store.horizon(), Some(12));
/// ```
pub fn simulate_all(
    simulators: &[BoxedSimulator],
    horizon: usize,
    n_paths: usize,
) -> Result<SamplePathStore> {
    SamplePathStore::from_sets(
        simulators
            .iter()
            .map(|s| s.simulate(horizon, n_paths))
            .collect::<Result<Vec<_>>>()?,
    )
}

fn check_dimensions(horizon: usize, n_paths: usize) -> Result<()> {
    if horizon == 0 || n_paths == 0 {
        return Err(ForecastError::EmptyData);
    }
    Ok(())
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Accumulate innovations into a level path starting after `start`.
fn integrate(start: f64, drift: f64, innovations: impl Iterator<Item = f64>) -> Vec<f64> {
    innovations
        .scan(start, |level, e| {
            *level += drift + e;
            Some(*level)
        })
        .collect()
}
