//! # pathcast
//!
//! Probabilistic forecast evaluation from simulated sample paths.
//!
//! Provides empirical quantile forecasts, pinball loss, CRPS and skill
//! scores, and ensembles built by pooling the sample paths of several
//! models. Path generation sits behind the [`simulate::Simulator`] trait so
//! that scoring stays free of randomness.

pub mod core;
pub mod ensemble;
pub mod error;
pub mod quantile;
pub mod scoring;
pub mod simulate;
pub mod utils;

pub use error::{ForecastError, Result};

pub mod prelude {
    pub use crate::core::{Forecast, SamplePathSet, SamplePathStore};
    pub use crate::ensemble::{EnsembleCombiner, EnsembleConfig, EnsembleMember, Share};
    pub use crate::error::{ForecastError, Result};
    pub use crate::quantile::{estimate, ProbabilityGrid, QuantileEstimator};
    pub use crate::scoring::{
        crps, pinball_loss, skill_score, CrpsMethod, ScoreEngine, ScoringConfig,
    };
    pub use crate::simulate::Simulator;
}
