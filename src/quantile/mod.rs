//! Empirical quantile forecasts from sample paths.
//!
//! Quantiles are read from the cross-section of all paths at a horizon step,
//! interpolating linearly between order statistics.

mod estimator;
mod level;

pub use estimator::{
    empirical_quantile, estimate, QuantileEstimator, QuantileForecast, StepQuantiles,
};
pub use level::{ProbabilityGrid, ProbabilityLevel};
