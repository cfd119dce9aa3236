//! Ensemble forecasts from pooled sample paths.
//!
//! A pooled ensemble is itself a [`SamplePathSet`](crate::core::SamplePathSet)
//! and is scored exactly like a single model.

mod combiner;

pub use combiner::{
    combination_mean, EnsembleCombiner, EnsembleConfig, EnsembleMember, Share,
};
