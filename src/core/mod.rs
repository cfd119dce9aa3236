//! Core data structures: sample paths, the per-model store and point forecasts.

mod forecast;
mod sample_paths;
mod store;

pub use forecast::Forecast;
pub use sample_paths::SamplePathSet;
pub use store::SamplePathStore;
