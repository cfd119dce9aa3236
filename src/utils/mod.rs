//! Utility functions shared by the scoring components.

pub mod metrics;
pub mod stats;

pub use metrics::{point_accuracy, PointAccuracy};
