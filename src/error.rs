//! Error types for the pathcast library.

use thiserror::Error;

/// Result type alias for scoring and ensemble operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Errors that can occur while building, scoring or combining forecasts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Probability level outside the open interval (0, 1).
    #[error("probability level must lie strictly between 0 and 1, got {0}")]
    InvalidProbability(f64),

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A sample path value is NaN or infinite.
    #[error("non-finite value in path {path} at step {step}")]
    NonFiniteValue { path: usize, step: usize },

    /// Sample paths do not share the same horizon.
    #[error("incompatible horizon: expected {expected} steps, got {got}")]
    IncompatibleHorizon { expected: usize, got: usize },

    /// Dimension mismatch between data structures.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Index out of bounds.
    #[error("index out of bounds: {index} (size: {size})")]
    IndexOutOfBounds { index: usize, size: usize },

    /// Model name not present in a store.
    #[error("unknown model: {0}")]
    UnknownModel(String),

    /// Skill score requested against a baseline CRPS that cannot be divided by.
    #[error("skill score undefined for baseline CRPS {baseline}")]
    UndefinedSkillScore { baseline: f64 },

    /// Timestamp-related error.
    #[error("timestamp error: {0}")]
    TimestampError(String),
}
