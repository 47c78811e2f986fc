//! Error types of the forward model.

use thiserror::Error;

/// Result type for forward-model operations.
pub type SimResult<T> = Result<T, SimError>;

/// Errors raised by geometry, sampling and response operations.
///
/// Every error is local to the call that produced it. Retrying with the same
/// inputs always gives the same outcome.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// Non-positive or non-finite plane dimension, separation or calibration reference
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Bad event count, grid shape or distribution parameters
    #[error("Invalid sampling: {0}")]
    InvalidSampling(String),

    /// Distribution kind not known to the sampler
    #[error("Unsupported distribution: '{0}'")]
    UnsupportedDistribution(String),

    /// Per-event energy sequence does not match the number of events
    #[error("Energy size mismatch: expected {expected} values, got {actual}")]
    EnergySizeMismatch { expected: usize, actual: usize },
}
