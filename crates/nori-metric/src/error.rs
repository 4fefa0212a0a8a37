//! Error types for nori-metric operations.

use thiserror::Error;

/// Errors that can occur while computing distances or searching columns.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MetricError {
    /// Two operands (or a matrix column and the query) have different lengths.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// A query argument is out of range (e.g. k == 0).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The metric name is not a built-in and no distance function was supplied.
    #[error("Invalid distance metric provided: {0}")]
    InvalidDistanceMetric(String),

    /// A caller-supplied distance function reported a failure.
    #[error("Distance function failed: {0}")]
    DistanceFunction(String),

    /// Invalid search configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type alias for metric operations.
pub type Result<T> = std::result::Result<T, MetricError>;

/// Fail with [`MetricError::DimensionMismatch`] unless both lengths agree.
#[inline]
pub(crate) fn check_dimensions(expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(MetricError::DimensionMismatch { expected, actual });
    }
    Ok(())
}
