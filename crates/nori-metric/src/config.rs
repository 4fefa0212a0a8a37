//! Column search configuration.

use serde::{Deserialize, Serialize};

use crate::distance::BuiltinMetric;
use crate::error::{MetricError, Result};

/// Configuration for a [`ColumnSearcher`](crate::ColumnSearcher).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Number of closest columns to return.
    /// Default: 1
    pub k: usize,

    /// Metric function name, optionally schema-qualified.
    /// Default: "squared_dist_norm2"
    pub metric: String,

    /// Reject metric names that are not built in instead of calling a
    /// supplied distance function.
    /// Default: false
    pub builtin_only: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            k: 1,
            metric: BuiltinMetric::SquaredNorm2.name().to_string(),
            builtin_only: false,
        }
    }
}

impl SearchConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of closest columns.
    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    /// Set the metric function name.
    pub fn with_metric(mut self, metric: impl Into<String>) -> Self {
        self.metric = metric.into();
        self
    }

    /// Only accept built-in metric names.
    pub fn with_builtin_only(mut self, builtin_only: bool) -> Self {
        self.builtin_only = builtin_only;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.k == 0 {
            return Err(MetricError::Config("k must be > 0".to_string()));
        }

        if self.metric.trim().is_empty() {
            return Err(MetricError::Config("metric name must not be empty".to_string()));
        }

        Ok(())
    }
}
