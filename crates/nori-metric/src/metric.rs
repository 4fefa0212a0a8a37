//! Metric name resolution.
//!
//! A metric is requested by function name, optionally schema-qualified
//! (`myschema.dist_norm2`). Names found in the built-in table resolve to a
//! [`BuiltinMetric`] and are evaluated without dynamic dispatch; any other
//! name is served by a caller-supplied [`DistanceFn`].

use std::fmt;

use crate::distance::{
    dist_angle, dist_norm1, dist_norm2, dist_tanimoto, squared_dist_norm2, BuiltinMetric,
};
use crate::error::{MetricError, Result};
use crate::matrix::Matrix;
use crate::topk::{select_closest, Neighbor};

/// Built-in metrics by function name, in the order of expected use.
///
/// The first matching entry wins; names are currently disjoint.
const BUILTIN_METRICS: [(&str, BuiltinMetric); 5] = [
    ("squared_dist_norm2", BuiltinMetric::SquaredNorm2),
    ("dist_norm2", BuiltinMetric::Norm2),
    ("dist_norm1", BuiltinMetric::Norm1),
    ("dist_angle", BuiltinMetric::Angle),
    ("dist_tanimoto", BuiltinMetric::Tanimoto),
];

/// A caller-supplied distance function.
///
/// Called once per column as `distance(column, query)`. Closures of type
/// `Fn(&[f64], &[f64]) -> f64` implement this trait; implement it directly
/// when the computation can fail.
pub trait DistanceFn {
    /// Compute the distance between a matrix column and the query vector.
    fn distance(&self, column: &[f64], query: &[f64]) -> Result<f64>;
}

impl<F> DistanceFn for F
where
    F: Fn(&[f64], &[f64]) -> f64,
{
    fn distance(&self, column: &[f64], query: &[f64]) -> Result<f64> {
        Ok(self(column, query))
    }
}

/// Strip a schema qualifier from a function name.
///
/// Everything up to and including the last `.` is dropped.
///
/// ```
/// use nori_metric::metric::function_name;
///
/// assert_eq!(function_name("myschema.dist_norm2"), "dist_norm2");
/// assert_eq!(function_name("dist_norm2"), "dist_norm2");
/// ```
pub fn function_name(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

/// Look up a bare function name in the built-in table (case-sensitive).
pub fn lookup_builtin(function: &str) -> Option<BuiltinMetric> {
    BUILTIN_METRICS
        .iter()
        .find(|(name, _)| *name == function)
        .map(|&(_, metric)| metric)
}

/// The metric used for one query.
#[derive(Clone, Copy)]
pub enum MetricHandle<'a> {
    /// One of the built-in distances (fast path).
    Builtin(BuiltinMetric),
    /// A caller-supplied distance function.
    External(&'a dyn DistanceFn),
}

impl<'a> MetricHandle<'a> {
    /// Resolve a metric name.
    ///
    /// Built-in names (with or without a schema qualifier) resolve to
    /// [`MetricHandle::Builtin`]. Any other name resolves to `external`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDistanceMetric` if the name is not a built-in and no
    /// external function was supplied.
    pub fn resolve(name: &str, external: Option<&'a dyn DistanceFn>) -> Result<Self> {
        let function = function_name(name);

        if let Some(metric) = lookup_builtin(function) {
            tracing::debug!(name, metric = %metric, "resolved built-in metric");
            return Ok(Self::Builtin(metric));
        }

        match external {
            Some(f) => {
                tracing::debug!(name, "resolved external distance function");
                Ok(Self::External(f))
            }
            None => Err(MetricError::InvalidDistanceMetric(format!(
                "{name}. No distance function was supplied for a metric that is not built in."
            ))),
        }
    }

    /// Resolve a metric name against the built-in table only.
    ///
    /// Surrounding whitespace is ignored and schema qualifiers are stripped.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDistanceMetric` for any name that is not a built-in.
    pub fn resolve_builtin(name: &str) -> Result<Self> {
        let trimmed = name.trim();

        match lookup_builtin(function_name(trimmed)) {
            Some(metric) => {
                tracing::debug!(name = trimmed, metric = %metric, "resolved built-in metric");
                Ok(Self::Builtin(metric))
            }
            None => Err(MetricError::InvalidDistanceMetric(format!(
                "{trimmed}. Currently only built-in distance functions are supported."
            ))),
        }
    }

    /// Check if this handle takes the built-in fast path.
    pub fn is_builtin(&self) -> bool {
        matches!(self, Self::Builtin(_))
    }

    /// Compute the distance between a column and the query.
    pub fn distance(&self, column: &[f64], query: &[f64]) -> Result<f64> {
        match self {
            Self::Builtin(metric) => metric.distance(column, query),
            Self::External(f) => f.distance(column, query),
        }
    }

    /// Run the top-k scan with this metric.
    ///
    /// Each built-in gets its own monomorphized scan; external functions are
    /// called through the trait object once per column.
    pub(crate) fn closest(
        &self,
        matrix: &Matrix,
        query: &[f64],
        k: usize,
    ) -> Result<Vec<Neighbor>> {
        match *self {
            Self::Builtin(BuiltinMetric::SquaredNorm2) => {
                select_closest(matrix, query, k, squared_dist_norm2)
            }
            Self::Builtin(BuiltinMetric::Norm2) => select_closest(matrix, query, k, dist_norm2),
            Self::Builtin(BuiltinMetric::Norm1) => select_closest(matrix, query, k, dist_norm1),
            Self::Builtin(BuiltinMetric::Angle) => select_closest(matrix, query, k, dist_angle),
            Self::Builtin(BuiltinMetric::Tanimoto) => {
                select_closest(matrix, query, k, dist_tanimoto)
            }
            Self::External(f) => {
                select_closest(matrix, query, k, |column, q| f.distance(column, q))
            }
        }
    }
}

impl fmt::Debug for MetricHandle<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin(metric) => f.debug_tuple("Builtin").field(metric).finish(),
            Self::External(_) => f.write_str("External(..)"),
        }
    }
}
