//! Closest-column queries.
//!
//! Each query resolves its metric, scans every column of the matrix once and
//! returns the closest columns in ascending order of distance. Nothing is
//! cached between calls.

use serde::{Deserialize, Serialize};

use crate::config::SearchConfig;
use crate::error::{MetricError, Result};
use crate::matrix::Matrix;
use crate::metric::{DistanceFn, MetricHandle};
use crate::topk::Neighbor;

/// Result of a k-closest query as two parallel arrays.
///
/// `indices[i]` is the column at distance `distances[i]`; entries are sorted
/// by ascending distance, ties by ascending index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClosestColumns {
    /// 0-based column indices.
    pub indices: Vec<i32>,
    /// Distances to the query.
    pub distances: Vec<f64>,
}

impl ClosestColumns {
    /// Split sorted neighbors into parallel arrays.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if a column index does not fit in an `i32`.
    pub fn from_neighbors(neighbors: &[Neighbor]) -> Result<Self> {
        let mut indices = Vec::with_capacity(neighbors.len());
        let mut distances = Vec::with_capacity(neighbors.len());

        for neighbor in neighbors {
            indices.push(neighbor.index_i32()?);
            distances.push(neighbor.distance);
        }

        Ok(Self { indices, distances })
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Check if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Iterate over `(index, distance)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (i32, f64)> + '_ {
        self.indices.iter().copied().zip(self.distances.iter().copied())
    }
}

/// Find the column of `matrix` closest to `x`.
///
/// `metric_name` may be schema-qualified. Built-in names are computed
/// directly; any other name is evaluated with `dist`.
///
/// An empty matrix yields the sentinel `(0, +inf)`.
///
/// # Errors
///
/// - `DimensionMismatch` if the columns and `x` differ in length
/// - `InvalidDistanceMetric` if the name is not built in and `dist` is `None`
///
/// # Example
///
/// ```
/// use nori_metric::{closest_column, Matrix};
///
/// let m = Matrix::from_columns(&[[1.0, 0.0], [0.0, 1.0], [1.0, 1.0]]).unwrap();
/// let nearest = closest_column(&m, &[0.9, 1.2], None, "dist_norm2").unwrap();
/// assert_eq!(nearest.index, 2);
/// ```
pub fn closest_column(
    matrix: &Matrix,
    x: &[f64],
    dist: Option<&dyn DistanceFn>,
    metric_name: &str,
) -> Result<Neighbor> {
    let metric = MetricHandle::resolve(metric_name, dist)?;
    nearest_one(matrix, x, metric)
}

/// Find the `k` columns of `matrix` closest to `x`.
///
/// Exactly `k` entries are returned. When `k` exceeds the number of columns
/// the trailing entries are `(0, +inf)` sentinels.
///
/// # Errors
///
/// - `InvalidArgument` if `k == 0`
/// - `DimensionMismatch` if the columns and `x` differ in length
/// - `InvalidDistanceMetric` if the name is not built in and `dist` is `None`
///
/// # Example
///
/// ```
/// use nori_metric::{closest_columns, Matrix};
///
/// let m = Matrix::from_columns(&[[1.0, 0.0], [0.0, 1.0], [1.0, 1.0]]).unwrap();
/// let result = closest_columns(&m, &[0.0, 0.0], 2, None, "squared_dist_norm2").unwrap();
/// assert_eq!(result.indices, vec![0, 1]);
/// assert_eq!(result.distances, vec![1.0, 1.0]);
/// ```
pub fn closest_columns(
    matrix: &Matrix,
    x: &[f64],
    k: usize,
    dist: Option<&dyn DistanceFn>,
    metric_name: &str,
) -> Result<ClosestColumns> {
    check_k(k)?;
    let metric = MetricHandle::resolve(metric_name, dist)?;
    ClosestColumns::from_neighbors(&nearest(matrix, x, k, metric)?)
}

/// Like [`closest_column`], but only built-in metrics are accepted.
///
/// Surrounding whitespace in `metric_name` is ignored.
pub fn closest_column_builtin(
    matrix: &Matrix,
    x: &[f64],
    metric_name: &str,
) -> Result<Neighbor> {
    let metric = MetricHandle::resolve_builtin(metric_name)?;
    nearest_one(matrix, x, metric)
}

/// Like [`closest_columns`], but only built-in metrics are accepted.
///
/// Surrounding whitespace in `metric_name` is ignored.
pub fn closest_columns_builtin(
    matrix: &Matrix,
    x: &[f64],
    k: usize,
    metric_name: &str,
) -> Result<ClosestColumns> {
    check_k(k)?;
    let metric = MetricHandle::resolve_builtin(metric_name)?;
    ClosestColumns::from_neighbors(&nearest(matrix, x, k, metric)?)
}

/// Reusable closest-columns search with a fixed configuration.
///
/// # Example
///
/// ```
/// use nori_metric::{ColumnSearcher, Matrix, SearchConfig};
///
/// let config = SearchConfig::new().with_k(2).with_metric("dist_norm1");
/// let searcher = ColumnSearcher::new(config).unwrap();
/// let m = Matrix::from_columns(&[[5.0], [1.0], [2.0]]).unwrap();
///
/// let result = searcher.search(&m, &[0.0], None).unwrap();
/// assert_eq!(result.indices, vec![1, 2]);
/// ```
#[derive(Debug, Clone)]
pub struct ColumnSearcher {
    config: SearchConfig,
}

impl ColumnSearcher {
    /// Create a searcher after validating `config`.
    pub fn new(config: SearchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration this searcher runs with.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Resolve the configured metric, using `dist` for non-built-in names.
    pub fn metric<'a>(&self, dist: Option<&'a dyn DistanceFn>) -> Result<MetricHandle<'a>> {
        if self.config.builtin_only {
            MetricHandle::resolve_builtin(&self.config.metric)
        } else {
            MetricHandle::resolve(&self.config.metric, dist)
        }
    }

    /// Find the configured number of columns closest to `x`.
    pub fn search(
        &self,
        matrix: &Matrix,
        x: &[f64],
        dist: Option<&dyn DistanceFn>,
    ) -> Result<ClosestColumns> {
        let metric = self.metric(dist)?;
        ClosestColumns::from_neighbors(&nearest(matrix, x, self.config.k, metric)?)
    }
}

fn check_k(k: usize) -> Result<()> {
    if k == 0 {
        return Err(MetricError::InvalidArgument(
            "the number of closest columns must be a positive integer".to_string(),
        ));
    }
    Ok(())
}

fn nearest_one(matrix: &Matrix, x: &[f64], metric: MetricHandle<'_>) -> Result<Neighbor> {
    let neighbors = nearest(matrix, x, 1, metric)?;
    Ok(neighbors.first().copied().unwrap_or_else(Neighbor::sentinel))
}

fn nearest(
    matrix: &Matrix,
    x: &[f64],
    k: usize,
    metric: MetricHandle<'_>,
) -> Result<Vec<Neighbor>> {
    tracing::debug!(
        columns = matrix.cols(),
        rows = matrix.rows(),
        k,
        builtin = metric.is_builtin(),
        "closest column search"
    );

    if k > matrix.cols() {
        tracing::warn!(
            k,
            columns = matrix.cols(),
            "k exceeds the number of columns, result will contain sentinels"
        );
    }

    let neighbors = metric.closest(matrix, x, k)?;

    if let Some(best) = neighbors.first() {
        tracing::debug!(index = best.index, distance = best.distance, "closest column found");
    }

    Ok(neighbors)
}
