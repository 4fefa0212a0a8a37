//! Exact nearest-column search for NoriKV.
//!
//! This crate answers "which columns of this matrix are closest to this
//! vector?" with an exhaustive linear scan:
//!
//! - **Distance functions**: L1, L2, squared L2, angle, Tanimoto, plus the
//!   L1/L2 magnitudes of a single vector
//! - **Metric resolution**: schema-qualified function names map to a built-in
//!   fast path, anything else to a caller-supplied [`DistanceFn`]
//! - **Top-k selection**: a bounded max-heap keeps the k best columns in
//!   O(n log k) time and O(k) space
//!
//! Results are sorted by ascending distance; equal distances are ordered by
//! ascending column index.
//!
//! # Example
//!
//! ```
//! use nori_metric::{closest_column, closest_columns, Matrix};
//!
//! // Three 2-dimensional columns
//! let m = Matrix::from_columns(&[[1.0, 0.0], [0.0, 1.0], [1.0, 1.0]]).unwrap();
//!
//! let nearest = closest_column(&m, &[0.0, 0.0], None, "squared_dist_norm2").unwrap();
//! assert_eq!((nearest.index, nearest.distance), (0, 1.0));
//!
//! // Unknown metric names are served by a supplied function
//! let chebyshev = |a: &[f64], b: &[f64]| {
//!     a.iter().zip(b).map(|(x, y)| (x - y).abs()).fold(0.0, f64::max)
//! };
//! let result = closest_columns(&m, &[2.0, 2.0], 2, Some(&chebyshev), "udf.chebyshev").unwrap();
//! assert_eq!(result.indices, vec![2, 0]);
//! ```

mod config;
mod distance;
mod error;
mod matrix;
pub mod metric;
mod search;
mod topk;

pub use config::SearchConfig;
pub use distance::{
    dist_angle, dist_norm1, dist_norm2, dist_tanimoto, norm1, norm2, squared_dist_norm2,
    BuiltinMetric,
};
pub use error::{MetricError, Result};
pub use matrix::Matrix;
pub use metric::{DistanceFn, MetricHandle};
pub use search::{
    closest_column, closest_column_builtin, closest_columns, closest_columns_builtin,
    ClosestColumns, ColumnSearcher,
};
pub use topk::{select_closest, Neighbor, TopK};
