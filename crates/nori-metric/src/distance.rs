//! Distance functions between dense `f64` vectors.
//!
//! Five built-in distances are provided:
//! - **L1** (`dist_norm1`): sum of absolute differences
//! - **L2** (`dist_norm2`) and its square (`squared_dist_norm2`)
//! - **Angle** (`dist_angle`): angle in radians between two vectors
//! - **Tanimoto** (`dist_tanimoto`): set-similarity style distance, not a metric
//!
//! Every pairwise function checks that both operands have the same length and
//! returns [`MetricError::DimensionMismatch`](crate::MetricError) otherwise.
//! The inner loops are unrolled by four so release builds auto-vectorize them.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{check_dimensions, MetricError, Result};

/// Smallest positive subnormal `f64`. Norms below this are treated as zero.
const DENORM_MIN: f64 = 4.940_656_458_412_465_4e-324;

/// Built-in distance tags.
///
/// The fast path of the column search dispatches on this enum instead of
/// calling through a trait object per column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuiltinMetric {
    /// Squared Euclidean distance: sum((a[i] - b[i])^2)
    SquaredNorm2,
    /// Euclidean distance: sqrt(sum((a[i] - b[i])^2))
    Norm2,
    /// Manhattan distance: sum(|a[i] - b[i]|)
    Norm1,
    /// Angle between the vectors, in [0, pi]
    Angle,
    /// Tanimoto distance: (s - 2d) / (s - d) with s = |a|^2 + |b|^2, d = a · b
    Tanimoto,
}

impl BuiltinMetric {
    /// All built-in metrics, in the order their names are matched.
    pub const ALL: [BuiltinMetric; 5] = [
        Self::SquaredNorm2,
        Self::Norm2,
        Self::Norm1,
        Self::Angle,
        Self::Tanimoto,
    ];

    /// Compute the distance between two vectors.
    #[inline]
    pub fn distance(&self, a: &[f64], b: &[f64]) -> Result<f64> {
        match self {
            Self::SquaredNorm2 => squared_dist_norm2(a, b),
            Self::Norm2 => dist_norm2(a, b),
            Self::Norm1 => dist_norm1(a, b),
            Self::Angle => dist_angle(a, b),
            Self::Tanimoto => dist_tanimoto(a, b),
        }
    }

    /// The function name this metric is registered under.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SquaredNorm2 => "squared_dist_norm2",
            Self::Norm2 => "dist_norm2",
            Self::Norm1 => "dist_norm1",
            Self::Angle => "dist_angle",
            Self::Tanimoto => "dist_tanimoto",
        }
    }
}

impl fmt::Display for BuiltinMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BuiltinMetric {
    type Err = MetricError;

    /// Parse a bare function name. Schema qualifiers are not stripped here;
    /// see [`crate::metric::function_name`].
    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| MetricError::InvalidDistanceMetric(s.to_string()))
    }
}

/// L1 magnitude of a vector: sum(|x[i]|).
///
/// # Example
///
/// ```
/// use nori_metric::norm1;
///
/// assert_eq!(norm1(&[1.0, -2.0, 3.0]), 6.0);
/// ```
#[inline]
pub fn norm1(x: &[f64]) -> f64 {
    x.iter().map(|v| v.abs()).sum()
}

/// L2 magnitude of a vector: sqrt(sum(x[i]^2)).
///
/// # Example
///
/// ```
/// use nori_metric::norm2;
///
/// assert_eq!(norm2(&[3.0, 4.0]), 5.0);
/// ```
#[inline]
pub fn norm2(x: &[f64]) -> f64 {
    squared_norm(x).sqrt()
}

/// Manhattan (L1) distance between two vectors.
///
/// # Example
///
/// ```
/// use nori_metric::dist_norm1;
///
/// let d = dist_norm1(&[1.0, 2.0], &[4.0, 0.0]).unwrap();
/// assert_eq!(d, 5.0);
/// ```
#[inline]
pub fn dist_norm1(a: &[f64], b: &[f64]) -> Result<f64> {
    check_dimensions(a.len(), b.len())?;

    let mut sum = 0.0f64;
    let chunks = a.len() / 4;

    for i in 0..chunks {
        let base = i * 4;
        sum += (a[base] - b[base]).abs()
            + (a[base + 1] - b[base + 1]).abs()
            + (a[base + 2] - b[base + 2]).abs()
            + (a[base + 3] - b[base + 3]).abs();
    }

    for i in (chunks * 4)..a.len() {
        sum += (a[i] - b[i]).abs();
    }

    Ok(sum)
}

/// Euclidean (L2) distance between two vectors.
///
/// # Example
///
/// ```
/// use nori_metric::dist_norm2;
///
/// let d = dist_norm2(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]).unwrap();
/// assert!((d - 27.0f64.sqrt()).abs() < 1e-12);
/// ```
#[inline]
pub fn dist_norm2(a: &[f64], b: &[f64]) -> Result<f64> {
    Ok(squared_dist_norm2(a, b)?.sqrt())
}

/// Squared Euclidean distance.
///
/// Preserves the ordering of [`dist_norm2`] without the square root, which
/// makes it the cheapest choice when only the nearest columns matter.
#[inline]
pub fn squared_dist_norm2(a: &[f64], b: &[f64]) -> Result<f64> {
    check_dimensions(a.len(), b.len())?;

    let mut sum = 0.0f64;
    let chunks = a.len() / 4;

    for i in 0..chunks {
        let base = i * 4;
        let d0 = a[base] - b[base];
        let d1 = a[base + 1] - b[base + 1];
        let d2 = a[base + 2] - b[base + 2];
        let d3 = a[base + 3] - b[base + 3];
        sum += d0 * d0 + d1 * d1 + d2 * d2 + d3 * d3;
    }

    for i in (chunks * 4)..a.len() {
        let d = a[i] - b[i];
        sum += d * d;
    }

    Ok(sum)
}

/// Angle between two vectors, in radians.
///
/// Returns a value in [0, pi]. When either vector has a norm below the
/// smallest subnormal (i.e. it is the zero vector) the angle is undefined and
/// pi is returned.
///
/// # Example
///
/// ```
/// use nori_metric::dist_angle;
/// use std::f64::consts::FRAC_PI_2;
///
/// let d = dist_angle(&[1.0, 0.0], &[0.0, 1.0]).unwrap();
/// assert!((d - FRAC_PI_2).abs() < 1e-12);
/// ```
#[inline]
pub fn dist_angle(a: &[f64], b: &[f64]) -> Result<f64> {
    check_dimensions(a.len(), b.len())?;

    let (dot, sq_a, sq_b) = dot_and_norms(a, b);
    let norm_a = sq_a.sqrt();
    let norm_b = sq_b.sqrt();
    if norm_a < DENORM_MIN || norm_b < DENORM_MIN {
        return Ok(PI);
    }

    // sqrt(|a|^2 |b|^2) is exact for a == b; fall back to dividing by each
    // norm when the product under- or overflows.
    let denom = (sq_a * sq_b).sqrt();
    let cosine = if denom.is_normal() {
        dot / denom
    } else {
        dot / norm_a / norm_b
    };

    // Clamp to [-1, 1] to absorb rounding drift
    Ok(cosine.clamp(-1.0, 1.0).acos())
}

/// Tanimoto distance between two vectors.
///
/// With `s = |a|^2 + |b|^2` and `d = a · b` this is `(s - 2d) / (s - d)`.
/// Note that this is not a metric in general. The denominator is only zero
/// when both inputs are zero vectors, in which case the result is NaN.
///
/// # Example
///
/// ```
/// use nori_metric::dist_tanimoto;
///
/// let d = dist_tanimoto(&[1.0, 0.0], &[0.0, 1.0]).unwrap();
/// assert_eq!(d, 1.0);
/// ```
#[inline]
pub fn dist_tanimoto(a: &[f64], b: &[f64]) -> Result<f64> {
    check_dimensions(a.len(), b.len())?;

    let (dot, sq_a, sq_b) = dot_and_norms(a, b);
    let sum = sq_a + sq_b;
    Ok((sum - 2.0 * dot) / (sum - dot))
}

/// Compute dot product and squared norms in a single pass.
///
/// Returns (dot, norm_a_squared, norm_b_squared)
#[inline]
fn dot_and_norms(a: &[f64], b: &[f64]) -> (f64, f64, f64) {
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;

    let chunks = a.len() / 4;

    for i in 0..chunks {
        let base = i * 4;

        dot += a[base] * b[base]
            + a[base + 1] * b[base + 1]
            + a[base + 2] * b[base + 2]
            + a[base + 3] * b[base + 3];

        norm_a += a[base] * a[base]
            + a[base + 1] * a[base + 1]
            + a[base + 2] * a[base + 2]
            + a[base + 3] * a[base + 3];

        norm_b += b[base] * b[base]
            + b[base + 1] * b[base + 1]
            + b[base + 2] * b[base + 2]
            + b[base + 3] * b[base + 3];
    }

    for i in (chunks * 4)..a.len() {
        dot += a[i] * b[i];
        norm_a += a[i] * a[i];
        norm_b += b[i] * b[i];
    }

    (dot, norm_a, norm_b)
}

#[inline]
fn squared_norm(x: &[f64]) -> f64 {
    x.iter().map(|v| v * v).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_norms() {
        assert_eq!(norm1(&[]), 0.0);
        assert_eq!(norm1(&[-1.5, 2.5]), 4.0);
        assert_eq!(norm2(&[3.0, 4.0]), 5.0);
        assert_eq!(norm2(&[0.0, 0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_dist_norm1() {
        assert_eq!(dist_norm1(&[1.0, 1.0], &[1.0, 1.0]).unwrap(), 0.0);
        assert_eq!(dist_norm1(&[0.0, 0.0], &[3.0, -4.0]).unwrap(), 7.0);

        // Exercises both the unrolled chunk and the remainder
        let a: Vec<f64> = (0..7).map(|i| i as f64).collect();
        let b: Vec<f64> = (0..7).map(|i| (i * 2) as f64).collect();
        assert_eq!(dist_norm1(&a, &b).unwrap(), 21.0);
    }

    #[test]
    fn test_dist_norm2() {
        let a = [0.0, 0.0, 0.0];
        let b = [3.0, 4.0, 0.0];
        assert_eq!(dist_norm2(&a, &b).unwrap(), 5.0);
        assert_eq!(squared_dist_norm2(&a, &b).unwrap(), 25.0);

        let c = [1.0, 2.0, 3.0];
        assert_eq!(dist_norm2(&c, &c).unwrap(), 0.0);
    }

    #[test]
    fn test_high_dimensional() {
        let a: Vec<f64> = (0..128).map(|i| i as f64).collect();
        let b: Vec<f64> = (0..128).map(|i| (i + 1) as f64).collect();

        // Each diff is 1
        assert_eq!(squared_dist_norm2(&a, &b).unwrap(), 128.0);
        assert!((dist_norm2(&a, &b).unwrap() - 128f64.sqrt()).abs() < 1e-12);
        assert_eq!(dist_norm1(&a, &b).unwrap(), 128.0);
    }

    #[test]
    fn test_dist_angle() {
        let x = [1.0, 1.0];
        assert_eq!(dist_angle(&x, &x).unwrap(), 0.0);

        let d = dist_angle(&[1.0, 0.0], &[0.0, 1.0]).unwrap();
        assert!((d - std::f64::consts::FRAC_PI_2).abs() < 1e-12);

        let d = dist_angle(&[1.0, 0.0], &[-1.0, 0.0]).unwrap();
        assert!((d - PI).abs() < 1e-12);

        // Parallel vectors of different magnitude
        let d = dist_angle(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]).unwrap();
        assert!(d.abs() < 1e-7);
    }

    #[test]
    fn test_dist_angle_zero_vector() {
        let zero = [0.0, 0.0, 0.0];
        let b = [1.0, 2.0, 3.0];
        assert_eq!(dist_angle(&zero, &b).unwrap(), PI);
        assert_eq!(dist_angle(&b, &zero).unwrap(), PI);
        assert_eq!(dist_angle(&zero, &zero).unwrap(), PI);
        assert_eq!(dist_angle(&[], &[]).unwrap(), PI);
    }

    #[test]
    fn test_dist_angle_tiny_norms() {
        // |a|^2 |b|^2 underflows, but the angle is still well defined
        let a = [1e-160, 0.0];
        let b = [0.0, 1e-160];
        let d = dist_angle(&a, &b).unwrap();
        assert!((d - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_dist_tanimoto() {
        // Orthogonal unit vectors: s = 2, d = 0 => 2 / 2
        assert_eq!(dist_tanimoto(&[1.0, 0.0], &[0.0, 1.0]).unwrap(), 1.0);

        // Identical non-zero vectors: s = 2|x|^2, d = |x|^2 => 0 / |x|^2
        let x = [1.0, 2.0, 3.0];
        assert_eq!(dist_tanimoto(&x, &x).unwrap(), 0.0);

        // s = 1 + 4 = 5, d = 2 => 1 / 3
        let d = dist_tanimoto(&[1.0], &[2.0]).unwrap();
        assert!((d - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_dist_tanimoto_zero_vectors_is_nan() {
        let zero = [0.0, 0.0];
        assert!(dist_tanimoto(&zero, &zero).unwrap().is_nan());
    }

    #[test]
    fn test_dimension_mismatch() {
        let a = [1.0, 2.0, 3.0];
        let b = [1.0, 2.0, 3.0, 4.0];

        for metric in BuiltinMetric::ALL {
            let err = metric.distance(&a, &b).unwrap_err();
            assert_eq!(
                err,
                MetricError::DimensionMismatch {
                    expected: 3,
                    actual: 4
                },
                "{metric} accepted mismatched lengths"
            );
        }
    }

    #[test]
    fn test_builtin_metric_enum() {
        let a = [1.0, 0.0];
        let b = [0.0, 1.0];

        let d = BuiltinMetric::Norm2.distance(&a, &b).unwrap();
        assert!((d - std::f64::consts::SQRT_2).abs() < 1e-12);

        assert_eq!(BuiltinMetric::SquaredNorm2.distance(&a, &b).unwrap(), 2.0);
        assert_eq!(BuiltinMetric::Norm1.distance(&a, &b).unwrap(), 2.0);
        assert_eq!(BuiltinMetric::Tanimoto.distance(&a, &b).unwrap(), 1.0);
    }

    #[test]
    fn test_builtin_metric_names() {
        for metric in BuiltinMetric::ALL {
            assert_eq!(metric.name().parse::<BuiltinMetric>().unwrap(), metric);
            assert_eq!(metric.to_string(), metric.name());
        }

        assert!(matches!(
            "DIST_NORM2".parse::<BuiltinMetric>(),
            Err(MetricError::InvalidDistanceMetric(_))
        ));
    }
}
