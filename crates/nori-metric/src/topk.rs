//! Bounded top-k selection over matrix columns.
//!
//! [`TopK`] is a fixed-capacity max-heap whose root is the worst candidate
//! kept so far. A new candidate only touches the heap when it is strictly
//! closer than the root, so a scan over `n` columns costs O(n log k) time and
//! O(k) extra space.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};

use crate::error::{check_dimensions, MetricError, Result};
use crate::matrix::Matrix;

/// A column index paired with its distance to the query.
///
/// Equality and ordering treat `-0.0` and `0.0` as the same distance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Neighbor {
    /// 0-based column index.
    pub index: usize,
    /// Distance to the query (lower = closer).
    pub distance: f64,
}

impl Neighbor {
    /// Create a new neighbor. A distance of `-0.0` is stored as `0.0`.
    pub fn new(index: usize, distance: f64) -> Self {
        Self {
            index,
            distance: unsigned_zero(distance),
        }
    }

    /// Placeholder occupying unfilled slots: index 0 at infinite distance.
    pub fn sentinel() -> Self {
        Self::new(0, f64::INFINITY)
    }

    /// The column index as the 32-bit integer hosts expect.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the index does not fit in an `i32`.
    pub fn index_i32(&self) -> Result<i32> {
        i32::try_from(self.index).map_err(|_| {
            MetricError::InvalidArgument(format!(
                "column index {} does not fit in a 32-bit integer",
                self.index
            ))
        })
    }
}

/// Map `-0.0` to `0.0`; every other value is unchanged.
#[inline]
fn unsigned_zero(distance: f64) -> f64 {
    distance + 0.0
}

impl PartialEq for Neighbor {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Neighbor {}

impl PartialOrd for Neighbor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Neighbor {
    /// Order by distance, then by index.
    ///
    /// In the max-heap this puts the farthest candidate at the root and, among
    /// equal distances, the one with the highest index, so that lower indices
    /// survive ties. Signed zeros are equal distances.
    fn cmp(&self, other: &Self) -> Ordering {
        unsigned_zero(self.distance)
            .total_cmp(&unsigned_zero(other.distance))
            .then_with(|| self.index.cmp(&other.index))
    }
}

/// Fixed-capacity set of the k best candidates seen so far.
///
/// Always holds exactly `k` entries; slots that were never filled keep the
/// [`Neighbor::sentinel`] value.
#[derive(Debug, Clone)]
pub struct TopK {
    heap: BinaryHeap<Neighbor>,
}

impl TopK {
    /// Create a set of `k` sentinel entries.
    pub fn new(k: usize) -> Self {
        let mut heap = BinaryHeap::with_capacity(k);
        heap.extend(std::iter::repeat(Neighbor::sentinel()).take(k));
        Self { heap }
    }

    /// Number of entries (always the capacity it was created with).
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Check if the set was created with k == 0.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// The current worst retained candidate.
    pub fn worst(&self) -> Option<&Neighbor> {
        self.heap.peek()
    }

    /// Offer a candidate.
    ///
    /// The candidate replaces the worst entry only if its distance is strictly
    /// smaller. NaN distances never compare smaller and are dropped. Returns
    /// `true` if the candidate was kept.
    #[inline]
    pub fn offer(&mut self, index: usize, distance: f64) -> bool {
        match self.heap.peek_mut() {
            Some(mut worst) if distance < worst.distance => {
                // PeekMut restores the heap property when dropped
                *worst = Neighbor::new(index, distance);
                true
            }
            _ => false,
        }
    }

    /// Consume the set, returning entries sorted by ascending distance with
    /// ties broken by ascending index.
    pub fn into_sorted_vec(self) -> Vec<Neighbor> {
        self.heap.into_sorted_vec()
    }
}

/// Find the `k` columns of `matrix` closest to `query`.
///
/// `distance` is called once per column as `distance(column, query)`. Each
/// column's length is checked against the query before the call, so a
/// mismatch fails on the first column that is compared.
///
/// Returns exactly `k` entries sorted ascending; if `k` exceeds the number
/// of columns the trailing entries are sentinels.
pub fn select_closest<F>(
    matrix: &Matrix,
    query: &[f64],
    k: usize,
    mut distance: F,
) -> Result<Vec<Neighbor>>
where
    F: FnMut(&[f64], &[f64]) -> Result<f64>,
{
    let mut top = TopK::new(k);

    for (i, column) in matrix.columns().enumerate() {
        check_dimensions(column.len(), query.len())?;

        let d = distance(column, query)?;
        if top.offer(i, d) {
            tracing::trace!(column = i, distance = d, "candidate kept");
        }
    }

    Ok(top.into_sorted_vec())
}
