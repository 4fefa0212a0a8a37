//! Dense column-major matrix.
//!
//! Columns are the unit of search: each column is a candidate vector and is
//! addressed by its 0-based index. Query vectors are plain `&[f64]` slices.

use crate::error::{check_dimensions, Result};

/// A dense matrix stored column by column in one contiguous buffer.
///
/// All columns share the same length (`rows`), so every column slice can be
/// handed to a distance function without copying.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    /// Column-major storage, `rows * cols` values
    data: Vec<f64>,
}

impl Matrix {
    /// Create a matrix from a column-major buffer.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if `data.len() != rows * cols`.
    ///
    /// # Example
    ///
    /// ```
    /// use nori_metric::Matrix;
    ///
    /// // Columns [1, 0] and [0, 1]
    /// let m = Matrix::new(2, 2, vec![1.0, 0.0, 0.0, 1.0]).unwrap();
    /// assert_eq!(m.column(1), Some(&[0.0, 1.0][..]));
    /// ```
    pub fn new(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        check_dimensions(rows.saturating_mul(cols), data.len())?;
        Ok(Self { rows, cols, data })
    }

    /// Create a matrix from a list of columns.
    ///
    /// An empty list yields a 0 x 0 matrix.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if the columns differ in length.
    pub fn from_columns<C: AsRef<[f64]>>(columns: &[C]) -> Result<Self> {
        let rows = columns.first().map_or(0, |c| c.as_ref().len());
        let mut data = Vec::with_capacity(rows * columns.len());

        for column in columns {
            let column = column.as_ref();
            check_dimensions(rows, column.len())?;
            data.extend_from_slice(column);
        }

        Ok(Self {
            rows,
            cols: columns.len(),
            data,
        })
    }

    /// Create a matrix from a list of rows, transposing into column order.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if the rows differ in length.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        for row in rows {
            check_dimensions(cols, row.as_ref().len())?;
        }

        let mut data = Vec::with_capacity(rows.len() * cols);
        for j in 0..cols {
            data.extend(rows.iter().map(|row| row.as_ref()[j]));
        }

        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    /// Length of every column.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Check if the matrix has no columns.
    pub fn is_empty(&self) -> bool {
        self.cols == 0
    }

    /// Get a column by index.
    #[inline]
    pub fn column(&self, index: usize) -> Option<&[f64]> {
        if index >= self.cols {
            return None;
        }
        let start = index * self.rows;
        Some(&self.data[start..start + self.rows])
    }

    /// Iterate over the columns in index order.
    pub fn columns(&self) -> impl ExactSizeIterator<Item = &[f64]> + '_ {
        (0..self.cols).map(move |i| {
            let start = i * self.rows;
            &self.data[start..start + self.rows]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MetricError;

    #[test]
    fn test_new_column_major() {
        let m = Matrix::new(3, 2, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        assert_eq!(m.rows(), 3);
        assert_eq!(m.cols(), 2);
        assert_eq!(m.column(0).unwrap(), &[1.0, 2.0, 3.0]);
        assert_eq!(m.column(1).unwrap(), &[4.0, 5.0, 6.0]);
        assert!(m.column(2).is_none());
    }

    #[test]
    fn test_new_wrong_length() {
        let result = Matrix::new(2, 2, vec![1.0, 2.0, 3.0]);
        assert_eq!(
            result.unwrap_err(),
            MetricError::DimensionMismatch {
                expected: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn test_from_columns() {
        let m = Matrix::from_columns(&[[1.0, 0.0], [0.0, 1.0], [1.0, 1.0]]).unwrap();
        assert_eq!(m.rows(), 2);
        assert_eq!(m.cols(), 3);

        let cols: Vec<&[f64]> = m.columns().collect();
        assert_eq!(cols, vec![&[1.0, 0.0][..], &[0.0, 1.0][..], &[1.0, 1.0][..]]);
    }

    #[test]
    fn test_from_columns_ragged() {
        let columns = vec![vec![1.0, 2.0, 3.0], vec![1.0, 2.0]];
        assert!(matches!(
            Matrix::from_columns(&columns),
            Err(MetricError::DimensionMismatch {
                expected: 3,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_from_rows_transposes() {
        // [[1, 2, 3],
        //  [4, 5, 6]]
        let m = Matrix::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();
        assert_eq!(m.rows(), 2);
        assert_eq!(m.cols(), 3);
        assert_eq!(m.column(0).unwrap(), &[1.0, 4.0]);
        assert_eq!(m.column(2).unwrap(), &[3.0, 6.0]);

        let ragged = vec![vec![1.0], vec![1.0, 2.0]];
        assert!(Matrix::from_rows(&ragged).is_err());
    }

    #[test]
    fn test_empty() {
        let empty: [Vec<f64>; 0] = [];
        let m = Matrix::from_columns(&empty).unwrap();
        assert!(m.is_empty());
        assert_eq!(m.columns().len(), 0);
    }
}
